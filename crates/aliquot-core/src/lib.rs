//! # aliquot-core
//! Foundation types and traits for the aliquot explorer.

pub mod constants;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;
