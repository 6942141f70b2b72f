//! # aliquot-runtime — Persistent state, configuration, and run composition.
//!
//! Wires the engine to durable state:
//! - [`storage::MaskFile`] / [`storage::FactorFile`] — on-disk stores for the
//!   primality mask and the persisted factorization prefix
//! - [`explorer::Explorer`] — owns the sieve and cache for one run, hydrating
//!   them on open and flushing on close
//! - [`config::ExplorerConfig`] — run configuration

pub mod config;
pub mod explorer;
pub mod storage;

pub use config::ExplorerConfig;
pub use explorer::Explorer;
pub use storage::{FactorFile, MaskFile};
