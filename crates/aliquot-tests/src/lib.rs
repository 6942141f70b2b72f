//! Cross-crate test suite for the aliquot explorer.
//!
//! Integration tests check the engine against brute-force reference
//! arithmetic and drive the explorer through real on-disk state.

pub mod helpers;
