//! Trait interfaces for the aliquot explorer.
//!
//! These traits define the contracts between crates:
//! - [`ProperDivisorSum`] — the map `n -> s(n)` (aliquot-engine implements)
//! - [`MaskStore`] — persisted primality mask (aliquot-runtime implements)
//! - [`FactorStore`] — persisted factorization cache (aliquot-runtime implements)

use std::collections::BTreeMap;

use crate::error::{DivisorError, StoreError};
use crate::types::Factorization;

/// The aliquot map `s(n) = sigma(n) - n`.
///
/// Takes `&mut self` because production implementations memoize
/// factorizations as they go.
pub trait ProperDivisorSum {
    /// Sum of the proper divisors of `n`. `s(1) = 0`; `s(0)` is an error.
    fn proper_divisor_sum(&mut self, n: u64) -> Result<u128, DivisorError>;
}

/// Load/save for the primality mask.
///
/// The mask is indexed by integer: `mask[i]` is true iff `i` is prime.
pub trait MaskStore {
    /// Load the stored mask. Returns `Ok(None)` when nothing has been stored
    /// yet (cold start); malformed data is an error.
    fn load(&self) -> Result<Option<Vec<bool>>, StoreError>;

    /// Replace the stored mask with `mask`.
    fn save(&self, mask: &[bool]) -> Result<(), StoreError>;
}

/// Load/save for the persisted subset of the factorization cache.
pub trait FactorStore {
    /// Load all stored entries. An absent store yields an empty map.
    fn load(&self) -> Result<BTreeMap<u64, Factorization>, StoreError>;

    /// Replace the stored entries with `entries`.
    fn save(&self, entries: &BTreeMap<u64, Factorization>) -> Result<(), StoreError>;
}
