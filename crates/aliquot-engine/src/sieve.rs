//! Incremental sieve of Eratosthenes.
//!
//! The mask covers `[0, limit]` and only ever grows. Extending to a new bound
//! strikes multiples of every prime up to `isqrt(new_bound)`, starting at
//! `max(p^2, first multiple past the old limit)`, so entries already covered
//! are never recomputed.

use tracing::debug;

/// Primality mask plus the derived, strictly increasing prime list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimeSieve {
    mask: Vec<bool>,
    primes: Vec<u64>,
}

impl PrimeSieve {
    /// An empty sieve covering nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sieve covering `[0, bound]`.
    pub fn with_capacity(bound: u64) -> Self {
        let mut sieve = Self::new();
        sieve.ensure_capacity(bound);
        sieve
    }

    /// Rebuild from a previously persisted mask.
    ///
    /// The mask is taken as-is; indices 0 and 1 are forced to `false`.
    pub fn from_mask(mut mask: Vec<bool>) -> Self {
        for slot in mask.iter_mut().take(2) {
            *slot = false;
        }
        let primes = mask
            .iter()
            .enumerate()
            .filter(|&(_, &is_prime)| is_prime)
            .map(|(i, _)| i as u64)
            .collect();
        Self { mask, primes }
    }

    /// Smallest index at which `mask` disagrees with a correct sieve.
    ///
    /// Each index is checked against the primes the mask itself reports
    /// below its square root, so a mask that is consistent with itself is
    /// correct.
    pub fn first_mismatch(mask: &[bool]) -> Option<u64> {
        let mut expected = vec![true; mask.len()];
        for slot in expected.iter_mut().take(2) {
            *slot = false;
        }
        let limit = mask.len().saturating_sub(1) as u64;
        for p in 2..=limit.isqrt() {
            if !mask[p as usize] {
                continue;
            }
            let mut m = p * p;
            while m <= limit {
                expected[m as usize] = false;
                m += p;
            }
        }
        mask.iter()
            .zip(&expected)
            .position(|(got, want)| got != want)
            .map(|i| i as u64)
    }

    /// Largest integer covered by the mask, or 0 when the mask is empty.
    pub fn limit(&self) -> u64 {
        self.mask.len().saturating_sub(1) as u64
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// All primes up to [`limit`](Self::limit), increasing.
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// Primality of `n`, or `None` if `n` lies beyond the covered range.
    pub fn is_prime(&self, n: u64) -> Option<bool> {
        usize::try_from(n)
            .ok()
            .and_then(|i| self.mask.get(i).copied())
    }

    /// Grow the mask so it covers `[0, bound]`.
    ///
    /// Returns `true` if the mask grew. Bounds below 2, or already covered,
    /// leave the sieve untouched.
    pub fn ensure_capacity(&mut self, bound: u64) -> bool {
        let old_len = self.mask.len();
        let new_len = bound as usize + 1;
        if bound < 2 || new_len <= old_len {
            return false;
        }

        self.mask.resize(new_len, true);
        self.mask[0] = false;
        self.mask[1] = false;

        // First integer not covered before this call.
        let first_new = old_len as u64;
        for p in 2..=bound.isqrt() {
            // Primes past the old limit are already correct here: every
            // composite below p was struck by a smaller prime earlier in
            // this loop.
            if !self.mask[p as usize] {
                continue;
            }
            let mut m = (p * p).max(first_new.div_ceil(p) * p);
            while m <= bound {
                self.mask[m as usize] = false;
                m += p;
            }
        }

        let before = self.primes.len();
        self.primes
            .extend((first_new.max(2)..=bound).filter(|&i| self.mask[i as usize]));

        debug!(
            old_limit = old_len.saturating_sub(1),
            new_limit = bound,
            new_primes = self.primes.len() - before,
            total_primes = self.primes.len(),
            "extended prime sieve"
        );
        true
    }
}
