//! Memoizing prime factorization.
//!
//! [`FactorCache`] trial-divides by the sieve's primes and remembers every
//! result by the original `n`. After each prime power is divided out, the
//! remaining cofactor is looked up; if it is already cached the two parts are
//! merged (exponents summed) and the search stops early. Aliquot chains share
//! cofactors heavily, so the shortcut fires often.
//!
//! Cached factorizations are never mutated in place: lookups hand out clones,
//! and entries disappear only through [`FactorCache::evict_session`].

use std::collections::{BTreeMap, HashMap};

use aliquot_core::error::FactorError;
use aliquot_core::types::Factorization;
use tracing::debug;

use crate::sieve::PrimeSieve;

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// `factorize` calls answered straight from the cache.
    pub hits: u64,
    /// `factorize` calls that ran trial division.
    pub misses: u64,
    /// Misses that finished early by splicing in a cached cofactor.
    pub shortcuts: u64,
    /// Entries removed by session eviction.
    pub evictions: u64,
}

/// Factorization cache keyed by `n`.
///
/// Entries with `n <= ceiling` form the persisted prefix; everything above is
/// session-only and may be evicted when `session_limit` is exceeded.
#[derive(Debug, Clone, Default)]
pub struct FactorCache {
    entries: HashMap<u64, Factorization>,
    ceiling: u64,
    session_limit: Option<usize>,
    session_len: usize,
    stats: CacheStats,
}

impl FactorCache {
    pub fn new(ceiling: u64) -> Self {
        Self {
            ceiling,
            ..Self::default()
        }
    }

    /// Seed the cache with previously persisted entries.
    ///
    /// Entries above `ceiling` are kept for this session but count toward the
    /// session limit.
    pub fn from_entries(ceiling: u64, entries: BTreeMap<u64, Factorization>) -> Self {
        let session_len = entries.keys().filter(|&&n| n > ceiling).count();
        Self {
            entries: entries.into_iter().collect(),
            ceiling,
            session_len,
            ..Self::default()
        }
    }

    /// Cap the number of session-only entries held at once.
    pub fn with_session_limit(mut self, limit: Option<usize>) -> Self {
        self.session_limit = limit;
        self
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries above the persistence ceiling.
    pub fn session_len(&self) -> usize {
        self.session_len
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn get(&self, n: u64) -> Option<&Factorization> {
        self.entries.get(&n)
    }

    pub fn contains(&self, n: u64) -> bool {
        self.entries.contains_key(&n)
    }

    /// Factorize `n`, consulting and then extending the cache.
    ///
    /// `factorize(1)` is the empty factorization.
    ///
    /// # Errors
    ///
    /// - [`FactorError::Zero`] for `n == 0`
    /// - [`FactorError::SieveExhausted`] if the sieve does not reach the
    ///   square root of the unfactored remainder
    pub fn factorize(&mut self, sieve: &PrimeSieve, n: u64) -> Result<Factorization, FactorError> {
        if let Some(cached) = self.entries.get(&n) {
            self.stats.hits += 1;
            return Ok(cached.clone());
        }

        let entries = &self.entries;
        let (factors, shortcut) = decompose(sieve, n, |m| entries.get(&m))?;

        self.stats.misses += 1;
        if shortcut {
            self.stats.shortcuts += 1;
        }
        self.insert(n, factors.clone());
        Ok(factors)
    }

    /// The persistable prefix: every entry with `n <= ceiling`.
    pub fn persistable(&self) -> BTreeMap<u64, Factorization> {
        self.entries
            .iter()
            .filter(|&(&n, _)| n <= self.ceiling)
            .map(|(&n, f)| (n, f.clone()))
            .collect()
    }

    /// Drop every session-only entry. Returns how many were removed.
    pub fn evict_session(&mut self) -> usize {
        let ceiling = self.ceiling;
        let before = self.entries.len();
        self.entries.retain(|&n, _| n <= ceiling);
        let removed = before - self.entries.len();
        self.session_len = 0;
        self.stats.evictions += removed as u64;
        removed
    }

    fn insert(&mut self, n: u64, factors: Factorization) {
        self.entries.insert(n, factors);
        if n <= self.ceiling {
            return;
        }
        self.session_len += 1;
        if let Some(limit) = self.session_limit {
            if self.session_len > limit {
                let removed = self.evict_session();
                debug!(removed, limit, "evicted session-only factorizations");
            }
        }
    }
}

/// Factorize `n` by plain trial division, without any cache.
pub fn trial_divide(sieve: &PrimeSieve, n: u64) -> Result<Factorization, FactorError> {
    decompose(sieve, n, |_| None).map(|(factors, _)| factors)
}

/// Whether `p` is prime: read from the mask when covered, otherwise decided
/// by trial division.
///
/// # Errors
///
/// Whatever [`trial_divide`] reports when the sieve cannot decide.
pub fn check_prime(sieve: &PrimeSieve, p: u64) -> Result<bool, FactorError> {
    match sieve.is_prime(p) {
        Some(prime) => Ok(prime),
        None => Ok(trial_divide(sieve, p)?.iter().eq([(p, 1u32)])),
    }
}

/// Trial division with an optional cofactor lookup.
///
/// Returns the factorization and whether a cached cofactor was spliced in.
fn decompose<'a>(
    sieve: &PrimeSieve,
    n: u64,
    cached: impl Fn(u64) -> Option<&'a Factorization>,
) -> Result<(Factorization, bool), FactorError> {
    if n == 0 {
        return Err(FactorError::Zero);
    }

    let mut remaining = n;
    let mut factors = Factorization::new();

    for &p in sieve.primes() {
        // p * p > remaining: whatever is left is 1 or a single prime.
        if p > remaining / p {
            break;
        }
        if remaining % p != 0 {
            continue;
        }

        let mut exponent = 0;
        while remaining % p == 0 {
            remaining /= p;
            exponent += 1;
        }
        factors.add(p, exponent);

        if remaining == 1 {
            break;
        }
        if let Some(cofactor) = cached(remaining) {
            return Ok((factors.merged(cofactor), true));
        }
    }

    if remaining > 1 {
        let root = remaining.isqrt();
        if root >= 2 && sieve.limit() < root {
            return Err(FactorError::SieveExhausted {
                n,
                remaining,
                limit: sieve.limit(),
            });
        }
        factors.add(remaining, 1);
    }

    Ok((factors, false))
}
