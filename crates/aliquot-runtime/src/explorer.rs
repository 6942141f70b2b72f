//! Run composition: one sieve, one factorization cache, two stores.
//!
//! [`Explorer::open`] hydrates the sieve and cache from storage, extends the
//! sieve to cover the configured growth bound (rewriting the mask if it
//! grew), checks every stored prime against the sieve, and hands out the
//! number-theoretic operations. [`Explorer::close`] flushes the persistable
//! cache prefix. The sieve never grows after open, so the mask is only
//! written there.

use aliquot_core::error::{AliquotError, DivisorError, FactorError, StoreError};
use aliquot_core::memory::{MemoryFactorStore, MemoryMaskStore};
use aliquot_core::traits::{FactorStore, MaskStore};
use aliquot_core::types::{AliquotSequence, Factorization, Limits};
use aliquot_engine::{
    Census, DivisorSummer, FactorCache, PrimeSieve, aliquot_sum, check_prime, survey, trace,
};
use tracing::info;

use crate::config::ExplorerConfig;
use crate::storage::{FactorFile, MaskFile};

/// Owns all mutable state for one run.
pub struct Explorer {
    limits: Limits,
    sieve: PrimeSieve,
    cache: FactorCache,
    factor_store: Box<dyn FactorStore>,
}

impl Explorer {
    /// Open with file stores under `config.data_dir`, or in-memory stores
    /// when `config.persist` is false.
    pub fn open(config: &ExplorerConfig) -> Result<Self, AliquotError> {
        if config.persist {
            Self::with_stores(
                config,
                Box::new(MaskFile::new(config.mask_path())),
                Box::new(FactorFile::new(config.factors_path())),
            )
        } else {
            Self::with_stores(
                config,
                Box::new(MemoryMaskStore::new()),
                Box::new(MemoryFactorStore::new()),
            )
        }
    }

    /// Open against explicit stores.
    pub fn with_stores(
        config: &ExplorerConfig,
        mask_store: Box<dyn MaskStore>,
        factor_store: Box<dyn FactorStore>,
    ) -> Result<Self, AliquotError> {
        let limits = config.limits()?;

        let mut sieve = match mask_store.load()? {
            Some(mask) => PrimeSieve::from_mask(mask),
            None => PrimeSieve::new(),
        };
        let stored_limit = sieve.limit();
        if sieve.ensure_capacity(config.sieve_limit()) {
            mask_store.save(sieve.mask())?;
        }

        let entries = factor_store.load()?;
        for (&n, factors) in &entries {
            for (factor, _) in factors.iter() {
                if !check_prime(&sieve, factor)? {
                    return Err(StoreError::CompositeFactor { n, factor }.into());
                }
            }
        }
        let cache = FactorCache::from_entries(config.cache_ceiling, entries)
            .with_session_limit(config.session_cache_limit);

        info!(
            stored_limit,
            sieve_limit = sieve.limit(),
            primes = sieve.primes().len(),
            cached_factorizations = cache.len(),
            cache_ceiling = cache.ceiling(),
            "explorer ready"
        );

        Ok(Self {
            limits,
            sieve,
            cache,
            factor_store,
        })
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn sieve(&self) -> &PrimeSieve {
        &self.sieve
    }

    pub fn cache(&self) -> &FactorCache {
        &self.cache
    }

    pub fn factorize(&mut self, n: u64) -> Result<Factorization, FactorError> {
        self.cache.factorize(&self.sieve, n)
    }

    /// `s(n)`.
    pub fn aliquot_sum(&mut self, n: u64) -> Result<u128, DivisorError> {
        aliquot_sum(&mut self.cache, &self.sieve, n)
    }

    pub fn trace(&mut self, seed: u64) -> Result<AliquotSequence, DivisorError> {
        let mut summer = DivisorSummer::new(&self.sieve, &mut self.cache);
        trace(seed, &self.limits, &mut summer)
    }

    /// Classify every seed in `1..=n_max`.
    pub fn survey(&mut self, n_max: u64) -> Census {
        let mut summer = DivisorSummer::new(&self.sieve, &mut self.cache);
        let census = survey(1..=n_max, &self.limits, &mut summer);
        let stats = self.cache.stats();
        info!(
            hits = stats.hits,
            misses = stats.misses,
            shortcuts = stats.shortcuts,
            evictions = stats.evictions,
            entries = self.cache.len(),
            "factorization cache stats"
        );
        census
    }

    /// Save the persistable cache prefix. Returns the number of entries written.
    pub fn flush(&self) -> Result<usize, StoreError> {
        let entries = self.cache.persistable();
        self.factor_store.save(&entries)?;
        info!(entries = entries.len(), ceiling = self.cache.ceiling(), "flushed factor cache");
        Ok(entries.len())
    }

    /// Flush and release the stores.
    pub fn close(self) -> Result<(), StoreError> {
        self.flush().map(|_| ())
    }
}
