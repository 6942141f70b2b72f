//! In-memory store implementations.
//!
//! Suitable for tests and for runs that should leave no files behind. Clones
//! share the same underlying state, so a caller can keep a handle and inspect
//! what a run saved.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::traits::{FactorStore, MaskStore};
use crate::types::Factorization;

/// Mask store backed by a shared `Vec<bool>`.
#[derive(Debug, Clone, Default)]
pub struct MemoryMaskStore {
    mask: Arc<Mutex<Option<Vec<bool>>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryMaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `mask`.
    pub fn with_mask(mask: Vec<bool>) -> Self {
        Self {
            mask: Arc::new(Mutex::new(Some(mask))),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    /// The currently stored mask, if any.
    pub fn snapshot(&self) -> Option<Vec<bool>> {
        self.mask.lock().clone()
    }

    /// How many times [`MaskStore::save`] has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl MaskStore for MemoryMaskStore {
    fn load(&self) -> Result<Option<Vec<bool>>, StoreError> {
        Ok(self.mask.lock().clone())
    }

    fn save(&self, mask: &[bool]) -> Result<(), StoreError> {
        *self.mask.lock() = Some(mask.to_vec());
        *self.saves.lock() += 1;
        Ok(())
    }
}

/// Factor store backed by a shared map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactorStore {
    entries: Arc<Mutex<BTreeMap<u64, Factorization>>>,
}

impl MemoryFactorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: BTreeMap<u64, Factorization>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<u64, Factorization> {
        self.entries.lock().clone()
    }
}

impl FactorStore for MemoryFactorStore {
    fn load(&self) -> Result<BTreeMap<u64, Factorization>, StoreError> {
        Ok(self.entries.lock().clone())
    }

    fn save(&self, entries: &BTreeMap<u64, Factorization>) -> Result<(), StoreError> {
        *self.entries.lock() = entries.clone();
        Ok(())
    }
}
