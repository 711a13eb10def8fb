// In-memory favorites repository
//
// The collection lives for the lifetime of the process. Every check-then-mutate
// sequence runs under a single lock with no suspension point inside it.

use crate::error::{Error, Result};
use crate::record::{Candidate, FavoriteRecord};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const FIRST_ID: i64 = 1;

struct Inner {
    records: Vec<FavoriteRecord>,
    next_id: i64,
}

/// Owned, volatile collection of favorite recipes
pub struct FavoritesRepository {
    inner: Mutex<Inner>,
}

impl Default for FavoritesRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesRepository {
    /// Create an empty repository with the id counter at its initial value
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: Vec::new(),
                next_id: FIRST_ID,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Nothing inside a critical section can panic halfway through a mutation
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========================================================================
    // CRUD API
    // ========================================================================

    /// Store a candidate, assigning the next id
    ///
    /// Fails with `DuplicateEntry` if a record with the same external id is
    /// already stored. The duplicate scan and the append happen under one lock.
    pub fn add(&self, candidate: Candidate) -> Result<FavoriteRecord> {
        let mut inner = self.lock();

        if inner.records.iter().any(|r| r.external_id == candidate.external_id) {
            debug!(external_id = %candidate.external_id, "add: duplicate rejected");
            return Err(Error::DuplicateEntry(candidate.external_id));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let record = candidate.into_record(id);
        inner.records.push(record.clone());

        info!(id, external_id = %record.external_id, name = %record.name, "Favorite added");
        Ok(record)
    }

    /// Snapshot of all records in insertion order
    pub fn list(&self) -> Vec<FavoriteRecord> {
        self.lock().records.clone()
    }

    /// Get a record by id
    pub fn get(&self, id: i64) -> Option<FavoriteRecord> {
        self.lock().records.iter().find(|r| r.id == id).cloned()
    }

    /// Change the display name of a stored record
    pub fn rename(&self, id: i64, new_name: Option<&str>) -> Result<FavoriteRecord> {
        let new_name = match new_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(Error::InvalidInput("The 'newName' field is required for an update".to_string())),
        };

        let mut inner = self.lock();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::NotFound(id))?;

        record.name = new_name.to_string();
        debug!(id, name = %record.name, "Favorite renamed");
        Ok(record.clone())
    }

    /// Remove a record, keeping the order of the survivors
    pub fn remove(&self, id: i64) -> Result<()> {
        let mut inner = self.lock();
        let index = inner
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound(id))?;

        let removed = inner.records.remove(index);
        info!(id, external_id = %removed.external_id, "Favorite removed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }
}
