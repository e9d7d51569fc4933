//! The one piece of shared mutable state: the latest reading per catalog location.

pub mod error;

use crate::catalog::LocationCatalog;
use crate::store::error::StoreError;
use crate::types::reading::Reading;
use chrono::{NaiveDateTime, SubsecRound};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Latest readings in catalog order, shared between the refresher (sole writer)
/// and the renderer and persistence (readers).
///
/// Cloning is cheap and yields a handle to the same underlying readings. Every
/// [`upsert`](Self::upsert) replaces both fields of a reading under one write
/// lock, and every [`snapshot`](Self::snapshot) copies all readings under one read
/// lock, so a reader never sees a temperature paired with a stale timestamp.
#[derive(Debug, Clone)]
pub struct ReadingStore {
    inner: Arc<RwLock<Vec<Reading>>>,
}

impl ReadingStore {
    /// One zero-temperature reading per catalog location, stamped with `at`.
    pub fn zeroed(catalog: &LocationCatalog, at: NaiveDateTime) -> Self {
        let readings = catalog
            .names()
            .map(|name| Reading::zeroed(name, at))
            .collect();
        Self::from_readings(readings)
    }

    /// Wraps already validated readings; their order becomes the store order.
    pub(crate) fn from_readings(readings: Vec<Reading>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(readings)),
        }
    }

    /// An independent copy of every reading, in catalog order.
    pub async fn snapshot(&self) -> Vec<Reading> {
        self.inner.read().await.clone()
    }

    /// Replaces temperature and timestamp of the reading called `name` in one step.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownLocation`] if no reading has that name. Readings are
    /// never added after construction.
    pub async fn upsert(
        &self,
        name: &str,
        temperature: i32,
        at: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let mut readings = self.inner.write().await;
        let reading = readings
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| StoreError::UnknownLocation(name.to_string()))?;
        reading.temperature = temperature;
        reading.last_updated = at.trunc_subsecs(0);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
