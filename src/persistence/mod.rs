//! Durable copy of the reading store, kept as a small JSON file.
//!
//! The file is an array of `{"name", "temperature", "last_updated"}` objects in
//! catalog order. Writes go to a temporary file next to the target which is then
//! renamed over it, so a reader sees either the old or the new snapshot, never a
//! truncated one.

pub mod error;

use crate::catalog::LocationCatalog;
use crate::persistence::error::PersistenceError;
use crate::types::reading::Reading;
use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

/// A snapshot file at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the snapshot on disk with `readings`.
    pub async fn save(&self, readings: &[Reading]) -> Result<(), PersistenceError> {
        let bytes = encode(readings)?;
        let path = self.path.clone();
        let len = bytes.len();
        task::spawn_blocking(move || write_atomically(&path, &bytes)).await??;
        debug!(
            "Wrote snapshot of {} readings ({} bytes) to {}",
            readings.len(),
            len,
            self.path.display()
        );
        Ok(())
    }

    /// Reads the snapshot back exactly as it was saved.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::NotFound`] if there is no file at the path, and
    /// [`PersistenceError::Decode`] if the file is not a valid readings array.
    pub async fn load(&self) -> Result<Vec<Reading>, PersistenceError> {
        let path = self.path.clone();
        let bytes = task::spawn_blocking(move || match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PersistenceError::NotFound(path)),
            Err(e) => Err(PersistenceError::Read(path, e)),
        })
        .await??;
        serde_json::from_slice(&bytes).map_err(|e| PersistenceError::Decode(self.path.clone(), e))
    }

    /// Like [`load`](Self::load), but also requires the snapshot to hold exactly the
    /// catalog's locations, in catalog order.
    pub async fn load_for(
        &self,
        catalog: &LocationCatalog,
    ) -> Result<Vec<Reading>, PersistenceError> {
        let readings = self.load().await?;
        check_against_catalog(&self.path, &readings, catalog)?;
        info!(
            "Loaded {} readings from {}",
            readings.len(),
            self.path.display()
        );
        Ok(readings)
    }
}

fn encode(readings: &[Reading]) -> Result<Vec<u8>, PersistenceError> {
    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    readings
        .serialize(&mut serializer)
        .map_err(PersistenceError::Encode)?;
    Ok(bytes)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| PersistenceError::CreateDir(dir.clone(), e))?;

    let mut temp_file =
        NamedTempFile::new_in(&dir).map_err(|e| PersistenceError::Write(dir.clone(), e))?;
    temp_file
        .write_all(bytes)
        .and_then(|_| temp_file.flush())
        .and_then(|_| temp_file.as_file().sync_all())
        .map_err(|e| PersistenceError::Write(dir.clone(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| PersistenceError::Persist(path.to_path_buf(), e.error))?;
    Ok(())
}

fn check_against_catalog(
    path: &Path,
    readings: &[Reading],
    catalog: &LocationCatalog,
) -> Result<(), PersistenceError> {
    let mut seen = HashSet::new();
    for reading in readings {
        if !seen.insert(reading.name.as_str()) {
            return Err(PersistenceError::DuplicateName {
                path: path.to_path_buf(),
                name: reading.name.clone(),
            });
        }
    }

    if readings.len() != catalog.len() {
        return Err(PersistenceError::CatalogMismatch {
            path: path.to_path_buf(),
            detail: format!(
                "expected {} locations, found {}",
                catalog.len(),
                readings.len()
            ),
        });
    }

    let misplaced = readings
        .iter()
        .zip(catalog.names())
        .enumerate()
        .find(|(_, (reading, name))| reading.name != *name);
    if let Some((index, (reading, expected))) = misplaced {
        return Err(PersistenceError::CatalogMismatch {
            path: path.to_path_buf(),
            detail: format!(
                "entry {} is '{}', expected '{}'",
                index, reading.name, expected
            ),
        });
    }
    Ok(())
}
