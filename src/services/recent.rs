//! Recent designs catalog shown on the home screen.
//!
//! DESIGN
//! ======
//! The catalog is a short list of design summaries kept in memory and
//! mirrored to the blob store under `recentDesigns` as a JSON array after
//! every change. Newest entries come first and the list is capped at
//! [`RECENT_DESIGNS_LIMIT`].
//!
//! ERROR HANDLING
//! ==============
//! In-memory state is updated before the write-through, so a failed write
//! leaves the catalog changed in memory and returns the storage error; the
//! next successful write persists it.

#[cfg(test)]
#[path = "recent_test.rs"]
mod recent_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::consts::{DESIGN_KEY_PREFIX, RECENT_DESIGNS_KEY, RECENT_DESIGNS_LIMIT};
use crate::services::persistence::{BlobStore, PersistenceError, now_ms};

/// Summary of one design in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDesign {
    pub id: String,
    pub label: String,
    /// Preview image URI; empty when the design has none.
    #[serde(default)]
    pub image: String,
    /// Milliseconds since the Unix epoch when the entry was added.
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub is_completed: bool,
}

impl RecentDesign {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), image: String::new(), created_at: now_ms(), is_completed: false }
    }
}

/// Partial update for a catalog entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentDesignPatch {
    pub label: Option<String>,
    pub image: Option<String>,
    pub is_completed: Option<bool>,
}

/// Write-through catalog of recently edited designs.
#[derive(Debug)]
pub struct RecentDesigns<B> {
    store: Arc<B>,
    designs: Vec<RecentDesign>,
}

impl<B: BlobStore> RecentDesigns<B> {
    /// An empty catalog over `store`. Call [`load`](Self::load) to read what
    /// was persisted.
    #[must_use]
    pub fn new(store: Arc<B>) -> Self {
        Self { store, designs: Vec::new() }
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the read fails and
    /// [`PersistenceError::Corrupt`] if the stored list does not parse; the
    /// catalog is left empty in both cases.
    pub async fn load(&mut self) -> Result<&[RecentDesign], PersistenceError> {
        self.designs.clear();
        let Some(raw) = self.store.get(RECENT_DESIGNS_KEY).await? else {
            return Ok(self.designs.as_slice());
        };
        match serde_json::from_str::<Vec<RecentDesign>>(&raw) {
            Ok(mut designs) => {
                designs.truncate(RECENT_DESIGNS_LIMIT);
                debug!(count = designs.len(), "recent designs loaded");
                self.designs = designs;
                Ok(self.designs.as_slice())
            }
            Err(e) => {
                warn!(error = %e, "recent designs list is corrupt");
                Err(e.into())
            }
        }
    }

    /// Put `design` at the front of the list, stamped with the current time.
    /// An existing entry with the same id is replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the write-through fails.
    pub async fn add(&mut self, mut design: RecentDesign) -> Result<(), PersistenceError> {
        design.created_at = now_ms();
        self.designs.retain(|d| d.id != design.id);
        info!(id = %design.id, label = %design.label, "recent design added");
        self.designs.insert(0, design);
        self.designs.truncate(RECENT_DESIGNS_LIMIT);
        self.persist().await
    }

    /// Merge `patch` into the entry with `id`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the write-through fails.
    pub async fn update(&mut self, id: &str, patch: RecentDesignPatch) -> Result<bool, PersistenceError> {
        let Some(design) = self.designs.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        if let Some(label) = patch.label {
            design.label = label;
        }
        if let Some(image) = patch.image {
            design.image = image;
        }
        if let Some(done) = patch.is_completed {
            design.is_completed = done;
        }
        self.persist().await?;
        Ok(true)
    }

    /// Remove the entry with `id`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the write-through fails.
    pub async fn delete(&mut self, id: &str) -> Result<bool, PersistenceError> {
        let before = self.designs.len();
        self.designs.retain(|d| d.id != id);
        if self.designs.len() == before {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Empty the list. Saved design blobs are left alone.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the write-through fails.
    pub async fn clear(&mut self) -> Result<(), PersistenceError> {
        self.designs.clear();
        self.persist().await
    }

    /// Empty the list, drop the persisted catalog, and remove every saved
    /// design blob. Returns how many design blobs were removed.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store fails; blobs removed
    /// before the failure stay removed.
    pub async fn clear_all_design_data(&mut self) -> Result<usize, PersistenceError> {
        self.designs.clear();
        self.store.remove(RECENT_DESIGNS_KEY).await?;
        let mut removed = 0;
        for key in self.store.keys().await? {
            if key.starts_with(DESIGN_KEY_PREFIX) && self.store.remove(&key).await? {
                removed += 1;
            }
        }
        info!(removed, "all design data cleared");
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RecentDesign> {
        self.designs.iter().find(|d| d.id == id)
    }

    /// Entries, newest first.
    #[must_use]
    pub fn designs(&self) -> &[RecentDesign] {
        &self.designs
    }

    async fn persist(&self) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&self.designs)?;
        if let Err(e) = self.store.set(RECENT_DESIGNS_KEY, raw).await {
            warn!(error = %e, "recent designs write failed");
            return Err(e);
        }
        Ok(())
    }
}
