//! Persistence service: saved designs in a key-value blob store.
//!
//! DESIGN
//! ======
//! A design is stored as one JSON blob under `design_<id>`, or under
//! `design_data` when it has no id. The blob holds the element list, the
//! canvas background, and a millisecond timestamp:
//!
//! ```json
//! { "elements": [...], "canvasBackgroundColor": "#FFFFFF", "timestamp": 1700000000000 }
//! ```
//!
//! The store itself is behind the async [`BlobStore`] trait so the gateway
//! can run against memory in tests and against a directory on disk in a
//! host. Callers hand the gateway an already-captured [`SavedDesign`], so
//! what gets written is the document as it was when the save was requested.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures surface as [`PersistenceError::Io`]; blobs that do not
//! parse surface as [`PersistenceError::Corrupt`]. A missing blob is not an
//! error: `load` returns `Ok(None)` and `delete` returns `Ok(false)`.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::consts::{ANONYMOUS_DESIGN_KEY, DEFAULT_BACKGROUND, DESIGN_KEY_PREFIX};
use crate::element::Element;
use crate::services::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt design data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl ErrorCode for PersistenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_IO",
            Self::Corrupt(_) => "E_CORRUPT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// The persisted form of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDesign {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default = "default_background")]
    pub canvas_background_color: String,
    /// Milliseconds since the Unix epoch at capture time.
    #[serde(default)]
    pub timestamp: i64,
}

impl SavedDesign {
    /// Capture `elements` and `background` stamped with the current time.
    #[must_use]
    pub fn new(elements: Vec<Element>, background: String) -> Self {
        Self { elements, canvas_background_color: background, timestamp: now_ms() }
    }

    /// Parse a stored blob. An empty background is read as the default.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if the blob is not a valid design.
    pub fn from_json(raw: &str) -> Result<Self, PersistenceError> {
        let mut design: Self = serde_json::from_str(raw)?;
        if design.canvas_background_color.is_empty() {
            design.canvas_background_color = default_background();
        }
        Ok(design)
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if an element cannot be encoded.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_owned()
}

pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Storage key for a design id; `None` or an empty id is the anonymous slot.
#[must_use]
pub fn design_key(design_id: Option<&str>) -> String {
    match design_id {
        Some(id) if !id.is_empty() => format!("{DESIGN_KEY_PREFIX}{id}"),
        _ => ANONYMOUS_DESIGN_KEY.to_owned(),
    }
}

// =============================================================================
// BLOB STORE
// =============================================================================

/// Async string key-value storage. Enables swapping disk for memory in tests.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the backing store fails.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the backing store fails.
    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;

    /// Remove the blob under `key`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the backing store fails.
    async fn remove(&self, key: &str) -> Result<bool, PersistenceError>;

    /// Every key currently stored, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the backing store fails.
    async fn keys(&self) -> Result<Vec<String>, PersistenceError>;
}

/// Process-local blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.blobs.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        Ok(self.blobs.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }
}

/// Blob store keeping one `<key>.json` file per key under a directory.
///
/// Key characters outside `[A-Za-z0-9_-]` are percent-encoded in file
/// names, so any key maps to a single file inside the directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Store blobs under `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A store rooted at `DESIGN_STORE_DIR`, if one was configured.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        config.store_dir.as_ref().map(|dir| Self::new(dir.clone()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

#[async_trait::async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, PersistenceError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            match decode_key(stem) {
                Some(key) => keys.push(key),
                None => debug!(file = %stem, "skipping file with undecodable name"),
            }
        }
        Ok(keys)
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0F)]));
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = char::from(*bytes.get(i + 1)?).to_digit(16)?;
            let lo = char::from(*bytes.get(i + 2)?).to_digit(16)?;
            out.push(u8::try_from(hi * 16 + lo).unwrap_or(b'?'));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    match String::from_utf8(out) {
        Ok(key) => Some(key),
        Err(_) => None,
    }
}

// =============================================================================
// DESIGN GATEWAY
// =============================================================================

/// Saves, loads, and enumerates designs in a [`BlobStore`].
#[derive(Debug)]
pub struct DesignGateway<B> {
    store: Arc<B>,
}

impl<B> Clone for DesignGateway<B> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<B: BlobStore> DesignGateway<B> {
    #[must_use]
    pub fn new(store: Arc<B>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<B> {
        &self.store
    }

    /// Write `design` under the key for `design_id`. Returns the key used.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if encoding or the store write fails.
    pub async fn save(&self, design_id: Option<&str>, design: &SavedDesign) -> Result<String, PersistenceError> {
        let key = design_key(design_id);
        let raw = design.to_json()?;
        if let Err(e) = self.store.set(&key, raw).await {
            warn!(error = %e, %key, "design save failed");
            return Err(e);
        }
        info!(%key, elements = design.elements.len(), "design saved");
        Ok(key)
    }

    /// Read the design stored for `design_id`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the store read fails and
    /// [`PersistenceError::Corrupt`] if the blob does not parse.
    pub async fn load(&self, design_id: Option<&str>) -> Result<Option<SavedDesign>, PersistenceError> {
        let key = design_key(design_id);
        let Some(raw) = self.store.get(&key).await? else {
            debug!(%key, "no design stored");
            return Ok(None);
        };
        match SavedDesign::from_json(&raw) {
            Ok(design) => {
                info!(%key, elements = design.elements.len(), "design loaded");
                Ok(Some(design))
            }
            Err(e) => {
                warn!(error = %e, %key, "stored design is corrupt");
                Err(e)
            }
        }
    }

    /// Remove the design stored for `design_id`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the store fails.
    pub async fn delete(&self, design_id: &str) -> Result<bool, PersistenceError> {
        let key = design_key(Some(design_id));
        let removed = self.store.remove(&key).await?;
        info!(%key, removed, "design deleted");
        Ok(removed)
    }

    /// Ids of every stored design, sorted. The anonymous slot is not listed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the store fails.
    pub async fn list(&self) -> Result<Vec<String>, PersistenceError> {
        let mut ids: Vec<String> = self
            .store
            .keys()
            .await?
            .into_iter()
            .filter(|key| key != ANONYMOUS_DESIGN_KEY)
            .filter_map(|key| key.strip_prefix(DESIGN_KEY_PREFIX).map(str::to_owned))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Remove every `design_*` blob, the anonymous slot included. Returns how
    /// many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the store fails.
    pub async fn clear_all(&self) -> Result<usize, PersistenceError> {
        let mut removed = 0;
        for key in self.store.keys().await? {
            if key.starts_with(DESIGN_KEY_PREFIX) && self.store.remove(&key).await? {
                removed += 1;
            }
        }
        info!(removed, "all designs cleared");
        Ok(removed)
    }
}
