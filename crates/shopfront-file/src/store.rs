//! Filesystem storage for documents, profiles and the change log.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use shopfront_core::Result;
use shopfront_core::catalog::RawDocument;
use shopfront_core::error::{DecodeError, Error, NotFoundError, RequestError, ValidationError};
use shopfront_core::profile::Profile;
use shopfront_core::types::{ItemId, UserId};

const CHANGES_FILE: &str = "changes.jsonl";

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

/// File name for a stored id, or a validation error if the name would be
/// longer than the filesystem allows.
fn file_name(id: &str) -> Result<String> {
    let name = format!("{}.json", id);
    if name.len() > MAX_FILE_NAME_BYTES {
        return Err(ValidationError::Id {
            value: id.to_string(),
            reason: format!(
                "too long for the file store (at most {} bytes)",
                MAX_FILE_NAME_BYTES - ".json".len()
            ),
        }
        .into());
    }
    Ok(name)
}

fn map_json(err: serde_json::Error) -> Error {
    Error::Request(RequestError::Backend {
        message: format!("JSON error: {}", err),
    })
}

/// One line of the change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Collection ("products", "posts") or "users" for profiles.
    pub collection: String,
    /// Id of the written document.
    pub id: String,
    /// RFC 3339 timestamp.
    pub time: String,
    pub op: ChangeOp,
}

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    /// Created or replaced.
    Put,
    Delete,
}

/// Plain JSON files under one root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. Directories are created on first
    /// write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join("collections").join(collection)
    }

    fn document_path(&self, collection: &str, id: &ItemId) -> Result<PathBuf> {
        Ok(self.collection_dir(collection).join(file_name(id.as_str())?))
    }

    fn user_path(&self, user: &UserId) -> Result<PathBuf> {
        Ok(self.root.join("users").join(file_name(user.as_str())?))
    }

    pub(crate) fn changes_path(&self) -> PathBuf {
        self.root.join(CHANGES_FILE)
    }

    fn changes_lock_path(&self) -> PathBuf {
        self.root.join("changes.lock")
    }

    /// Current size of the change log in bytes; zero if it does not exist.
    pub fn changes_len(&self) -> u64 {
        fs::metadata(self.changes_path())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    fn write_atomic(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn append_change(&self, collection: &str, id: &str, op: ChangeOp) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.changes_lock_path())?;
        lock_file.lock_exclusive()?;

        let event = ChangeEvent {
            collection: collection.to_string(),
            id: id.to_string(),
            time: Utc::now().to_rfc3339(),
            op,
        };
        let line = serde_json::to_string(&event).map_err(map_json)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.changes_path())?;
        writeln!(file, "{}", line)?;
        file.sync_data()?;

        lock_file.unlock()?;
        Ok(())
    }

    /// Read the whole change log. Lines that do not parse are skipped.
    pub fn changes(&self) -> Result<Vec<ChangeEvent>> {
        let path = self.changes_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut events = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ChangeEvent>(&line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(error = %e, "skipping malformed change log line"),
            }
        }
        Ok(events)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Create or replace a document.
    ///
    /// # Errors
    ///
    /// Fails with a decode error if `data` is not a JSON object.
    #[instrument(skip(self, data))]
    pub fn put_document(&self, collection: &str, id: &ItemId, data: &Value) -> Result<()> {
        if !data.is_object() {
            return Err(DecodeError::NotAnObject { id: id.to_string() }.into());
        }

        let content = serde_json::to_string_pretty(data).map_err(map_json)?;
        Self::write_atomic(&self.document_path(collection, id)?, &content)?;
        self.append_change(collection, id.as_str(), ChangeOp::Put)?;

        debug!(collection, id = %id, "stored document");
        Ok(())
    }

    /// Store a document under a freshly generated id.
    pub fn insert_document(&self, collection: &str, data: &Value) -> Result<ItemId> {
        let id = ItemId::new(Uuid::new_v4().simple().to_string())?;
        self.put_document(collection, &id, data)?;
        Ok(id)
    }

    /// Read one document.
    pub fn get_document(&self, collection: &str, id: &ItemId) -> Result<RawDocument> {
        let path = self.document_path(collection, id)?;
        if !path.exists() {
            return Err(NotFoundError::new("document", format!("{}/{}", collection, id)).into());
        }

        let content = fs::read_to_string(&path)?;
        Ok(RawDocument::from_json(id.as_str(), &content)?)
    }

    /// Delete a document. Returns false if it did not exist.
    #[instrument(skip(self))]
    pub fn delete_document(&self, collection: &str, id: &ItemId) -> Result<bool> {
        let path = self.document_path(collection, id)?;
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        self.append_change(collection, id.as_str(), ChangeOp::Delete)?;

        debug!(collection, id = %id, "deleted document");
        Ok(true)
    }

    /// Every readable document in a collection, ordered by file name.
    ///
    /// Files that are not JSON objects are skipped with a warning.
    pub fn scan(&self, collection: &str) -> Result<Vec<RawDocument>> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<_> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let mut documents = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = entry.path();
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let parsed = fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|content| Ok(RawDocument::from_json(id, &content)?));

            match parsed {
                Ok(doc) => documents.push(doc),
                Err(e) => warn!(collection, id, error = %e, "skipping unreadable document"),
            }
        }

        Ok(documents)
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Read a profile, if one has been written.
    pub fn read_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        let path = self.user_path(user)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let profile = serde_json::from_str(&content).map_err(|e| DecodeError::Json {
            id: user.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(profile))
    }

    /// Create or replace a profile.
    #[instrument(skip(self, profile), fields(user = %profile.id))]
    pub fn write_profile(&self, profile: &Profile) -> Result<()> {
        let content = serde_json::to_string_pretty(profile).map_err(map_json)?;
        Self::write_atomic(&self.user_path(&profile.id)?, &content)?;
        self.append_change("users", profile.id.as_str(), ChangeOp::Put)?;

        debug!("stored profile");
        Ok(())
    }
}
