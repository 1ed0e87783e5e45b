//! Credential storage.
//!
//! # Responsibilities
//! - Hold the bearer token and the signed-in user's profile
//! - Survive restarts (file-backed store)
//! - Offer an in-memory store for tests and embedding
//!
//! # Design Decisions
//! - Reads never fail: an unreadable store behaves as an empty one
//! - Writes report errors; the pipeline logs them rather than failing a call
//! - File writes are atomic (temp file + rename); a reader never sees a partial file
//! - No coordination between readers: a request may race a concurrent clear

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
}

/// Errors raised while persisting credentials.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Credential store lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable storage for the bearer token and user profile.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> StorageResult<()>;
    fn clear_token(&self) -> StorageResult<()>;

    fn profile(&self) -> Option<UserProfile>;
    fn set_profile(&self, profile: &UserProfile) -> StorageResult<()>;
    fn clear_profile(&self) -> StorageResult<()>;
}

/// Lock-free in-memory store.
pub struct MemoryStore {
    token: ArcSwapOption<String>,
    profile: ArcSwapOption<UserProfile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            token: ArcSwapOption::empty(),
            profile: ArcSwapOption::empty(),
        }
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.token.store(Some(Arc::new(token.to_string())));
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryStore {
    fn token(&self) -> Option<String> {
        self.token.load_full().map(|t| t.as_ref().clone())
    }

    fn set_token(&self, token: &str) -> StorageResult<()> {
        self.token.store(Some(Arc::new(token.to_string())));
        Ok(())
    }

    fn clear_token(&self) -> StorageResult<()> {
        self.token.store(None);
        Ok(())
    }

    fn profile(&self) -> Option<UserProfile> {
        self.profile.load_full().map(|p| p.as_ref().clone())
    }

    fn set_profile(&self, profile: &UserProfile) -> StorageResult<()> {
        self.profile.store(Some(Arc::new(profile.clone())));
        Ok(())
    }

    fn clear_profile(&self) -> StorageResult<()> {
        self.profile.store(None);
        Ok(())
    }
}

/// On-disk layout of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserProfile>,
}

/// JSON-file backed store. A missing file is an empty store.
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Credentials> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn load_or_empty(&self) -> Credentials {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(path = ?self.path, error = %e, "Unreadable credential file, treating as empty");
            Credentials::default()
        })
    }

    /// Write a sibling temp file and rename it over the target, so readers
    /// only ever see a complete file.
    fn save(&self, credentials: &Credentials) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, credentials)?;
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Credentials)) -> StorageResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut credentials = self.load_or_empty();
        f(&mut credentials);
        self.save(&credentials)
    }
}

impl CredentialStore for FileStore {
    fn token(&self) -> Option<String> {
        self.load_or_empty().token
    }

    fn set_token(&self, token: &str) -> StorageResult<()> {
        self.update(|c| c.token = Some(token.to_string()))
    }

    fn clear_token(&self) -> StorageResult<()> {
        self.update(|c| c.token = None)
    }

    fn profile(&self) -> Option<UserProfile> {
        self.load_or_empty().user
    }

    fn set_profile(&self, profile: &UserProfile) -> StorageResult<()> {
        self.update(|c| c.user = Some(profile.clone()))
    }

    fn clear_profile(&self) -> StorageResult<()> {
        self.update(|c| c.user = None)
    }
}
