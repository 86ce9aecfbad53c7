//! Filesystem storage for the token pair.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use coursekit_core::error::{Error, StorageError};
use coursekit_core::{AccessToken, CredentialStore, Credentials, RefreshToken, Result};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

impl StoredCredentials {
    fn credentials(&self) -> Option<Credentials> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        let refresh = self.refresh.as_deref().filter(|t| !t.is_empty())?;
        Some(Credentials::new(
            AccessToken::new(token),
            RefreshToken::new(refresh),
        ))
    }
}

/// A [`CredentialStore`] backed by a single JSON file.
///
/// Every operation takes an advisory lock on a sibling `.lock` file, so
/// several processes sharing one credential file see each write whole, and
/// [`replace_access_token`](CredentialStore::replace_access_token) compares
/// and writes under a single exclusive lock.
/// Writes go to a temporary file first and are renamed into place. On Unix
/// the file is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the given file path. Nothing is touched until the
    /// first operation.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the credential file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> Error {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
        .into()
    }

    /// Open and lock the lock file. The lock is released when the returned
    /// handle is dropped.
    fn lock(&self, exclusive: bool) -> Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;

        let locked = if exclusive {
            lock_file.lock_exclusive()
        } else {
            lock_file.lock_shared()
        };
        locked.map_err(|e| self.io_error(e))?;

        Ok(lock_file)
    }

    fn load(&self) -> Result<Option<StoredCredentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let stored = serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        Ok(Some(stored))
    }

    fn save(&self, stored: &StoredCredentials) -> Result<()> {
        let content = serde_json::to_string_pretty(stored).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let file_name = self.path.file_name().unwrap_or_default().to_string_lossy();
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let result = self.write_temp(&temp_path, content.as_bytes());
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
            return result;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(e)
        })
    }

    fn write_temp(&self, temp_path: &Path, content: &[u8]) -> Result<()> {
        let mut options = OpenOptions::new();
        options.create_new(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(temp_path).map_err(|e| self.io_error(e))?;
        file.write_all(content).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            let mut perms = file.metadata().map_err(|e| self.io_error(e))?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(temp_path, perms).map_err(|e| self.io_error(e))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Result<Option<Credentials>> {
        let _lock = self.lock(false)?;
        Ok(self.load()?.and_then(|stored| stored.credentials()))
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn write(&self, access_token: &AccessToken, refresh_token: &RefreshToken) -> Result<()> {
        let _lock = self.lock(true)?;
        self.save(&StoredCredentials {
            token: Some(access_token.as_str().to_string()),
            refresh: Some(refresh_token.as_str().to_string()),
            saved_at: Some(Utc::now()),
        })?;
        debug!("Saved credential pair");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn write_access_token(&self, access_token: &AccessToken) -> Result<()> {
        let _lock = self.lock(true)?;
        let mut stored = self.load()?.unwrap_or_default();
        stored.token = Some(access_token.as_str().to_string());
        stored.saved_at = Some(Utc::now());
        self.save(&stored)?;
        debug!("Saved rotated access token");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn replace_access_token(&self, expected: &AccessToken, fresh: &AccessToken) -> Result<bool> {
        let _lock = self.lock(true)?;
        let Some(mut stored) = self.load()? else {
            return Ok(false);
        };
        if stored.credentials().is_none() || stored.token.as_deref() != Some(expected.as_str()) {
            debug!("Stored access token changed, leaving it in place");
            return Ok(false);
        }

        stored.token = Some(fresh.as_str().to_string());
        stored.saved_at = Some(Utc::now());
        self.save(&stored)?;
        debug!("Saved rotated access token");
        Ok(true)
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        let _lock = self.lock(true)?;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed credential file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
