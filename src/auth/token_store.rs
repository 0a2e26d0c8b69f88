//! Persistence for the auth token between app launches.

use crate::auth::error::TokenStoreError;
use crate::utils::{ensure_dir_exists, get_data_dir};
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

const TOKEN_FILE_NAME: &str = "auth-token.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Where the session token lives between launches.
///
/// Implementations must be cheap to call; the session calls them on sign-in,
/// sign-out and restore only.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: i64,
}

/// Stores the token in a single bincode file inside a private directory.
///
/// Writes go to a temporary file in the same directory which is then renamed over
/// the old one, so a crash never leaves a half-written token. On unix the file is
/// readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Uses `<data dir>/flood_alert/auth-token.bin`.
    pub fn new() -> Result<Self, TokenStoreError> {
        let dir = get_data_dir().map_err(TokenStoreError::DirResolution)?;
        Self::in_dir(&dir)
    }

    pub fn in_dir(dir: &Path) -> Result<Self, TokenStoreError> {
        ensure_dir_exists(dir).map_err(|e| TokenStoreError::DirCreation(dir.to_path_buf(), e))?;
        Ok(Self {
            path: dir.join(TOKEN_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(bytes)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored token at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(TokenStoreError::Read(self.path.clone(), e)),
        };
        let (stored, _) = bincode::serde::decode_from_slice::<StoredToken, _>(&bytes, BINCODE_CONFIG)
            .map_err(|e| TokenStoreError::Decode(self.path.clone(), Box::new(e)))?;
        Ok(Some(stored.token))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now().timestamp(),
        };
        let bytes = bincode::serde::encode_to_vec(&stored, BINCODE_CONFIG)
            .map_err(|e| TokenStoreError::Encode(Box::new(e)))?;
        self.write_atomic(&bytes)
            .map_err(|e| TokenStoreError::Write(self.path.clone(), e))?;
        info!("Stored auth token at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed auth token at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenStoreError::Delete(self.path.clone(), e)),
        }
    }
}

/// Keeps the token in memory only. Useful for tests and for hosts that manage
/// secure storage themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
