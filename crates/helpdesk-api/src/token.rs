//! Durable bearer-token storage behind a seam, so the gateway can be
//! tested without touching the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::interface::ApiError;

/// Storage key used by the original client; doubles as the default
/// file name for the file-backed store.
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, ApiError>;
    fn save(&self, token: &str) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_owned()))
                }
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(ApiError::Configuration(format!(
                "failed to read token file '{}': {error}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, token: &str) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| {
                    ApiError::Configuration(format!(
                        "failed to create token directory '{}': {error}",
                        parent.display()
                    ))
                })?;
            }
        }
        fs::write(&self.path, token).map_err(|error| {
            ApiError::Configuration(format!(
                "failed to write token file '{}': {error}",
                self.path.display()
            ))
        })
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ApiError::Configuration(format!(
                "failed to remove token file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        Ok(self.token.read().expect("token store read lock").clone())
    }

    fn save(&self, token: &str) -> Result<(), ApiError> {
        *self.token.write().expect("token store write lock") = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.token.write().expect("token store write lock") = None;
        Ok(())
    }
}
