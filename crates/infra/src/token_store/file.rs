//! JSON file token store
//!
//! All records live in a single JSON object keyed by store key. The file is
//! re-read on every access so several processes (or several stores in one
//! process) pointing at the same path observe each other's writes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crewconnect_common::{TokenRecord, TokenStore, TokenStoreError};
use parking_lot::Mutex;
use tracing::debug;

type TokenMap = HashMap<String, TokenRecord>;

/// [`TokenStore`] persisting records to a JSON file
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store backed by `path`; the file and its parent directory are created
    /// on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<TokenMap, TokenStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(TokenMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(TokenMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_map(&self, map: &TokenMap) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_vec_pretty(map)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, contents)?;
        restrict_permissions(&staging)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn has(&self, key: &str) -> bool {
        let _guard = self.lock.lock();
        self.read_map().map(|map| map.contains_key(key)).unwrap_or(false)
    }

    async fn get(&self, key: &str) -> Result<Option<TokenRecord>, TokenStoreError> {
        let _guard = self.lock.lock();
        Ok(self.read_map()?.remove(key))
    }

    async fn set(&self, key: &str, record: TokenRecord) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        map.insert(key.to_string(), record);
        self.write_map(&map)?;
        debug!(key, path = %self.path.display(), "token record persisted");
        Ok(())
    }
}
