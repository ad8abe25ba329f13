//! In-memory token store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::TokenStore;
use super::types::TokenRecord;

/// Error type for token store operations
#[derive(Debug)]
pub enum TokenStoreError {
    /// Backing file or device could not be read or written
    Io(String),

    /// Stored content is not a valid token map
    Corrupted(String),
}

impl std::fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "Token storage I/O failed: {msg}"),
            Self::Corrupted(msg) => write!(f, "Token storage is corrupted: {msg}"),
        }
    }
}

impl std::error::Error for TokenStoreError {}

impl From<std::io::Error> for TokenStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TokenStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Corrupted(err.to_string())
    }
}

/// Process-local [`TokenStore`]; records are lost when it is dropped
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    records: RwLock<HashMap<String, TokenRecord>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `records`
    #[must_use]
    pub fn with_records<I, K>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, TokenRecord)>,
        K: Into<String>,
    {
        Self {
            records: RwLock::new(records.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn has(&self, key: &str) -> bool {
        self.records.read().contains_key(key)
    }

    async fn get(&self, key: &str) -> Result<Option<TokenRecord>, TokenStoreError> {
        Ok(self.records.read().get(key).cloned())
    }

    async fn set(&self, key: &str, record: TokenRecord) -> Result<(), TokenStoreError> {
        self.records.write().insert(key.to_string(), record);
        Ok(())
    }
}
