use anyhow::{anyhow, Result};
use web_sys::Storage;

use esomchat_core::HistoryStore;

/// Conversation snapshot kept in the browser's `localStorage`
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn storage(&self) -> Result<Storage> {
        web_sys::window()
            .ok_or_else(|| anyhow!("No window object"))?
            .local_storage()
            .map_err(|e| anyhow!("localStorage is not accessible: {:?}", e))?
            .ok_or_else(|| anyhow!("localStorage is not available"))
    }
}

impl HistoryStore for LocalStorageStore {
    fn load(&self) -> Result<Option<String>> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| anyhow!("Failed to read {}: {:?}", self.key, e))
    }

    fn save(&self, snapshot: &str) -> Result<()> {
        self.storage()?
            .set_item(&self.key, snapshot)
            .map_err(|e| anyhow!("Failed to write {}: {:?}", self.key, e))
    }
}
