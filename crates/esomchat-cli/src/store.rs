use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use esomchat_core::HistoryStore;

/// Get or create the esomchat directory (~/.esomchat)
pub fn esomchat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let dir = PathBuf::from(home_dir).join(".esomchat");
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create esomchat directory")?;
    }
    Ok(dir)
}

/// Conversation snapshot kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file {}", self.path.display()))?;
        Ok(Some(contents))
    }

    fn save(&self, snapshot: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&self.path, snapshot)
            .with_context(|| format!("Failed to write history file {}", self.path.display()))
    }
}
