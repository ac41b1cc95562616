use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};

use esomchat_types::Message;

/// Durable storage for the conversation snapshot.
///
/// The snapshot is an opaque JSON string; stores only move it around.
pub trait HistoryStore {
    /// Read the stored snapshot, `None` if nothing was stored yet
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &str) -> Result<()>;
}

impl<S: HistoryStore + ?Sized> HistoryStore for &S {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> Result<()> {
        (**self).save(snapshot)
    }
}

/// Serialize messages into the snapshot format
pub fn encode_snapshot(messages: &[Message]) -> Result<String> {
    serde_json::to_string(messages).context("Failed to serialize chat history")
}

/// Parse a snapshot back into messages
pub fn decode_snapshot(snapshot: &str) -> Result<Vec<Message>> {
    serde_json::from_str(snapshot).context("Failed to deserialize chat history")
}

/// In-memory store, for tests and hosts without durable storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a snapshot
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        let store = Self::new();
        store.slot.replace(Some(snapshot.into()));
        store
    }

    /// Make subsequent writes fail, the way a full browser quota does
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// The raw stored snapshot
    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, snapshot: &str) -> Result<()> {
        if self.fail_writes.get() {
            anyhow::bail!("storage quota exceeded");
        }
        self.slot.replace(Some(snapshot.to_string()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esomchat_types::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_round_trip() {
        let messages = vec![
            Message::new(Role::User, "What is GDP?", "2024-01-01T00:00:00.000Z"),
            Message::new(Role::Bot, "GDP is...", "2024-01-01T00:00:01.000Z"),
        ];
        let json = encode_snapshot(&messages).unwrap();
        assert_eq!(decode_snapshot(&json).unwrap(), messages);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_snapshot("not json").is_err());
        assert!(decode_snapshot(r#"{"role":"user"}"#).is_err());
    }

    #[test]
    fn test_memory_store_write_failure() {
        let store = MemoryStore::with_snapshot("[]");
        store.fail_writes(true);
        assert!(store.save("[1]").is_err());
        assert_eq!(store.contents().as_deref(), Some("[]"));
        assert_eq!(store.writes(), 0);
    }
}
