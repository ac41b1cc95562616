use std::collections::VecDeque;

use esomchat_types::Message;

/// A message in the log, with whether it belongs to a completed exchange.
///
/// Only durable entries are persisted and sent upstream as history; the
/// welcome text and the turns of a failed exchange stay transient.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub seq: u64,
    pub message: Message,
    pub durable: bool,
}

/// Ordered, bounded conversation log with FIFO eviction.
///
/// The bound applies to durable entries and, separately, to transient ones,
/// so a run of failed exchanges never pushes completed turns out of the log.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    entries: VecDeque<LogEntry>,
    max_items: usize,
    next_seq: u64,
}

impl ConversationLog {
    /// Create an empty log holding at most `max_items` durable messages (at least one)
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_items: max_items.max(1),
            next_seq: 0,
        }
    }

    /// Rebuild a log from a persisted snapshot, keeping the most recent entries
    pub fn from_snapshot(messages: Vec<Message>, max_items: usize) -> Self {
        let mut log = Self::new(max_items);
        for message in messages {
            log.push(message, true);
        }
        log
    }

    /// Append a message, evicting the oldest entries of its kind while over
    /// capacity. Returns the sequence number of the new entry.
    pub fn push(&mut self, message: Message, durable: bool) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(LogEntry { seq, message, durable });
        self.evict();
        seq
    }

    /// Mark the entry with the given sequence number durable, if it is still held
    pub fn mark_durable(&mut self, seq: u64) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.seq == seq) else {
            return false;
        };
        entry.durable = true;
        self.evict();
        true
    }

    fn evict(&mut self) {
        // Transient entries older than the oldest kept durable one go with it
        while self.durable_len() > self.max_items {
            self.entries.pop_front();
        }
        while self.len() - self.durable_len() > self.max_items {
            match self.entries.iter().position(|e| !e.durable) {
                Some(index) => {
                    self.entries.remove(index);
                }
                None => break,
            }
        }
    }

    /// Number of durable entries
    pub fn durable_len(&self) -> usize {
        self.entries.iter().filter(|e| e.durable).count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().map(|e| &e.message)
    }

    /// Durable messages in chronological order; this is what gets persisted
    pub fn snapshot(&self) -> Vec<Message> {
        self.entries
            .iter()
            .filter(|e| e.durable)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.back().map(|e| &e.message)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
