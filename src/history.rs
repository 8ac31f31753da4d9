//! Per-light event history for debugging and diagnostics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter};

use crate::runtime::Instant;

/// Kind of event in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageType {
    /// A command forwarded to the unit
    Command,
    /// A push notification routed to the light
    Push,
    /// Cached state re-derived from the unit
    Refresh,
}

/// A recorded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub msg_type: MessageType,
    pub action: String,
    pub message: Value,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Tracks recent events of one light.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    counts: HashMap<MessageType, usize>,
    latest: HashMap<MessageType, Value>,
    last_error: Option<String>,
    start_time: Instant,
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            latest: HashMap::new(),
            last_error: None,
            start_time: Instant::now(),
            entries: Vec::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn record(&mut self, msg_type: MessageType, action: &str, message: Value) {
        *self.counts.entry(msg_type).or_default() += 1;
        self.latest.insert(msg_type, message.clone());

        self.entries.push(HistoryEntry {
            msg_type,
            action: action.to_string(),
            message,
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Most recent payload of the given kind.
    pub fn latest(&self, msg_type: MessageType) -> Option<&Value> {
        self.latest.get(&msg_type)
    }

    /// Number of events of the given kind since creation, including evicted ones.
    pub fn count(&self, msg_type: MessageType) -> usize {
        self.counts.get(&msg_type).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            command_count: self.count(MessageType::Command),
            push_count: self.count(MessageType::Push),
            refresh_count: self.count(MessageType::Refresh),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of the history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub command_count: usize,
    pub push_count: usize,
    pub refresh_count: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}
