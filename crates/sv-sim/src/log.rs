//! The event log ("main courante"): a bounded, append-only record of what
//! happened, stamped with virtual time.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Entries kept before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 1_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info     => "INFO",
            Severity::Warning  => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSource {
    Vehicle,
    System,
    Regulation,
}

impl LogSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LogSource::Vehicle    => "VEHICLE",
            LogSource::System     => "SYSTEM",
            LogSource::Regulation => "REGULATION",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Monotonic within one log, starting at 1.
    pub id:           u64,
    pub virtual_time: NaiveDateTime,
    pub severity:     Severity,
    pub source:       LogSource,
    pub message:      String,
    /// Vehicle label or stop id the entry is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id:    Option<String>,
}

#[derive(Clone, Debug)]
pub struct EventLog {
    entries:  VecDeque<LogEntry>,
    next_id:  u64,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), next_id: 1, capacity: capacity.max(1) }
    }

    /// Append an entry and return its id.
    pub fn push(
        &mut self,
        virtual_time: NaiveDateTime,
        severity:     Severity,
        source:       LogSource,
        message:      impl Into<String>,
        entity_id:    Option<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            id,
            virtual_time,
            severity,
            source,
            message: message.into(),
            entity_id,
        });
        id
    }

    /// Oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    /// Entries with an id greater than `id`, oldest first.
    pub fn since(&self, id: u64) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().filter(move |e| e.id > id)
    }

    /// Id of the newest entry, 0 when nothing was ever logged.
    pub fn last_id(&self) -> u64 {
        self.next_id - 1
    }

    /// Drop all entries.  Ids keep counting up.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
