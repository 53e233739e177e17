use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column::Column;

/// Unique, stable note identifier within a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub u32);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque keysound handle. Only used to tag sound notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeysoundId(pub u16);

/// A single playable note, already resolved to absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub column: Column,
    /// Hit time in microseconds
    pub time_us: i64,
    /// End time in microseconds, present only for long notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_us: Option<i64>,
    #[serde(default)]
    pub keysound: KeysoundId,
}

impl Note {
    pub fn normal(id: u32, column: Column, time_us: i64, keysound: u16) -> Self {
        Self {
            id: NoteId(id),
            column,
            time_us,
            end_time_us: None,
            keysound: KeysoundId(keysound),
        }
    }

    pub fn long_note(id: u32, column: Column, time_us: i64, end_time_us: i64, keysound: u16) -> Self {
        Self {
            id: NoteId(id),
            column,
            time_us,
            end_time_us: Some(end_time_us),
            keysound: KeysoundId(keysound),
        }
    }

    pub fn is_long_note(&self) -> bool {
        self.end_time_us.is_some()
    }

    /// The last timestamp this note is concerned with: the end time for long
    /// notes, the hit time otherwise.
    pub fn last_time_us(&self) -> i64 {
        self.end_time_us.unwrap_or(self.time_us)
    }

    /// Number of judgment events this note produces (press, plus release for LN).
    pub fn judgment_count(&self) -> u32 {
        if self.is_long_note() { 2 } else { 1 }
    }
}
