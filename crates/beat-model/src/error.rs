use thiserror::Error;

use crate::column::Column;
use crate::note::NoteId;

/// Reasons a note sequence is rejected before play starts.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("note {id} has a negative time ({time_us} us)")]
    NegativeTime { id: NoteId, time_us: i64 },

    #[error("note {id} reaches {time_us} us, past the chart time limit")]
    TimeOutOfRange { id: NoteId, time_us: i64 },

    #[error("long note {id} ends at {end_time_us} us, not after its start at {time_us} us")]
    InvalidLongNote {
        id: NoteId,
        time_us: i64,
        end_time_us: i64,
    },

    #[error("duplicate note id {0}")]
    DuplicateNoteId(NoteId),

    #[error("note {id} in column {column} is not after the previous note {previous}")]
    OutOfOrder {
        id: NoteId,
        previous: NoteId,
        column: Column,
    },

    #[error("note {id} in column {column} starts before long note {previous} ends")]
    Overlap {
        id: NoteId,
        previous: NoteId,
        column: Column,
    },

    #[error("invalid BPM: {0}")]
    InvalidBpm(f64),

    #[error("invalid BPM change to {bpm} at beat {beat}")]
    InvalidBpmChange { beat: f64, bpm: f64 },

    #[error("failed to decode chart: {0}")]
    Decode(#[from] serde_json::Error),
}
