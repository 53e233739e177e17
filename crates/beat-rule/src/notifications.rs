use beat_model::{Column, KeysoundId, NoteId};
use serde::{Deserialize, Serialize};

use crate::judgment::Judgment;

/// Why a keysound should be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// A note was hit.
    Hit,
    /// A note was missed.
    Break,
    /// A press landed on no note.
    Free,
}

/// One judgment made during the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgmentNotification {
    pub judgment: Judgment,
    /// Combo after this judgment was recorded
    pub combo: u32,
    pub delta_us: i64,
    pub column: Column,
}

/// One keysound to trigger, produced during the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundNotification {
    pub note: NoteId,
    pub keysound: KeysoundId,
    pub kind: SoundKind,
}

/// Tick-scoped feedback for rendering and audio.
///
/// Cleared at the start of every update; read after it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    pub judgments: Vec<JudgmentNotification>,
    pub sounds: Vec<SoundNotification>,
}

impl Notifications {
    pub fn clear(&mut self) {
        self.judgments.clear();
        self.sounds.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty() && self.sounds.is_empty()
    }
}
