// Judging rules: per-column note judging, stats, speed and player state

pub mod autoplay;
mod error;
pub mod input;
mod judgment;
pub mod note_judge;
mod notifications;
mod options;
mod player_state;
mod result;
mod speed;
mod stats;

pub use autoplay::Autoplay;
pub use error::PlayerError;
pub use input::{ButtonSignal, ControlSignals, InputChannel, InputSample, InputSignals, InputTracker};
pub use judgment::{Judgment, Timegates};
pub use note_judge::{JudgeEvent, JudgeSource, NoteJudge, NoteRuntimeState, NoteStatus};
pub use notifications::{JudgmentNotification, Notifications, SoundKind, SoundNotification};
pub use options::PlayerOptions;
pub use player_state::PlayerState;
pub use result::{JudgmentCounts, PlayResult};
pub use speed::SpeedController;
pub use stats::PlayerStats;
