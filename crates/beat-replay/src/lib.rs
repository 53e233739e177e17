// Input logs, recording and deterministic replay of a player

mod input_log;
mod recorder;
mod replay;

pub use input_log::{InputFrame, InputLog};
pub use recorder::ReplayRecorder;
pub use replay::{ReplayOutcome, TimedJudgment, autoplay_log, run_replay};
