use beat_model::{Column, Note, NoteChart, NoteId};
use log::{debug, info};

use crate::autoplay::Autoplay;
use crate::error::PlayerError;
use crate::input::{InputSample, InputTracker};
use crate::judgment::{Judgment, Timegates};
use crate::note_judge::{JudgeEvent, JudgeSource, NoteJudge, NoteRuntimeState, NoteStatus};
use crate::notifications::{JudgmentNotification, Notifications, SoundNotification};
use crate::options::PlayerOptions;
use crate::result::PlayResult;
use crate::speed::SpeedController;
use crate::stats::PlayerStats;

/// Complete judging state of one player for one attempt.
///
/// `update` is the only mutating entry point. After each call,
/// `notifications()` holds what happened during that tick.
#[derive(Debug, Clone)]
pub struct PlayerState {
    player: u8,
    chart: NoteChart,
    judges: [NoteJudge; Column::COUNT],
    gates: Timegates,
    stats: PlayerStats,
    speed: SpeedController,
    tracker: InputTracker,
    autoplay: Option<Autoplay>,
    notifications: Notifications,
    events: Vec<JudgeEvent>,
    finish_time_us: i64,
    finished: bool,
}

impl PlayerState {
    pub fn new(chart: &NoteChart, options: &PlayerOptions) -> Result<Self, PlayerError> {
        options.validate()?;

        let judges = std::array::from_fn(|i| {
            let column = Column::ALL[i];
            NoteJudge::new(column, chart.column_notes(column))
        });
        let finish_time_us = chart.last_time_us().unwrap_or(0) + options.finish_grace_us;

        Ok(Self {
            player: options.player,
            chart: chart.clone(),
            judges,
            gates: options.timegates(),
            stats: PlayerStats::new(chart.total_combo()),
            speed: SpeedController::new(options.speed, options.min_speed, options.max_speed),
            tracker: InputTracker::new(),
            autoplay: options.autoplay.then(|| Autoplay::new(chart)),
            notifications: Notifications::default(),
            events: Vec::new(),
            finish_time_us,
            finished: false,
        })
    }

    /// Validate `notes` into a chart and build the state for it.
    pub fn from_notes(notes: Vec<Note>, options: &PlayerOptions) -> Result<Self, PlayerError> {
        let chart = NoteChart::new(notes)?;
        Self::new(&chart, options)
    }

    /// Advance play to `time_us` with this tick's input.
    ///
    /// Times are expected to be non-decreasing. Once finished only the
    /// notifications are cleared.
    pub fn update(&mut self, time_us: i64, sample: &InputSample) {
        self.notifications.clear();
        if self.finished {
            return;
        }

        let mut sample = *sample;
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.apply(time_us, &mut sample);
        }
        let signals = self.tracker.track(&sample);
        self.speed.apply(&signals.controls);

        let mut events = std::mem::take(&mut self.events);
        for column in Column::ALL {
            events.clear();
            self.judges[column.index()].advance(
                time_us,
                signals.column(column),
                &self.gates,
                &mut events,
            );
            for event in &events {
                self.apply_event(column, event);
            }
        }

        if time_us > self.finish_time_us {
            for column in Column::ALL {
                events.clear();
                self.judges[column.index()].flush(time_us, &mut events);
                for event in &events {
                    self.apply_event(column, event);
                }
            }
            self.finished = true;
            info!(
                "player {} finished: score {} max combo {}/{} accuracy {:.4}",
                self.player,
                self.stats.score(),
                self.stats.max_combo(),
                self.stats.total_combo(),
                self.stats.accuracy()
            );
        }
        self.events = events;
    }

    fn apply_event(&mut self, column: Column, event: &JudgeEvent) {
        match *event {
            JudgeEvent::Judged {
                note,
                judgment,
                delta_us,
                source,
            } => {
                if source == JudgeSource::Press {
                    self.stats.handle_delta(delta_us);
                }
                self.stats.record_judgment(judgment);
                debug!(
                    "p{} {column} note {note}: {judgment:?} ({delta_us} us, {source:?}) combo {}",
                    self.player,
                    self.stats.combo()
                );
                self.notifications.judgments.push(JudgmentNotification {
                    judgment,
                    combo: self.stats.combo(),
                    delta_us,
                    column,
                });
            }
            JudgeEvent::Sound {
                note,
                keysound,
                kind,
            } => {
                self.notifications.sounds.push(SoundNotification {
                    note,
                    keysound,
                    kind,
                });
            }
        }
    }

    pub fn player(&self) -> u8 {
        self.player
    }

    pub fn chart(&self) -> &NoteChart {
        &self.chart
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn speed(&self) -> f64 {
        self.speed.speed()
    }

    pub fn timegates(&self) -> &Timegates {
        &self.gates
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Play is finished on the first update strictly after this time.
    pub fn finish_time_us(&self) -> i64 {
        self.finish_time_us
    }

    fn runtime_state(&self, id: NoteId) -> Option<&NoteRuntimeState> {
        let (column, index) = self.chart.locate(id)?;
        self.judges[column.index()].state(index)
    }

    pub fn note_status(&self, id: NoteId) -> Option<NoteStatus> {
        self.runtime_state(id).map(|state| state.status)
    }

    /// Judgment of a note; the head judgment while a long note is held.
    pub fn note_judgment(&self, id: NoteId) -> Option<Judgment> {
        self.runtime_state(id).and_then(|state| state.judgment)
    }

    pub fn result(&self) -> PlayResult {
        self.stats.result()
    }
}
