use beat_model::{Column, KeysoundId, Note, NoteChart, NoteId};
use serde::{Deserialize, Serialize};

use crate::input::ButtonSignal;
use crate::judgment::{Judgment, Timegates};
use crate::notifications::SoundKind;

/// How far ahead of the current time a free keysound may look.
pub const FREE_SOUND_LOOKAHEAD_US: i64 = 1_000_000;

/// Tick times are clamped to this magnitude so note deltas cannot overflow.
const TIME_LIMIT_US: i64 = 4 * NoteChart::MAX_TIME_US;

/// Judging progress of a single note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteStatus {
    #[default]
    Unjudged,
    /// Long note whose head was hit and is being held.
    Active,
    Judged,
}

/// Runtime state of one note.
///
/// For an active long note `judgment` holds the head judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteRuntimeState {
    pub status: NoteStatus,
    pub judgment: Option<Judgment>,
}

/// What caused a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JudgeSource {
    /// A press edge attributed to the note.
    Press,
    /// Release of a held long note.
    Release,
    /// Time alone (missed notes, timed out or self-terminating holds).
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeEvent {
    Judged {
        note: NoteId,
        judgment: Judgment,
        delta_us: i64,
        source: JudgeSource,
    },
    Sound {
        note: NoteId,
        keysound: KeysoundId,
        kind: SoundKind,
    },
}

/// Judges the notes of a single column.
///
/// Notes are walked with a cursor pointing at the earliest note that is not
/// yet judged. At most one long note is active at a time.
#[derive(Debug, Clone)]
pub struct NoteJudge {
    column: Column,
    notes: Vec<Note>,
    states: Vec<NoteRuntimeState>,
    cursor: usize,
    active: Option<usize>,
    sound_cursor: usize,
}

impl NoteJudge {
    /// `notes` must be the time-ordered notes of `column`.
    pub fn new(column: Column, notes: &[Note]) -> Self {
        Self {
            column,
            notes: notes.to_vec(),
            states: vec![NoteRuntimeState::default(); notes.len()],
            cursor: 0,
            active: None,
            sound_cursor: 0,
        }
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn state(&self, index: usize) -> Option<&NoteRuntimeState> {
        self.states.get(index)
    }

    /// Index of the currently held long note.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Every note of the column is judged.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.notes.len()
    }

    /// Advance the column to `time_us` with this tick's signal, appending
    /// whatever was judged or should be heard to `events`.
    pub fn advance(
        &mut self,
        time_us: i64,
        signal: ButtonSignal,
        gates: &Timegates,
        events: &mut Vec<JudgeEvent>,
    ) {
        let time_us = time_us.clamp(-TIME_LIMIT_US, TIME_LIMIT_US);
        let tick_start = events.len();
        if let Some(index) = self.active {
            self.advance_active(index, time_us, signal, gates, events);
        }
        self.miss_passed(time_us, gates, events);
        if signal == ButtonSignal::Pressed && self.active.is_none() {
            self.handle_press(time_us, gates, events, tick_start);
        }
        self.settle_cursor();
    }

    /// Judge every remaining note as missed and conclude a held long note.
    pub fn flush(&mut self, time_us: i64, events: &mut Vec<JudgeEvent>) {
        let time_us = time_us.clamp(-TIME_LIMIT_US, TIME_LIMIT_US);
        if let Some(index) = self.active.take() {
            let end = self.notes[index].last_time_us();
            self.conclude(index, Judgment::Missed, time_us - end, JudgeSource::Passive, events);
        }
        for index in self.cursor..self.notes.len() {
            if self.states[index].status == NoteStatus::Unjudged {
                self.miss(index, time_us, events);
            }
        }
        self.settle_cursor();
    }

    fn advance_active(
        &mut self,
        index: usize,
        time_us: i64,
        signal: ButtonSignal,
        gates: &Timegates,
        events: &mut Vec<JudgeEvent>,
    ) {
        let end = self.notes[index].last_time_us();
        let head = self.states[index].judgment.unwrap_or(Judgment::Missed);
        let delta_us = time_us - end;

        // The turntable cannot be held still, so scratch holds end by themselves
        if self.column.is_scratch() && time_us >= end {
            self.conclude(index, head, delta_us, JudgeSource::Passive, events);
        } else if signal == ButtonSignal::Pressed || !signal.is_down() {
            let judgment = if gates.release_in_range(delta_us) {
                head
            } else {
                Judgment::Missed
            };
            self.conclude(index, judgment, delta_us, JudgeSource::Release, events);
        } else if delta_us > gates.release_window() {
            self.conclude(index, Judgment::Missed, delta_us, JudgeSource::Passive, events);
        }
    }

    fn conclude(
        &mut self,
        index: usize,
        judgment: Judgment,
        delta_us: i64,
        source: JudgeSource,
        events: &mut Vec<JudgeEvent>,
    ) {
        let note = self.notes[index];
        self.states[index] = NoteRuntimeState {
            status: NoteStatus::Judged,
            judgment: Some(judgment),
        };
        self.active = None;
        events.push(JudgeEvent::Judged {
            note: note.id,
            judgment,
            delta_us,
            source,
        });
        if judgment.is_miss() {
            events.push(sound(&note, SoundKind::Break));
        }
    }

    fn miss_passed(&mut self, time_us: i64, gates: &Timegates, events: &mut Vec<JudgeEvent>) {
        for index in self.cursor..self.notes.len() {
            if self.states[index].status != NoteStatus::Unjudged {
                continue;
            }
            if time_us - self.notes[index].time_us <= gates.widest() {
                break;
            }
            self.miss(index, time_us, events);
        }
    }

    fn miss(&mut self, index: usize, time_us: i64, events: &mut Vec<JudgeEvent>) {
        let note = self.notes[index];
        let delta_us = time_us - note.time_us;
        self.states[index] = NoteRuntimeState {
            status: NoteStatus::Judged,
            judgment: Some(Judgment::Missed),
        };
        for _ in 0..note.judgment_count() {
            events.push(JudgeEvent::Judged {
                note: note.id,
                judgment: Judgment::Missed,
                delta_us,
                source: JudgeSource::Passive,
            });
        }
        events.push(sound(&note, SoundKind::Break));
    }

    fn handle_press(
        &mut self,
        time_us: i64,
        gates: &Timegates,
        events: &mut Vec<JudgeEvent>,
        tick_start: usize,
    ) {
        let Some(index) = self.select_target(time_us, gates) else {
            // A keysound cut off during this tick stays silent
            if let Some(note) = self.free_sound_note(time_us)
                && !broke_in(&events[tick_start..], note.id)
            {
                events.push(sound(&note, SoundKind::Free));
            }
            return;
        };

        let note = self.notes[index];
        let delta_us = time_us - note.time_us;
        let judgment = gates.judge(delta_us);
        let status = if note.is_long_note() && !judgment.is_miss() {
            self.active = Some(index);
            NoteStatus::Active
        } else {
            NoteStatus::Judged
        };
        self.states[index] = NoteRuntimeState {
            status,
            judgment: Some(judgment),
        };
        events.push(JudgeEvent::Judged {
            note: note.id,
            judgment,
            delta_us,
            source: JudgeSource::Press,
        });
        let kind = if judgment.is_miss() {
            SoundKind::Break
        } else {
            SoundKind::Hit
        };
        events.push(sound(&note, kind));
    }

    /// Pick the note a press at `time_us` belongs to.
    ///
    /// The first unjudged note inside the widest window wins unless it would
    /// only be a worst-tier hit, in which case a strictly closer later note
    /// takes over. Ties keep the earlier note.
    fn select_target(&self, time_us: i64, gates: &Timegates) -> Option<usize> {
        let mut candidate: Option<(usize, i64)> = None;
        for index in self.cursor..self.notes.len() {
            if self.states[index].status != NoteStatus::Unjudged {
                continue;
            }
            let delta_us = time_us - self.notes[index].time_us;
            if delta_us < -gates.widest() {
                break;
            }
            if delta_us > gates.widest() {
                continue;
            }
            if let Some((_, best)) = candidate
                && delta_us.abs() >= best.abs()
            {
                break;
            }
            candidate = Some((index, delta_us));
            if !gates.judge(delta_us).is_worst_hit() {
                break;
            }
        }
        candidate.map(|(index, _)| index)
    }

    /// The latest note starting no later than the lookahead, falling back to
    /// the first note of the column.
    fn free_sound_note(&mut self, time_us: i64) -> Option<Note> {
        let horizon = time_us + FREE_SOUND_LOOKAHEAD_US;
        while self
            .notes
            .get(self.sound_cursor + 1)
            .is_some_and(|next| next.time_us <= horizon)
        {
            self.sound_cursor += 1;
        }
        self.notes.get(self.sound_cursor).copied()
    }

    fn settle_cursor(&mut self) {
        while self
            .states
            .get(self.cursor)
            .is_some_and(|state| state.status == NoteStatus::Judged)
        {
            self.cursor += 1;
        }
    }
}

fn broke_in(events: &[JudgeEvent], id: NoteId) -> bool {
    events.iter().any(|event| {
        matches!(
            *event,
            JudgeEvent::Sound { note, kind: SoundKind::Break, .. } if note == id
        )
    })
}

fn sound(note: &Note, kind: SoundKind) -> JudgeEvent {
    JudgeEvent::Sound {
        note: note.id,
        keysound: note.keysound,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judge(notes: &[Note]) -> NoteJudge {
        NoteJudge::new(notes[0].column, notes)
    }

    fn step(judge: &mut NoteJudge, time_us: i64, signal: ButtonSignal) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        judge.advance(time_us, signal, &Timegates::normal(), &mut events);
        events
    }

    fn judgments(events: &[JudgeEvent]) -> Vec<(NoteId, Judgment, i64)> {
        events
            .iter()
            .filter_map(|event| match *event {
                JudgeEvent::Judged {
                    note,
                    judgment,
                    delta_us,
                    ..
                } => Some((note, judgment, delta_us)),
                JudgeEvent::Sound { .. } => None,
            })
            .collect()
    }

    fn sounds(events: &[JudgeEvent]) -> Vec<(NoteId, SoundKind)> {
        events
            .iter()
            .filter_map(|event| match *event {
                JudgeEvent::Sound { note, kind, .. } => Some((note, kind)),
                JudgeEvent::Judged { .. } => None,
            })
            .collect()
    }

    #[test]
    fn press_on_time_is_best_tier() {
        let mut judge = judge(&[Note::normal(0, Column::Key1, 2_000_000, 1)]);
        let events = step(&mut judge, 2_000_000, ButtonSignal::Pressed);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Meticulous, 0)]);
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Hit)]);
        assert_eq!(judge.state(0).unwrap().status, NoteStatus::Judged);
        assert!(judge.is_complete());
    }

    #[test]
    fn press_too_early_plays_free_sound() {
        let mut judge = judge(&[Note::normal(0, Column::Key1, 2_000_000, 1)]);
        let events = step(&mut judge, 1_500_000, ButtonSignal::Pressed);
        assert!(judgments(&events).is_empty());
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Free)]);
        assert_eq!(judge.state(0).unwrap().status, NoteStatus::Unjudged);
    }

    #[test]
    fn holding_never_retriggers() {
        let mut judge = judge(&[Note::normal(0, Column::Key1, 2_000_000, 1)]);
        step(&mut judge, 1_000_000, ButtonSignal::Pressed);
        let events = step(&mut judge, 1_100_000, ButtonSignal::Held);
        assert!(events.is_empty());
    }

    #[test]
    fn passed_note_is_missed_without_input() {
        let mut judge = judge(&[Note::normal(0, Column::Key1, 2_000_000, 1)]);
        assert!(step(&mut judge, 2_200_000, ButtonSignal::Idle).is_empty());
        let events = step(&mut judge, 2_200_001, ButtonSignal::Idle);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Missed, 200_001)]);
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Break)]);
    }

    #[test]
    fn offbeat_candidate_yields_to_closer_note() {
        let mut judge = judge(&[
            Note::normal(0, Column::Key1, 2_000_000, 1),
            Note::normal(1, Column::Key1, 2_062_500, 1),
            Note::normal(2, Column::Key1, 2_125_000, 1),
        ]);
        let events = step(&mut judge, 2_125_000, ButtonSignal::Pressed);
        assert_eq!(judgments(&events), vec![(NoteId(1), Judgment::Good, 62_500)]);
        assert_eq!(judge.state(0).unwrap().status, NoteStatus::Unjudged);
        assert_eq!(judge.state(2).unwrap().status, NoteStatus::Unjudged);
    }

    #[test]
    fn equal_distance_keeps_earlier_note() {
        let mut judge = judge(&[
            Note::normal(0, Column::Key1, 1_000_000, 1),
            Note::normal(1, Column::Key1, 1_300_000, 1),
        ]);
        let events = step(&mut judge, 1_150_000, ButtonSignal::Pressed);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Offbeat, 150_000)]);
    }

    #[test]
    fn long_note_release_keeps_head_tier() {
        let mut judge = judge(&[Note::long_note(0, Column::Key2, 2_000_000, 3_000_000, 1)]);
        let events = step(&mut judge, 2_030_000, ButtonSignal::Pressed);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Precise, 30_000)]);
        assert_eq!(judge.active(), Some(0));
        assert!(step(&mut judge, 2_900_000, ButtonSignal::Held).is_empty());

        let events = step(&mut judge, 3_000_000, ButtonSignal::Released);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Precise, 0)]);
        assert!(sounds(&events).is_empty());
        assert_eq!(judge.active(), None);
    }

    #[test]
    fn early_release_misses_tail() {
        let mut judge = judge(&[Note::long_note(0, Column::Key2, 2_000_000, 3_000_000, 1)]);
        step(&mut judge, 2_000_000, ButtonSignal::Pressed);
        let events = step(&mut judge, 2_010_000, ButtonSignal::Released);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Missed, -990_000)]);
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Break)]);
        assert_eq!(judge.state(0).unwrap().judgment, Some(Judgment::Missed));
    }

    #[test]
    fn held_too_long_times_out() {
        let mut judge = judge(&[Note::long_note(0, Column::Key2, 2_000_000, 3_000_000, 1)]);
        step(&mut judge, 2_000_000, ButtonSignal::Pressed);
        assert!(step(&mut judge, 3_200_000, ButtonSignal::Held).is_empty());
        let events = step(&mut judge, 3_200_001, ButtonSignal::Held);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Missed, 200_001)]);
    }

    #[test]
    fn missed_long_note_head_misses_tail() {
        let mut judge = judge(&[Note::long_note(0, Column::Key2, 2_000_000, 3_000_000, 1)]);
        let events = step(&mut judge, 2_300_000, ButtonSignal::Pressed);
        let judged = judgments(&events);
        assert_eq!(judged.len(), 2);
        assert!(judged.iter().all(|&(_, j, _)| j == Judgment::Missed));
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Break)]);
    }

    #[test]
    fn press_after_miss_sounds_next_note() {
        let mut judge = judge(&[
            Note::normal(0, Column::Key1, 2_000_000, 1),
            Note::normal(1, Column::Key1, 3_000_000, 2),
        ]);
        let events = step(&mut judge, 2_300_000, ButtonSignal::Pressed);
        assert_eq!(
            sounds(&events),
            vec![(NoteId(0), SoundKind::Break), (NoteId(1), SoundKind::Free)]
        );
    }

    #[test]
    fn release_at_window_edge_keeps_head_tier() {
        let end = 3_000_000;
        let window = Timegates::normal().release_window();

        let mut hold = judge(&[Note::long_note(0, Column::Key2, 2_000_000, end, 1)]);
        step(&mut hold, 2_000_000, ButtonSignal::Pressed);
        let events = step(&mut hold, end - window, ButtonSignal::Released);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Meticulous, -window)]);
        assert!(sounds(&events).is_empty());

        let mut hold = judge(&[Note::long_note(0, Column::Key2, 2_000_000, end, 1)]);
        step(&mut hold, 2_000_000, ButtonSignal::Pressed);
        let events = step(&mut hold, end - window - 1, ButtonSignal::Released);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Missed, -window - 1)]);
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Break)]);
    }

    #[test]
    fn scratch_hold_ends_by_itself() {
        let mut judge = judge(&[Note::long_note(0, Column::Scratch, 2_000_000, 3_000_000, 1)]);
        step(&mut judge, 2_000_000, ButtonSignal::Pressed);
        let events = step(&mut judge, 3_000_000, ButtonSignal::Held);
        assert_eq!(judgments(&events), vec![(NoteId(0), Judgment::Meticulous, 0)]);
        assert!(judge.is_complete());
    }

    #[test]
    fn direction_change_moves_to_adjacent_hold() {
        let mut judge = judge(&[
            Note::long_note(0, Column::Scratch, 2_000_000, 3_968_750, 1),
            Note::long_note(1, Column::Scratch, 4_000_000, 5_968_750, 1),
        ]);
        step(&mut judge, 2_000_000, ButtonSignal::Pressed);
        let events = step(&mut judge, 4_000_000, ButtonSignal::Pressed);
        assert_eq!(
            judgments(&events),
            vec![
                (NoteId(0), Judgment::Meticulous, 31_250),
                (NoteId(1), Judgment::Meticulous, 0),
            ]
        );
        assert_eq!(judge.active(), Some(1));
    }

    #[test]
    fn free_sound_follows_lookahead() {
        let mut judge = judge(&[
            Note::normal(0, Column::Key1, 4_000_000, 1),
            Note::normal(1, Column::Key1, 8_000_000, 2),
        ]);
        step(&mut judge, 4_000_000, ButtonSignal::Pressed);
        step(&mut judge, 4_000_000, ButtonSignal::Released);

        let events = step(&mut judge, 6_500_000, ButtonSignal::Pressed);
        assert_eq!(sounds(&events), vec![(NoteId(0), SoundKind::Free)]);
        step(&mut judge, 6_500_000, ButtonSignal::Released);

        let events = step(&mut judge, 7_500_000, ButtonSignal::Pressed);
        assert_eq!(sounds(&events), vec![(NoteId(1), SoundKind::Free)]);
    }

    #[test]
    fn empty_column_is_silent() {
        let mut judge = NoteJudge::new(Column::Key7, &[]);
        assert!(step(&mut judge, 0, ButtonSignal::Pressed).is_empty());
        assert!(judge.is_complete());
    }

    #[test]
    fn flush_misses_everything_left() {
        let mut judge = judge(&[
            Note::long_note(0, Column::Key3, 1_000_000, 2_000_000, 1),
            Note::normal(1, Column::Key3, 3_000_000, 1),
        ]);
        step(&mut judge, 1_000_000, ButtonSignal::Pressed);
        let mut events = Vec::new();
        judge.flush(2_100_000, &mut events);
        let judged = judgments(&events);
        assert_eq!(judged.len(), 2);
        assert_eq!(judged[0], (NoteId(0), Judgment::Missed, 100_000));
        assert_eq!(judged[1].0, NoteId(1));
        assert!(judge.is_complete());
        assert_eq!(judge.active(), None);
    }
}
