//! Note cursor tracking during playback
//!
//! The note cursor moves at beat resolution, far coarser than the frame
//! rate. Recomputing its index is comparatively expensive, so it is only
//! looked up once playback has advanced by `beat_duration / steps_per_beat`
//! since the last lookup, independent of how often frames fire.

use crate::error::{CursorError, CursorResult};
use crate::traits::{NoteCursor, NoteIndex};

/// Default lookup resolution: 32 steps per beat
pub const DEFAULT_NOTE_STEPS_PER_BEAT: u32 = 32;

/// Score lookup and note cursor, configured together or not at all
pub struct NoteTracking {
    notes: Box<dyn NoteIndex>,
    cursor: Box<dyn NoteCursor>,
}

impl NoteTracking {
    pub fn new(notes: Box<dyn NoteIndex>, cursor: Box<dyn NoteCursor>) -> Self {
        Self { notes, cursor }
    }

    /// Pair two optional collaborators
    ///
    /// Both present gives `Some`, both absent gives `None`; anything else is
    /// a configuration error.
    pub fn from_parts(
        notes: Option<Box<dyn NoteIndex>>,
        cursor: Option<Box<dyn NoteCursor>>,
    ) -> CursorResult<Option<Self>> {
        match (notes, cursor) {
            (Some(notes), Some(cursor)) => Ok(Some(Self::new(notes, cursor))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(CursorError::Configuration(
                "note index given without a note cursor".to_string(),
            )),
            (None, Some(_)) => Err(CursorError::Configuration(
                "note cursor given without a note index".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for NoteTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteTracking")
            .field("list_len", &self.cursor.list_len())
            .finish()
    }
}

/// Throttle state of one playback run
#[derive(Debug, Clone, PartialEq)]
pub struct NoteThrottle {
    beat_duration: f64,
    min_beat_step: f64,
    time_step: f64,
    prev_index: usize,
}

impl NoteThrottle {
    pub fn new(beat_duration: f64, steps_per_beat: u32) -> Self {
        Self {
            beat_duration,
            min_beat_step: beat_duration / steps_per_beat.max(1) as f64,
            time_step: 0.0,
            prev_index: 0,
        }
    }

    pub fn min_beat_step(&self) -> f64 {
        self.min_beat_step
    }

    /// Time of the last lookup threshold
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Index last applied to the note cursor
    pub fn prev_index(&self) -> usize {
        self.prev_index
    }

    /// Advance the note cursor for the current playback time
    ///
    /// Returns the index applied on this call, if any.
    pub fn update(&mut self, time: f64, tracking: &mut NoteTracking) -> Option<usize> {
        if time < self.time_step + self.min_beat_step {
            return None;
        }
        self.time_step += self.min_beat_step;

        let index = tracking.notes.prev_index_by_beat(time / self.beat_duration + 1.0);
        if index != self.prev_index && index < tracking.cursor.list_len() {
            tracking.cursor.set_pos(index);
            self.prev_index = index;
            log::trace!("Note cursor -> {} at {:.3}s", index, time);
            return Some(index);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// One note per beat; counts lookups
    struct BeatNotes {
        lookups: Rc<Cell<usize>>,
    }

    impl NoteIndex for BeatNotes {
        fn prev_index_by_beat(&self, beat: f64) -> usize {
            self.lookups.set(self.lookups.get() + 1);
            (beat - 1.0).floor().max(0.0) as usize
        }
    }

    struct RecordingCursor {
        len: usize,
        positions: Rc<RefCell<Vec<usize>>>,
    }

    impl NoteCursor for RecordingCursor {
        fn set_pos(&mut self, index: usize) {
            self.positions.borrow_mut().push(index);
        }

        fn list_len(&self) -> usize {
            self.len
        }
    }

    fn tracking(len: usize) -> (NoteTracking, Rc<Cell<usize>>, Rc<RefCell<Vec<usize>>>) {
        let lookups = Rc::new(Cell::new(0));
        let positions = Rc::new(RefCell::new(Vec::new()));
        let tracking = NoteTracking::new(
            Box::new(BeatNotes { lookups: lookups.clone() }),
            Box::new(RecordingCursor {
                len,
                positions: positions.clone(),
            }),
        );
        (tracking, lookups, positions)
    }

    #[test]
    fn test_lookup_throttled_to_min_beat_step() {
        let (mut tracking, lookups, _) = tracking(16);
        let mut throttle = NoteThrottle::new(1.0, DEFAULT_NOTE_STEPS_PER_BEAT);
        assert_eq!(throttle.min_beat_step(), 1.0 / 32.0);

        for t in [0.0, 0.01, 0.02, 0.031] {
            throttle.update(t, &mut tracking);
        }
        assert_eq!(lookups.get(), 0);

        throttle.update(0.032, &mut tracking);
        assert_eq!(lookups.get(), 1);
        assert_eq!(throttle.time_step(), 1.0 / 32.0);

        // Still below the next threshold (0.0625)
        throttle.update(0.05, &mut tracking);
        assert_eq!(lookups.get(), 1);
    }

    #[test]
    fn test_applies_only_changed_indices() {
        let (mut tracking, _, positions) = tracking(16);
        let mut throttle = NoteThrottle::new(0.5, 4);
        let mut t = 0.0;
        while t < 2.0 {
            throttle.update(t, &mut tracking);
            t += 0.01;
        }
        // Beats at 0.5s: notes 1, 2, 3 get applied once each
        assert_eq!(*positions.borrow(), vec![1, 2, 3]);
        assert_eq!(throttle.prev_index(), 3);
    }

    #[test]
    fn test_index_past_list_is_not_applied() {
        let (mut tracking, lookups, positions) = tracking(2);
        let mut throttle = NoteThrottle::new(1.0, 1);
        throttle.update(1.0, &mut tracking);
        throttle.update(2.0, &mut tracking);
        throttle.update(3.0, &mut tracking);
        assert_eq!(lookups.get(), 3);
        assert_eq!(*positions.borrow(), vec![1]);
    }

    #[test]
    fn test_half_configured_pair_is_rejected() {
        let (full, _, _) = tracking(1);
        let NoteTracking { notes, cursor } = full;

        assert!(matches!(
            NoteTracking::from_parts(Some(notes), None),
            Err(CursorError::Configuration(_))
        ));
        assert!(matches!(
            NoteTracking::from_parts(None, Some(cursor)),
            Err(CursorError::Configuration(_))
        ));
        assert!(matches!(NoteTracking::from_parts(None, None), Ok(None)));
    }
}
