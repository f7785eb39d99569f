//! Cursor model: the selected time range plus the playhead
//!
//! The model has one writer at a time. While playback runs, the scheduler
//! owns it ([`CursorMode::Playing`]) and interactive edits are rejected;
//! otherwise the selection handler owns it ([`CursorMode::Interactive`]).
//!
//! The scheduler only moves the playhead. The selected range is left alone
//! during playback so the player keeps looping over it.

use crate::error::{CursorError, CursorResult};
use serde::{Deserialize, Serialize};

/// Which writer currently owns the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorMode {
    /// User is free to drag a selection
    #[default]
    Interactive,
    /// A playback chain is updating the playhead
    Playing,
}

/// A `[start, end]` time range in seconds
///
/// `start == end` is a point cursor. `start > end` comes from a right-to-left
/// drag; call [`normalized`](Self::normalized) before using it as an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorRange {
    pub start: f64,
    pub end: f64,
}

impl CursorRange {
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn point(time: f64) -> Self {
        Self { start: time, end: time }
    }

    /// True for a zero-width cursor
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Same range with `start <= end`
    pub fn normalized(&self) -> Self {
        if self.start <= self.end {
            *self
        } else {
            Self::new(self.end, self.start)
        }
    }
}

/// Cursor state shared by the selection handler and the playback scheduler
#[derive(Debug, Clone)]
pub struct CursorModel {
    range: CursorRange,
    playhead: f64,
    editable: bool,
    mode: CursorMode,
    duration: f64,
}

impl CursorModel {
    /// Create a point cursor at 0 for a track of `duration` seconds
    pub fn new(duration: f64) -> Self {
        Self {
            range: CursorRange::point(0.0),
            playhead: 0.0,
            editable: true,
            mode: CursorMode::Interactive,
            duration: duration.max(0.0),
        }
    }

    /// Total track duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn pos(&self) -> CursorRange {
        self.range
    }

    pub fn start(&self) -> f64 {
        self.range.start
    }

    pub fn end(&self) -> f64 {
        self.range.end
    }

    /// Time the playhead was last placed at
    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Hand ownership to a playback chain
    pub fn begin_playback(&mut self) {
        self.mode = CursorMode::Playing;
    }

    /// Hand ownership back to interactive editing
    pub fn end_playback(&mut self) {
        self.mode = CursorMode::Interactive;
    }

    fn claim(&self, requested: CursorMode) -> CursorResult<()> {
        if self.mode != requested {
            return Err(CursorError::WriterConflict {
                active: self.mode,
                requested,
            });
        }
        Ok(())
    }

    /// Set the range from an interactive edit
    ///
    /// Returns `Ok(false)` when the cursor is not editable. The range is
    /// stored as given, without sorting.
    pub fn set_pos(&mut self, range: CursorRange) -> CursorResult<bool> {
        self.claim(CursorMode::Interactive)?;
        if !self.editable {
            return Ok(false);
        }
        self.range = range;
        Ok(true)
    }

    /// Move the playhead from a given writer
    pub fn set_playhead(&mut self, time: f64, writer: CursorMode) -> CursorResult<()> {
        self.claim(writer)?;
        self.playhead = time;
        Ok(())
    }

    /// Clamp a seek target to the track
    ///
    /// Non-finite times are rejected rather than clamped.
    pub fn clamp_time(&self, time: f64) -> CursorResult<f64> {
        if !time.is_finite() {
            return Err(CursorError::OutOfRange {
                time,
                total: self.duration,
            });
        }
        Ok(time.clamp(0.0, self.duration))
    }

    /// Collapse the range to a point and park the playhead there
    ///
    /// The time is clamped to the track. Used when the host seeks; the point
    /// range keeps the player from looping. On error nothing is changed.
    pub fn seek(&mut self, time: f64) -> CursorResult<f64> {
        self.claim(CursorMode::Interactive)?;
        let time = self.clamp_time(time)?;
        self.range = CursorRange::point(time);
        self.playhead = time;
        Ok(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor_is_point_at_zero() {
        let cursor = CursorModel::new(12.0);
        assert!(cursor.pos().is_point());
        assert_eq!(cursor.start(), 0.0);
        assert_eq!(cursor.mode(), CursorMode::Interactive);
        assert!(cursor.is_editable());
    }

    #[test]
    fn test_set_pos_keeps_order() {
        let mut cursor = CursorModel::new(12.0);
        assert_eq!(cursor.set_pos(CursorRange::new(5.0, 2.0)), Ok(true));
        assert_eq!(cursor.pos(), CursorRange::new(5.0, 2.0));
        assert_eq!(cursor.pos().normalized(), CursorRange::new(2.0, 5.0));
    }

    #[test]
    fn test_not_editable_ignores_writes() {
        let mut cursor = CursorModel::new(12.0);
        cursor.set_editable(false);
        assert_eq!(cursor.set_pos(CursorRange::new(1.0, 2.0)), Ok(false));
        assert!(cursor.pos().is_point());
    }

    #[test]
    fn test_playback_rejects_interactive_writer() {
        let mut cursor = CursorModel::new(12.0);
        cursor.begin_playback();
        assert_eq!(
            cursor.set_pos(CursorRange::new(1.0, 2.0)),
            Err(CursorError::WriterConflict {
                active: CursorMode::Playing,
                requested: CursorMode::Interactive,
            })
        );
        assert!(cursor.set_playhead(3.0, CursorMode::Playing).is_ok());
        assert_eq!(cursor.playhead(), 3.0);

        cursor.end_playback();
        assert!(cursor.set_playhead(4.0, CursorMode::Playing).is_err());
        assert!(cursor.set_pos(CursorRange::new(1.0, 2.0)).is_ok());
    }

    #[test]
    fn test_seek_clamps_to_track() {
        let mut cursor = CursorModel::new(10.0);
        assert_eq!(cursor.seek(14.0), Ok(10.0));
        assert_eq!(cursor.pos(), CursorRange::point(10.0));
        assert_eq!(cursor.seek(-1.0), Ok(0.0));
        assert_eq!(cursor.playhead(), 0.0);
    }

    #[test]
    fn test_seek_rejects_non_finite_time() {
        let mut cursor = CursorModel::new(10.0);
        cursor.set_pos(CursorRange::new(1.0, 3.0)).unwrap();

        for time in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                cursor.seek(time),
                Err(CursorError::OutOfRange { total, .. }) if total == 10.0
            ));
        }
        assert_eq!(cursor.pos(), CursorRange::new(1.0, 3.0));
        assert_eq!(cursor.playhead(), 0.0);
    }
}
