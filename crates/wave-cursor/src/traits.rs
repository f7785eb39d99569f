//! Traits for the host-side collaborators of the cursor
//!
//! The cursor never reaches for globals. Everything it talks to is handed to
//! [`AudioCursorBuilder`](crate::AudioCursorBuilder) as one of these traits.

use crate::playback::TickToken;
use crate::types::Rect;

/// Audio clock of the loaded track
pub trait AudioClock {
    /// Current playback time in seconds
    fn current_time(&self) -> f64;

    /// Duration of one beat in seconds (constant for the loaded piece)
    fn beat_duration(&self) -> f64;
}

/// The view that displays the waveform and the cursor
pub trait CursorView {
    /// Request a redraw
    fn refresh(&mut self);

    /// Map an unscaled layout rectangle to on-screen coordinates (zoom/pan)
    fn scale(&self, rect: Rect) -> Rect {
        rect
    }
}

/// Host "next frame" primitive
///
/// The host calls [`AudioCursor::on_frame`](crate::AudioCursor::on_frame)
/// with the same token once the requested frame fires.
pub trait FrameRequester {
    /// Schedule one tick for the chain identified by `token`
    fn request_frame(&mut self, token: TickToken);

    /// Drop the pending tick of `token`, if any
    fn cancel_frame(&mut self, token: TickToken);
}

/// Note lookup of the score model
pub trait NoteIndex {
    /// Index of the last note starting at or before `beat` (1-based beats)
    fn prev_index_by_beat(&self, beat: f64) -> usize;
}

/// The note cursor kept in step with playback
pub trait NoteCursor {
    fn set_pos(&mut self, index: usize);

    /// Number of notes the cursor can point at
    fn list_len(&self) -> usize;
}

/// Drawing primitives for the cursor layer
pub trait CursorPainter {
    /// Fill a rectangle with a colour (`0xRRGGBB`) at the given opacity
    fn fill_rect(&mut self, rect: Rect, color: u32, alpha: f64);

    /// Stroke a vertical line at `x` from `y0` to `y1`
    fn stroke_line(&mut self, x: f64, y0: f64, y1: f64, color: u32, width: f64);
}
