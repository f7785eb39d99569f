//! Time <-> screen position conversion
//!
//! Within one bar the mapping is linear:
//!
//! ```text
//! x = area.x + (t - time_start) / (time_end - time_start) * area.w
//! ```
//!
//! Across the whole timeline it is piecewise linear, one piece per bar.
//! [`position_to_time`] is the exact inverse when given the same rectangle.

use crate::error::CursorResult;
use crate::segment::SegmentIndex;
use crate::types::Rect;

/// Map a time to the cursor rectangle inside its bar
///
/// `x` is the precise cursor position; `w` is the full bar width. The
/// rectangle is shrunk vertically by `margin` on both sides. When `segment`
/// is `None` the bar is looked up from the time.
pub fn time_to_rect(
    index: &SegmentIndex,
    time: f64,
    segment: Option<usize>,
    margin: f64,
) -> CursorResult<Rect> {
    let segment = match segment {
        Some(segment) => segment,
        None => index.segment_at(time)?,
    };
    let bounds = index.bounds_of(segment)?;
    let area = index.area_of(segment)?;

    let percent = (time - bounds.start) / bounds.duration();
    Ok(Rect {
        x: area.x + percent * area.w,
        y: area.y + margin,
        w: area.w,
        h: area.h - margin * 2.0,
    })
}

/// Map a screen x coordinate to a time, relative to a known bar
///
/// `scaled_area` is the bar's area as currently shown on screen (after
/// zoom/pan). The result is not clamped: positions left or right of the bar
/// extrapolate past its time span.
pub fn position_to_time(
    index: &SegmentIndex,
    x: f64,
    segment: usize,
    scaled_area: Rect,
) -> CursorResult<f64> {
    let bounds = index.bounds_of(segment)?;
    let percent = (x - scaled_area.x) / scaled_area.w;
    Ok(percent * bounds.duration() + bounds.start)
}

/// Rectangles covering the time interval `[start, end]`
///
/// One rectangle per bar from the start bar to the end bar. The first one is
/// trimmed on the left to the precise start position and the last one on the
/// right to the precise end position, but only where that position falls
/// strictly inside the bar. A zero-length interval covers nothing.
pub fn interval_to_rects(index: &SegmentIndex, start: f64, end: f64) -> CursorResult<Vec<Rect>> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    if start == end {
        return Ok(Vec::new());
    }

    let start_bar = index.segment_at(start)?;
    let end_bar = index.segment_at_inclusive(end)?;
    let mut areas = index.areas_between(start_bar, end_bar)?;

    let start_x = time_to_rect(index, start, Some(start_bar), 0.0)?.x;
    let end_x = time_to_rect(index, end, Some(end_bar), 0.0)?.x;

    if let Some(first) = areas.first_mut() {
        if start_x > first.x && start_x < first.right() {
            first.w -= start_x - first.x;
            first.x = start_x;
        }
    }
    if let Some(last) = areas.last_mut() {
        if end_x > last.x && end_x < last.right() {
            last.w = end_x - last.x;
        }
    }

    Ok(areas)
}
