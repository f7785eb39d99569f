//! Range selection by pointer drag
//!
//! A drag is described by the raw press point and the current pointer
//! point. The two are turned into a bounding box; its left and right edges
//! are converted to times inside the bars under them.
//!
//! The layout wraps bars over several rows, so reading order is row first,
//! then x. When a drag spans more than one row and runs against reading
//! order diagonally (bottom-left to top-right, or top-right to bottom-left),
//! the box edges are swapped: the point on the upper row is the earlier one
//! even though its x is larger. Only x is swapped; the upper row is always
//! taken from the box top.

use crate::convert::position_to_time;
use crate::cursor::{CursorModel, CursorRange};
use crate::error::CursorResult;
use crate::events::Selection;
use crate::segment::SegmentIndex;
use crate::types::{Point, Rect};

/// One pointer sample of a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Where the button was pressed
    pub start: Point,
    /// Where the pointer is now
    pub end: Point,
    /// True for the button-release sample
    pub released: bool,
}

impl DragSample {
    pub fn new(start: Point, end: Point, released: bool) -> Self {
        Self { start, end, released }
    }

    /// A press and release at the same point
    pub fn click(point: Point) -> Self {
        Self::new(point, point, true)
    }

    /// Bounding box of the two points
    pub fn bounding_box(&self) -> DragBox {
        DragBox {
            x: self.start.x.min(self.end.x),
            y: self.start.y.min(self.end.y),
            xe: self.start.x.max(self.end.x),
            ye: self.start.y.max(self.end.y),
        }
    }

    pub fn from_bottom_left_to_top_right(&self) -> bool {
        self.start.x < self.end.x && self.start.y > self.end.y
    }

    pub fn from_top_right_to_bottom_left(&self) -> bool {
        self.start.x > self.end.x && self.start.y < self.end.y
    }
}

/// Normalized drag rectangle (`x <= xe`, `y <= ye`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBox {
    pub x: f64,
    pub y: f64,
    pub xe: f64,
    pub ye: f64,
}

/// Bars and times a drag sample resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDrag {
    pub first_bar: usize,
    pub last_bar: usize,
    /// `[pos1, pos2]`, unsorted
    pub range: CursorRange,
}

/// Convert a drag sample into bars and times
///
/// Returns `Ok(None)` when either edge of the drag lies outside every bar.
pub fn resolve_drag<F>(
    index: &SegmentIndex,
    sample: &DragSample,
    scale: F,
) -> CursorResult<Option<ResolvedDrag>>
where
    F: Fn(Rect) -> Rect,
{
    let bbox = sample.bounding_box();
    let multiple_rows = index.rows_spanned(bbox.y, bbox.ye, &scale) > 1;
    let against_reading_order =
        sample.from_bottom_left_to_top_right() || sample.from_top_right_to_bottom_left();

    let (x1, x2) = if against_reading_order && multiple_rows {
        (bbox.xe, bbox.x)
    } else {
        (bbox.x, bbox.xe)
    };

    let first = index.segment_at_point(Point::new(x1, bbox.y), &scale);
    let last = index.segment_at_point(Point::new(x2, bbox.ye), &scale);
    let (Some(first_bar), Some(last_bar)) = (first, last) else {
        return Ok(None);
    };

    let pos1 = position_to_time(index, x1, first_bar, scale(index.area_of(first_bar)?))?;
    let pos2 = position_to_time(index, x2, last_bar, scale(index.area_of(last_bar)?))?;

    Ok(Some(ResolvedDrag {
        first_bar,
        last_bar,
        range: CursorRange::new(pos1, pos2),
    }))
}

/// What a drag sample did to the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Sample was outside the timeline, or the cursor is locked
    Ignored,
    /// Selection moved while dragging
    Moved(ResolvedDrag),
    /// Released with a non-empty selection
    Selected(Selection),
    /// Released without a selection
    Clicked,
}

/// Tracks one drag gesture at a time
#[derive(Debug, Clone, Default)]
pub struct SelectionHandler {
    dragging: bool,
}

impl SelectionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between the first sample of a drag and its release
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Apply a drag sample to the cursor model
    ///
    /// Fails with a writer conflict while playback owns the cursor.
    pub fn handle<F>(
        &mut self,
        model: &mut CursorModel,
        index: &SegmentIndex,
        sample: &DragSample,
        scale: F,
    ) -> CursorResult<(DragOutcome, Option<ResolvedDrag>)>
    where
        F: Fn(Rect) -> Rect,
    {
        let resolved = resolve_drag(index, sample, scale)?;

        let mut applied = None;
        if let Some(drag) = resolved {
            if model.set_pos(drag.range)? {
                log::debug!(
                    "Drag bars {}..{} -> [{:.3}, {:.3}]",
                    drag.first_bar,
                    drag.last_bar,
                    drag.range.start,
                    drag.range.end
                );
                applied = Some(drag);
            } else {
                log::debug!("Drag ignored: cursor is not editable");
            }
        } else {
            log::trace!("Drag sample outside the timeline: {:?}", sample);
        }

        if !sample.released {
            self.dragging = true;
            let outcome = applied.map(DragOutcome::Moved).unwrap_or(DragOutcome::Ignored);
            return Ok((outcome, applied));
        }

        self.dragging = false;
        let range = model.pos();
        let outcome = if range.is_point() {
            DragOutcome::Clicked
        } else {
            DragOutcome::Selected(Selection {
                start_time: range.start,
                end_time: range.end,
            })
        };
        Ok((outcome, applied))
    }
}
