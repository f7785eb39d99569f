//! Segment index: bars of the timeline with their time spans and screen areas
//!
//! The layout subsystem computes one [`Segment`] per bar once the audio is
//! loaded and the waveform is laid out. The index is read-only afterwards.
//!
//! Segments partition `[0, total_duration)` without gaps or overlaps, so a
//! time always resolves to exactly one bar. Lookups use binary search over
//! the segment end times; [`SegmentIndex::segment_at_linear`] is the forward
//! scan equivalent and returns identical results.

use crate::error::{CursorError, CursorResult};
use crate::types::{Point, Rect, TimeBounds};
use serde::{Deserialize, Serialize};

/// Tolerance when checking that adjacent segments share a boundary
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Tolerance when grouping segment areas into layout rows
const ROW_EPSILON: f64 = 1e-6;

/// One bar of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Ordinal position (0-based, contiguous)
    pub index: usize,
    /// Start time in seconds (inclusive)
    pub time_start: f64,
    /// End time in seconds (exclusive)
    pub time_end: f64,
    /// Screen area in unscaled layout coordinates
    pub area: Rect,
}

impl Segment {
    pub fn new(index: usize, time_start: f64, time_end: f64, area: Rect) -> Self {
        Self {
            index,
            time_start,
            time_end,
            area,
        }
    }

    #[inline]
    pub fn bounds(&self) -> TimeBounds {
        TimeBounds::new(self.time_start, self.time_end)
    }
}

/// Read-only registry of the timeline's segments
///
/// Deserializes from a plain list of segments and validates it on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Segment>", into = "Vec<Segment>")]
pub struct SegmentIndex {
    segments: Vec<Segment>,
}

impl SegmentIndex {
    /// Build an index, validating that the segments partition the timeline
    pub fn new(segments: Vec<Segment>) -> CursorResult<Self> {
        let Some(first) = segments.first() else {
            return Err(CursorError::InvalidLayout("no segments".to_string()));
        };
        if first.time_start.abs() > BOUNDARY_EPSILON {
            return Err(CursorError::InvalidLayout(format!(
                "first segment starts at {}s instead of 0",
                first.time_start
            )));
        }

        for (position, segment) in segments.iter().enumerate() {
            if segment.index != position {
                return Err(CursorError::InvalidLayout(format!(
                    "segment at position {} has index {}",
                    position, segment.index
                )));
            }
            if !(segment.time_start < segment.time_end) {
                return Err(CursorError::InvalidLayout(format!(
                    "segment {} has empty span [{}, {})",
                    position, segment.time_start, segment.time_end
                )));
            }
        }

        for pair in segments.windows(2) {
            if (pair[1].time_start - pair[0].time_end).abs() > BOUNDARY_EPSILON {
                return Err(CursorError::InvalidLayout(format!(
                    "gap or overlap between segment {} (ends {}s) and {} (starts {}s)",
                    pair[0].index, pair[0].time_end, pair[1].index, pair[1].time_start
                )));
            }
        }

        log::debug!(
            "SegmentIndex: {} segments over {:.3}s",
            segments.len(),
            segments[segments.len() - 1].time_end
        );

        Ok(Self { segments })
    }

    /// Build an index from parallel lists of bar time spans and areas
    pub fn from_parts(bounds: &[TimeBounds], areas: &[Rect]) -> CursorResult<Self> {
        if bounds.len() != areas.len() {
            return Err(CursorError::InvalidLayout(format!(
                "{} time spans but {} areas",
                bounds.len(),
                areas.len()
            )));
        }
        let segments = bounds
            .iter()
            .zip(areas)
            .enumerate()
            .map(|(i, (b, a))| Segment::new(i, b.start, b.end, *a))
            .collect();
        Self::new(segments)
    }

    /// Number of segments (bars)
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End time of the last segment
    pub fn total_duration(&self) -> f64 {
        self.segments.last().map(|s| s.time_end).unwrap_or(0.0)
    }

    /// All segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn check_time(&self, time: f64) -> CursorResult<()> {
        let total = self.total_duration();
        if time.is_nan() || time < 0.0 || time >= total {
            return Err(CursorError::OutOfRange { time, total });
        }
        Ok(())
    }

    /// Find the segment whose `[time_start, time_end)` contains `time`
    pub fn segment_at(&self, time: f64) -> CursorResult<usize> {
        self.check_time(time)?;
        // First segment whose end lies past `time`
        Ok(self.segments.partition_point(|s| s.time_end <= time))
    }

    /// Forward-scan variant of [`segment_at`](Self::segment_at)
    pub fn segment_at_linear(&self, time: f64) -> CursorResult<usize> {
        self.check_time(time)?;
        self.segments
            .iter()
            .position(|s| time < s.time_end)
            .ok_or(CursorError::OutOfRange {
                time,
                total: self.total_duration(),
            })
    }

    /// Like [`segment_at`](Self::segment_at), but the exact end of the
    /// timeline resolves to the last segment
    pub fn segment_at_inclusive(&self, time: f64) -> CursorResult<usize> {
        if time == self.total_duration() {
            return Ok(self.segments.len() - 1);
        }
        self.segment_at(time)
    }

    fn get(&self, index: usize) -> CursorResult<&Segment> {
        self.segments.get(index).ok_or(CursorError::InvalidSegment {
            index,
            count: self.segments.len(),
        })
    }

    /// Time boundaries of a segment
    pub fn bounds_of(&self, index: usize) -> CursorResult<TimeBounds> {
        self.get(index).map(Segment::bounds)
    }

    /// Unscaled screen area of a segment
    pub fn area_of(&self, index: usize) -> CursorResult<Rect> {
        self.get(index).map(|s| s.area)
    }

    /// Areas of all segments from `first` to `last` inclusive
    ///
    /// The order of the two indices does not matter.
    pub fn areas_between(&self, first: usize, last: usize) -> CursorResult<Vec<Rect>> {
        let (lo, hi) = if first <= last { (first, last) } else { (last, first) };
        self.get(hi)?;
        Ok(self.segments[lo..=hi].iter().map(|s| s.area).collect())
    }

    /// Find the segment whose scaled area contains a screen point
    pub fn segment_at_point<F>(&self, point: Point, scale: F) -> Option<usize>
    where
        F: Fn(Rect) -> Rect,
    {
        self.segments
            .iter()
            .find(|s| scale(s.area).contains(point))
            .map(|s| s.index)
    }

    /// Count the distinct layout rows touched by the vertical span `[top, bottom]`
    pub fn rows_spanned<F>(&self, top: f64, bottom: f64, scale: F) -> usize
    where
        F: Fn(Rect) -> Rect,
    {
        let mut rows: Vec<f64> = self
            .segments
            .iter()
            .map(|s| scale(s.area))
            .filter(|area| area.overlaps_rows(top, bottom))
            .map(|area| area.y)
            .collect();
        rows.sort_by(|a, b| a.total_cmp(b));
        rows.dedup_by(|a, b| (*a - *b).abs() < ROW_EPSILON);
        rows.len()
    }
}

impl TryFrom<Vec<Segment>> for SegmentIndex {
    type Error = CursorError;

    fn try_from(segments: Vec<Segment>) -> CursorResult<Self> {
        Self::new(segments)
    }
}

impl From<SegmentIndex> for Vec<Segment> {
    fn from(index: SegmentIndex) -> Self {
        index.segments
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two rows of two bars, one second each, 100x50 px per bar
    pub(crate) fn two_row_layout() -> SegmentIndex {
        SegmentIndex::from_parts(
            &[
                TimeBounds::new(0.0, 1.0),
                TimeBounds::new(1.0, 2.0),
                TimeBounds::new(2.0, 3.0),
                TimeBounds::new(3.0, 4.0),
            ],
            &[
                Rect::new(0.0, 0.0, 100.0, 50.0),
                Rect::new(100.0, 0.0, 100.0, 50.0),
                Rect::new(0.0, 60.0, 100.0, 50.0),
                Rect::new(100.0, 60.0, 100.0, 50.0),
            ],
        )
        .unwrap()
    }

    fn uneven_layout() -> SegmentIndex {
        let ends = [0.5, 1.75, 2.0, 4.2, 4.3, 7.0];
        let mut start = 0.0;
        let segments = ends
            .iter()
            .enumerate()
            .map(|(i, &end)| {
                let seg = Segment::new(i, start, end, Rect::new(i as f64 * 10.0, 0.0, 10.0, 20.0));
                start = end;
                seg
            })
            .collect();
        SegmentIndex::new(segments).unwrap()
    }

    #[test]
    fn test_segment_at_boundaries() {
        let index = two_row_layout();
        assert_eq!(index.segment_at(0.0), Ok(0));
        assert_eq!(index.segment_at(0.999), Ok(0));
        assert_eq!(index.segment_at(1.0), Ok(1));
        assert_eq!(index.segment_at(3.5), Ok(3));
    }

    #[test]
    fn test_segment_at_out_of_range() {
        let index = two_row_layout();
        assert!(matches!(index.segment_at(-0.1), Err(CursorError::OutOfRange { .. })));
        assert!(matches!(index.segment_at(4.0), Err(CursorError::OutOfRange { .. })));
        assert!(matches!(index.segment_at(f64::NAN), Err(CursorError::OutOfRange { .. })));
    }

    #[test]
    fn test_binary_and_linear_agree() {
        let index = uneven_layout();
        let mut t = 0.0;
        while t < 7.5 {
            assert_eq!(index.segment_at(t), index.segment_at_linear(t), "t = {}", t);
            t += 0.01;
        }
    }

    #[test]
    fn test_partition_is_total() {
        let index = uneven_layout();
        let mut t = 0.0;
        while t < index.total_duration() {
            let hits = index
                .segments()
                .iter()
                .filter(|s| s.bounds().contains(t))
                .count();
            assert_eq!(hits, 1, "t = {}", t);
            let found = index.segment_at(t).unwrap();
            assert!(index.bounds_of(found).unwrap().contains(t));
            t += 0.013;
        }
    }

    #[test]
    fn test_inclusive_end_resolves_last() {
        let index = two_row_layout();
        assert_eq!(index.segment_at_inclusive(4.0), Ok(3));
        assert!(index.segment_at_inclusive(4.1).is_err());
    }

    #[test]
    fn test_bounds_of_invalid_index() {
        let index = two_row_layout();
        assert_eq!(index.bounds_of(1), Ok(TimeBounds::new(1.0, 2.0)));
        assert_eq!(
            index.bounds_of(4),
            Err(CursorError::InvalidSegment { index: 4, count: 4 })
        );
    }

    #[test]
    fn test_rejects_gaps_and_bad_indices() {
        let gap = SegmentIndex::from_parts(
            &[TimeBounds::new(0.0, 1.0), TimeBounds::new(1.5, 2.0)],
            &[Rect::default(), Rect::default()],
        );
        assert!(matches!(gap, Err(CursorError::InvalidLayout(_))));

        let shifted = SegmentIndex::new(vec![Segment::new(1, 0.0, 1.0, Rect::default())]);
        assert!(matches!(shifted, Err(CursorError::InvalidLayout(_))));

        let empty = SegmentIndex::new(Vec::new());
        assert!(matches!(empty, Err(CursorError::InvalidLayout(_))));

        let mismatched = SegmentIndex::from_parts(&[TimeBounds::new(0.0, 1.0)], &[]);
        assert!(matches!(mismatched, Err(CursorError::InvalidLayout(_))));
    }

    #[test]
    fn test_areas_between_any_order() {
        let index = two_row_layout();
        let forward = index.areas_between(1, 3).unwrap();
        let backward = index.areas_between(3, 1).unwrap();
        assert_eq!(forward.len(), 3);
        assert_eq!(forward, backward);
        assert!(index.areas_between(2, 9).is_err());
    }

    #[test]
    fn test_layout_from_yaml() {
        let yaml = "
- index: 0
  time_start: 0.0
  time_end: 2.0
  area: { x: 0.0, y: 0.0, w: 80.0, h: 40.0 }
- index: 1
  time_start: 2.0
  time_end: 3.5
  area: { x: 80.0, y: 0.0, w: 80.0, h: 40.0 }
";
        let index: SegmentIndex = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.total_duration(), 3.5);
        assert_eq!(index.segment_at(2.5), Ok(1));

        let overlapping = yaml.replace("time_start: 2.0", "time_start: 1.5");
        assert!(serde_yaml::from_str::<SegmentIndex>(&overlapping).is_err());
    }

    #[test]
    fn test_hit_testing_and_rows() {
        let index = two_row_layout();
        let identity = |r: Rect| r;
        assert_eq!(index.segment_at_point(Point::new(150.0, 25.0), identity), Some(1));
        assert_eq!(index.segment_at_point(Point::new(50.0, 80.0), identity), Some(2));
        assert_eq!(index.segment_at_point(Point::new(50.0, 55.0), identity), None);

        assert_eq!(index.rows_spanned(10.0, 40.0, identity), 1);
        assert_eq!(index.rows_spanned(10.0, 80.0, identity), 2);

        let zoom = |r: Rect| Rect::new(r.x * 2.0, r.y * 2.0, r.w * 2.0, r.h * 2.0);
        assert_eq!(index.segment_at_point(Point::new(150.0, 25.0), zoom), Some(0));
    }
}
