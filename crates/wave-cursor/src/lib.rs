//! Playback cursor and range selection for bar-segmented waveform views
//!
//! The waveform is laid out bar by bar, wrapping over several rows. This
//! crate keeps a playhead in step with the audio clock inside that layout,
//! lets the user drag-select a time range across bars and rows, and moves an
//! optional note cursor along with playback.
//!
//! ## Architecture
//!
//! - **Segment index** ([`SegmentIndex`]): bars with their time spans and areas
//! - **Cursor model** ([`CursorModel`]): selected range, playhead, writer mode
//! - **Conversion** ([`convert`]): piecewise-linear time <-> position mapping
//! - **Selection** ([`selection`]): pointer drags to time ranges
//! - **Playback** ([`playback`]): frame-driven tracking loop and note throttle
//! - **Facade** ([`AudioCursor`]): host entry points, built with injected collaborators
//!
//! Drawing, the audio engine, the score model and frame scheduling belong to
//! the host and are reached through the traits in [`traits`].

pub mod audio_cursor;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod error;
pub mod events;
pub mod playback;
pub mod segment;
pub mod selection;
pub mod traits;
pub mod types;

pub use audio_cursor::{AudioCursor, AudioCursorBuilder};
pub use config::CursorConfig;
pub use convert::{interval_to_rects, position_to_time, time_to_rect};
pub use cursor::{CursorMode, CursorModel, CursorRange};
pub use error::{CursorError, CursorResult};
pub use events::{CursorEvent, EventBus, Selection};
pub use playback::{NoteTracking, PlaybackScheduler, PlaybackState, TickOutcome, TickToken};
pub use segment::{Segment, SegmentIndex};
pub use selection::{DragOutcome, DragSample};
pub use traits::{AudioClock, CursorPainter, CursorView, FrameRequester, NoteCursor, NoteIndex};
pub use types::{Point, Rect, TimeBounds};
