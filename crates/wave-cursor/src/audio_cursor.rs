//! Audio cursor: selection, playhead and note cursor of one waveform view
//!
//! Ties the pieces together and exposes the host-facing entry points:
//!
//! - [`on_ready`](AudioCursor::on_ready) once the waveform is laid out
//! - [`on_play`](AudioCursor::on_play) / [`on_stop`](AudioCursor::on_stop) from the player
//! - [`on_frame`](AudioCursor::on_frame) when a requested frame fires
//! - [`on_drag`](AudioCursor::on_drag) for pointer samples over the waveform
//! - [`draw`](AudioCursor::draw) from the view's paint pass
//!
//! Collaborators are injected through [`AudioCursorBuilder`]; notifications
//! go out on the cursor's [`EventBus`].

use crate::config::CursorConfig;
use crate::convert::{interval_to_rects, time_to_rect};
use crate::cursor::{CursorMode, CursorModel};
use crate::error::{CursorError, CursorResult};
use crate::events::{CursorEvent, EventBus};
use crate::playback::{NoteTracking, PlaybackScheduler, TickContext, TickOutcome, TickToken};
use crate::segment::SegmentIndex;
use crate::selection::{DragOutcome, DragSample, SelectionHandler};
use crate::traits::{AudioClock, CursorPainter, CursorView, FrameRequester, NoteCursor, NoteIndex};
use crate::types::{Point, Rect};
use crossbeam::channel::Receiver;
use std::path::Path;

/// Layout-dependent state, present once the waveform is laid out
#[derive(Debug)]
struct Timeline {
    segments: SegmentIndex,
    model: CursorModel,
    playhead: Rect,
}

/// Cursor of one waveform view
pub struct AudioCursor {
    config: CursorConfig,
    clock: Box<dyn AudioClock>,
    view: Box<dyn CursorView>,
    frames: Box<dyn FrameRequester>,
    notes: Option<NoteTracking>,
    events: EventBus,
    timeline: Option<Timeline>,
    scheduler: PlaybackScheduler,
    selection: SelectionHandler,
    enabled: bool,
}

impl AudioCursor {
    pub fn builder() -> AudioCursorBuilder {
        AudioCursorBuilder::default()
    }

    // =========================================================================
    // Host signals
    // =========================================================================

    /// The waveform was laid out; the cursor starts as a point at 0
    ///
    /// A new layout replaces the previous one and stops any running chain.
    pub fn on_ready(&mut self, segments: SegmentIndex) -> CursorResult<()> {
        if let Some(timeline) = self.timeline.as_mut() {
            if self.scheduler.stop(self.frames.as_mut(), &mut timeline.model) {
                self.events.notify(CursorEvent::PlaybackStopped);
            }
        }

        let duration = segments.total_duration();
        let playhead = time_to_rect(&segments, 0.0, Some(0), self.config.validated_margin())?;
        let count = segments.len();
        self.timeline = Some(Timeline {
            model: CursorModel::new(duration),
            segments,
            playhead,
        });
        self.view.refresh();

        log::info!("AudioCursor ready: {} bars, {:.3}s", count, duration);
        self.events.notify(CursorEvent::Ready {
            duration,
            segments: count,
        });
        Ok(())
    }

    /// Playback started: (re)start the tracking chain and run its first tick
    pub fn on_play(&mut self) -> CursorResult<()> {
        let Some(timeline) = self.timeline.as_mut() else {
            log::warn!("Play received before the waveform was laid out");
            return Err(CursorError::NotReady);
        };

        let note_steps = self
            .notes
            .as_ref()
            .map(|_| self.config.validated_note_steps());
        let token = self.scheduler.start(
            self.frames.as_mut(),
            &mut timeline.model,
            self.clock.beat_duration(),
            note_steps,
        );
        self.events.notify(CursorEvent::PlaybackStarted);
        self.on_frame(token)
    }

    /// Playback stopped: cancel the pending frame, if any
    pub fn on_stop(&mut self) {
        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };
        if self.scheduler.stop(self.frames.as_mut(), &mut timeline.model) {
            self.events.notify(CursorEvent::PlaybackStopped);
        }
    }

    /// A frame requested for `token` fired
    pub fn on_frame(&mut self, token: TickToken) -> CursorResult<()> {
        let Some(timeline) = self.timeline.as_mut() else {
            return Ok(());
        };

        let outcome = self.scheduler.tick(
            token,
            TickContext {
                clock: self.clock.as_ref(),
                segments: &timeline.segments,
                model: &mut timeline.model,
                notes: self.notes.as_mut(),
                view: self.view.as_mut(),
                frames: self.frames.as_mut(),
                margin: self.config.validated_margin(),
            },
        )?;

        match outcome {
            TickOutcome::Continue { playhead, .. } => timeline.playhead = playhead,
            TickOutcome::Finished { .. } => self.events.notify(CursorEvent::PlaybackEnded),
            TickOutcome::Stale => {}
        }
        Ok(())
    }

    /// Pointer sample of a drag over the waveform
    ///
    /// Samples outside the waveform, or before layout, are ignored. While
    /// playback runs the cursor belongs to the playback chain and the drag is
    /// rejected with [`CursorError::WriterConflict`].
    pub fn on_drag(&mut self, sample: DragSample) -> CursorResult<DragOutcome> {
        let Some(timeline) = self.timeline.as_mut() else {
            return Ok(DragOutcome::Ignored);
        };

        let view = self.view.as_ref();
        let (outcome, applied) = match self.selection.handle(
            &mut timeline.model,
            &timeline.segments,
            &sample,
            |rect| view.scale(rect),
        ) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Drag rejected: {}", e);
                return Err(e);
            }
        };

        if let Some(drag) = applied {
            timeline.playhead = time_to_rect(
                &timeline.segments,
                drag.range.start,
                Some(drag.first_bar),
                self.config.validated_margin(),
            )?;
            timeline
                .model
                .set_playhead(drag.range.start, CursorMode::Interactive)?;
            self.view.refresh();
        }

        if let DragOutcome::Selected(selection) = outcome {
            log::info!(
                "Selection [{:.3}, {:.3}]",
                selection.start_time,
                selection.end_time
            );
            self.events.notify(CursorEvent::Selected(selection));
        }
        Ok(outcome)
    }

    /// Place a point cursor at a 1-based beat of the score
    ///
    /// The range collapses to a point so the player does not loop.
    pub fn set_cursor_at_beat(&mut self, beat: f64) -> CursorResult<()> {
        let timeline = self.timeline.as_mut().ok_or(CursorError::NotReady)?;
        let time = timeline
            .model
            .clamp_time(self.clock.beat_duration() * (beat - 1.0))?;
        let bar = timeline.segments.segment_at_inclusive(time)?;
        let playhead = time_to_rect(
            &timeline.segments,
            time,
            Some(bar),
            self.config.validated_margin(),
        )?;

        // Model last: a failed lookup leaves the cursor untouched
        timeline.model.seek(time)?;
        timeline.playhead = playhead;
        self.view.refresh();
        Ok(())
    }

    // =========================================================================
    // Interaction state
    // =========================================================================

    pub fn set_editable(&mut self, editable: bool) {
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.model.set_editable(editable);
        }
    }

    /// Whether the user is currently interacting with the cursor layer
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether a screen point lies over one of the bars
    pub fn in_path(&self, point: Point) -> bool {
        let view = self.view.as_ref();
        self.timeline
            .as_ref()
            .and_then(|t| t.segments.segment_at_point(point, |rect| view.scale(rect)))
            .is_some()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Cursor model, once the waveform is laid out
    pub fn cursor(&self) -> Option<&CursorModel> {
        self.timeline.as_ref().map(|t| &t.model)
    }

    pub fn segments(&self) -> Option<&SegmentIndex> {
        self.timeline.as_ref().map(|t| &t.segments)
    }

    /// Playhead rectangle in layout coordinates
    pub fn playhead_rect(&self) -> Option<Rect> {
        self.timeline.as_ref().map(|t| t.playhead)
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    /// Receiver for cursor events
    pub fn subscribe(&self) -> Receiver<CursorEvent> {
        self.events.subscribe()
    }

    /// Areas covered by the current selection
    pub fn selection_rects(&self) -> CursorResult<Vec<Rect>> {
        let timeline = self.timeline.as_ref().ok_or(CursorError::NotReady)?;
        let range = timeline.model.pos();
        interval_to_rects(&timeline.segments, range.start, range.end)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Paint the selection and the playhead
    pub fn draw(&self, painter: &mut dyn CursorPainter) -> CursorResult<()> {
        let Some(timeline) = self.timeline.as_ref() else {
            return Ok(());
        };

        let fill = self.config.selection.rgb();
        let alpha = self.config.selection.validated_alpha();
        for rect in self.selection_rects()? {
            painter.fill_rect(rect, fill, alpha);
        }

        let line = timeline.playhead;
        painter.stroke_line(
            line.x,
            line.y,
            line.bottom(),
            self.config.playhead.rgb(),
            self.config.playhead.width,
        );
        Ok(())
    }
}

impl std::fmt::Debug for AudioCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioCursor")
            .field("config", &self.config)
            .field("timeline", &self.timeline)
            .field("scheduler", &self.scheduler)
            .field("notes", &self.notes)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Builder for [`AudioCursor`]
///
/// Clock, view and frame requester are required. The note index and note
/// cursor are optional but must be given together. The config is sanitized
/// on build.
#[derive(Default)]
pub struct AudioCursorBuilder {
    config: CursorConfig,
    clock: Option<Box<dyn AudioClock>>,
    view: Option<Box<dyn CursorView>>,
    frames: Option<Box<dyn FrameRequester>>,
    note_index: Option<Box<dyn NoteIndex>>,
    note_cursor: Option<Box<dyn NoteCursor>>,
    events: Option<EventBus>,
}

impl AudioCursorBuilder {
    pub fn config(mut self, config: CursorConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the config from a YAML file (defaults when missing)
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config = CursorConfig::load(path.as_ref());
        self
    }

    pub fn clock(mut self, clock: impl AudioClock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn view(mut self, view: impl CursorView + 'static) -> Self {
        self.view = Some(Box::new(view));
        self
    }

    pub fn frames(mut self, frames: impl FrameRequester + 'static) -> Self {
        self.frames = Some(Box::new(frames));
        self
    }

    pub fn note_index(mut self, notes: impl NoteIndex + 'static) -> Self {
        self.note_index = Some(Box::new(notes));
        self
    }

    pub fn note_cursor(mut self, cursor: impl NoteCursor + 'static) -> Self {
        self.note_cursor = Some(Box::new(cursor));
        self
    }

    /// Publish on an existing bus instead of a private one
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> CursorResult<AudioCursor> {
        let clock = self
            .clock
            .ok_or_else(|| CursorError::Configuration("audio clock is required".to_string()))?;
        let view = self
            .view
            .ok_or_else(|| CursorError::Configuration("view is required".to_string()))?;
        let frames = self
            .frames
            .ok_or_else(|| CursorError::Configuration("frame requester is required".to_string()))?;
        let notes = NoteTracking::from_parts(self.note_index, self.note_cursor)?;
        let mut config = self.config;
        config.sanitize();

        log::debug!(
            "AudioCursor built (note tracking: {})",
            if notes.is_some() { "on" } else { "off" }
        );

        Ok(AudioCursor {
            config,
            clock,
            view,
            frames,
            notes,
            events: self.events.unwrap_or_default(),
            timeline: None,
            scheduler: PlaybackScheduler::new(),
            selection: SelectionHandler::new(),
            enabled: false,
        })
    }
}
