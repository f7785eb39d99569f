//! Playback tracking loop
//!
//! The playhead follows the audio clock through a chain of frame callbacks.
//! Each tick reads the clock, moves the playhead and asks the host for the
//! next frame; the chain ends by simply not asking again.
//!
//! ```text
//!          start()               tick(): bar past the end
//!   Idle ───────────▶ Running(t) ─────────────────────────▶ Idle
//!    ▲                  │   ▲
//!    │     stop()       │   │ start(): cancel t, mint t+1
//!    └──────────────────┘   └────────────
//! ```
//!
//! Every chain carries a [`TickToken`]. Restarting mints a new token, so a
//! frame that was already queued for the previous chain arrives stale and is
//! dropped. Only one chain can therefore touch the cursor.

mod note_tracker;

pub use note_tracker::{NoteThrottle, NoteTracking, DEFAULT_NOTE_STEPS_PER_BEAT};

use crate::convert::time_to_rect;
use crate::cursor::{CursorMode, CursorModel};
use crate::error::{CursorError, CursorResult};
use crate::segment::SegmentIndex;
use crate::traits::{AudioClock, CursorView, FrameRequester};
use crate::types::Rect;

/// Identity of one playback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running(TickToken),
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Token belongs to a cancelled or replaced chain; nothing was done
    Stale,
    /// Playhead moved and the next frame was requested
    Continue { time: f64, bar: usize, playhead: Rect },
    /// Clock ran past the timeline; the chain ended
    Finished { time: f64 },
}

/// Everything one tick reads or writes
pub struct TickContext<'a> {
    pub clock: &'a dyn AudioClock,
    pub segments: &'a SegmentIndex,
    pub model: &'a mut CursorModel,
    pub notes: Option<&'a mut NoteTracking>,
    pub view: &'a mut dyn CursorView,
    pub frames: &'a mut dyn FrameRequester,
    /// Vertical inset of the playhead inside its bar
    pub margin: f64,
}

/// State machine driving the playback chain
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    last_token: u64,
    throttle: Option<NoteThrottle>,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PlaybackState::Running(_))
    }

    /// Note throttle of the current run, when note tracking is active
    pub fn note_throttle(&self) -> Option<&NoteThrottle> {
        self.throttle.as_ref()
    }

    /// Begin a new chain, replacing any running one
    ///
    /// `note_steps` is `Some(steps_per_beat)` when a note cursor should be
    /// tracked. The caller runs the first tick with the returned token.
    pub fn start(
        &mut self,
        frames: &mut dyn FrameRequester,
        model: &mut CursorModel,
        beat_duration: f64,
        note_steps: Option<u32>,
    ) -> TickToken {
        if let PlaybackState::Running(previous) = self.state {
            log::debug!("Replacing playback chain {}", previous.id());
            frames.cancel_frame(previous);
        }

        self.last_token += 1;
        let token = TickToken(self.last_token);
        self.state = PlaybackState::Running(token);
        model.begin_playback();

        self.throttle = match note_steps {
            Some(steps) if beat_duration > 0.0 => Some(NoteThrottle::new(beat_duration, steps)),
            Some(_) => {
                log::warn!(
                    "Beat duration {} is not positive, note cursor will not follow playback",
                    beat_duration
                );
                None
            }
            None => None,
        };

        log::info!("Playback chain {} started", token.id());
        token
    }

    /// Cancel the running chain, if any
    ///
    /// Returns true when a chain was running. Calling it again is a no-op.
    pub fn stop(&mut self, frames: &mut dyn FrameRequester, model: &mut CursorModel) -> bool {
        match std::mem::take(&mut self.state) {
            PlaybackState::Running(token) => {
                frames.cancel_frame(token);
                model.end_playback();
                self.throttle = None;
                log::info!("Playback chain {} stopped", token.id());
                true
            }
            PlaybackState::Idle => false,
        }
    }

    /// Run one tick of the chain identified by `token`
    pub fn tick(&mut self, token: TickToken, ctx: TickContext<'_>) -> CursorResult<TickOutcome> {
        if self.state != PlaybackState::Running(token) {
            log::trace!("Dropping stale tick {}", token.id());
            return Ok(TickOutcome::Stale);
        }

        let time = ctx.clock.current_time().max(0.0);
        // Always a fresh lookup: the clock may jump back on loop or seek
        let bar = match ctx.segments.segment_at(time) {
            Ok(bar) => bar,
            Err(CursorError::OutOfRange { .. }) => ctx.segments.len(),
            Err(e) => return Err(e),
        };

        if let (Some(throttle), Some(notes)) = (self.throttle.as_mut(), ctx.notes) {
            throttle.update(time, notes);
        }

        if bar >= ctx.segments.len() {
            self.state = PlaybackState::Idle;
            self.throttle = None;
            ctx.model.end_playback();
            log::info!("Playback chain {} reached the end at {:.3}s", token.id(), time);
            return Ok(TickOutcome::Finished { time });
        }

        let playhead = time_to_rect(ctx.segments, time, Some(bar), ctx.margin)?;
        ctx.model.set_playhead(time, CursorMode::Playing)?;
        ctx.view.refresh();
        ctx.frames.request_frame(token);

        Ok(TickOutcome::Continue { time, bar, playhead })
    }
}
