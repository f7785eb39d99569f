//! Cursor appearance and playback-tracking settings

use crate::playback::DEFAULT_NOTE_STEPS_PER_BEAT;
use serde::{Deserialize, Serialize};

/// Colour used when a configured colour string does not parse
const FALLBACK_COLOR: u32 = 0x000000;

const DEFAULT_SELECTION_ALPHA: f64 = 0.2;

/// Root cursor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Vertical inset of the playhead inside its bar, in layout units
    pub margin_cursor: f64,
    /// Note cursor lookups per beat during playback (>= 1)
    /// Higher values follow the score more closely at a higher cost.
    pub note_steps_per_beat: u32,
    /// Selection fill
    pub selection: SelectionStyle,
    /// Playhead line
    pub playhead: PlayheadStyle,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            margin_cursor: 5.0,
            note_steps_per_beat: DEFAULT_NOTE_STEPS_PER_BEAT,
            selection: SelectionStyle::default(),
            playhead: PlayheadStyle::default(),
        }
    }
}

impl CursorConfig {
    /// Lookup resolution, never below one step per beat
    pub fn validated_note_steps(&self) -> u32 {
        self.note_steps_per_beat.max(1)
    }

    /// Margin clamped to be non-negative
    pub fn validated_margin(&self) -> f64 {
        if self.margin_cursor.is_finite() {
            self.margin_cursor.max(0.0)
        } else {
            0.0
        }
    }
}

/// Selection fill style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionStyle {
    /// `#RRGGBB`
    pub color: String,
    /// Opacity 0.0 to 1.0
    pub alpha: f64,
}

impl Default for SelectionStyle {
    fn default() -> Self {
        Self {
            color: "#9900FF".to_string(),
            alpha: DEFAULT_SELECTION_ALPHA,
        }
    }
}

impl SelectionStyle {
    pub fn rgb(&self) -> u32 {
        parse_color(&self.color).unwrap_or_else(|| {
            log::warn!("Invalid selection colour '{}', using black", self.color);
            FALLBACK_COLOR
        })
    }

    /// Opacity clamped to `[0, 1]`; NaN falls back to the default
    pub fn validated_alpha(&self) -> f64 {
        if self.alpha.is_nan() {
            return DEFAULT_SELECTION_ALPHA;
        }
        self.alpha.clamp(0.0, 1.0)
    }
}

/// Playhead line style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayheadStyle {
    /// `#RRGGBB`
    pub color: String,
    /// Line width in layout units
    pub width: f64,
}

impl Default for PlayheadStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 1.0,
        }
    }
}

impl PlayheadStyle {
    pub fn rgb(&self) -> u32 {
        parse_color(&self.color).unwrap_or_else(|| {
            log::warn!("Invalid playhead colour '{}', using black", self.color);
            FALLBACK_COLOR
        })
    }
}

/// Parse `#RRGGBB` (leading `#` optional) into `0xRRGGBB`
pub fn parse_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
