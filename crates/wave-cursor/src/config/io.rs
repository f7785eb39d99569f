//! Reading and writing the cursor config file
//!
//! Values loaded from disk go through [`CursorConfig::sanitize`], so a hand
//! edited file can never hand the cursor a negative margin or a zero step
//! count.

use super::cursor::{CursorConfig, PlayheadStyle, SelectionStyle};
use super::paths::default_config_path;
use super::parse_color;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// File name of the cursor config inside the config directory
pub const CONFIG_FILE_NAME: &str = "cursor.yaml";

impl CursorConfig {
    /// Load the config at `path`
    ///
    /// A missing file gives the defaults. An unreadable or malformed file
    /// gives the defaults with a warning.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No cursor config at {:?}, using defaults", path);
                return Self::default();
            }
            Err(e) => {
                log::warn!("Cannot read cursor config {:?}: {}, using defaults", path, e);
                return Self::default();
            }
        };

        let mut config = match serde_yaml::from_str::<Self>(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Malformed cursor config {:?}: {}, using defaults", path, e);
                return Self::default();
            }
        };

        let corrected = config.sanitize();
        log::info!(
            "Loaded cursor config from {:?} ({} value(s) corrected)",
            path,
            corrected
        );
        config
    }

    /// Load `cursor.yaml` from the user config directory
    pub fn load_default() -> Self {
        Self::load(&default_config_path(CONFIG_FILE_NAME))
    }

    /// Write the config as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize cursor config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write cursor config {:?}", path))?;
        log::info!("Saved cursor config to {:?}", path);
        Ok(())
    }

    /// Replace out-of-range values in place, warning once per field
    ///
    /// Returns the number of fields corrected.
    pub fn sanitize(&mut self) -> usize {
        let mut corrected = 0;

        let margin = self.validated_margin();
        if margin != self.margin_cursor {
            log::warn!("margin_cursor {} out of range, using {}", self.margin_cursor, margin);
            self.margin_cursor = margin;
            corrected += 1;
        }

        let steps = self.validated_note_steps();
        if steps != self.note_steps_per_beat {
            log::warn!("note_steps_per_beat {} out of range, using {}", self.note_steps_per_beat, steps);
            self.note_steps_per_beat = steps;
            corrected += 1;
        }

        let alpha = self.selection.validated_alpha();
        if alpha != self.selection.alpha {
            log::warn!("selection.alpha {} out of range, using {}", self.selection.alpha, alpha);
            self.selection.alpha = alpha;
            corrected += 1;
        }

        if parse_color(&self.selection.color).is_none() {
            let fallback = SelectionStyle::default().color;
            log::warn!("selection.color '{}' is not #RRGGBB, using {}", self.selection.color, fallback);
            self.selection.color = fallback;
            corrected += 1;
        }

        if parse_color(&self.playhead.color).is_none() {
            let fallback = PlayheadStyle::default().color;
            log::warn!("playhead.color '{}' is not #RRGGBB, using {}", self.playhead.color, fallback);
            self.playhead.color = fallback;
            corrected += 1;
        }

        if !(self.playhead.width.is_finite() && self.playhead.width > 0.0) {
            let fallback = PlayheadStyle::default().width;
            log::warn!("playhead.width {} out of range, using {}", self.playhead.width, fallback);
            self.playhead.width = fallback;
            corrected += 1;
        }

        corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CursorConfig::load(&dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config, CursorConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = CursorConfig {
            margin_cursor: 8.0,
            note_steps_per_beat: 8,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(CursorConfig::load(&path), config);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "margin_cursor: [not, a, number]").unwrap();
        assert_eq!(CursorConfig::load(&path), CursorConfig::default());
    }

    #[test]
    fn test_load_corrects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "margin_cursor: -4.0\n\
             note_steps_per_beat: 0\n\
             selection:\n  color: purple\n  alpha: 3.0\n\
             playhead:\n  width: 0.0\n",
        )
        .unwrap();

        let config = CursorConfig::load(&path);
        assert_eq!(config.margin_cursor, 0.0);
        assert_eq!(config.note_steps_per_beat, 1);
        assert_eq!(config.selection.alpha, 1.0);
        assert_eq!(config.selection.color, "#9900FF");
        assert_eq!(config.playhead, PlayheadStyle::default());
    }

    #[test]
    fn test_sanitize_counts_corrections() {
        let mut config = CursorConfig::default();
        assert_eq!(config.sanitize(), 0);

        config.margin_cursor = f64::NAN;
        config.selection.alpha = f64::NAN;
        assert_eq!(config.sanitize(), 2);
        assert_eq!(config.margin_cursor, 0.0);
        assert_eq!(config.selection.alpha, 0.2);
        assert_eq!(config.sanitize(), 0);
    }
}
