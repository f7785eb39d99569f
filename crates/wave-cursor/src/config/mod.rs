//! Cursor configuration
//!
//! - Cursor appearance and note-tracking settings
//! - YAML loading with out-of-range values corrected
//! - Default config location
//!
//! # Usage
//!
//! ```ignore
//! use wave_cursor::{AudioCursor, CursorConfig};
//!
//! let config = CursorConfig::load_default();
//! let cursor = AudioCursor::builder().config(config) /* collaborators */ .build()?;
//! ```

mod cursor;
mod io;
mod paths;

pub use cursor::{parse_color, CursorConfig, PlayheadStyle, SelectionStyle};
pub use io::CONFIG_FILE_NAME;
pub use paths::{default_config_dir, default_config_path};
