//! Standard locations for cursor configuration files

use std::path::PathBuf;

/// Get the default config directory
///
/// Returns: `<user config dir>/wave-cursor`, or `./wave-cursor` when the
/// platform has no config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wave-cursor")
}

/// Get the default path of a config file
///
/// Returns: `<user config dir>/wave-cursor/{filename}`
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}
