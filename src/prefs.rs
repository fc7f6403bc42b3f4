//! User preferences: the shared poll interval and the default-enabled flag.

use std::io;
use std::path::Path;

use serde::Deserialize;
use tokio::fs;

/// Smallest accepted poll interval, in milliseconds.
pub const MIN_CHECK_RATE_MS: u64 = 50;

/// Largest accepted poll interval, in milliseconds.
///
/// Just under the largest delay a 32-bit millisecond timer can represent.
pub const MAX_CHECK_RATE_MS: u64 = 2_147_000_000;

/// Poll interval used when the preference store has no value.
const DEFAULT_CHECK_RATE_MS: u64 = 1000;

/// Default preference file contents.
pub const DEFAULT_PREFS_TOML: &str = r#"# tabwatch preferences

# How often watched files are polled for changes, in milliseconds.
file_check_rate = 1000

# If true, newly-tracked local-file tabs start with polling enabled.
default_enabled = true
"#;

/// Loaded user preferences.
///
/// `file_check_rate` is shared by every running poll timer; changing it
/// restarts all of them at the new rate.
#[derive(Clone, Debug, Deserialize)]
pub struct Prefs {
    #[serde(default = "default_check_rate")]
    pub file_check_rate: u64,
    #[serde(default = "default_enabled")]
    pub default_enabled: bool,
}

fn default_check_rate() -> u64 {
    DEFAULT_CHECK_RATE_MS
}

fn default_enabled() -> bool {
    true
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            file_check_rate: DEFAULT_CHECK_RATE_MS,
            default_enabled: true,
        }
    }
}

impl Prefs {
    /// Loads preferences from a TOML file on disk.
    pub async fn load(path: &Path) -> io::Result<Prefs> {
        let toml_str = fs::read_to_string(path).await?;
        Self::from_toml_str(&toml_str)
    }

    /// Parses preferences from a TOML document.
    ///
    /// Missing keys fall back to their defaults; the poll interval is
    /// clamped into the supported range.
    pub fn from_toml_str(toml_str: &str) -> io::Result<Prefs> {
        let mut prefs: Prefs = toml::from_str(toml_str).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("invalid TOML: {}", e))
        })?;
        prefs.file_check_rate = clamp_check_rate(prefs.file_check_rate);
        Ok(prefs)
    }

    /// Applies a new poll interval.
    ///
    /// Returns the clamped value actually stored, so callers can write
    /// it back to the preference store.
    pub fn set_check_rate(&mut self, rate_ms: u64) -> u64 {
        self.file_check_rate = clamp_check_rate(rate_ms);
        self.file_check_rate
    }
}

/// Clamps a poll interval into `[MIN_CHECK_RATE_MS, MAX_CHECK_RATE_MS]`.
pub fn clamp_check_rate(rate_ms: u64) -> u64 {
    rate_ms.clamp(MIN_CHECK_RATE_MS, MAX_CHECK_RATE_MS)
}
