use std::time::Duration;

use validator::Validate;

use crate::error::CoreError;

/// Default autosave period while a window is open and not minimized.
pub const DEFAULT_AUTOSAVE_SECS: u64 = 30;

/// Default maximum title length in draft summaries (characters).
pub const DEFAULT_TITLE_MAX_CHARS: usize = 50;

/// Default maximum summary length in draft summaries (characters).
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 100;

/// Draft tuning loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct DraftConfig {
    /// Seconds between autosave ticks.
    #[validate(range(min = 1, max = 3600))]
    pub autosave_interval_secs: u64,
    /// Title truncation length for tray listings.
    #[validate(range(min = 1, max = 1000))]
    pub title_max_chars: usize,
    /// Summary truncation length for tray listings.
    #[validate(range(min = 1, max = 1000))]
    pub summary_max_chars: usize,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: DEFAULT_AUTOSAVE_SECS,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }
}

impl DraftConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `DRAFT_AUTOSAVE_SECS`     | `30`    |
    /// | `DRAFT_TITLE_MAX_CHARS`   | `50`    |
    /// | `DRAFT_SUMMARY_MAX_CHARS` | `100`   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            autosave_interval_secs: parse_var(
                &lookup,
                "DRAFT_AUTOSAVE_SECS",
                defaults.autosave_interval_secs,
            )?,
            title_max_chars: parse_var(&lookup, "DRAFT_TITLE_MAX_CHARS", defaults.title_max_chars)?,
            summary_max_chars: parse_var(
                &lookup,
                "DRAFT_SUMMARY_MAX_CHARS",
                defaults.summary_max_chars,
            )?,
        };
        config
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(config)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CoreError::Validation(format!("{key} must be a positive integer, got '{raw}'"))
        }),
    }
}
