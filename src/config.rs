//! JSON configuration for a key bonding run.
//!
//! ```json
//! {
//!   "window_title": "Untitled - Notepad",
//!   "modifiers": ["shift"],
//!   "keys": ["a", 13, "f5"],
//!   "repeat_count": 3,
//!   "interval": "250ms"
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::time::Duration;

use crate::bonding::{KeyBonding, Modifier};
use crate::error::{KeyError, Result};
use crate::key::Key;
use crate::window::{MessagePoster, WindowHandle};

/// How the target window is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Handle(WindowHandle),
    Title(String),
    Process(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,

    /// Raw window handle, for callers that already hold one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_handle: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    #[serde(default)]
    pub keys: Vec<Key>,

    #[serde(default = "default_repeat_count")]
    pub repeat_count: u32,

    #[serde(
        default = "default_interval",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub interval: Duration,

    /// Keep going when a title lookup finds nothing.
    #[serde(default)]
    pub allow_missing_window: bool,

    #[serde(default)]
    pub verbose: bool,
}

fn default_repeat_count() -> u32 {
    1
}

fn default_interval() -> Duration {
    Duration::from_millis(100)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: None,
            window_handle: None,
            process_name: None,
            modifiers: Vec::new(),
            keys: Vec::new(),
            repeat_count: default_repeat_count(),
            interval: default_interval(),
            allow_missing_window: false,
            verbose: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| KeyError::config_load(path, e.to_string()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| KeyError::config_load(path, e.to_string()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| KeyError::config_save(path, e.to_string()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.target()?;

        if self.keys.is_empty() && self.modifiers.is_empty() {
            return Err(KeyError::config_validation(
                "at least one key or modifier must be configured",
            ));
        }

        if self.repeat_count == 0 {
            return Err(KeyError::config_validation(
                "repeat_count must be greater than 0",
            ));
        }

        Ok(())
    }

    /// The single configured target.
    pub fn target(&self) -> Result<Target> {
        match (&self.window_title, self.window_handle, &self.process_name) {
            (Some(title), None, None) => {
                if title.trim().is_empty() {
                    return Err(KeyError::config_validation("window_title cannot be empty"));
                }
                Ok(Target::Title(title.clone()))
            }
            (None, Some(raw), None) => {
                let raw = usize::try_from(raw).map_err(|_| {
                    KeyError::config_validation(format!(
                        "window_handle {raw:#x} does not fit a pointer"
                    ))
                })?;
                Ok(Target::Handle(WindowHandle::from_raw(raw)))
            }
            (None, None, Some(name)) => {
                if name.trim().is_empty() {
                    return Err(KeyError::config_validation("process_name cannot be empty"));
                }
                Ok(Target::Process(name.clone()))
            }
            (None, None, None) => Err(KeyError::config_validation(
                "one of window_title, window_handle or process_name is required",
            )),
            _ => Err(KeyError::config_validation(
                "only one of window_title, window_handle or process_name may be set",
            )),
        }
    }

    /// A bonding carrying this config's modifiers and keys, with no window
    /// assigned yet.
    pub fn to_bonding<P: MessagePoster>(&self, poster: P) -> KeyBonding<P> {
        let mut bonding = KeyBonding::with_poster(poster);
        for modifier in &self.modifiers {
            bonding.add_modifier(*modifier);
        }
        bonding.extend_keys(self.keys.iter().copied());
        bonding
    }
}

/// Parses `"500ms"`, `"2s"`, `"1m"`, `"1h"` or a bare number of milliseconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    if s.is_empty() {
        return Err(KeyError::invalid_duration(s, "empty duration"));
    }

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    if number.is_empty() {
        return Err(KeyError::invalid_duration(&s, "missing number"));
    }

    let value: u64 = number
        .parse()
        .map_err(|e| KeyError::invalid_duration(&s, format!("{e}")))?;

    let duration = match unit.trim() {
        "" | "ms" => Duration::from_millis(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(3600)),
        other => {
            return Err(KeyError::invalid_duration(
                &s,
                format!("unknown unit '{other}' (use ms, s, m or h)"),
            ))
        }
    };

    Ok(duration)
}

/// Formats a duration the way [`parse_duration`] reads it back.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 != 0 || millis == 0 {
        format!("{millis}ms")
    } else if millis % 60_000 != 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}m", millis / 60_000)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_duration(*duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("750").unwrap(), Duration::from_millis(750));
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("1.5s").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
    }

    #[test]
    fn test_target_selection() {
        let mut config = Config {
            window_title: Some("Notepad".to_string()),
            ..Config::default()
        };
        assert_eq!(config.target().unwrap(), Target::Title("Notepad".to_string()));

        config.window_handle = Some(0x10);
        assert!(config.target().is_err());

        config.window_title = None;
        assert_eq!(
            config.target().unwrap(),
            Target::Handle(WindowHandle::from_raw(0x10))
        );

        config.window_handle = None;
        assert!(config.target().is_err());

        config.process_name = Some("  ".to_string());
        assert!(config.target().is_err());
    }
}
