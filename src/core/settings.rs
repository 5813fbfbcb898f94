//! Integer key/value settings store with built-in defaults.
//!
//! Settings are persisted in a plain `KEY:value` text format. Every key a
//! caller may look up has a default, so a missing or corrupt settings file
//! never prevents the engine from starting.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::core::error::{EngineError, Result};

/// The default value for a known setting key, or `None` for unknown keys.
///
/// This is the full set of keys the engine understands; a supplied settings
/// set containing anything else is rejected as corrupt.
pub fn default_value(key: &str) -> Option<i32> {
    let value = match key {
        "MAX_FPS" => 100,
        "MS_PER_TICK" => 25,
        "RESOLUTION_X" => 640,
        "RESOLUTION_Y" => 480,
        "PIXELS_PER_SQUARE" => 32,
        "GRID_SIZE" => 1024,
        "FOV" => 60,
        "WALL_TEXTURES" => 3,
        "VIEW_DISTANCE" => 3,
        "SHOW_FPS" => 1,
        "KEY_UP" => 38,
        "KEY_DOWN" => 40,
        "KEY_LEFT" => 37,
        "KEY_RIGHT" => 39,
        "KEY_STRAFE_LEFT" => 65,
        "KEY_STRAFE_RIGHT" => 68,
        "KEY_LOOK_UP" => 87,
        "KEY_LOOK_DOWN" => 83,
        _ => return None,
    };
    Some(value)
}

/// All known setting keys, in persistence order.
pub const KNOWN_KEYS: &[&str] = &[
    "MAX_FPS",
    "MS_PER_TICK",
    "RESOLUTION_X",
    "RESOLUTION_Y",
    "PIXELS_PER_SQUARE",
    "GRID_SIZE",
    "FOV",
    "WALL_TEXTURES",
    "VIEW_DISTANCE",
    "SHOW_FPS",
    "KEY_UP",
    "KEY_DOWN",
    "KEY_LEFT",
    "KEY_RIGHT",
    "KEY_STRAFE_LEFT",
    "KEY_STRAFE_RIGHT",
    "KEY_LOOK_UP",
    "KEY_LOOK_DOWN",
];

/// A set of engine-wide settings supplied by the user.
///
/// Lookups fall back to the built-in defaults for keys the set does not
/// override, so a `Settings` is always complete from the caller's view.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    map: HashMap<String, i32>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A settings set that overrides nothing; every lookup hits the defaults.
    pub fn defaults() -> Self {
        Self::new()
    }

    /// Looks up a key, falling back to the built-in default.
    pub fn get(&self, key: &str) -> Result<i32> {
        if let Some(&value) = self.map.get(key) {
            return Ok(value);
        }
        default_value(key).ok_or_else(|| EngineError::UnknownSettingKey(key.to_string()))
    }

    /// Assigns a value to a key, replacing any previous value.
    pub fn put(&mut self, key: &str, value: i32) {
        self.map.insert(key.to_string(), value);
    }

    /// Rejects the set if it overrides a key the engine does not know.
    pub fn check(&self) -> Result<()> {
        for key in self.map.keys() {
            if default_value(key).is_none() {
                return Err(EngineError::CorruptSettings(format!(
                    "invalid key \"{key}\" in settings"
                )));
            }
        }
        Ok(())
    }

    /// Parses the `KEY:value` settings format.
    ///
    /// Lines starting with `#` and blank lines are skipped. Keys are
    /// upper-cased so hand-edited files are forgiving about case.
    pub fn parse(text: &str) -> Result<Self> {
        let mut settings = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once(':').ok_or_else(|| {
                EngineError::CorruptSettings(format!("key or value missing on line \"{line}\""))
            })?;
            let value: i32 = value.trim().parse().map_err(|_| {
                EngineError::CorruptSettings(format!("unparsable value on line \"{line}\""))
            })?;
            settings.put(&key.trim().to_uppercase(), value);
        }
        settings.check()?;
        Ok(settings)
    }

    /// Loads settings from disk.
    ///
    /// A missing file is not an error: the defaults are written back so the
    /// user has a file to edit, and the defaults are returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::defaults();
            settings.save(path)?;
            return Ok(settings);
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Saves the effective settings (overrides merged over defaults) to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = String::new();
        for key in KNOWN_KEYS {
            // get() cannot fail for a known key.
            let value = self.get(key)?;
            let _ = writeln!(out, "{key}:{value}");
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}
