//! Persisted user preferences.
//!
//! The record is small and flat: it is read once at startup and written back
//! whole at shutdown. Missing fields take their defaults so files written by
//! older versions keep loading.

use crate::error::StorageError;
use crate::model::{OptionFlag, OrderingPolicy};
use crate::transform::Toggles;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Settings file name, created next to wherever the program is started.
pub const DEFAULT_FILE_NAME: &str = "TextLiner-SettingsData.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub always_on_top: bool,
    #[serde(deserialize_with = "lenient_policy")]
    pub last_action: OrderingPolicy,
    pub apply_last_on_open: bool,
    pub remove_blank_lines: bool,
    pub trim_lines: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            always_on_top: false,
            last_action: OrderingPolicy::ByLengthAscending,
            apply_last_on_open: true,
            remove_blank_lines: true,
            trim_lines: false,
        }
    }
}

impl Preferences {
    pub fn toggles(&self) -> Toggles {
        Toggles {
            trim: self.trim_lines,
            remove_blank: self.remove_blank_lines,
        }
    }

    pub fn flag(&self, flag: OptionFlag) -> bool {
        match flag {
            OptionFlag::AlwaysOnTop => self.always_on_top,
            OptionFlag::ApplyLastOnOpen => self.apply_last_on_open,
            OptionFlag::RemoveBlankLines => self.remove_blank_lines,
            OptionFlag::TrimLines => self.trim_lines,
        }
    }

    pub fn set_flag(&mut self, flag: OptionFlag, value: bool) {
        let slot = match flag {
            OptionFlag::AlwaysOnTop => &mut self.always_on_top,
            OptionFlag::ApplyLastOnOpen => &mut self.apply_last_on_open,
            OptionFlag::RemoveBlankLines => &mut self.remove_blank_lines,
            OptionFlag::TrimLines => &mut self.trim_lines,
        };
        *slot = value;
    }
}

/// Accept the enum key as well as the display labels older files stored.
/// Anything unrecognised falls back to the default instead of failing the
/// whole record.
fn lenient_policy<'de, D>(deserializer: D) -> Result<OrderingPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(OrderingPolicy::from_stored(&raw).unwrap_or_else(|| {
        tracing::warn!(value = %raw, "unknown last action in settings, using default");
        OrderingPolicy::default()
    }))
}

/// Load preferences, creating the file with defaults first if it is missing.
pub fn load(path: &Path) -> Result<Preferences, StorageError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "settings file missing, writing defaults");
        save(path, &Preferences::default())?;
    }

    let data = std::fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let prefs: Preferences = serde_json::from_str(&data).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?prefs, "settings loaded");
    Ok(prefs)
}

/// Write the whole record, replacing whatever was there.
pub fn save(path: &Path, prefs: &Preferences) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(prefs).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}
