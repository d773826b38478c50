// ── User settings ─────────────────────────────────────────────────────────────
//
// Reads `<config dir>/jotter/settings.json`.  Every field has a default, so a
// missing file, a missing field, or an unreadable file all leave the editor
// usable.  No `unsafe`: pure safe Rust + serde_json.

use std::{fs, io, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::error::{JotterError, Result};

// ── Format version ────────────────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_app_name() -> String {
    "Jotter".to_owned()
}

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Suffix of the window title, e.g. `"notes.txt * - Jotter"`.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Initial state of the find dialog's "Match case" box.
    #[serde(default)]
    pub match_case: bool,
    /// Initial state of the find dialog's "Whole word" box.
    #[serde(default)]
    pub whole_word: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            app_name: default_app_name(),
            match_case: false,
            whole_word: false,
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the settings file: `<config dir>/jotter/settings.json`.
///
/// Returns `None` on platforms without a per-user config directory.
pub fn settings_path() -> Option<PathBuf> {
    let mut p = dirs::config_dir()?;
    p.push("jotter");
    p.push("settings.json");
    Some(p)
}

// ── Load ──────────────────────────────────────────────────────────────────────

impl Settings {
    /// Read settings from the default location.
    ///
    /// Never fails: a missing file gives defaults silently, anything else
    /// that goes wrong is logged and also gives defaults.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring settings file");
                Self::default()
            }
        }
    }

    /// Read and parse `path`.
    ///
    /// `Ok(None)` when the file does not exist or carries an unrecognised
    /// version number.
    ///
    /// # Errors
    ///
    /// [`JotterError::Read`] when the file exists but cannot be read, and
    /// [`JotterError::Settings`] when it is not valid settings JSON.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(JotterError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        let settings: Self = serde_json::from_slice(&data).map_err(|source| JotterError::Settings {
            path: path.to_owned(),
            source,
        })?;
        if settings.version != SETTINGS_VERSION {
            tracing::warn!(version = settings.version, "unrecognised settings version");
            return Ok(None);
        }
        Ok(Some(settings))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
