//! Persistent settings and per-user state.
//!
//! A [`Session`] is loaded once at start-up and passed to whatever needs it.
//! It owns two small JSON files in one directory:
//!
//! - `settings.json`: [`Settings`], user preferences
//! - `userdata.json`: [`UserData`], the last-used directory and a counter
//!   of processed files
//!
//! Loading never fails. A missing or malformed file yields defaults, and
//! missing keys fall back to their default values; the file is rewritten in
//! full on the next [`Session::save`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PdfBuilderError, Result};

/// File name of the preferences file.
pub const SETTINGS_FILE: &str = "settings.json";

/// File name of the user-state file.
pub const USER_DATA_FILE: &str = "userdata.json";

/// Environment variable overriding the session directory.
pub const CONFIG_DIR_ENV: &str = "PDFBUILDER_CONFIG_DIR";

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefer external poppler tools. Stored only.
    pub use_poppler_tools: bool,
}

/// State remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    /// Directory of the last chosen or written file.
    pub filedialog_path: PathBuf,
    /// Number of files produced so far.
    pub number_of_processed_files: u64,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            filedialog_path: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            number_of_processed_files: 0,
        }
    }
}

/// Settings and user data, tied to the directory they live in.
#[derive(Debug, Clone)]
pub struct Session {
    dir: PathBuf,
    /// User preferences.
    pub settings: Settings,
    /// Remembered state.
    pub user_data: UserData,
}

impl Session {
    /// Default session directory: `$PDFBUILDER_CONFIG_DIR`, else
    /// `<config dir>/pdfbuilder`.
    pub fn default_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|d| d.join("pdfbuilder"))
            .unwrap_or_else(|| PathBuf::from(".pdfbuilder"))
    }

    /// Load the session stored in `dir`.
    pub async fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let settings = read_or_default(&dir.join(SETTINGS_FILE)).await;
        let user_data = read_or_default(&dir.join(USER_DATA_FILE)).await;
        Self {
            dir,
            settings,
            user_data,
        }
    }

    /// Write both files, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBuilderError::Settings`] if a file can't be written.
    pub async fn save(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| settings_error(&self.dir, e))?;

        write_json(&self.settings_path(), &self.settings).await?;
        write_json(&self.user_data_path(), &self.user_data).await?;

        log::debug!("saved session to {}", self.dir.display());
        Ok(())
    }

    /// Remember that `files` documents were written, the last at `output`.
    pub fn record_export(&mut self, output: &Path, files: u64) {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.user_data.filedialog_path = parent.to_path_buf();
        }
        self.user_data.number_of_processed_files += files;
    }

    /// Resolve a user-supplied input path.
    ///
    /// A relative path that doesn't exist from the working directory is
    /// looked up in the last-used directory instead. Anything else is
    /// returned unchanged.
    pub async fn resolve_input(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || tokio::fs::try_exists(path).await.unwrap_or(false) {
            return path.to_path_buf();
        }

        let candidate = self.user_data.filedialog_path.join(path);
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            log::debug!("resolved {} to {}", path.display(), candidate.display());
            candidate
        } else {
            path.to_path_buf()
        }
    }

    /// Session state as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::json!({
            "directory": self.dir,
            "settings": self.settings,
            "userdata": self.user_data,
        });
        serde_json::to_string_pretty(&value).map_err(|e| PdfBuilderError::other(e.to_string()))
    }

    /// Directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `settings.json`.
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Path of `userdata.json`.
    pub fn user_data_path(&self) -> PathBuf {
        self.dir.join(USER_DATA_FILE)
    }
}

async fn read_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(_) => {
            log::debug!("no session file at {}, using defaults", path.display());
            return T::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("ignoring malformed session file {}: {e}", path.display());
            T::default()
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| PdfBuilderError::Settings {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| settings_error(path, e))
}

fn settings_error(path: &Path, source: std::io::Error) -> PdfBuilderError {
    PdfBuilderError::Settings {
        path: path.to_path_buf(),
        reason: source.to_string(),
    }
}
