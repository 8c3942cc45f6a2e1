//! Application state shared by the text mode and the TUI.
//!
//! `AppState` owns the line buffer, the live preferences and the current
//! file. Front ends translate user input into calls on it and present the
//! results; none of the logic here knows about terminals.

use crate::content;
use crate::error::{SaveError, StorageError};
use crate::model::{OptionFlag, OrderingPolicy};
use crate::preferences::{self, Preferences};
use crate::transform;
use std::path::{Path, PathBuf};

/// Accessor pair over whatever holds the editable lines.
pub trait LineBuffer {
    fn lines(&self) -> Vec<String>;
    fn set_lines(&mut self, lines: Vec<String>);

    fn line_count(&self) -> usize {
        self.lines().len()
    }
}

impl LineBuffer for Vec<String> {
    fn lines(&self) -> Vec<String> {
        self.clone()
    }

    fn set_lines(&mut self, lines: Vec<String>) {
        *self = lines;
    }

    fn line_count(&self) -> usize {
        self.len()
    }
}

pub struct AppState<B: LineBuffer> {
    pub buffer: B,
    pub prefs: Preferences,
    pub file_path: Option<PathBuf>,
}

impl<B: LineBuffer> AppState<B> {
    pub fn new(buffer: B, prefs: Preferences) -> Self {
        Self {
            buffer,
            prefs,
            file_path: None,
        }
    }

    /// Clean and reorder the buffer, then remember `policy` as the last action.
    ///
    /// Toggles are read from the live preferences at call time.
    pub fn apply(&mut self, policy: OrderingPolicy) {
        let before = self.buffer.line_count();
        let lines = transform::transform(self.buffer.lines(), self.prefs.toggles(), policy);
        tracing::info!(
            action = policy.label(),
            before,
            after = lines.len(),
            "applied ordering"
        );
        self.buffer.set_lines(lines);
        self.prefs.last_action = policy;
    }

    pub fn new_document(&mut self) {
        self.buffer.set_lines(Vec::new());
        self.file_path = None;
    }

    /// Load `path` into the buffer.
    ///
    /// Returns the policy that was re-applied when "apply last on open" is
    /// set. On failure the buffer and current file are left untouched.
    pub fn open(&mut self, path: &Path) -> Result<Option<OrderingPolicy>, StorageError> {
        let lines = content::read_lines(path)?;
        self.buffer.set_lines(lines);
        self.file_path = Some(path.to_path_buf());

        if self.prefs.apply_last_on_open {
            let policy = self.prefs.last_action;
            self.apply(policy);
            return Ok(Some(policy));
        }
        Ok(None)
    }

    /// Write the buffer back to the current file.
    pub fn save(&mut self) -> Result<PathBuf, SaveError> {
        let path = self.file_path.clone().ok_or(SaveError::NoPath)?;
        content::write_lines(&path, &self.buffer.lines())?;
        Ok(path)
    }

    /// Write the buffer to `path` and make it the current file.
    pub fn save_as(&mut self, path: &Path) -> Result<(), StorageError> {
        content::write_lines(path, &self.buffer.lines())?;
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Flip one option and return its new value.
    pub fn toggle(&mut self, flag: OptionFlag) -> bool {
        let value = !self.prefs.flag(flag);
        self.prefs.set_flag(flag, value);
        tracing::debug!(option = flag.label(), value, "option toggled");
        value
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn last_label(&self) -> &'static str {
        self.prefs.last_action.label()
    }

    /// File name for the status bar, "Not set" for an unsaved buffer.
    pub fn file_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Not set".to_string())
    }

    /// Persist the final preferences. Called once, when the session ends.
    pub fn shutdown(&self, settings_path: &Path) -> Result<(), StorageError> {
        preferences::save(settings_path, &self.prefs)
    }
}
