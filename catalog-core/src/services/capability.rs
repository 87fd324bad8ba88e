//! Collaborators the editor depends on but does not implement: directory
//! selection, yes/no confirmation and the status line.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    /// The host cannot hand out directory access at all.
    Unavailable,
    Cancelled,
    Chosen(PathBuf),
}

pub trait DirectoryPicker {
    fn pick(&mut self) -> PickResult;
}

/// Picker answering with a path decided up front (command payload or config).
/// An empty path counts as a dismissed dialog.
#[derive(Debug, Clone)]
pub struct PresetPicker {
    pub fs_access: bool,
    pub path: Option<PathBuf>,
}

impl DirectoryPicker for PresetPicker {
    fn pick(&mut self) -> PickResult {
        if !self.fs_access {
            return PickResult::Unavailable;
        }
        match self.path.take() {
            Some(p) if !p.as_os_str().is_empty() => PickResult::Chosen(p),
            _ => PickResult::Cancelled,
        }
    }
}

pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Fixed answer, logged so the decision shows up next to the prompt.
#[derive(Debug, Clone, Copy)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&mut self, prompt: &str) -> bool {
        log::debug!("confirm '{}' -> {}", prompt.lines().next().unwrap_or(""), self.0);
        self.0
    }
}

pub trait StatusSink: Send {
    fn status(&mut self, message: &str);
}

/// Default sink: status lines go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn status(&mut self, message: &str) {
        log::info!("status: {message}");
    }
}

/// Keeps every status line; handy for hosts that render a history and for tests.
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(l) => l.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StatusSink for StatusLog {
    fn status(&mut self, message: &str) {
        match self.lines.lock() {
            Ok(mut l) => l.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
