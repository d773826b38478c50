// ── Shell contract ────────────────────────────────────────────────────────────
//
// Everything the core needs from the surrounding UI: the three-way save prompt,
// the file dialogs, and somewhere to put messages and the window title.  All
// calls are synchronous; answers come back as plain return values.

use std::{collections::VecDeque, path::PathBuf};

/// Answer to "The document has been modified. Do you want to save your changes?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// The UI surface the session and the app controller talk to.
pub trait Shell {
    /// Ask whether to save a modified document before it is discarded.
    fn confirm_save(&mut self) -> SaveChoice;

    /// Show an "Open File" dialog.  `None` if the user cancelled.
    fn choose_open_path(&mut self) -> Option<PathBuf>;

    /// Show a "Save File As" dialog.  `None` if the user cancelled.
    fn choose_save_path(&mut self) -> Option<PathBuf>;

    /// Informational message box (e.g. a search miss).
    fn info(&mut self, title: &str, message: &str);

    /// Error message box (e.g. a failed save).
    fn error(&mut self, title: &str, message: &str);

    /// Transient status-bar text.
    fn status(&mut self, message: &str);

    /// Replace the window title.
    fn set_title(&mut self, title: &str);
}

// ── Scripted shell ────────────────────────────────────────────────────────────

/// Everything a [`ScriptedShell`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Info { title: String, message: String },
    Error { title: String, message: String },
    Status(String),
    Title(String),
}

/// A headless [`Shell`] that answers prompts from queues and records output.
///
/// Prompts with an empty queue answer `Cancel` / `None`, so a script that
/// forgets an answer can never silently discard a document.
#[derive(Debug, Default)]
pub struct ScriptedShell {
    pub save_choices: VecDeque<SaveChoice>,
    pub open_paths: VecDeque<PathBuf>,
    pub save_paths: VecDeque<PathBuf>,
    pub events: Vec<ShellEvent>,
    /// Number of times `confirm_save` was called.
    pub prompts: usize,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_save(mut self, choice: SaveChoice) -> Self {
        self.save_choices.push_back(choice);
        self
    }

    pub fn answer_open(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_paths.push_back(path.into());
        self
    }

    pub fn answer_save_as(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_paths.push_back(path.into());
        self
    }

    /// The most recent title set, if any.
    pub fn title(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            ShellEvent::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            ShellEvent::Error { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn infos(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            ShellEvent::Info { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

impl Shell for ScriptedShell {
    fn confirm_save(&mut self) -> SaveChoice {
        self.prompts += 1;
        self.save_choices.pop_front().unwrap_or(SaveChoice::Cancel)
    }

    fn choose_open_path(&mut self) -> Option<PathBuf> {
        self.open_paths.pop_front()
    }

    fn choose_save_path(&mut self) -> Option<PathBuf> {
        self.save_paths.pop_front()
    }

    fn info(&mut self, title: &str, message: &str) {
        self.events.push(ShellEvent::Info {
            title: title.to_owned(),
            message: message.to_owned(),
        });
    }

    fn error(&mut self, title: &str, message: &str) {
        self.events.push(ShellEvent::Error {
            title: title.to_owned(),
            message: message.to_owned(),
        });
    }

    fn status(&mut self, message: &str) {
        self.events.push(ShellEvent::Status(message.to_owned()));
    }

    fn set_title(&mut self, title: &str) {
        self.events.push(ShellEvent::Title(title.to_owned()));
    }
}
