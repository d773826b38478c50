// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by the shell for its whole
// lifetime.  User actions arrive as `Command`s and are handled synchronously
// by `App::dispatch`; there is no global mutable state and no callback wiring.

use std::ops::Range;

use crate::{
    editor::TextBuffer,
    error::JotterError,
    search::{self, FindOutcome, SearchQuery},
    session::Session,
    settings::Settings,
    shell::Shell,
};

// ── Commands ──────────────────────────────────────────────────────────────────

/// Every user-triggerable action, one per menu item / button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // File
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    // Edit
    Undo,
    Redo,
    SelectAll,
    Select(Range<usize>),
    Insert(String),
    // Find & Replace dialog
    ShowFind,
    HideFind,
    SetFindText(String),
    SetReplaceText(String),
    SetMatchCase(bool),
    SetWholeWord(bool),
    FindNext,
    Replace,
    ReplaceAll,
    // Help
    About,
}

/// Whether the shell should keep running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// ── Find dialog state ─────────────────────────────────────────────────────────

/// Contents of the Find & Replace dialog.
///
/// Created the first time it is needed and then kept, so its fields survive
/// being hidden and shown again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindDialog {
    pub query: SearchQuery,
    pub replacement: String,
    pub visible: bool,
}

impl FindDialog {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            query: SearchQuery {
                needle: String::new(),
                match_case: settings.match_case,
                whole_word: settings.whole_word,
            },
            replacement: String::new(),
            visible: false,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state: the document session plus the find dialog.
#[derive(Debug)]
pub struct App<B> {
    session: Session<B>,
    find_dialog: Option<FindDialog>,
    settings: Settings,
}

impl<B: TextBuffer> App<B> {
    pub fn new(buffer: B, settings: Settings) -> Self {
        Self {
            session: Session::new(buffer, settings.app_name.clone()),
            find_dialog: None,
            settings,
        }
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<B> {
        &mut self.session
    }

    /// The find dialog, if it has ever been opened.
    pub fn find_dialog(&self) -> Option<&FindDialog> {
        self.find_dialog.as_ref()
    }

    /// The find dialog, created on first use.
    fn find_dialog_mut(&mut self) -> &mut FindDialog {
        let settings = &self.settings;
        self.find_dialog.get_or_insert_with(|| {
            tracing::debug!("creating find dialog");
            FindDialog::from_settings(settings)
        })
    }

    /// Run `cmd` to completion.
    ///
    /// Errors never escape: I/O failures are shown through `shell.error`,
    /// cancellations are dropped, search misses go to `shell.info`.
    pub fn dispatch(&mut self, cmd: Command, shell: &mut impl Shell) -> Flow {
        tracing::trace!(?cmd, "dispatch");
        match cmd {
            // ── File ──────────────────────────────────────────────────────────
            Command::New => {
                let r = self.session.new_document(shell);
                report(r, shell);
            }
            Command::Open => {
                let r = self.session.open(shell);
                report(r, shell);
            }
            Command::Save => {
                let r = self.session.save(shell);
                report(r, shell);
            }
            Command::SaveAs => {
                let r = self.session.save_as(shell);
                report(r, shell);
            }
            Command::Exit => {
                if self.session.close(shell).is_ok() {
                    return Flow::Exit;
                }
            }

            // ── Edit ──────────────────────────────────────────────────────────
            Command::Undo => {
                self.session.buffer_mut().undo();
                self.session.text_changed(shell);
            }
            Command::Redo => {
                self.session.buffer_mut().redo();
                self.session.text_changed(shell);
            }
            Command::SelectAll => {
                let buffer = self.session.buffer_mut();
                let len = buffer.len();
                buffer.set_selection(0..len);
            }
            Command::Select(range) => self.session.buffer_mut().set_selection(range),
            Command::Insert(text) => {
                self.session.buffer_mut().insert_at_selection(&text);
                self.session.text_changed(shell);
            }

            // ── Find & Replace ────────────────────────────────────────────────
            Command::ShowFind => self.find_dialog_mut().visible = true,
            Command::HideFind => {
                if let Some(dialog) = self.find_dialog.as_mut() {
                    dialog.visible = false;
                }
            }
            Command::SetFindText(text) => self.find_dialog_mut().query.needle = text,
            Command::SetReplaceText(text) => self.find_dialog_mut().replacement = text,
            Command::SetMatchCase(on) => self.find_dialog_mut().query.match_case = on,
            Command::SetWholeWord(on) => self.find_dialog_mut().query.whole_word = on,
            Command::FindNext => {
                let query = self.find_dialog_mut().query.clone();
                let outcome = search::find_next(self.session.buffer_mut(), &query);
                report_find(&query, &outcome, shell);
            }
            Command::Replace => {
                let dialog = self.find_dialog_mut().clone();
                let outcome =
                    search::replace_one(self.session.buffer_mut(), &dialog.query, &dialog.replacement);
                self.session.text_changed(shell);
                report_find(&dialog.query, &outcome.next, shell);
            }
            Command::ReplaceAll => {
                let dialog = self.find_dialog_mut().clone();
                if !dialog.query.needle.is_empty() {
                    let count =
                        search::replace_all(self.session.buffer_mut(), &dialog.query, &dialog.replacement);
                    self.session.text_changed(shell);
                    shell.status(&format!("Replaced {count} occurrence(s)"));
                }
            }

            // ── Help ──────────────────────────────────────────────────────────
            Command::About => shell.info(
                &format!("About {}", self.settings.app_name),
                concat!(
                    "A plain-text editor with find & replace.\n\n",
                    "Licensed under MIT OR Apache-2.0.",
                ),
            ),
        }
        Flow::Continue
    }
}

// ── Reporting ─────────────────────────────────────────────────────────────────

/// Show a failed session operation to the user.  Cancellation is silent.
fn report(result: crate::error::Result<()>, shell: &mut impl Shell) {
    match result {
        Ok(()) | Err(JotterError::Cancelled) => {}
        Err(e) => {
            tracing::warn!(error = %e, "file operation failed");
            shell.error("Error", &e.to_string());
        }
    }
}

/// Tell the user about a search miss.  An empty needle says nothing.
fn report_find(query: &SearchQuery, outcome: &FindOutcome, shell: &mut impl Shell) {
    if *outcome == FindOutcome::NotFound && !query.needle.is_empty() {
        shell.info("Find", &format!("'{}' not found.", query.needle));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        editor::MemoryBuffer,
        shell::{SaveChoice, ScriptedShell, ShellEvent},
    };

    fn app() -> App<MemoryBuffer> {
        App::new(MemoryBuffer::new(), Settings::default())
    }

    #[test]
    fn find_dialog_is_created_lazily_and_reused() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        assert!(app.find_dialog().is_none());

        app.dispatch(Command::SetFindText("needle".into()), &mut shell);
        app.dispatch(Command::ShowFind, &mut shell);
        app.dispatch(Command::HideFind, &mut shell);
        app.dispatch(Command::ShowFind, &mut shell);

        let dialog = app.find_dialog().expect("created");
        assert!(dialog.visible);
        assert_eq!(dialog.query.needle, "needle");
    }

    #[test]
    fn hide_before_show_does_not_create_dialog() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.dispatch(Command::HideFind, &mut shell);
        assert!(app.find_dialog().is_none());
    }

    #[test]
    fn dialog_flags_start_from_settings() {
        let settings = Settings {
            match_case: true,
            whole_word: true,
            ..Settings::default()
        };
        let mut app = App::new(MemoryBuffer::new(), settings);
        app.dispatch(Command::ShowFind, &mut ScriptedShell::new());
        let q = &app.find_dialog().expect("created").query;
        assert!(q.match_case);
        assert!(q.whole_word);
    }

    #[test]
    fn insert_marks_dirty() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.dispatch(Command::Insert("text".into()), &mut shell);
        assert!(app.session().is_dirty());
        assert_eq!(shell.title(), Some("Untitled * - Jotter"));
    }

    #[test]
    fn find_miss_is_reported_as_info() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.dispatch(Command::Insert("abc".into()), &mut shell);
        app.dispatch(Command::SetFindText("xyz".into()), &mut shell);
        app.dispatch(Command::FindNext, &mut shell);
        assert_eq!(shell.infos().collect::<Vec<_>>(), ["'xyz' not found."]);
    }

    #[test]
    fn find_with_empty_needle_is_silent() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.dispatch(Command::FindNext, &mut shell);
        assert_eq!(shell.infos().count(), 0);
    }

    #[test]
    fn replace_all_reports_count_and_dirties() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.session_mut().buffer_mut().load("a b a");
        app.dispatch(Command::SetFindText("a".into()), &mut shell);
        app.dispatch(Command::SetReplaceText("c".into()), &mut shell);
        app.dispatch(Command::ReplaceAll, &mut shell);
        assert_eq!(app.session().buffer().text(), "c b c");
        assert!(app.session().is_dirty());
        assert!(shell
            .events
            .contains(&ShellEvent::Status("Replaced 2 occurrence(s)".into())));
    }

    #[test]
    fn replace_all_with_empty_needle_does_nothing() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.session_mut().buffer_mut().load("abc");
        app.dispatch(Command::ReplaceAll, &mut shell);
        assert!(!app.session().is_dirty());
        assert!(!app.session().buffer().can_undo());
    }

    #[test]
    fn exit_on_clean_document() {
        let mut shell = ScriptedShell::new();
        assert_eq!(app().dispatch(Command::Exit, &mut shell), Flow::Exit);
    }

    #[test]
    fn exit_cancelled_keeps_running() {
        let mut shell = ScriptedShell::new().answer_save(SaveChoice::Cancel);
        let mut app = app();
        app.dispatch(Command::Insert("unsaved".into()), &mut shell);
        assert_eq!(app.dispatch(Command::Exit, &mut shell), Flow::Continue);
        assert_eq!(app.session().buffer().text(), "unsaved");
        assert!(app.session().is_dirty());
    }

    #[test]
    fn failed_open_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = ScriptedShell::new().answer_open(dir.path().join("missing.txt"));
        let mut app = app();
        app.dispatch(Command::Open, &mut shell);
        assert_eq!(shell.errors().count(), 1);
    }

    #[test]
    fn undo_after_save_is_dirty_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut shell = ScriptedShell::new().answer_save_as(dir.path().join("f.txt"));
        let mut app = app();
        app.dispatch(Command::Insert("x".into()), &mut shell);
        app.dispatch(Command::Save, &mut shell);
        assert!(!app.session().is_dirty());
        app.dispatch(Command::Undo, &mut shell);
        assert!(app.session().is_dirty());
        assert_eq!(app.session().buffer().text(), "");
    }

    #[test]
    fn undo_back_to_loaded_text_is_clean() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.session_mut().buffer_mut().load("saved");
        app.dispatch(Command::Insert("x".into()), &mut shell);
        assert_eq!(shell.title(), Some("Untitled * - Jotter"));

        app.dispatch(Command::Undo, &mut shell);
        assert_eq!(app.session().buffer().text(), "saved");
        assert!(!app.session().is_dirty());
        assert_eq!(shell.title(), Some("Untitled - Jotter"));

        app.dispatch(Command::Redo, &mut shell);
        assert!(app.session().is_dirty());
        assert_eq!(shell.title(), Some("Untitled * - Jotter"));
    }

    #[test]
    fn undo_back_to_saved_text_is_clean() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("f.txt");
        let mut shell = ScriptedShell::new().answer_save_as(&path);
        let mut app = app();
        app.dispatch(Command::Insert("x".into()), &mut shell);
        app.dispatch(Command::Save, &mut shell);
        app.dispatch(Command::Insert("y".into()), &mut shell);
        assert!(app.session().is_dirty());
        app.dispatch(Command::Undo, &mut shell);
        assert!(!app.session().is_dirty());
        assert_eq!(shell.title(), Some(format!("{} - Jotter", path.display()).as_str()));
    }

    #[test]
    fn select_all_selects_everything() {
        let mut shell = ScriptedShell::new();
        let mut app = app();
        app.session_mut().buffer_mut().load("whole");
        app.dispatch(Command::SelectAll, &mut shell);
        assert_eq!(app.session().buffer().selected_text(), "whole");
    }

    #[test]
    fn about_shows_info() {
        let mut shell = ScriptedShell::new();
        app().dispatch(Command::About, &mut shell);
        assert_eq!(shell.infos().count(), 1);
    }
}
