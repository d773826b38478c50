// ── Document session ──────────────────────────────────────────────────────────
//
// Owns the open document: its path, its modified flag, and the buffer holding
// its text.  Every transition between new / open / save / close goes through
// here, and every destructive one (new, open, close) first passes the
// save-prompt gate in `maybe_save`.
//
// Failure rule: a failed read or write changes nothing.  Files are read fully
// before the buffer is touched, and the path / modified flag are only updated
// after a write has succeeded.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    editor::TextBuffer,
    error::{JotterError, Result},
    shell::{SaveChoice, Shell},
};

const UNTITLED: &str = "Untitled";
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// ── Document ──────────────────────────────────────────────────────────────────

/// `Clean` after a successful new / open / save; `Dirty` after any edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocState {
    Clean,
    Dirty,
}

/// Per-document state for the currently open file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Path on disk, or `None` for an untitled buffer that was never saved.
    pub path: Option<PathBuf>,
    /// `true` when the buffer contains changes not yet saved to disk.
    pub modified: bool,
}

impl Document {
    /// The full path, or `"Untitled"` if no path is set.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| UNTITLED.to_owned())
    }

    pub fn state(&self) -> DocState {
        if self.modified {
            DocState::Dirty
        } else {
            DocState::Clean
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// The single open document and the buffer that holds its text.
#[derive(Debug)]
pub struct Session<B> {
    doc: Document,
    buffer: B,
    app_name: String,
}

impl<B: TextBuffer> Session<B> {
    /// Start with an empty, clean, untitled document.
    pub fn new(mut buffer: B, app_name: impl Into<String>) -> Self {
        buffer.load("");
        Self {
            doc: Document::default(),
            buffer,
            app_name: app_name.into(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Mutable access for edits.  Call [`Session::text_changed`] afterwards.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn state(&self) -> DocState {
        self.doc.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.doc.modified
    }

    /// `(path or "Untitled") + (" *" if dirty)`.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No path, clean | `"Untitled"` |
    /// | No path, dirty | `"Untitled *"` |
    /// | Path set, dirty | `"/home/me/todo.txt *"` |
    pub fn display_title(&self) -> String {
        let name = self.doc.display_name();
        if self.doc.modified {
            format!("{name} *")
        } else {
            name
        }
    }

    /// The display title with the application name appended.
    pub fn window_title(&self) -> String {
        format!("{} - {}", self.display_title(), self.app_name)
    }

    /// Pick up the buffer's modified flag after an edit.
    ///
    /// Pushes a new title to the shell when the document flips state.
    pub fn text_changed(&mut self, shell: &mut impl Shell) {
        let modified = self.buffer.is_modified();
        if modified != self.doc.modified {
            self.doc.modified = modified;
            shell.set_title(&self.window_title());
        }
    }

    // ── Save-prompt gate ──────────────────────────────────────────────────────

    /// Ask to save a dirty document before it is discarded.
    ///
    /// `Ok(())` means the caller may proceed: the document was clean, was
    /// saved, or the user chose Discard.
    ///
    /// # Errors
    ///
    /// [`JotterError::Cancelled`] when the user chose Cancel, cancelled the
    /// save-as dialog, or the save failed (the failure is reported first).
    pub fn maybe_save(&mut self, shell: &mut impl Shell) -> Result<()> {
        self.text_changed(shell);
        if !self.doc.modified {
            return Ok(());
        }
        match shell.confirm_save() {
            SaveChoice::Discard => Ok(()),
            SaveChoice::Cancel => Err(JotterError::Cancelled),
            SaveChoice::Save => match self.save(shell) {
                Ok(()) => Ok(()),
                Err(JotterError::Cancelled) => Err(JotterError::Cancelled),
                Err(e) => {
                    tracing::warn!(error = %e, "save before discard failed");
                    shell.error("Error", &e.to_string());
                    Err(JotterError::Cancelled)
                }
            },
        }
    }

    // ── New ───────────────────────────────────────────────────────────────────

    /// Replace the document with an empty, untitled one.
    ///
    /// # Errors
    ///
    /// [`JotterError::Cancelled`] if the save prompt was cancelled.
    pub fn new_document(&mut self, shell: &mut impl Shell) -> Result<()> {
        self.maybe_save(shell)?;
        self.buffer.load("");
        self.doc = Document::default();
        tracing::info!("new document");
        shell.status("New file");
        shell.set_title(&self.window_title());
        Ok(())
    }

    // ── Open ──────────────────────────────────────────────────────────────────

    /// Gate, then ask the shell which file to open.
    ///
    /// Dismissing the open dialog is a silent no-op.
    ///
    /// # Errors
    ///
    /// [`JotterError::Cancelled`] from the gate, or a read / encoding error.
    pub fn open(&mut self, shell: &mut impl Shell) -> Result<()> {
        self.maybe_save(shell)?;
        match shell.choose_open_path() {
            Some(path) => self.load_file(path, shell),
            None => Ok(()),
        }
    }

    /// Gate, then open `path`.
    ///
    /// # Errors
    ///
    /// As [`Session::open`].  On a read error the previous document is untouched.
    pub fn open_path(&mut self, path: impl Into<PathBuf>, shell: &mut impl Shell) -> Result<()> {
        self.maybe_save(shell)?;
        self.load_file(path.into(), shell)
    }

    fn load_file(&mut self, path: PathBuf, shell: &mut impl Shell) -> Result<()> {
        let text = read_text(&path)?;
        self.buffer.load(&text);
        tracing::info!(path = %path.display(), bytes = text.len(), "opened");
        shell.status(&format!("Opened '{}'", path.display()));
        self.doc = Document {
            path: Some(path),
            modified: false,
        };
        shell.set_title(&self.window_title());
        Ok(())
    }

    // ── Save ──────────────────────────────────────────────────────────────────

    /// Write to the current path, or fall through to [`Session::save_as`].
    ///
    /// # Errors
    ///
    /// [`JotterError::Write`] on I/O failure; [`JotterError::Cancelled`] when
    /// an untitled document's save-as dialog was dismissed.
    pub fn save(&mut self, shell: &mut impl Shell) -> Result<()> {
        match self.doc.path.clone() {
            Some(path) => self.save_as_path(path, shell),
            None => self.save_as(shell),
        }
    }

    /// Ask the shell for a path and save there.
    ///
    /// # Errors
    ///
    /// [`JotterError::Cancelled`] when the dialog was dismissed, or a write error.
    pub fn save_as(&mut self, shell: &mut impl Shell) -> Result<()> {
        let path = shell.choose_save_path().ok_or(JotterError::Cancelled)?;
        self.save_as_path(path, shell)
    }

    /// Write the buffer to `path` and adopt it as the document's path.
    ///
    /// # Errors
    ///
    /// [`JotterError::Write`]; the document's path and modified flag are
    /// left as they were.
    pub fn save_as_path(&mut self, path: impl Into<PathBuf>, shell: &mut impl Shell) -> Result<()> {
        let path = path.into();
        fs::write(&path, self.buffer.text()).map_err(|source| JotterError::Write {
            path: path.clone(),
            source,
        })?;
        self.buffer.set_modified(false);
        tracing::info!(path = %path.display(), "saved");
        shell.status(&format!("Saved '{}'", path.display()));
        self.doc = Document {
            path: Some(path),
            modified: false,
        };
        shell.set_title(&self.window_title());
        Ok(())
    }

    // ── Close ─────────────────────────────────────────────────────────────────

    /// Ask whether the document may be closed.
    ///
    /// # Errors
    ///
    /// [`JotterError::Cancelled`] when the close must not happen.
    pub fn close(&mut self, shell: &mut impl Shell) -> Result<()> {
        self.maybe_save(shell)
    }
}

// ── File I/O ──────────────────────────────────────────────────────────────────

/// Read `path` as UTF-8, dropping a leading byte-order mark.
fn read_text(path: &Path) -> Result<String> {
    let mut bytes = fs::read(path).map_err(|source| JotterError::Read {
        path: path.to_owned(),
        source,
    })?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    String::from_utf8(bytes).map_err(|source| JotterError::Encoding {
        path: path.to_owned(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
