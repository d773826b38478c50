// ── In-memory text buffer ─────────────────────────────────────────────────────
//
// A `String` plus linear undo/redo stacks.  Every edit is stored as a single
// range replacement, so replacing the whole document and inserting one word
// cost the same single undo step.
//
// The modified flag is a save point: the undo-stack depth at the last load or
// save.  Undoing or redoing back to that depth makes the buffer clean again.

use std::ops::Range;

use super::TextBuffer;

/// One recorded range replacement.
#[derive(Debug, Clone)]
struct Edit {
    /// Byte offset where `removed` used to start and `inserted` now starts.
    at: usize,
    removed: String,
    inserted: String,
    /// Selection before the edit; restored on undo.
    selection_before: Range<usize>,
}

/// Plain in-process implementation of [`TextBuffer`].
#[derive(Debug)]
pub struct MemoryBuffer {
    text: String,
    selection: Range<usize>,
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
    /// `undo_stack.len()` at the last save point; `None` once that state is
    /// unreachable (dropped redo history, or explicitly marked modified).
    save_point: Option<usize>,
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self {
            text: String::new(),
            selection: 0..0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            save_point: Some(0),
        }
    }
}

impl MemoryBuffer {
    /// An empty, unmodified buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text` with no history, caret at 0.
    pub fn with_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.load(text);
        buf
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Replace `range` with `with`, record it, and drop any redo history.
    fn replace_range(&mut self, range: Range<usize>, with: &str) {
        let edit = Edit {
            at: range.start,
            removed: self.text[range.clone()].to_owned(),
            inserted: with.to_owned(),
            selection_before: self.selection.clone(),
        };
        self.text.replace_range(range, with);
        let caret = edit.at + edit.inserted.len();
        self.selection = caret..caret;
        // A save point inside the redo history can never be reached again.
        if self.save_point.is_some_and(|depth| depth > self.undo_stack.len()) {
            self.save_point = None;
        }
        self.undo_stack.push(edit);
        self.redo_stack.clear();
    }

    /// Largest `char` boundary that is `<= pos`, clamped to the text length.
    fn floor_boundary(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }
}

impl TextBuffer for MemoryBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.replace_range(0..self.text.len(), text);
    }

    fn load(&mut self, text: &str) {
        self.text = text.to_owned();
        self.selection = 0..0;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.save_point = Some(0);
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn set_selection(&mut self, range: Range<usize>) {
        let end = self.floor_boundary(range.end.max(range.start));
        let start = self.floor_boundary(range.start.min(range.end));
        self.selection = start..end;
    }

    fn insert_at_selection(&mut self, text: &str) {
        self.replace_range(self.selection.clone(), text);
    }

    fn undo(&mut self) -> bool {
        let Some(edit) = self.undo_stack.pop() else {
            return false;
        };
        self.text
            .replace_range(edit.at..edit.at + edit.inserted.len(), &edit.removed);
        self.selection = edit.selection_before.clone();
        self.redo_stack.push(edit);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(edit) = self.redo_stack.pop() else {
            return false;
        };
        self.text
            .replace_range(edit.at..edit.at + edit.removed.len(), &edit.inserted);
        let caret = edit.at + edit.inserted.len();
        self.selection = caret..caret;
        self.undo_stack.push(edit);
        true
    }

    fn is_modified(&self) -> bool {
        self.save_point != Some(self.undo_stack.len())
    }

    fn set_modified(&mut self, modified: bool) {
        self.save_point = if modified {
            None
        } else {
            Some(self.undo_stack.len())
        };
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
