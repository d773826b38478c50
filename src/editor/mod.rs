// ── Editor component abstraction ──────────────────────────────────────────────
//
// The session and the find/replace engine never touch a widget directly.
// They talk to the text through `TextBuffer`, which is the only contract the
// core needs from whatever owns the edit history.  `MemoryBuffer` is the
// in-process implementation used by the console shell and by the tests.

use std::ops::Range;

mod memory;

pub use memory::MemoryBuffer;

/// The buffer capability the core consumes.
///
/// Offsets are UTF-8 byte offsets into [`TextBuffer::text`] and always lie on
/// `char` boundaries.  An empty selection is a plain caret.
///
/// Every method documented as an *edit* is recorded as exactly one undo step
/// and sets the modified flag.
pub trait TextBuffer {
    /// The full document text.
    fn text(&self) -> &str;

    /// Replace the whole document.  One edit.
    fn set_text(&mut self, text: &str);

    /// Replace the document and clear the undo/redo history.
    ///
    /// Used when a file is opened or a new document is started.  The caret
    /// moves to offset 0 and the modified flag is cleared.
    fn load(&mut self, text: &str);

    /// The current selection (`start <= end`).
    fn selection(&self) -> Range<usize>;

    /// Select `range`.  Not an edit.
    fn set_selection(&mut self, range: Range<usize>);

    /// Replace the selection with `text`, leaving the caret after it.  One edit.
    fn insert_at_selection(&mut self, text: &str);

    /// Revert the most recent edit.  Returns `false` when there is nothing to undo.
    fn undo(&mut self) -> bool;

    /// Re-apply the most recently undone edit.
    fn redo(&mut self) -> bool;

    /// `false` exactly at the save point: the history position of the last
    /// `load` or `set_modified(false)`.  Undo and redo can return to it; a new
    /// edit made after undoing past it makes it unreachable.
    fn is_modified(&self) -> bool;

    /// `false` marks the current history position as the save point;
    /// `true` drops the save point.
    fn set_modified(&mut self, modified: bool);

    /// The text covered by the current selection.
    fn selected_text(&self) -> &str {
        &self.text()[self.selection()]
    }

    /// Document length in bytes.
    fn len(&self) -> usize {
        self.text().len()
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}
