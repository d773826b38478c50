// ── Find / replace engine ─────────────────────────────────────────────────────
//
// Literal search over any `TextBuffer`.  The engine never owns text: it reads
// the buffer, moves the selection, and writes edits back through the buffer so
// the buffer's own history records them.

use std::ops::Range;

use crate::editor::TextBuffer;

mod matcher;

use matcher::Matcher;

// ── Query ─────────────────────────────────────────────────────────────────────

/// Parameters for a single search operation.
///
/// Populated from the find dialog and kept there so "Find Next" can repeat the
/// last search without re-entering it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// The literal text to look for.  Operations with an empty needle do nothing.
    pub needle: String,
    pub match_case: bool,
    /// Accepted for compatibility with the dialog; matching ignores it.
    pub whole_word: bool,
}

impl SearchQuery {
    pub fn new(needle: impl Into<String>, match_case: bool) -> Self {
        Self {
            needle: needle.into(),
            match_case,
            whole_word: false,
        }
    }

    /// Does `selected` count as an occurrence of the needle?
    ///
    /// Exact comparison when `match_case`, lower-cased comparison otherwise.
    pub fn matches_selection(&self, selected: &str) -> bool {
        if selected.is_empty() {
            return false;
        }
        if self.match_case {
            selected == self.needle
        } else {
            selected.to_lowercase() == self.needle.to_lowercase()
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Result of [`find_next`].  A miss is informational, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindOutcome {
    /// The match now selected in the buffer.
    Found(Range<usize>),
    NotFound,
}

impl FindOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Result of [`replace_one`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// `true` when the selection matched and was substituted.
    pub replaced: bool,
    /// The find that always follows.
    pub next: FindOutcome,
}

// ── Operations ────────────────────────────────────────────────────────────────

/// Find the next occurrence after the current selection, wrapping around once.
///
/// On a hit the match is selected.  On a miss (or an empty needle) the
/// selection is left exactly as it was.
pub fn find_next<B: TextBuffer + ?Sized>(buffer: &mut B, query: &SearchQuery) -> FindOutcome {
    let Some(matcher) = Matcher::new(query) else {
        return FindOutcome::NotFound;
    };
    let from = buffer.selection().end;
    let hit = matcher.find_at(buffer.text(), from).or_else(|| {
        tracing::debug!(from, "no match before end of buffer, wrapping to start");
        matcher.find_at(buffer.text(), 0)
    });
    match hit {
        Some(range) => {
            buffer.set_selection(range.clone());
            FindOutcome::Found(range)
        }
        None => FindOutcome::NotFound,
    }
}

/// Replace the selection if it is an occurrence of the needle, then find the next one.
///
/// With a selection that does not match, this is a plain [`find_next`].
pub fn replace_one<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    query: &SearchQuery,
    replacement: &str,
) -> ReplaceOutcome {
    let replaced = query.matches_selection(buffer.selected_text());
    if replaced {
        buffer.insert_at_selection(replacement);
    }
    ReplaceOutcome {
        replaced,
        next: find_next(buffer, query),
    }
}

/// Replace every occurrence in the buffer as one undoable edit.
///
/// The whole text is rewritten even when nothing matched, so the buffer is
/// marked modified and gains an undo step either way.  Returns the number of
/// substitutions; an empty needle is a no-op returning 0.
pub fn replace_all<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    query: &SearchQuery,
    replacement: &str,
) -> usize {
    let Some(matcher) = Matcher::new(query) else {
        return 0;
    };
    let (text, count) = matcher.replace_all(buffer.text(), replacement);
    buffer.set_text(&text);
    tracing::debug!(count, needle = %query.needle, "replace all");
    count
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::MemoryBuffer;

    fn query(needle: &str, match_case: bool) -> SearchQuery {
        SearchQuery::new(needle, match_case)
    }

    #[test]
    fn absent_needle_leaves_selection_unchanged() {
        let mut buf = MemoryBuffer::with_text("alpha beta gamma");
        buf.set_selection(6..10);
        assert_eq!(find_next(&mut buf, &query("delta", false)), FindOutcome::NotFound);
        assert_eq!(buf.selection(), 6..10);
    }

    #[test]
    fn empty_needle_is_a_no_op() {
        let mut buf = MemoryBuffer::with_text("text");
        buf.set_selection(1..2);
        assert_eq!(find_next(&mut buf, &query("", true)), FindOutcome::NotFound);
        assert_eq!(buf.selection(), 1..2);
        assert_eq!(replace_all(&mut buf, &query("", true), "x"), 0);
        assert_eq!(buf.text(), "text");
        assert!(!buf.is_modified());
    }

    #[test]
    fn find_advances_then_wraps() {
        let mut buf = MemoryBuffer::with_text("dog cat dog");
        let q = query("dog", true);
        assert_eq!(find_next(&mut buf, &q), FindOutcome::Found(0..3));
        assert_eq!(find_next(&mut buf, &q), FindOutcome::Found(8..11));
        assert_eq!(find_next(&mut buf, &q), FindOutcome::Found(0..3));
        assert_eq!(buf.selection(), 0..3);
    }

    #[test]
    fn single_occurrence_is_reselected_after_wrap() {
        let mut buf = MemoryBuffer::with_text("one needle here");
        let q = query("needle", true);
        let first = find_next(&mut buf, &q);
        let second = find_next(&mut buf, &q);
        assert_eq!(first, FindOutcome::Found(4..10));
        assert_eq!(second, first);
        assert_eq!(buf.selected_text(), "needle");
    }

    #[test]
    fn find_starts_from_selection_end() {
        let mut buf = MemoryBuffer::with_text("abab");
        buf.set_selection(0..1);
        assert_eq!(find_next(&mut buf, &query("ab", true)), FindOutcome::Found(2..4));
    }

    #[test]
    fn find_honours_case_policy() {
        let mut buf = MemoryBuffer::with_text("Hello HELLO");
        assert_eq!(find_next(&mut buf, &query("hello", false)), FindOutcome::Found(0..5));
        let mut buf = MemoryBuffer::with_text("Hello HELLO");
        assert_eq!(find_next(&mut buf, &query("HELLO", true)), FindOutcome::Found(6..11));
    }

    #[test]
    fn whole_word_flag_is_inert() {
        let mut q = query("cat", true);
        q.whole_word = true;
        let mut buf = MemoryBuffer::with_text("concatenate");
        assert_eq!(find_next(&mut buf, &q), FindOutcome::Found(3..6));
    }

    #[test]
    fn replace_one_substitutes_matching_selection_and_advances() {
        let mut buf = MemoryBuffer::with_text("dog and dog");
        let q = query("DOG", false);
        find_next(&mut buf, &q);
        let out = replace_one(&mut buf, &q, "cat");
        assert!(out.replaced);
        assert_eq!(buf.text(), "cat and dog");
        assert_eq!(out.next, FindOutcome::Found(8..11));
        assert_eq!(buf.selected_text(), "dog");
    }

    #[test]
    fn replace_one_with_non_matching_selection_only_finds() {
        let mut buf = MemoryBuffer::with_text("cat sees dog");
        buf.set_selection(0..3);
        let out = replace_one(&mut buf, &query("dog", true), "bird");
        assert!(!out.replaced);
        assert_eq!(buf.text(), "cat sees dog");
        assert_eq!(out.next, FindOutcome::Found(9..12));
        assert!(!buf.is_modified());
    }

    #[test]
    fn replace_one_case_sensitive_rejects_other_case() {
        let mut buf = MemoryBuffer::with_text("Dog dog");
        buf.set_selection(0..3);
        let out = replace_one(&mut buf, &query("dog", true), "cat");
        assert!(!out.replaced);
        assert_eq!(out.next, FindOutcome::Found(4..7));
    }

    #[test]
    fn replace_all_case_insensitive() {
        let mut buf = MemoryBuffer::with_text("The cat saw THE dog");
        assert_eq!(replace_all(&mut buf, &query("The", false), "A"), 2);
        assert_eq!(buf.text(), "A cat saw A dog");
    }

    #[test]
    fn replace_all_case_sensitive() {
        let mut buf = MemoryBuffer::with_text("The cat saw THE dog");
        assert_eq!(replace_all(&mut buf, &query("The", true), "A"), 1);
        assert_eq!(buf.text(), "A cat saw THE dog");
    }

    #[test]
    fn replace_all_is_one_undo_step() {
        let original = "x1 x2 x3 x4";
        let mut buf = MemoryBuffer::with_text(original);
        assert_eq!(replace_all(&mut buf, &query("x", true), "y"), 4);
        assert!(!buf.text().contains('x'));
        assert!(buf.undo());
        assert_eq!(buf.text(), original);
        assert!(!buf.can_undo());
    }

    #[test]
    fn replace_all_without_matches_still_edits() {
        let mut buf = MemoryBuffer::with_text("nothing here");
        assert_eq!(replace_all(&mut buf, &query("zzz", false), "y"), 0);
        assert_eq!(buf.text(), "nothing here");
        assert!(buf.is_modified());
        assert!(buf.can_undo());
    }

    #[test]
    fn long_case_insensitive_needle_is_found_and_replaced() {
        let needle = "é".repeat(100_000);
        let text = format!("<{}>", "É".repeat(100_000));
        let q = query(&needle, false);

        let mut buf = MemoryBuffer::with_text(&text);
        assert_eq!(find_next(&mut buf, &q), FindOutcome::Found(1..200_001));

        let mut buf = MemoryBuffer::with_text(&text);
        assert_eq!(replace_all(&mut buf, &q, "e"), 1);
        assert_eq!(buf.text(), "<e>");
        assert!(buf.is_modified());
    }

    #[test]
    fn matches_selection_rules() {
        assert!(query("Cat", false).matches_selection("cAT"));
        assert!(!query("Cat", true).matches_selection("cAT"));
        assert!(query("Cat", true).matches_selection("Cat"));
        assert!(!query("", false).matches_selection(""));
    }
}
