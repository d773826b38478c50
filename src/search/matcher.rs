// ── Literal matcher ───────────────────────────────────────────────────────────
//
// Case-sensitive search is plain `str` matching.  Case-insensitive search
// escapes the needle and hands it to `regex`, which gives Unicode case folding
// with correct byte offsets into the original text (lower-casing the haystack
// can change its length, so offsets would drift).  A needle too large for the
// regex compiler falls back to a char-by-char case-folded scan.

use std::ops::Range;

use regex::{NoExpand, Regex, RegexBuilder};

use super::SearchQuery;

/// A compiled, non-empty needle.
#[derive(Debug)]
pub(crate) enum Matcher {
    Exact(String),
    IgnoreCase(Regex),
    /// Case-insensitive needle the regex compiler rejected.
    Folded(Vec<char>),
}

impl Matcher {
    /// Compile `query`.  `None` only for an empty needle.
    pub(crate) fn new(query: &SearchQuery) -> Option<Self> {
        if query.needle.is_empty() {
            return None;
        }
        if query.whole_word {
            tracing::debug!("whole-word matching is not supported; searching for any occurrence");
        }
        if query.match_case {
            return Some(Self::Exact(query.needle.clone()));
        }
        match RegexBuilder::new(&regex::escape(&query.needle))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(Self::IgnoreCase(re)),
            // Only reachable when the escaped needle exceeds the regex size limit.
            Err(e) => {
                tracing::debug!(error = %e, "falling back to a case-folded scan");
                Some(Self::Folded(query.needle.chars().collect()))
            }
        }
    }

    /// First match starting at or after byte offset `start`.
    pub(crate) fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        match self {
            Self::Exact(needle) => haystack
                .get(start..)?
                .find(needle.as_str())
                .map(|pos| start + pos..start + pos + needle.len()),
            Self::IgnoreCase(re) => re.find_at(haystack, start).map(|m| m.range()),
            Self::Folded(needle) => find_folded(needle, haystack, start),
        }
    }

    /// Substitute every non-overlapping match in one left-to-right pass.
    ///
    /// Scanning resumes after each original match, never inside inserted
    /// replacement text.  Returns the new text and the number of substitutions.
    pub(crate) fn replace_all(&self, haystack: &str, replacement: &str) -> (String, usize) {
        match self {
            Self::Exact(needle) => {
                let count = haystack.matches(needle.as_str()).count();
                (haystack.replace(needle.as_str(), replacement), count)
            }
            Self::IgnoreCase(re) => {
                let count = re.find_iter(haystack).count();
                let replaced = re.replace_all(haystack, NoExpand(replacement));
                (replaced.into_owned(), count)
            }
            Self::Folded(needle) => {
                let mut out = String::with_capacity(haystack.len());
                let mut count = 0;
                let mut pos = 0;
                while let Some(m) = find_folded(needle, haystack, pos) {
                    out.push_str(&haystack[pos..m.start]);
                    out.push_str(replacement);
                    pos = m.end;
                    count += 1;
                }
                out.push_str(&haystack[pos..]);
                (out, count)
            }
        }
    }
}

// ── Case-folded scan ──────────────────────────────────────────────────────────

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// First case-insensitive match of `needle` at or after `start`.
///
/// Compares one haystack char per needle char, so a match covers exactly
/// `needle.len()` chars of the original text.
fn find_folded(needle: &[char], haystack: &str, start: usize) -> Option<Range<usize>> {
    let tail = haystack.get(start..)?;
    'starts: for (offset, _) in tail.char_indices() {
        let mut end = offset;
        let mut hay = tail[offset..].chars();
        for &n in needle {
            match hay.next() {
                Some(h) if chars_eq_ignore_case(h, n) => end += h.len_utf8(),
                _ => continue 'starts,
            }
        }
        return Some(start + offset..start + end);
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
