// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Jotter return `error::Result<T>`.  No panics
// in production paths; errors surface as user-facing messages through
// `Shell::error` (see `app::App::dispatch`).  A search miss is not an error:
// it is `search::FindOutcome::NotFound`.

use std::{path::PathBuf, string::FromUtf8Error};

/// Every error that Jotter can produce.
#[derive(Debug, thiserror::Error)]
pub enum JotterError {
    /// Reading a document from disk failed (missing file, permissions, …).
    #[error("Could not read file {}:\n{source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a document to disk failed.
    #[error("Could not save file {}:\n{source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid UTF-8.
    #[error("Could not read file {}:\nthe file is not valid UTF-8", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    /// The user chose Cancel at the save prompt or dismissed a path dialog.
    ///
    /// Aborts the triggering action; never shown to the user.
    #[error("operation cancelled by the user")]
    Cancelled,

    /// `settings.json` exists but could not be parsed.
    #[error("invalid settings file {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl JotterError {
    /// `true` for the silent user-cancel outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JotterError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_path() {
        let err = JotterError::Read {
            path: PathBuf::from("/tmp/missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.txt"), "{msg}");
        assert!(msg.contains("no such file"), "{msg}");
    }

    #[test]
    fn only_cancelled_is_cancelled() {
        assert!(JotterError::Cancelled.is_cancelled());
        let io = JotterError::Write {
            path: PathBuf::from("x"),
            source: std::io::Error::other("disk full"),
        };
        assert!(!io.is_cancelled());
    }

    #[test]
    fn io_errors_expose_their_source() {
        use std::error::Error as _;
        let err = JotterError::Write {
            path: PathBuf::from("x"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.source().is_some());
        assert!(JotterError::Cancelled.source().is_none());
    }
}
