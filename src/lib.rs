// ── Safety policy ────────────────────────────────────────────────────────────
// Jotter is pure safe Rust: the buffer, the session and the search engine
// never need FFI.  Any future platform shell lives in its own crate.
#![forbid(unsafe_code)]

//! Plain-text editor core: a document session with a save-prompt gate, and a
//! literal find / replace engine, both driven through the [`editor::TextBuffer`]
//! and [`shell::Shell`] contracts.

pub mod app;
pub mod console;
pub mod editor;
pub mod error;
pub mod search;
pub mod session;
pub mod settings;
pub mod shell;
