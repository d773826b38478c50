// ── Line-oriented console shell ───────────────────────────────────────────────
//
// Drives an `App` from a text stream: one command per line, prompts answered
// on the following lines.  This is the only UI the crate ships; it exists so
// the core can be exercised by hand or by a script piped to stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::{
    app::{App, Command, Flow},
    editor::TextBuffer,
    shell::{SaveChoice, Shell},
};

const HELP: &str = "\
commands:
  new | open | save | save-as | exit
  undo | redo | select-all | select <start> <end> | insert <text>
  find-text <text> | replace-text <text> | match-case on|off | whole-word on|off
  find | replace | replace-all | show-find | hide-find
  print | about | help
`insert` understands \\n and \\t escapes.";

// ── Parsing ───────────────────────────────────────────────────────────────────

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Write the buffer contents.
    Print,
    Help,
}

/// Parse one input line.  `Ok(None)` for a blank line.
///
/// # Errors
///
/// A short message naming what was wrong with the line.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let cmd = match verb.trim_end() {
        "new" => Command::New,
        "open" => Command::Open,
        "save" => Command::Save,
        "save-as" => Command::SaveAs,
        "exit" | "quit" => Command::Exit,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "select-all" => Command::SelectAll,
        "select" => {
            let mut nums = rest.split_whitespace().map(str::parse::<usize>);
            match (nums.next(), nums.next(), nums.next()) {
                (Some(Ok(start)), Some(Ok(end)), None) => Command::Select(start..end),
                _ => return Err("usage: select <start> <end>".to_owned()),
            }
        }
        "insert" => Command::Insert(unescape(rest)),
        "find-text" => Command::SetFindText(rest.to_owned()),
        "replace-text" => Command::SetReplaceText(rest.to_owned()),
        "match-case" => Command::SetMatchCase(parse_switch(rest)?),
        "whole-word" => Command::SetWholeWord(parse_switch(rest)?),
        "find" => Command::FindNext,
        "replace" => Command::Replace,
        "replace-all" => Command::ReplaceAll,
        "show-find" => Command::ShowFind,
        "hide-find" => Command::HideFind,
        "about" => Command::About,
        "print" => return Ok(Some(Input::Print)),
        "help" => return Ok(Some(Input::Help)),
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(Input::Command(cmd)))
}

fn parse_switch(arg: &str) -> Result<bool, String> {
    match arg.trim() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err("expected 'on' or 'off'".to_owned()),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

// ── Console ───────────────────────────────────────────────────────────────────

/// A [`Shell`] over a reader and a writer.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect what a test script produced.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Next line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
            Err(e) => {
                tracing::warn!(error = %e, "reading input failed; treating as end of input");
                None
            }
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{question}");
        let _ = self.output.flush();
        self.read_line()
    }

    fn ask_path(&mut self, question: &str) -> Option<PathBuf> {
        self.ask(question)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    /// Read and dispatch commands until `exit` is accepted or input ends.
    ///
    /// # Errors
    ///
    /// Only when writing the prompt or printed output fails.
    pub fn run<B: TextBuffer>(&mut self, app: &mut App<B>) -> io::Result<()> {
        let title = app.session().window_title();
        self.set_title(&title);
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line() else {
                if app.dispatch(Command::Exit, self) == Flow::Continue {
                    writeln!(self.output, "end of input: leaving with unsaved changes")?;
                }
                return Ok(());
            };
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(Input::Command(cmd))) => {
                    if app.dispatch(cmd, self) == Flow::Exit {
                        return Ok(());
                    }
                }
                Ok(Some(Input::Print)) => {
                    let buffer = app.session().buffer();
                    let sel = buffer.selection();
                    writeln!(self.output, "{}", buffer.text())?;
                    writeln!(self.output, "-- selection {}..{}", sel.start, sel.end)?;
                }
                Ok(Some(Input::Help)) => writeln!(self.output, "{HELP}")?,
                Err(msg) => writeln!(self.output, "{msg}")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Shell for Console<R, W> {
    fn confirm_save(&mut self) -> SaveChoice {
        loop {
            let answer = self.ask(
                "The document has been modified. Save changes? [s]ave / [d]iscard / [c]ancel: ",
            );
            match answer.as_deref().map(str::trim) {
                Some("s" | "save") => return SaveChoice::Save,
                Some("d" | "discard") => return SaveChoice::Discard,
                Some("c" | "cancel") | None => return SaveChoice::Cancel,
                Some(_) => {}
            }
        }
    }

    fn choose_open_path(&mut self) -> Option<PathBuf> {
        self.ask_path("Open file: ")
    }

    fn choose_save_path(&mut self) -> Option<PathBuf> {
        self.ask_path("Save file as: ")
    }

    fn info(&mut self, title: &str, message: &str) {
        let _ = writeln!(self.output, "{title}: {message}");
    }

    fn error(&mut self, title: &str, message: &str) {
        let _ = writeln!(self.output, "{title}: {message}");
    }

    fn status(&mut self, message: &str) {
        let _ = writeln!(self.output, "-- {message}");
    }

    fn set_title(&mut self, title: &str) {
        let _ = writeln!(self.output, "[{title}]");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
