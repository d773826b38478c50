use std::io;

use jotter::{app::App, console::Console, editor::MemoryBuffer, settings::Settings};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `JOTTER_LOG=debug`.
const LOG_ENV: &str = "JOTTER_LOG";

fn main() {
    init_logging();

    let settings = Settings::load();
    let mut app = App::new(MemoryBuffer::new(), settings);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());
    if let Err(e) = console.run(&mut app) {
        // The console itself is gone; stderr is the only output path left.
        tracing::error!(error = %e, "console failed");
        eprintln!("jotter: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so diagnostics never interleave with the console on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
