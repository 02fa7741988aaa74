//! Turing console demo runner (default binary).
//!
//! Stands in for the execution engine: it paints a program and a tape, then
//! walks the head across the tape while stepping the current-line highlight
//! through the program. `q` or `Esc` quits.
//!
//! Usage: `turing-console <program-file> [tape]`

use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use turing_console::config::{self, Config};
use turing_console::core::{SourceStream, TuringConsole};
use turing_console::term::{AnyBackend, Backend};

const STEP: Duration = Duration::from_millis(400);
const DEFAULT_TAPE: &str = "0110100111";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(program) = args.next().map(PathBuf::from) else {
        bail!("usage: turing-console <program-file> [tape]");
    };
    let tape = args.next().unwrap_or_else(|| DEFAULT_TAPE.to_string());

    let config = config::load_from(None)?;
    let _log_guard = configure_logging(&config);
    install_panic_hook();

    let mut source = SourceStream::open(&program);
    let line_count = source.count_lines().unwrap_or_else(|e| {
        warn!(target: "runtime.startup", program = %program.display(), error = %e, "source_not_counted");
        0
    });
    let kind = config.backend_kind();
    info!(
        target: "runtime.startup",
        program = %program.display(),
        lines = line_count,
        backend = kind.as_str(),
        config = ?config.path,
        "startup"
    );

    // The console restores the terminal when it drops, before any error
    // below is printed.
    let mut console = TuringConsole::new(AnyBackend::stdout(kind), config.theme(), &source)
        .context("terminal initialization failed")?;
    run(&mut console, &mut source, &tape, line_count)
}

fn run<B: Backend>(
    console: &mut TuringConsole<B>,
    source: &mut SourceStream<std::fs::File>,
    tape: &str,
    line_count: usize,
) -> Result<()> {
    // A failed listing is already reported; keep showing the tape.
    console.print_turing_code(source);

    let mut symbols: Vec<char> = tape.chars().collect();
    let len = symbols.len();
    let mut current: String = symbols.iter().collect();
    console.set_tape_value(&current)?;
    console.set_tape_cursor(0, &current)?;

    let mut position = 0usize;
    let mut line = 0usize;
    loop {
        console.draw_tape_scrollers(position == 0, position + 1 >= len)?;

        if line_count > 0 {
            line = line % line_count + 1;
            if let Err(e) = console.set_current_code_line(line, source) {
                error!(target: "runtime", error = %e, "highlight_failed");
            }
        }

        if len > 0 {
            symbols[position] = if symbols[position] == '1' { '0' } else { '1' };
            console.write_at(symbols[position], position)?;
            current = symbols.iter().collect();
            position = (position + 1) % len;
            console.set_tape_cursor(position, &current)?;
        }

        if quit_requested(STEP)? {
            return Ok(());
        }
    }
}

fn quit_requested(timeout: Duration) -> Result<bool> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn configure_logging(config: &Config) -> Option<WorkerGuard> {
    let log_path = Path::new(&config.file.logging.file);
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = log_path.file_name()?;
    // Each run starts a fresh log; a failed removal is reported once the
    // subscriber is up.
    let stale = if log_path.exists() {
        std::fs::remove_file(log_path).err()
    } else {
        None
    };

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.file.logging.filter));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => {
            if let Some(e) = stale {
                warn!(target: "runtime.startup", file = %log_path.display(), error = %e, "old_log_not_removed");
            }
            Some(guard)
        }
        // Global subscriber already installed.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}
