//! Backend capability set and runtime backend selection.
//!
//! Higher layers only talk to [`Backend`]. Two implementations exist:
//!
//! - [`AnsiBackend`]: writes escape sequences inline, colors take effect
//!   immediately and every primitive is flushed on the spot.
//! - [`BufferedBackend`]: writes land in an off-screen framebuffer through
//!   pre-registered color pairs and only reach the terminal on `flush()`.
//!
//! Coordinates are always `(column, row)` with `(0, 0)` top-left.

use std::io::{self, IsTerminal, Stdout, Write};

use tracing::debug;

use crate::ansi::AnsiBackend;
use crate::buffered::BufferedBackend;
use crate::error::{BackendError, Result};
use crate::types::{ColorAttribute, Coordinate, ScreenSize};

pub trait Backend {
    /// Acquire the terminal. Must be called before any write.
    fn init(&mut self) -> Result<()>;
    /// Give the terminal back in the mode it had before `init()`.
    fn teardown(&mut self) -> Result<()>;
    fn query_size(&self) -> Result<ScreenSize>;
    fn set_cursor(&mut self, at: Coordinate) -> Result<()>;
    fn set_attribute(&mut self, attr: ColorAttribute) -> Result<()>;
    fn write_char(&mut self, ch: char) -> Result<()>;
    fn write_str(&mut self, s: &str) -> Result<()> {
        for ch in s.chars() {
            self.write_char(ch)?;
        }
        Ok(())
    }
    /// Blank the whole screen and home the cursor.
    fn clear(&mut self) -> Result<()>;
    /// Make every write so far visible.
    fn flush(&mut self) -> Result<()>;
    fn kind(&self) -> BackendKind;
}

/// Where a backend gets its dimensions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    /// Ask the controlling terminal.
    Terminal,
    /// Headless (tests, recordings).
    Fixed(ScreenSize),
}

impl SizeSource {
    pub fn resolve(self) -> Result<ScreenSize> {
        match self {
            SizeSource::Terminal => crossterm::terminal::size()
                .map(|(w, h)| ScreenSize::new(w, h))
                .map_err(BackendError::SizeUnavailable),
            SizeSource::Fixed(size) => Ok(size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Direct,
    Buffered,
}

impl BackendKind {
    /// Pick a backend for the current process.
    ///
    /// Piped output and dumb terminals get the direct stream; interactive
    /// terminals get the cell buffer.
    pub fn probe() -> Self {
        let is_tty = io::stdout().is_terminal();
        let term = std::env::var("TERM").ok();
        let kind = Self::probe_with(is_tty, term.as_deref());
        debug!(target: "term.backend", is_tty, term = term.as_deref(), kind = kind.as_str(), "backend_probe");
        kind
    }

    pub fn probe_with(is_tty: bool, term: Option<&str>) -> Self {
        if !is_tty || term == Some("dumb") {
            BackendKind::Direct
        } else {
            BackendKind::Buffered
        }
    }

    /// Parse backend name (case-insensitive)
    ///
    /// ```
    /// use turing_console_term::BackendKind;
    ///
    /// assert_eq!(BackendKind::from_str("direct"), Some(BackendKind::Direct));
    /// assert_eq!(BackendKind::from_str("Buffered"), Some(BackendKind::Buffered));
    /// assert_eq!(BackendKind::from_str("curses"), Some(BackendKind::Buffered));
    /// assert_eq!(BackendKind::from_str("auto"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" | "ansi" => Some(BackendKind::Direct),
            "buffered" | "curses" => Some(BackendKind::Buffered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Direct => "direct",
            BackendKind::Buffered => "buffered",
        }
    }
}

/// Either backend, chosen at runtime.
pub enum AnyBackend<W: Write = Stdout> {
    Direct(AnsiBackend<W>),
    Buffered(BufferedBackend<W>),
}

impl AnyBackend<Stdout> {
    /// Backend of `kind` attached to the process terminal.
    pub fn stdout(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Direct => AnyBackend::Direct(AnsiBackend::stdout()),
            BackendKind::Buffered => AnyBackend::Buffered(BufferedBackend::stdout()),
        }
    }
}

impl<W: Write> AnyBackend<W> {
    /// Headless backend of `kind` writing into `out`.
    pub fn with_size(kind: BackendKind, out: W, size: ScreenSize) -> Self {
        match kind {
            BackendKind::Direct => AnyBackend::Direct(AnsiBackend::with_size(out, size)),
            BackendKind::Buffered => AnyBackend::Buffered(BufferedBackend::with_size(out, size)),
        }
    }
}

macro_rules! delegate {
    ($self:ident, $b:ident => $e:expr) => {
        match $self {
            AnyBackend::Direct($b) => $e,
            AnyBackend::Buffered($b) => $e,
        }
    };
}

impl<W: Write> Backend for AnyBackend<W> {
    fn init(&mut self) -> Result<()> {
        delegate!(self, b => b.init())
    }

    fn teardown(&mut self) -> Result<()> {
        delegate!(self, b => b.teardown())
    }

    fn query_size(&self) -> Result<ScreenSize> {
        delegate!(self, b => b.query_size())
    }

    fn set_cursor(&mut self, at: Coordinate) -> Result<()> {
        delegate!(self, b => b.set_cursor(at))
    }

    fn set_attribute(&mut self, attr: ColorAttribute) -> Result<()> {
        delegate!(self, b => b.set_attribute(attr))
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        delegate!(self, b => b.write_char(ch))
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        delegate!(self, b => b.write_str(s))
    }

    fn clear(&mut self) -> Result<()> {
        delegate!(self, b => b.clear())
    }

    fn flush(&mut self) -> Result<()> {
        delegate!(self, b => b.flush())
    }

    fn kind(&self) -> BackendKind {
        delegate!(self, b => b.kind())
    }
}
