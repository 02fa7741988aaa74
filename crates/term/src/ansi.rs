//! Direct-stream backend: ANSI escape sequences written inline.
//!
//! Colors are raw SGR numbers applied the moment they are set. Cursor,
//! visibility, wrap and clear go through crossterm commands. Every primitive
//! flushes the underlying writer, so output is always visible and `flush()`
//! has nothing left to do.

use std::io::{self, Stdout, Write};

use crossterm::{cursor, terminal, QueueableCommand};
use tracing::info;

use crate::backend::{Backend, BackendKind, SizeSource};
use crate::error::{BackendError, Result};
use crate::types::{ColorAttribute, Coordinate, ScreenSize};

pub struct AnsiBackend<W: Write> {
    out: W,
    size: SizeSource,
    entered: bool,
}

impl AnsiBackend<Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            size: SizeSource::Terminal,
            entered: false,
        }
    }
}

impl<W: Write> AnsiBackend<W> {
    /// Headless backend over `out` with fixed dimensions.
    pub fn with_size(out: W, size: ScreenSize) -> Self {
        Self {
            out,
            size: SizeSource::Fixed(size),
            entered: false,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Cursor addressing primitive, row first like CUP.
    fn goto(&mut self, row: u16, column: u16) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(column, row))?;
        Ok(())
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        f(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Backend for AnsiBackend<W> {
    fn init(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        let size = self.size.resolve()?;
        // Cells past the right edge are dropped, as in the cell buffer.
        self.out.queue(cursor::Hide)?.queue(terminal::DisableLineWrap)?;
        self.out.flush()?;
        self.entered = true;
        info!(target: "term.backend", kind = "direct", width = size.width, height = size.height, "backend_init");
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        write!(self.out, "\x1b[0m")?;
        self.out.queue(terminal::EnableLineWrap)?.queue(cursor::Show)?;
        self.out.flush()?;
        self.entered = false;
        info!(target: "term.backend", kind = "direct", "backend_teardown");
        Ok(())
    }

    fn query_size(&self) -> Result<ScreenSize> {
        self.size.resolve()
    }

    fn set_cursor(&mut self, at: Coordinate) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        self.goto(at.row, at.column)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_attribute(&mut self, attr: ColorAttribute) -> Result<()> {
        self.emit(|out| write!(out, "\x1b[{}m", attr.sgr_code()))
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        self.emit(|out| write!(out, "{ch}"))
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.emit(|out| out.write_all(s.as_bytes()))
    }

    fn clear(&mut self) -> Result<()> {
        self.emit(|out| {
            out.queue(terminal::Clear(terminal::ClearType::All))?
                .queue(cursor::MoveTo(0, 0))?;
            Ok(())
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Direct
    }
}

impl<W: Write> Drop for AnsiBackend<W> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn backend() -> AnsiBackend<Vec<u8>> {
        let mut b = AnsiBackend::with_size(Vec::new(), ScreenSize::new(80, 24));
        b.init().unwrap();
        b
    }

    fn text(b: &AnsiBackend<Vec<u8>>) -> String {
        String::from_utf8(b.output().clone()).unwrap()
    }

    #[test]
    fn set_cursor_swaps_to_row_major_one_based() {
        let mut b = backend();
        b.set_cursor(Coordinate::new(5, 2)).unwrap();
        assert!(text(&b).ends_with("\x1b[3;6H"));
    }

    #[test]
    fn attributes_are_written_as_numeric_sgr() {
        let mut b = backend();
        b.set_attribute(ColorAttribute::Background(Color::Cyan)).unwrap();
        b.write_char('1').unwrap();
        b.set_attribute(ColorAttribute::Reset).unwrap();
        assert!(text(&b).ends_with("\x1b[46m1\x1b[0m"));
    }

    #[test]
    fn writes_before_init_are_rejected() {
        let mut b = AnsiBackend::with_size(Vec::new(), ScreenSize::new(80, 24));
        assert!(matches!(b.write_char('x'), Err(BackendError::NotInitialized)));
        assert!(b.output().is_empty());
    }

    #[test]
    fn init_hides_cursor_and_disables_autowrap() {
        let b = backend();
        assert_eq!(text(&b), "\x1b[?25l\x1b[?7l");
    }

    #[test]
    fn clear_erases_and_homes() {
        let mut b = backend();
        b.clear().unwrap();
        assert!(text(&b).ends_with("\x1b[2J\x1b[1;1H"));
    }

    #[test]
    fn teardown_resets_attributes_and_shows_cursor_once() {
        let mut b = backend();
        b.teardown().unwrap();
        b.teardown().unwrap();
        let out = text(&b);
        assert_eq!(out.matches("\x1b[?25h").count(), 1);
        assert!(out.ends_with("\x1b[0m\x1b[?7h\x1b[?25h"));
    }
}
