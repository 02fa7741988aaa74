//! Cell-buffer backend: curses-style off-screen screen buffer.
//!
//! Every write is resolved to a pre-registered color pair and stored in a
//! framebuffer. Nothing reaches the terminal until `flush()`, which diffs the
//! pending frame against the last presented one and emits only changed runs.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use tracing::{debug, info};

use crate::backend::{Backend, BackendKind, SizeSource};
use crate::error::{BackendError, Result};
use crate::fb::{Cell, FrameBuffer};
use crate::pairs::{ColorPairs, Pen, Shade};
use crate::types::{Color, ColorAttribute, Coordinate, ScreenSize};

/// Raw-mode switch, tracked apart from the screen state so it is undone
/// even when entering or leaving the alternate screen fails.
struct RawMode {
    enable: fn() -> io::Result<()>,
    disable: fn() -> io::Result<()>,
    on: bool,
}

impl RawMode {
    fn crossterm() -> Self {
        Self {
            enable: terminal::enable_raw_mode,
            disable: terminal::disable_raw_mode,
            on: false,
        }
    }

    fn enter(&mut self) -> io::Result<()> {
        if !self.on {
            (self.enable)()?;
            self.on = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if self.on {
            (self.disable)()?;
            self.on = false;
        }
        Ok(())
    }
}

pub struct BufferedBackend<W: Write> {
    out: W,
    size: SizeSource,
    /// Attached to a real terminal: raw mode + alternate screen on init.
    terminal: bool,
    raw: RawMode,
    entered: bool,
    pairs: ColorPairs,
    pen: Pen,
    cursor: Coordinate,
    pending: FrameBuffer,
    presented: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl BufferedBackend<Stdout> {
    pub fn stdout() -> Self {
        Self::build(io::stdout(), SizeSource::Terminal, true)
    }
}

impl<W: Write> BufferedBackend<W> {
    /// Headless backend over `out` with fixed dimensions. Terminal modes are
    /// left alone.
    pub fn with_size(out: W, size: ScreenSize) -> Self {
        Self::build(out, SizeSource::Fixed(size), false)
    }

    fn build(out: W, size: SizeSource, terminal: bool) -> Self {
        Self {
            out,
            size,
            terminal,
            raw: RawMode::crossterm(),
            entered: false,
            pairs: ColorPairs::new(),
            pen: Pen::default(),
            cursor: Coordinate::default(),
            pending: FrameBuffer::new(ScreenSize::new(0, 0)),
            presented: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn pairs(&self) -> &ColorPairs {
        &self.pairs
    }

    /// Frame holding writes not yet flushed.
    pub fn pending(&self) -> &FrameBuffer {
        &self.pending
    }

    /// Frame as of the last `flush()`; `None` before the first one.
    pub fn presented(&self) -> Option<&FrameBuffer> {
        self.presented.as_ref()
    }

    /// Visible character and pen at `at`.
    pub fn cell_at(&self, at: Coordinate) -> Option<(char, Pen)> {
        let cell = self.presented.as_ref()?.get(at)?;
        Some((cell.ch, self.pairs.pen(cell.pair)?))
    }

    fn enter_screen(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    fn leave_screen(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Backend for BufferedBackend<W> {
    fn init(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        let size = self.size.resolve()?;
        if self.terminal {
            self.raw.enter()?;
            if let Err(e) = self.enter_screen() {
                let _ = self.raw.leave();
                return Err(e);
            }
        }
        self.pairs.register_all();
        self.pen = Pen::default();
        self.cursor = Coordinate::default();
        self.pending = FrameBuffer::new(size);
        self.presented = None;
        self.entered = true;
        info!(
            target: "term.backend",
            kind = "buffered",
            width = size.width,
            height = size.height,
            pairs = self.pairs.len(),
            "backend_init"
        );
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        let screen = if self.terminal {
            self.leave_screen()
        } else {
            Ok(())
        };
        let raw = self.raw.leave().map_err(BackendError::from);
        screen.and(raw)?;
        info!(target: "term.backend", kind = "buffered", "backend_teardown");
        Ok(())
    }

    fn query_size(&self) -> Result<ScreenSize> {
        self.size.resolve()
    }

    fn set_cursor(&mut self, at: Coordinate) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        self.cursor = at;
        Ok(())
    }

    fn set_attribute(&mut self, attr: ColorAttribute) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        self.pen.apply(attr);
        Ok(())
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        if ch == '\n' {
            self.cursor = Coordinate::new(0, self.cursor.row.saturating_add(1));
            return Ok(());
        }
        let pair = self
            .pairs
            .lookup(self.pen)
            .ok_or(BackendError::UnregisteredPair(self.pen))?;
        self.pending.put_char(self.cursor, ch, pair);
        self.cursor = self.cursor.offset_column(1);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        self.pending.clear(Cell::default());
        self.cursor = Coordinate::default();
        // Next flush repaints everything, starting from a cleared screen.
        self.presented = None;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.entered {
            return Err(BackendError::NotInitialized);
        }
        self.buf.clear();
        let size = self.pending.size();
        match self.presented.as_mut().filter(|prev| prev.size() == size) {
            Some(prev) => {
                encode_diff_into(prev, &self.pending, &self.pairs, &mut self.buf)?;
                prev.clone_from(&self.pending);
            }
            None => {
                encode_full_into(&self.pending, &self.pairs, &mut self.buf)?;
                self.presented = Some(self.pending.clone());
            }
        }
        debug!(target: "term.backend", bytes = self.buf.len(), "buffered_flush");
        self.flush_buf()
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Buffered
    }
}

impl<W: Write> Drop for BufferedBackend<W> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, pairs: &ColorPairs, out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut current: Option<u16> = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(Coordinate::new(x, y)).unwrap_or_default();
            if current != Some(cell.pair) {
                apply_pair_into(out, pairs, cell.pair)?;
                current = Some(cell.pair);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    Ok(())
}

/// Encode the changed runs between `prev` and `next` into `out`.
pub fn encode_diff_into(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    pairs: &ColorPairs,
    out: &mut Vec<u8>,
) -> io::Result<()> {
    let mut current: Option<u16> = None;

    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(Coordinate::new(x + dx, y)).unwrap_or_default();
            if current != Some(cell.pair) {
                apply_pair_into(out, pairs, cell.pair)?;
                current = Some(cell.pair);
            }
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    })?;

    if current.is_some() {
        out.queue(ResetColor)?;
    }
    Ok(())
}

fn apply_pair_into(out: &mut Vec<u8>, pairs: &ColorPairs, pair: u16) -> io::Result<()> {
    let pen = pairs.pen(pair).unwrap_or_default();
    out.queue(ResetColor)?;
    if let Some(fg) = pen.fg {
        out.queue(SetForegroundColor(shade_to_color(fg)))?;
    }
    if let Some(bg) = pen.bg {
        out.queue(SetBackgroundColor(shade_to_color(bg)))?;
    }
    Ok(())
}

fn shade_to_color(shade: Shade) -> TermColor {
    match (shade.color, shade.bright) {
        (Color::Black, false) => TermColor::Black,
        (Color::Red, false) => TermColor::DarkRed,
        (Color::Green, false) => TermColor::DarkGreen,
        (Color::Yellow, false) => TermColor::DarkYellow,
        (Color::Blue, false) => TermColor::DarkBlue,
        (Color::Purple, false) => TermColor::DarkMagenta,
        (Color::Cyan, false) => TermColor::DarkCyan,
        (Color::White, false) => TermColor::Grey,
        (Color::Black, true) => TermColor::DarkGrey,
        (Color::Red, true) => TermColor::Red,
        (Color::Green, true) => TermColor::Green,
        (Color::Yellow, true) => TermColor::Yellow,
        (Color::Blue, true) => TermColor::Blue,
        (Color::Purple, true) => TermColor::Magenta,
        (Color::Cyan, true) => TermColor::Cyan,
        (Color::White, true) => TermColor::White,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> io::Result<()>,
) -> io::Result<()> {
    let w = next.width();
    let h = next.height();

    for y in 0..h {
        let mut x = 0;
        while x < w {
            let at = Coordinate::new(x, y);
            if prev.get(at) == next.get(at) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w {
                let at = Coordinate::new(x, y);
                if prev.get(at) == next.get(at) {
                    break;
                }
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
