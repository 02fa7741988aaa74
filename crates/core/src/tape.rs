//! Tape renderer: full paints plus single-cell cursor/symbol updates.
//!
//! The tape content is owned by the caller and passed in on every call; the
//! renderer only owns the head position. Cells are addressed by char index.

use tracing::debug;

use crate::error::ConsoleError;
use crate::layout::Layout;
use crate::term::Backend;
use crate::types::{ColorAttribute, Theme};

#[derive(Debug, Default)]
pub struct TapeRenderer {
    cursor: usize,
}

impl TapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Paint every cell of `tape`, highlighting the one under the head.
    ///
    /// A tape wider than the viewport is rejected and nothing is drawn.
    pub fn paint_full<B: Backend>(
        &self,
        backend: &mut B,
        layout: &Layout,
        theme: &Theme,
        tape: &str,
    ) -> Result<(), ConsoleError> {
        let len = tape.chars().count();
        check_viewport(layout, len)?;

        backend.set_cursor(layout.tape_start)?;
        backend.set_attribute(ColorAttribute::Reset)?;
        for (i, ch) in tape.chars().enumerate() {
            if i == self.cursor {
                backend.set_attribute(theme.tape_cursor)?;
                backend.write_char(ch)?;
                backend.set_attribute(ColorAttribute::Reset)?;
            } else {
                backend.write_char(ch)?;
            }
        }
        debug!(target: "console.tape", len, cursor = self.cursor, "tape_painted");
        Ok(())
    }

    /// Move the head to `position`: restore the old cell, highlight the new.
    pub fn move_cursor<B: Backend>(
        &mut self,
        backend: &mut B,
        layout: &Layout,
        theme: &Theme,
        position: usize,
        tape: &str,
    ) -> Result<(), ConsoleError> {
        let len = tape.chars().count();
        if position >= len {
            return Err(ConsoleError::CursorOutOfRange { position, len });
        }
        check_viewport(layout, len)?;

        // A previous head past a tape that has since shrunk is blanked.
        if self.cursor < layout.tape_width as usize {
            let prev = tape.chars().nth(self.cursor).unwrap_or(' ');
            backend.set_cursor(layout.tape_cell(self.cursor))?;
            backend.set_attribute(ColorAttribute::Reset)?;
            backend.write_char(prev)?;
        }

        if let Some(next) = tape.chars().nth(position) {
            backend.set_cursor(layout.tape_cell(position))?;
            backend.set_attribute(theme.tape_cursor)?;
            backend.write_char(next)?;
            backend.set_attribute(ColorAttribute::Reset)?;
        }

        debug!(target: "console.tape", from = self.cursor, to = position, "tape_cursor_moved");
        self.cursor = position;
        Ok(())
    }

    /// Overwrite one cell, keeping the highlight if the head is on it.
    pub fn write_cell<B: Backend>(
        &self,
        backend: &mut B,
        layout: &Layout,
        theme: &Theme,
        symbol: char,
        position: usize,
    ) -> Result<(), ConsoleError> {
        if position >= layout.tape_width as usize {
            return Err(ConsoleError::TapeExceedsViewport {
                len: position.saturating_add(1),
                width: layout.tape_width,
            });
        }

        backend.set_cursor(layout.tape_cell(position))?;
        if position == self.cursor {
            backend.set_attribute(theme.tape_cursor)?;
        } else {
            backend.set_attribute(ColorAttribute::Reset)?;
        }
        backend.write_char(symbol)?;
        backend.set_attribute(ColorAttribute::Reset)?;
        Ok(())
    }
}

fn check_viewport(layout: &Layout, len: usize) -> Result<(), ConsoleError> {
    if layout.fits_tape(len) {
        Ok(())
    } else {
        Err(ConsoleError::TapeExceedsViewport {
            len,
            width: layout.tape_width,
        })
    }
}
