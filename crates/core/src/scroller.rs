//! Tape scroller indicators: two 3x3 blocks flanking the tape.

use tracing::trace;

use crate::layout::Layout;
use crate::term::{Backend, BackendError};
use crate::types::{ColorAttribute, Coordinate, Theme, SCROLLER_HEIGHT};

/// Paint both blocks. Nothing is remembered; pass both flags every time.
pub fn paint<B: Backend>(
    backend: &mut B,
    layout: &Layout,
    theme: &Theme,
    left_disabled: bool,
    right_disabled: bool,
) -> Result<(), BackendError> {
    paint_block(backend, theme, layout.left_scroller, left_disabled, '<')?;
    paint_block(backend, theme, layout.right_scroller, right_disabled, '>')?;
    backend.set_attribute(ColorAttribute::Reset)?;
    trace!(target: "console.scroller", left_disabled, right_disabled, "scrollers_painted");
    Ok(())
}

fn paint_block<B: Backend>(
    backend: &mut B,
    theme: &Theme,
    origin: Coordinate,
    disabled: bool,
    glyph: char,
) -> Result<(), BackendError> {
    let fill = if disabled {
        theme.scroller_disabled
    } else {
        theme.scroller_enabled
    };
    backend.set_attribute(ColorAttribute::Reset)?;
    backend.set_attribute(theme.scroller_glyph)?;
    backend.set_attribute(fill)?;
    for dy in 0..SCROLLER_HEIGHT {
        backend.set_cursor(origin.offset_row(dy))?;
        if dy == SCROLLER_HEIGHT / 2 {
            backend.write_char(' ')?;
            backend.write_char(glyph)?;
            backend.write_char(' ')?;
        } else {
            backend.write_str("   ")?;
        }
    }
    Ok(())
}
