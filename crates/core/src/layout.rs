//! Fixed screen regions, computed once from the terminal size.

use crate::error::LayoutError;
use crate::types::{
    Coordinate, ScreenSize, CODE_START, LEFT_SCROLLER_ORIGIN, MIN_SCREEN_SIZE,
    RIGHT_SCROLLER_INSET, TAPE_DISPLAY_START, TAPE_MARGIN_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub size: ScreenSize,
    pub tape_start: Coordinate,
    /// Number of tape cells that fit between the scrollers.
    pub tape_width: u16,
    pub code_start: Coordinate,
    pub left_scroller: Coordinate,
    pub right_scroller: Coordinate,
}

impl Layout {
    /// No relayout happens afterwards; a resized terminal keeps this layout.
    pub fn compute(size: ScreenSize) -> Result<Self, LayoutError> {
        if !size.fits_layout() {
            return Err(LayoutError::TooSmall {
                size,
                min: MIN_SCREEN_SIZE,
            });
        }
        Ok(Self {
            size,
            tape_start: TAPE_DISPLAY_START,
            tape_width: size.width - TAPE_MARGIN_WIDTH,
            code_start: CODE_START,
            left_scroller: LEFT_SCROLLER_ORIGIN,
            right_scroller: Coordinate::new(size.width - RIGHT_SCROLLER_INSET, LEFT_SCROLLER_ORIGIN.row),
        })
    }

    /// Screen position of tape cell `index`.
    pub fn tape_cell(&self, index: usize) -> Coordinate {
        self.tape_start.offset_column(clamp_u16(index))
    }

    pub fn fits_tape(&self, len: usize) -> bool {
        len <= self.tape_width as usize
    }

    /// Start of code line `line` (1-based).
    pub fn code_line(&self, line: usize) -> Coordinate {
        self.code_start.offset_row(clamp_u16(line.saturating_sub(1)))
    }

    /// Start of code line `line` when that row is on screen.
    pub fn visible_code_line(&self, line: usize) -> Option<Coordinate> {
        let at = self.code_line(line);
        (line > 0 && at.row < self.size.height).then_some(at)
    }

    /// Cells available to one code line before the right edge.
    pub fn code_columns(&self) -> usize {
        usize::from(self.size.width.saturating_sub(self.code_start.column))
    }
}

fn clamp_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_terminal_layout() {
        let l = Layout::compute(ScreenSize::new(80, 24)).unwrap();
        assert_eq!(l.tape_width, 70);
        assert_eq!(l.tape_start, Coordinate::new(5, 2));
        assert_eq!(l.code_start, Coordinate::new(0, 5));
        assert_eq!(l.left_scroller, Coordinate::new(1, 1));
        assert_eq!(l.right_scroller, Coordinate::new(76, 1));
    }

    #[test]
    fn tape_fits_exactly_between_scrollers() {
        let l = Layout::compute(ScreenSize::new(80, 24)).unwrap();
        let last = l.tape_cell(l.tape_width as usize - 1);
        // One-cell gap before the right scroller block.
        assert_eq!(last.column + 2, l.right_scroller.column);
        assert!(l.fits_tape(70));
        assert!(!l.fits_tape(71));
    }

    #[test]
    fn code_lines_are_one_based() {
        let l = Layout::compute(ScreenSize::new(80, 24)).unwrap();
        assert_eq!(l.code_line(1), Coordinate::new(0, 5));
        assert_eq!(l.code_line(3), Coordinate::new(0, 7));
    }

    #[test]
    fn code_lines_below_the_screen_are_not_visible() {
        let l = Layout::compute(ScreenSize::new(20, 8)).unwrap();
        assert_eq!(l.visible_code_line(3), Some(Coordinate::new(0, 7)));
        assert_eq!(l.visible_code_line(4), None);
        assert_eq!(l.visible_code_line(0), None);
        assert_eq!(l.code_columns(), 20);
    }

    #[test]
    fn too_small_terminal_is_rejected() {
        let err = Layout::compute(ScreenSize::new(10, 24)).unwrap_err();
        assert!(matches!(err, LayoutError::TooSmall { .. }));
        assert!(Layout::compute(ScreenSize::new(80, 5)).is_err());
        assert!(Layout::compute(MIN_SCREEN_SIZE).is_ok());
    }
}
