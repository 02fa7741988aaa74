//! Framebuffer of character cells tagged with a color-pair number.

use crate::pairs::PairId;
use crate::types::{Coordinate, ScreenSize};

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub pair: PairId,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', pair: 0 }
    }
}

/// 2D framebuffer of paired character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(size: ScreenSize) -> Self {
        let len = (size.width as usize) * (size.height as usize);
        Self {
            width: size.width,
            height: size.height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn size(&self) -> ScreenSize {
        ScreenSize::new(self.width, self.height)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, at: Coordinate) -> Option<Cell> {
        self.idx(at.column, at.row).map(|i| self.cells[i])
    }

    /// Writes outside the buffer are dropped (the terminal clips them too).
    pub fn set(&mut self, at: Coordinate, cell: Cell) {
        if let Some(i) = self.idx(at.column, at.row) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, at: Coordinate, ch: char, pair: PairId) {
        self.set(at, Cell { ch, pair });
    }

    /// Characters of row `y`, trailing blanks included.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .map(|x| self.get(Coordinate::new(x, y)).unwrap_or_default().ch)
            .collect()
    }
}
