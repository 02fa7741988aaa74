#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use turing_console::core::{SourceStream, TuringConsole};
use turing_console::term::{AnsiBackend, BufferedBackend, Pen};
use turing_console::types::{Color, ColorAttribute, Coordinate, ScreenSize, Theme};

pub const SIZE: ScreenSize = ScreenSize::new(40, 14);

pub type MemStream = SourceStream<Cursor<Vec<u8>>>;
pub type Buffered = TuringConsole<BufferedBackend<Vec<u8>>>;

pub fn stream(text: &str) -> MemStream {
    SourceStream::from_reader(Cursor::new(text.as_bytes().to_vec()))
}

pub fn closed_stream() -> MemStream {
    SourceStream::closed()
}

pub fn buffered_console(source: &MemStream) -> Buffered {
    TuringConsole::new(
        BufferedBackend::with_size(Vec::new(), SIZE),
        Theme::default(),
        source,
    )
    .unwrap()
}

pub fn direct_console(source: &MemStream) -> (TuringConsole<AnsiBackend<SharedBuf>>, SharedBuf) {
    let out = SharedBuf::default();
    let console = TuringConsole::new(
        AnsiBackend::with_size(out.clone(), SIZE),
        Theme::default(),
        source,
    )
    .unwrap();
    (console, out)
}

/// Visible (char, pen) at `at` on the buffered backend.
pub fn visible(console: &Buffered, at: Coordinate) -> (char, Pen) {
    console.backend().cell_at(at).unwrap()
}

pub fn pen(attrs: &[ColorAttribute]) -> Pen {
    Pen::from_attributes(attrs)
}

/// Writer whose bytes stay readable after the owning backend is dropped.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.contents()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Minimal terminal emulator for the sequences the direct backend emits.
pub struct AnsiScreen {
    size: ScreenSize,
    cells: Vec<(char, Pen)>,
    cursor: Coordinate,
    pen: Pen,
    pub cursor_visible: bool,
    pub autowrap: bool,
}

impl AnsiScreen {
    pub fn replay(size: ScreenSize, bytes: &[u8]) -> Self {
        let mut screen = Self {
            size,
            cells: vec![(' ', Pen::default()); size.width as usize * size.height as usize],
            cursor: Coordinate::default(),
            pen: Pen::default(),
            cursor_visible: true,
            autowrap: true,
        };
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\x1b' => {
                    assert_eq!(chars.next(), Some('['), "only CSI sequences are expected");
                    let mut params = String::new();
                    let fin = loop {
                        let c = chars.next().unwrap();
                        if ('@'..='~').contains(&c) && c != '?' {
                            break c;
                        }
                        params.push(c);
                    };
                    screen.csi(&params, fin);
                }
                '\r' => screen.cursor.column = 0,
                '\n' => screen.cursor = Coordinate::new(0, screen.cursor.row + 1),
                c => screen.put(c),
            }
        }
        screen
    }

    fn csi(&mut self, params: &str, fin: char) {
        match (fin, params) {
            ('m', _) => {
                for p in params.split(';') {
                    let code: u8 = p.parse().unwrap_or(0);
                    self.pen.apply(attribute_from_sgr(code));
                }
            }
            ('H', "") => self.cursor = Coordinate::default(),
            ('H', _) => {
                let (r, c) = params.split_once(';').unwrap();
                let row: u16 = r.parse().unwrap();
                let col: u16 = c.parse().unwrap();
                self.cursor = Coordinate::new(col - 1, row - 1);
            }
            ('J', "2") => self.cells.fill((' ', Pen::default())),
            ('l', "?25") => self.cursor_visible = false,
            ('h', "?25") => self.cursor_visible = true,
            ('l', "?7") => self.autowrap = false,
            ('h', "?7") => self.autowrap = true,
            other => panic!("unexpected CSI {other:?}"),
        }
    }

    /// Print one glyph the way a VT100 does: with autowrap the text flows
    /// onto the next row, without it the last column is overwritten.
    fn put(&mut self, ch: char) {
        assert!(!ch.is_control(), "control character {ch:?} reached the terminal");
        let last = self.size.width - 1;
        if self.cursor.column > last {
            if self.autowrap {
                self.cursor = Coordinate::new(0, (self.cursor.row + 1).min(self.size.height - 1));
            } else {
                self.cursor.column = last;
            }
        }
        let i = self.cursor.row as usize * self.size.width as usize + self.cursor.column as usize;
        self.cells[i] = (ch, self.pen);
        self.cursor.column += 1;
    }

    pub fn cell(&self, at: Coordinate) -> (char, Pen) {
        self.cells[at.row as usize * self.size.width as usize + at.column as usize]
    }
}

fn attribute_from_sgr(code: u8) -> ColorAttribute {
    let color = |base: u8| Color::ALL[(code - base) as usize];
    match code {
        30..=37 => ColorAttribute::Foreground(color(30)),
        40..=47 => ColorAttribute::Background(color(40)),
        90..=97 => ColorAttribute::BrightForeground(color(90)),
        100..=107 => ColorAttribute::BrightBackground(color(100)),
        _ => ColorAttribute::Reset,
    }
}
