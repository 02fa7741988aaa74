//! Core types module - shared value types and layout constants
//!
//! Everything in this crate is plain data with no external dependencies, so it
//! can be shared by the terminal backends, the renderers and the config layer.
//!
//! # Screen Layout
//!
//! The console splits the terminal into fixed regions, derived once from the
//! queried [`ScreenSize`]:
//!
//! | Region | Origin (col, row) | Size |
//! |--------|-------------------|------|
//! | Left scroller | (1, 1) | 3x3 |
//! | Right scroller | (width - 4, 1) | 3x3 |
//! | Tape | (5, 2) | (width - 10) x 1 |
//! | Code | (0, 5) | rest of the screen |
//!
//! # Colors
//!
//! A [`ColorAttribute`] is either a reset or a single foreground/background
//! selection. Numeric values follow the SGR convention:
//!
//! | Attribute | Code |
//! |-----------|------|
//! | `Reset` | 0 |
//! | `Foreground(c)` | 30 + c |
//! | `Background(c)` | 40 + c |
//! | `BrightForeground(c)` | 90 + c |
//! | `BrightBackground(c)` | 100 + c |
//!
//! # Examples
//!
//! ```
//! use turing_console_types::{Color, ColorAttribute, Coordinate, TAPE_DISPLAY_START};
//!
//! let attr = ColorAttribute::from_str("cyan_bg").unwrap();
//! assert_eq!(attr, ColorAttribute::Background(Color::Cyan));
//! assert_eq!(attr.sgr_code(), 46);
//!
//! assert_eq!(TAPE_DISPLAY_START, Coordinate::new(5, 2));
//! ```

/// Total width of the left + right margins around the tape.
pub const TAPE_MARGIN_WIDTH: u16 = 10;

/// First tape cell.
pub const TAPE_DISPLAY_START: Coordinate = Coordinate::new(5, 2);

/// Top-left corner of the code viewport.
pub const CODE_START: Coordinate = Coordinate::new(0, 5);

/// Scroller block width in cells.
pub const SCROLLER_WIDTH: u16 = 3;

/// Scroller block height in cells.
pub const SCROLLER_HEIGHT: u16 = 3;

/// Top-left corner of the left scroller block.
pub const LEFT_SCROLLER_ORIGIN: Coordinate = Coordinate::new(1, 1);

/// Distance of the right scroller block from the right edge (`width - 1 - 3`).
pub const RIGHT_SCROLLER_INSET: u16 = 1 + SCROLLER_WIDTH;

/// Smallest terminal the fixed layout fits in.
///
/// Width must leave at least one tape cell between the margins, height must
/// leave at least one code row.
pub const MIN_SCREEN_SIZE: ScreenSize = ScreenSize::new(TAPE_MARGIN_WIDTH + 1, CODE_START.row + 1);

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl ScreenSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Whether the fixed layout fits.
    ///
    /// ```
    /// use turing_console_types::ScreenSize;
    ///
    /// assert!(ScreenSize::new(80, 24).fits_layout());
    /// assert!(!ScreenSize::new(10, 24).fits_layout());
    /// assert!(!ScreenSize::new(80, 5).fits_layout());
    /// ```
    pub const fn fits_layout(&self) -> bool {
        self.width >= MIN_SCREEN_SIZE.width && self.height >= MIN_SCREEN_SIZE.height
    }
}

/// Zero-based cell position, column first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    pub column: u16,
    pub row: u16,
}

impl Coordinate {
    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    /// Same row, `dx` columns to the right (saturating).
    pub const fn offset_column(self, dx: u16) -> Self {
        Self {
            column: self.column.saturating_add(dx),
            row: self.row,
        }
    }

    /// Same column, `dy` rows down (saturating).
    pub const fn offset_row(self, dy: u16) -> Self {
        Self {
            column: self.column,
            row: self.row.saturating_add(dy),
        }
    }
}

/// The eight base terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Purple = 5,
    Cyan = 6,
    White = 7,
}

impl Color {
    /// All colors in code order.
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Purple,
        Color::Cyan,
        Color::White,
    ];

    /// Offset added to the SGR base (0-7).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Parse color name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use turing_console_types::Color;
    ///
    /// assert_eq!(Color::from_str("cyan"), Some(Color::Cyan));
    /// assert_eq!(Color::from_str("PURPLE"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("magenta"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("orange"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "purple" | "magenta" => Some(Color::Purple),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Cyan => "cyan",
            Color::White => "white",
        }
    }
}

/// One color selection applied to subsequent writes.
///
/// Never layered: a value is a pure reset or exactly one foreground or
/// background choice. Backends accumulate one foreground and one background
/// until the next `Reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorAttribute {
    #[default]
    Reset,
    Foreground(Color),
    Background(Color),
    BrightForeground(Color),
    BrightBackground(Color),
}

impl ColorAttribute {
    /// SGR parameter for this attribute.
    ///
    /// ```
    /// use turing_console_types::{Color, ColorAttribute};
    ///
    /// assert_eq!(ColorAttribute::Reset.sgr_code(), 0);
    /// assert_eq!(ColorAttribute::Foreground(Color::Black).sgr_code(), 30);
    /// assert_eq!(ColorAttribute::Background(Color::Green).sgr_code(), 42);
    /// assert_eq!(ColorAttribute::BrightForeground(Color::Black).sgr_code(), 90);
    /// assert_eq!(ColorAttribute::BrightBackground(Color::White).sgr_code(), 107);
    /// ```
    pub const fn sgr_code(self) -> u8 {
        match self {
            ColorAttribute::Reset => 0,
            ColorAttribute::Foreground(c) => 30 + c.index(),
            ColorAttribute::Background(c) => 40 + c.index(),
            ColorAttribute::BrightForeground(c) => 90 + c.index(),
            ColorAttribute::BrightBackground(c) => 100 + c.index(),
        }
    }

    pub const fn is_reset(self) -> bool {
        matches!(self, ColorAttribute::Reset)
    }

    /// Parse an attribute name.
    ///
    /// Accepted forms: `reset`, `<color>_fg`, `<color>_bg`, `light_<color>_fg`
    /// and `light_<color>_bg` (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use turing_console_types::{Color, ColorAttribute};
    ///
    /// assert_eq!(ColorAttribute::from_str("reset"), Some(ColorAttribute::Reset));
    /// assert_eq!(
    ///     ColorAttribute::from_str("light_black_fg"),
    ///     Some(ColorAttribute::BrightForeground(Color::Black))
    /// );
    /// assert_eq!(ColorAttribute::from_str("green"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if lower == "reset" {
            return Some(ColorAttribute::Reset);
        }
        let (bright, rest) = match lower.strip_prefix("light_") {
            Some(rest) => (true, rest),
            None => (false, lower.as_str()),
        };
        if let Some(name) = rest.strip_suffix("_fg") {
            let c = Color::from_str(name)?;
            return Some(if bright {
                ColorAttribute::BrightForeground(c)
            } else {
                ColorAttribute::Foreground(c)
            });
        }
        if let Some(name) = rest.strip_suffix("_bg") {
            let c = Color::from_str(name)?;
            return Some(if bright {
                ColorAttribute::BrightBackground(c)
            } else {
                ColorAttribute::Background(c)
            });
        }
        None
    }

    /// Canonical name, the inverse of [`ColorAttribute::from_str`].
    pub fn name(&self) -> String {
        match self {
            ColorAttribute::Reset => "reset".to_string(),
            ColorAttribute::Foreground(c) => format!("{}_fg", c.as_str()),
            ColorAttribute::Background(c) => format!("{}_bg", c.as_str()),
            ColorAttribute::BrightForeground(c) => format!("light_{}_fg", c.as_str()),
            ColorAttribute::BrightBackground(c) => format!("light_{}_bg", c.as_str()),
        }
    }
}

/// Attributes used by the renderers for each visual role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Tape cell under the machine head.
    pub tape_cursor: ColorAttribute,
    /// Code line currently being executed.
    pub current_line: ColorAttribute,
    /// From `;` to the end of the line.
    pub comment: ColorAttribute,
    pub scroller_enabled: ColorAttribute,
    pub scroller_disabled: ColorAttribute,
    /// Foreground of the `<` / `>` arrows.
    pub scroller_glyph: ColorAttribute,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            tape_cursor: ColorAttribute::Background(Color::Cyan),
            current_line: ColorAttribute::Background(Color::Green),
            comment: ColorAttribute::BrightForeground(Color::Black),
            scroller_enabled: ColorAttribute::Background(Color::White),
            scroller_disabled: ColorAttribute::BrightBackground(Color::Black),
            scroller_glyph: ColorAttribute::Foreground(Color::Black),
        }
    }
}
