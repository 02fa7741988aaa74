//! Color-pair registry for the cell-buffer backend.
//!
//! Curses-style terminals cannot take a color directly: each foreground +
//! background combination has to be registered as a numbered pair before the
//! first write that uses it. Pair 0 is the terminal default.

use std::collections::HashMap;

use crate::types::{Color, ColorAttribute};

/// A base color, optionally in its bright variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shade {
    pub color: Color,
    pub bright: bool,
}

impl Shade {
    pub const fn normal(color: Color) -> Self {
        Self {
            color,
            bright: false,
        }
    }

    pub const fn bright(color: Color) -> Self {
        Self {
            color,
            bright: true,
        }
    }

    /// All 16 shades, normal first.
    pub fn all() -> impl Iterator<Item = Shade> {
        Color::ALL
            .into_iter()
            .map(Shade::normal)
            .chain(Color::ALL.into_iter().map(Shade::bright))
    }
}

/// Accumulated foreground/background state. `None` means terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pen {
    pub fg: Option<Shade>,
    pub bg: Option<Shade>,
}

impl Pen {
    /// Fold one attribute into the pen.
    pub fn apply(&mut self, attr: ColorAttribute) {
        match attr {
            ColorAttribute::Reset => *self = Pen::default(),
            ColorAttribute::Foreground(c) => self.fg = Some(Shade::normal(c)),
            ColorAttribute::Background(c) => self.bg = Some(Shade::normal(c)),
            ColorAttribute::BrightForeground(c) => self.fg = Some(Shade::bright(c)),
            ColorAttribute::BrightBackground(c) => self.bg = Some(Shade::bright(c)),
        }
    }

    /// Pen obtained by applying `attrs` in order to the default pen.
    pub fn from_attributes(attrs: &[ColorAttribute]) -> Self {
        let mut pen = Pen::default();
        for &a in attrs {
            pen.apply(a);
        }
        pen
    }

    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none()
    }
}

pub type PairId = u16;

/// Numbered pens, registered once and looked up on every write.
#[derive(Debug, Clone)]
pub struct ColorPairs {
    pens: Vec<Pen>,
    index: HashMap<Pen, PairId>,
}

impl Default for ColorPairs {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPairs {
    /// Registry holding only the default pair 0.
    pub fn new() -> Self {
        let mut pairs = Self {
            pens: Vec::new(),
            index: HashMap::new(),
        };
        pairs.register(Pen::default());
        pairs
    }

    /// Register `pen` and return its pair number. Registering twice returns
    /// the existing number.
    pub fn register(&mut self, pen: Pen) -> PairId {
        if let Some(&id) = self.index.get(&pen) {
            return id;
        }
        let id = self.pens.len() as PairId;
        self.pens.push(pen);
        self.index.insert(pen, id);
        id
    }

    /// Register every fg/bg combination of {default, 16 shades}.
    pub fn register_all(&mut self) {
        let choices: Vec<Option<Shade>> = std::iter::once(None)
            .chain(Shade::all().map(Some))
            .collect();
        for &fg in &choices {
            for &bg in &choices {
                self.register(Pen { fg, bg });
            }
        }
    }

    pub fn lookup(&self, pen: Pen) -> Option<PairId> {
        self.index.get(&pen).copied()
    }

    pub fn pen(&self, id: PairId) -> Option<Pen> {
        self.pens.get(id as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.pens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pens.is_empty()
    }
}
