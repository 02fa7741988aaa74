//! Terminal backend capability layer.
//!
//! The console draws through a small capability set (cursor, attribute,
//! character writes, size, clear, flush) with two implementations behind it:
//! a direct ANSI stream and a curses-style cell buffer. Which one runs is
//! decided at startup, see [`BackendKind::probe`].

pub mod ansi;
pub mod backend;
pub mod buffered;
pub mod error;
pub mod fb;
pub mod pairs;

pub use turing_console_types as types;

pub use ansi::AnsiBackend;
pub use backend::{AnyBackend, Backend, BackendKind, SizeSource};
pub use buffered::{encode_diff_into, encode_full_into, BufferedBackend};
pub use error::BackendError;
pub use fb::{Cell, FrameBuffer};
pub use pairs::{ColorPairs, PairId, Pen, Shade};
