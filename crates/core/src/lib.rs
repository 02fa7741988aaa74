//! Turing-machine visualizer display core.
//!
//! Renders a one-row tape with a highlighted head, the program listing with a
//! highlighted current line, and two scroller indicators. All drawing goes
//! through [`term::Backend`], so the same renderers run on the direct ANSI
//! stream and on the cell-buffer backend.
//!
//! Everything is synchronous and single-threaded: each call finishes its
//! writes (and flush) before returning.

pub mod code;
pub mod console;
pub mod error;
pub mod layout;
pub mod scroller;
pub mod source;
pub mod tape;

pub use turing_console_term as term;
pub use turing_console_types as types;

pub use code::CodeRenderer;
pub use console::TuringConsole;
pub use error::{ConsoleError, ErrorReport, LayoutError};
pub use layout::Layout;
pub use source::SourceStream;
pub use tape::TapeRenderer;
