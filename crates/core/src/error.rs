//! Console error taxonomy.

use std::io;

use thiserror::Error;

use crate::term::BackendError;
use crate::types::ScreenSize;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("terminal is {}x{}, layout needs at least {}x{}", size.width, size.height, min.width, min.height)]
    TooSmall { size: ScreenSize, min: ScreenSize },
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("source stream is not open")]
    StreamUnavailable,
    #[error("line {requested} is not in the source ({line_count} lines)")]
    LineOutOfRange { requested: usize, line_count: usize },
    #[error("tape of {len} cells exceeds the {width}-cell viewport")]
    TapeExceedsViewport { len: usize, width: u16 },
    #[error("tape position {position} is outside a tape of {len} cells")]
    CursorOutOfRange { position: usize, len: usize },
    #[error("reading source failed: {0}")]
    Read(#[source] io::Error),
}

/// Message pushed onto the console's error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub operation: &'static str,
    pub message: String,
}
