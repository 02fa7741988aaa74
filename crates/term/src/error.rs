//! Errors raised by the terminal backends.

use std::io;

use thiserror::Error;

use crate::pairs::Pen;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal size unavailable: {0}")]
    SizeUnavailable(#[source] io::Error),
    #[error("backend used before init()")]
    NotInitialized,
    #[error("no color pair registered for {0:?}")]
    UnregisteredPair(Pen),
}

pub type Result<T> = std::result::Result<T, BackendError>;
