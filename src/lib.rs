//! Turing console (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof:
//! `turing_console::{types, term, core, config}`.

pub use turing_console_config as config;
pub use turing_console_core as core;
pub use turing_console_term as term;
pub use turing_console_types as types;
