//! Pkgtask - a task runner for releasing a Python package
//!
//! Pkgtask exposes two tasks: `distribute`, which runs the packaging tool to
//! build a source distribution and a universal wheel and upload them, and
//! `build-doc`, a documentation placeholder.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{PkgtaskError, Result};

/// Current version of Pkgtask
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
