//! Configuration parsing and validation
//!
//! This module handles the optional pkgtask.yml file: discovery, parsing,
//! validation, and turning it into the child process environment.

pub mod environment;
pub mod interpolate;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use environment::*;
pub use interpolate::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
