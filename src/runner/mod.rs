//! Task execution engine
//!
//! This module holds the task registry, the execution context, and the
//! seam through which external commands are spawned.

pub mod command;
pub mod context;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use task::*;
