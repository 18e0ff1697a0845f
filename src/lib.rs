//! cmdtree: filesystem-driven command trees
//!
//! Resolves leading argv tokens against a directory of command modules,
//! binds the remaining tokens to the resolved command's declared
//! parameters and options, and dispatches the call.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
