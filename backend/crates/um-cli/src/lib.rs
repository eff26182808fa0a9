//! um-cli library
//!
//! Argument parsing, command execution and logger setup for the `um` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;


pub use cli::Cli;
pub use commands::{Commands, execute};
pub use error::{CliError, Result};
