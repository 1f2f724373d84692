//! Command-line host for skill bars.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
