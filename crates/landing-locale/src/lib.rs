//! Command-line front end for landing-site locale resolution.

pub mod commands;

pub use commands::{Cli, Command, execute, load_config};
