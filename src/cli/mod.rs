//! Command-line interface
//!
//! Argument parsing lives in [`args`]; each subcommand has a handler in
//! [`commands`].

pub mod args;
pub mod commands;
