//! Command-line interface
//!
//! Argument definitions live in [`args`]; one handler per subcommand in
//! [`commands`].

pub mod args;
pub mod commands;
