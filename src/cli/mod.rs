//! Command-line interface

pub mod commands;

pub use commands::{cmd_digest, cmd_info, cmd_sign, CliResult};
