//! Command line interface

/// Subcommands and their handlers
pub mod commands;
