//! Command-line interface
//!
//! Argument definitions and command handlers for the `loadmap` binary.

pub mod args;
pub mod commands;
