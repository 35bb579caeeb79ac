//! `loadmap` Core - configuration table types
//!
//! This crate provides the typed configuration table handed to a module
//! loader (options, path rules, package aliases, scoped overrides) together
//! with the error types shared by the `loadmap` loader and CLI.

pub mod config;
pub mod error;
