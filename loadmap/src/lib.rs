//! `loadmap` - Module loader package maps
//!
//! This library loads, validates and registers the configuration table a
//! module loader consumes (option flags, path rules, package aliases and
//! scoped overrides), and ships a reference resolver that applies the
//! table to bare identifiers.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod registry;
pub mod resolver;
