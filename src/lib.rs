//! Podcat - message catalog manager for static site pods
//!
//! Podcat extracts translatable strings from a pod's content, templates and
//! configuration into gettext catalogs, keeps per-locale catalogs in sync with
//! fresh extractions without losing translator work, and compiles them for
//! runtime lookup.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Catalog engine (messages, catalogs, extraction, catalog set)
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
