//! Utility helpers for the core catalog engine.
//!
//! - `path_filter`: literal / glob matching of pod paths

pub mod path_filter;

pub use path_filter::PathFilter;
