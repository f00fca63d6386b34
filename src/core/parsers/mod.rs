//! Serialization boundaries for catalogs.
//!
//! - `po`: line-oriented persisted form (read/write)
//! - `mo`: compiled binary lookup form (read/write)

pub mod mo;
pub mod po;
