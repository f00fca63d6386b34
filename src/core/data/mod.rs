//! Core data types shared by catalogs, extraction and the codecs.
//!
//! - `message`: Message, its key and source locations

pub mod message;

pub use message::{FUZZY_FLAG, Location, Message, MessageKey};
