//! Catalog engine.
//!
//! - `data`: the message value type
//! - `catalog`: one catalog and its merge rules
//! - `extract`: walking the pod into scratch catalogs
//! - `catalogs`: the catalog set under `/translations/`
//! - `parsers`: persisted (PO) and compiled (MO) forms
//! - `content`, `pod`: the pod's files and content tree

pub mod catalog;
pub mod catalogs;
pub mod content;
pub mod context;
pub mod data;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod parsers;
pub mod pod;
pub mod translations;
pub mod utils;

pub use catalog::{Catalog, UpdateOptions, UpdateStats};
pub use catalogs::{CatalogSet, CompileReport, FilterOptions, LocaleStats};
pub use context::CatalogContext;
pub use data::{Location, Message, MessageKey};
pub use error::CatalogError;
pub use extract::{ExtractOptions, ExtractReport, SavedCatalog};
pub use pod::Pod;
pub use translations::Translations;
