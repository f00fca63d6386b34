use std::io;

use thiserror::Error;

/// Errors raised by catalog, extraction and compilation operations.
///
/// Missing catalogs and missing compiled artifacts are not errors: lookups
/// fall back to the identity translator instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The caller supplied an inconsistent set of options.
    #[error("{0}")]
    Usage(String),

    /// A persisted catalog could not be parsed.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    /// A template body could not be tokenized during extraction.
    #[error("Problem extracting body: {path}:{line}: {message}")]
    Extraction {
        path: String,
        line: usize,
        message: String,
    },

    /// A catalog could not be compiled into its binary lookup form.
    #[error("Failed to compile {path}: {source}")]
    Compile {
        path: String,
        #[source]
        source: Box<CatalogError>,
    },

    /// A compiled artifact is truncated or carries an unknown magic number.
    #[error("Invalid compiled catalog: {message}")]
    InvalidMo { message: String },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl CatalogError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn parse(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn compile(path: impl Into<String>, source: CatalogError) -> Self {
        Self::Compile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_location() {
        let err = CatalogError::parse("/translations/de/LC_MESSAGES/messages.po", 7, "bad");
        assert_eq!(
            err.to_string(),
            "/translations/de/LC_MESSAGES/messages.po:7: bad"
        );
    }

    #[test]
    fn test_compile_error_keeps_source() {
        let inner = CatalogError::parse("a.po", 3, "unterminated string");
        let err = CatalogError::compile("a.po", inner);
        assert!(err.to_string().contains("Failed to compile a.po"));
        assert!(matches!(
            err,
            CatalogError::Compile { ref source, .. } if matches!(**source, CatalogError::Parse { line: 3, .. })
        ));
    }
}
