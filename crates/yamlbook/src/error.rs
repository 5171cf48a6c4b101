//! Error types for yamlbook

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a conversion.
///
/// A conversion that fails leaves whatever it had written in an undefined
/// state; callers should discard the partial workbook.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid settings, or a schema-driven conversion without a schema
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The JSON schema text could not be parsed
    #[error("Malformed schema: {0}")]
    MalformedSchema(#[source] serde_json::Error),

    /// The YAML text could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The workbook layer rejected an operation
    #[error("Workbook error while {context}: {source}")]
    Grid {
        /// What the conversion was doing
        context: String,
        /// The underlying workbook error
        #[source]
        source: yamlbook_grid::Error,
    },

    /// I/O error while reading input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error with a message
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }
}

/// Attach context to workbook-layer results
pub(crate) trait GridContext<T> {
    fn grid_context<F, S>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> GridContext<T> for yamlbook_grid::Result<T> {
    fn grid_context<F, S>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| Error::Grid {
            context: context().into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_context() {
        let failed: yamlbook_grid::Result<()> =
            Err(yamlbook_grid::Error::SheetNotFound("Sheet9".into()));
        let err = failed.grid_context(|| "writing row 3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Workbook error while writing row 3: Sheet not found: Sheet9"
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = Error::configuration("no schema");
        assert_eq!(err.to_string(), "Configuration error: no schema");
    }
}
