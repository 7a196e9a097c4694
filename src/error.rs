//! Error types for map loading
//!
//! Only structural failures surface here. Geometric anomalies (degenerate rings,
//! out-of-range triangle indices) are tolerated at render and query time instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for map loading
pub type Result<T> = std::result::Result<T, LoadError>;

/// Reasons a load call can fail. Any of these leaves the engine empty.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file could not be read
    #[error("failed to read map definition {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid GeoJSON document
    #[error("parse error: {0}")]
    Parse(String),

    /// An accepted feature is missing the data needed to build its geometry
    #[error("invalid feature #{index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl LoadError {
    pub(crate) fn invalid_feature(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            index,
            reason: reason.into(),
        }
    }

    /// True for the parse class of failures (as opposed to I/O)
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::InvalidFeature { .. })
    }
}

impl From<simd_json::Error> for LoadError {
    fn from(err: simd_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let io = LoadError::Io {
            path: PathBuf::from("missing.geojson"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!io.is_parse());
        assert!(io.to_string().contains("missing.geojson"));

        assert!(LoadError::Parse("bad".into()).is_parse());
        let invalid = LoadError::invalid_feature(3, "missing geometry");
        assert!(invalid.is_parse());
        assert_eq!(invalid.to_string(), "invalid feature #3: missing geometry");
    }
}
