//! Error types for store, export and configuration operations.

use crate::id::AnnotationId;
use thiserror::Error;

/// Errors returned by the annotation store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Annotations must carry a visible title.
    #[error("Please enter a title")]
    EmptyTitle,

    /// No annotation with this id is stored.
    #[error("Annotation not found: {0}")]
    NotFound(AnnotationId),
}

/// Errors produced while serializing or parsing GeoJSON.
#[derive(Error, Debug)]
pub enum ExportError {
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input is not valid GeoJSON
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Valid GeoJSON, but not a FeatureCollection
    #[error("Expected a FeatureCollection, found {found}")]
    NotFeatureCollection {
        /// Top-level GeoJSON object type that was found
        found: &'static str,
    },
}

/// Errors produced while loading widget configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is out of range
    #[error("Invalid config value for '{field}': {message}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Why it was rejected
        message: String,
    },
}
