//! Error types for the annotation layout engine

use thiserror::Error;

/// Result type alias for annotator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating input or composing a screenshot
#[derive(Error, Debug)]
pub enum Error {
    /// A label violates the routing contract (e.g. parallel directions)
    #[error("Invalid label '{id}': {reason}")]
    InvalidLabel { id: String, reason: String },

    /// Point coordinates outside of the image box
    #[error("Invalid point ({x}, {y}): coordinates must be percentages in [0, 100]")]
    InvalidPoint { x: f64, y: f64 },

    /// Two labels or features share the same identifier
    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    /// Invalid layout configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to produce render output
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Malformed annotation document
    #[error("Failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Page URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
