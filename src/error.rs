//! Error types for the display engine

use thiserror::Error;

/// Result type alias for display operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing, rendering or dispatching frames
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Malformed scene or element data
    #[error("Invalid scene: {0}")]
    SceneError(String),

    /// Failed to render an element
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode a frame for the transport
    #[error("Frame encoding failed: {0}")]
    EncodeError(String),

    /// The transport rejected or failed an operation
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Image bytes could not be decoded
    #[error("Image decode failed: {0}")]
    ImageError(String),

    /// Icon font or metadata could not be loaded
    #[error("Icon assets unavailable: {0}")]
    AssetError(String),

    /// The animation task ended abnormally
    #[error("Animation task failed: {0}")]
    AnimationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_domain() {
        let e = Error::TransportError("link down".into());
        assert_eq!(e.to_string(), "Transport error: link down");
        assert_eq!(Error::Other("plain".into()).to_string(), "plain");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(Error::from(io), Error::Io(_)));
    }
}
