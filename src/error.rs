//! Error types for the card pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing or exporting a card
#[derive(Error, Debug)]
pub enum Error {
    /// Out-of-domain preset key or invalid render option
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Author icon could not be fetched or decoded
    #[error("Image resolution failed: {0}")]
    ImageResolutionError(String),

    /// Rendering, encoding or delivery of the raster failed
    #[error("Rasterization failed: {0}")]
    RasterizationError(String),

    /// Font file could not be read or parsed
    #[error("Font error: {0}")]
    FontError(String),

    /// An export is already running on this controller
    #[error("An export is already in progress")]
    AlreadyInProgress,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error should be shown to the user as an export failure.
    ///
    /// Everything else is either absorbed with a fallback or ignored.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::RasterizationError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rasterization_failures_are_user_facing() {
        assert!(Error::RasterizationError("encode".into()).is_user_facing());
        assert!(!Error::AlreadyInProgress.is_user_facing());
        assert!(!Error::ImageResolutionError("404".into()).is_user_facing());
        assert!(!Error::ConfigError("bad key".into()).is_user_facing());
    }
}
