//! Error types for the snippet pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for snippet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a snippet card
///
/// Theme, configuration and highlighting failures are absorbed by the
/// component that hits them (logged, then replaced by a fallback value).
/// Session, element and measurement failures abort the current render.
#[derive(Error, Debug)]
pub enum Error {
    /// No editor context (selection source) was available
    #[error("No active editor context: nothing to render")]
    NoActiveContext,

    /// The selection was empty after trimming
    #[error("Please select some code first")]
    EmptySelection,

    /// No project root to write output into
    #[error("No workspace folder found at {0}")]
    NoWorkspace(PathBuf),

    /// A single theme definition could not be read or parsed
    #[error("Failed to load theme '{key}': {reason}")]
    ThemeLoadFailure { key: String, reason: String },

    /// The project configuration could not be read or parsed
    #[error("Failed to load configuration {path}: {reason}")]
    ConfigLoadFailure { path: PathBuf, reason: String },

    /// The highlighting engine rejected the input
    #[error("Highlighting failed: {0}")]
    HighlightFailure(String),

    /// The content element was not present in the rendered document
    #[error("Could not find element '{0}'")]
    ElementNotFound(String),

    /// The content element's bounding box could not be measured
    #[error("Could not measure element: {0}")]
    MeasurementFailed(String),

    /// The rendering session failed to start or a browser command failed
    #[error("Render session failed: {0}")]
    RenderSessionFailure(String),

    /// Output directory or file write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts the current invocation.
    ///
    /// Non-fatal kinds are only ever logged; they are exposed so callers can
    /// report them uniformly.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::ThemeLoadFailure { .. } | Error::ConfigLoadFailure { .. } | Error::HighlightFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorbed_failures_are_not_fatal() {
        let theme = Error::ThemeLoadFailure { key: "nord".into(), reason: "missing".into() };
        assert!(!theme.is_fatal());
        assert!(!Error::HighlightFailure("bad grammar".into()).is_fatal());
        assert!(Error::ElementNotFound(".code-container".into()).is_fatal());
        assert!(Error::EmptySelection.is_fatal());
    }

    #[test]
    fn messages_name_the_failing_piece() {
        let err = Error::ElementNotFound(".code-container".into());
        assert_eq!(err.to_string(), "Could not find element '.code-container'");
    }
}
