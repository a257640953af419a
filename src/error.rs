use thiserror::Error;

/// Errors raised while loading pages and sessions from outside the controller.
///
/// The controller itself never fails: missing elements turn operations into
/// no-ops instead.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("no element matches '{0}'")]
    UnknownTarget(String),
}

pub type PageResult<T> = Result<T, PageError>;
