use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {which} size {width}x{height}")]
    InvalidSize {
        which: &'static str,
        width: f64,
        height: f64,
    },
    #[error("parameter '{0}' must be finite")]
    NonFinite(&'static str),
    #[error("coordinate ({x}, {y}) is out of bounds")]
    OutOfBounds { x: f64, y: f64 },
    #[error("room '{0}' not found")]
    UnknownRoom(String),
    #[error("floor '{0}' not found")]
    UnknownFloor(String),
    #[error("room '{0}' appears twice on one floor")]
    DuplicateRoom(String),
    #[error("captured point {0} not found")]
    UnknownPoint(u32),
    #[error("a name is required")]
    EmptyName,
    #[error("selection mode is off")]
    NotSelecting,
    #[error("nothing to export")]
    NothingToExport,
    #[error("{what} limit exceeded ({got} > {max})")]
    LimitExceeded {
        what: &'static str,
        max: usize,
        got: usize,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{backend} backend failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
    #[error("every counter backend failed")]
    AllBackendsFailed,
}

impl Error {
    /// Stable identifier surfaced to JS callers in result envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidSize { .. } => "invalid_size",
            Error::NonFinite(_) => "non_finite",
            Error::OutOfBounds { .. } => "out_of_bounds",
            Error::UnknownRoom(_) => "unknown_room",
            Error::UnknownFloor(_) => "unknown_floor",
            Error::DuplicateRoom(_) => "duplicate_room",
            Error::UnknownPoint(_) => "invalid_id",
            Error::EmptyName => "empty_name",
            Error::NotSelecting => "not_selecting",
            Error::NothingToExport => "nothing_to_export",
            Error::LimitExceeded { .. } => "limit_exceeded",
            Error::Json(_) => "invalid_json",
            Error::Backend { .. } => "backend_failed",
            Error::AllBackendsFailed => "all_backends_failed",
        }
    }

    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Error::Backend {
            backend,
            message: message.into(),
        }
    }
}
