use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Landmark {index} out of range for a detection of {len} points")]
    LandmarkOutOfRange { index: usize, len: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Shape comparison needs at least {required} shared anchors, found {found}")]
    InsufficientAnchors { found: usize, required: usize },

    #[error("Alignment failed: {0}")]
    Alignment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
