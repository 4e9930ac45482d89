//! Error types for sequence generation, configuration and plot output.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("invalid bound {bound}: expected an integer between 3 and {max}", max = u32::MAX)]
    InvalidBound { bound: i64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read or write config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color {0:?}: expected #RRGGBB")]
    Color(String),

    #[error(transparent)]
    Bound(#[from] SequenceError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("canvas of {width}x{height} does not fit an image buffer")]
    CanvasSize { width: usize, height: usize },
}
