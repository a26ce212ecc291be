use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong between reading an image and writing a theme.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image at {source_name} does not have enough variation to support a {requested} color palette")]
    InsufficientVariation {
        source_name: String,
        requested: usize,
    },

    #[error("palette size must be between 2 and {max}, got {requested}")]
    InvalidColorCount { requested: usize, max: usize },

    #[error("cannot split colors into dark and light sets (dark: {dark}, light: {light})")]
    EmptyPartition { dark: usize, light: usize },

    #[error("invalid hex color {value:?}: {reason}")]
    InvalidHex { value: String, reason: String },

    #[error("invalid theme name {name:?}: must be a plain file name")]
    InvalidThemeName { name: String },

    #[error("theme entry {key:?} must be a finite number, got {value}")]
    NonFiniteNumber { key: String, value: f64 },

    #[error("no saved theme named {name:?} in {}", dir.display())]
    UnknownTheme { name: String, dir: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed theme json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_hex(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHex {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
