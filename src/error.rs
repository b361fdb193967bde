//! Error type shared by the configuration and export layers.
//!
//! Generation itself is infallible: bad numeric input is clamped, flat
//! fields and uncovered thresholds have documented fallbacks.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// Reading or writing a file failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A region file was not valid JSON or had the wrong shape.
    #[error("failed to parse regions from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Image encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A threshold table had no entries.
    #[error("threshold table `{0}` is empty")]
    EmptyTable(String),

    /// A threshold bound was NaN or infinite.
    #[error("threshold table `{table}` has a non-finite bound for `{name}`")]
    NonFiniteBound { table: String, name: String },

    /// The rendered image would not fit in `u32` pixel dimensions.
    #[error("a {width}x{height} grid at {cell_size} px per tile is too large to render")]
    ImageTooLarge {
        width: usize,
        height: usize,
        cell_size: u32,
    },

    /// More distinct tile names than a `TileId` can address.
    #[error("too many distinct tiles ({0}), the palette holds at most 65535")]
    PaletteFull(usize),
}

impl GenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
