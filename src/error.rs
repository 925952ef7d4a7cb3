use std::path::PathBuf;

use gdal::errors::GdalError;

use crate::raster::Shape;

/// Errors raised while extracting, clipping or aggregating rasters.
#[derive(Debug, thiserror::Error)]
pub enum ModisError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: GdalError,
    },

    #[error(
        "{}: subdataset index {index} is not available ({available} subdatasets found)",
        .path.display()
    )]
    Subdataset {
        path: PathBuf,
        index: usize,
        available: usize,
    },

    #[error("{}: raster shape {found} does not match reference shape {expected}", .path.display())]
    ShapeMismatch {
        path: PathBuf,
        expected: Shape,
        found: Shape,
    },

    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("no input rasters found in {}", .dir.display())]
    NoInputs { dir: PathBuf },

    #[error("failed to list {}: {source}", .dir.display())]
    Listing {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("invalid raster data: {0}")]
    InvalidData(String),

    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalError),
}

pub type ModisResult<T> = Result<T, ModisError>;

impl ModisError {
    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ModisError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
