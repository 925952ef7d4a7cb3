use gdal::GeoTransform;
use ndarray::{Array3, ArrayView2, Axis};
use std::fmt;

/// `bands x height x width` of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub bands: usize,
    pub height: usize,
    pub width: usize,
}

impl Shape {
    pub fn single_band(height: usize, width: usize) -> Self {
        Self {
            bands: 1,
            height,
            width,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.bands, self.height, self.width)
    }
}

/// Georeferencing and dimensions of a raster, without its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geo_transform: GeoTransform,
    pub projection: String,
}

/// A raster fully materialised in memory as a `bands x height x width` array.
#[derive(Debug, Clone)]
pub struct RasterImage<T> {
    pub geo_transform: GeoTransform,
    pub projection: String,
    /// No-data value of the first band, if flagged.
    pub no_data: Option<f64>,
    pub data: Array3<T>,
}

impl<T> RasterImage<T> {
    pub fn band_count(&self) -> usize {
        self.data.dim().0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    pub fn shape(&self) -> Shape {
        let (bands, height, width) = self.data.dim();
        Shape {
            bands,
            height,
            width,
        }
    }

    /// Zero-based band view.
    pub fn band(&self, index: usize) -> ArrayView2<'_, T> {
        self.data.index_axis(Axis(0), index)
    }
}

impl<T: Copy + Into<f64>> fmt::Display for RasterImage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = crate::utils::RasterStats::from_values(self.data.iter().map(|&v| v.into()));

        write!(
            f,
            "Bands: {}\nWidth: {}\nHeight: {}\nMin value: {}\nMax value: {}",
            self.band_count(),
            self.width(),
            self.height(),
            stats.min,
            stats.max,
        )
    }
}
