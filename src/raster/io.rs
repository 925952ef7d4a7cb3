use gdal::raster::{Buffer, GdalType};
use gdal::{Dataset, DriverManager, GeoTransform};
use log::debug;
use ndarray::{Array3, ArrayBase, Axis, Data, Dimension};
use std::path::Path;

use super::{OutputPixel, RasterImage, RasterMetadata};
use crate::error::{ModisError, ModisResult};

/// GDAL's georeferencing for a raster without a geotransform.
const IDENTITY_GEO_TRANSFORM: GeoTransform = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

pub fn open<P: AsRef<Path>>(path: P) -> ModisResult<Dataset> {
    let path = path.as_ref();
    Dataset::open(path).map_err(|source| ModisError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every band of the raster at `path` into memory.
pub fn read<T, P>(path: P) -> ModisResult<RasterImage<T>>
where
    T: GdalType + Copy,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let dataset = open(path)?;
    read_dataset(&dataset, path)
}

pub fn read_dataset<T: GdalType + Copy>(
    dataset: &Dataset,
    path: &Path,
) -> ModisResult<RasterImage<T>> {
    let (width, height) = dataset.raster_size();
    let band_count = dataset.raster_count();

    let mut values: Vec<T> = Vec::with_capacity(band_count * width * height);
    let mut no_data = None;
    for index in 1..=band_count {
        let band = dataset.rasterband(index)?;
        if index == 1 {
            no_data = band.no_data_value();
        }
        let buffer = band.read_as::<T>((0, 0), (width, height), (width, height), None)?;
        values.extend_from_slice(buffer.data());
    }

    let data = Array3::from_shape_vec((band_count, height, width), values)
        .map_err(|e| ModisError::InvalidData(format!("{}: {}", path.display(), e)))?;

    debug!(
        "Read {} band(s) of {}x{} from {}",
        band_count,
        width,
        height,
        path.display()
    );

    Ok(RasterImage {
        geo_transform: geo_transform_or_identity(dataset, path),
        projection: dataset.projection(),
        no_data,
        data,
    })
}

/// Georeferencing and dimensions only; pixels are not read.
pub fn read_metadata<P: AsRef<Path>>(path: P) -> ModisResult<RasterMetadata> {
    let path = path.as_ref();
    let dataset = open(path)?;
    let (width, height) = dataset.raster_size();

    Ok(RasterMetadata {
        width,
        height,
        band_count: dataset.raster_count(),
        geo_transform: geo_transform_or_identity(&dataset, path),
        projection: dataset.projection(),
    })
}

fn geo_transform_or_identity(dataset: &Dataset, path: &Path) -> GeoTransform {
    dataset.geo_transform().unwrap_or_else(|_| {
        debug!("{} has no geotransform, using identity", path.display());
        IDENTITY_GEO_TRANSFORM
    })
}

/// Writes `data` as a GeoTIFF at `path`, replacing any existing file.
///
/// A 2-D array is written as a single band, a 3-D array as `shape[0]`
/// bands. The stored pixel type follows [`OutputPixel`].
pub fn write<T, S, D, P>(
    path: P,
    projection: &str,
    geo_transform: &GeoTransform,
    data: &ArrayBase<S, D>,
) -> ModisResult<()>
where
    T: OutputPixel,
    S: Data<Elem = T>,
    D: Dimension,
    P: AsRef<Path>,
{
    write_with_no_data(path, projection, geo_transform, data, None)
}

/// Same as [`write`], flagging `no_data` on every band when given.
pub fn write_with_no_data<T, S, D, P>(
    path: P,
    projection: &str,
    geo_transform: &GeoTransform,
    data: &ArrayBase<S, D>,
    no_data: Option<f64>,
) -> ModisResult<()>
where
    T: OutputPixel,
    S: Data<Elem = T>,
    D: Dimension,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data = data.view().into_dyn();

    let (bands, height, width) = match *data.shape() {
        [height, width] => (1, height, width),
        [bands, height, width] => (bands, height, width),
        ref other => {
            return Err(ModisError::write(
                path,
                format!("expected a 2-D or 3-D array, got shape {:?}", other),
            ));
        }
    };
    if bands == 0 || height == 0 || width == 0 {
        return Err(ModisError::write(
            path,
            format!("cannot write an empty raster ({bands}x{height}x{width})"),
        ));
    }

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dataset = driver
        .create_with_band_type::<T::Stored, _>(path, width, height, bands)
        .map_err(|e| ModisError::write(path, e))?;

    dataset
        .set_geo_transform(geo_transform)
        .map_err(|e| ModisError::write(path, e))?;
    if !projection.is_empty() {
        dataset
            .set_projection(projection)
            .map_err(|e| ModisError::write(path, e))?;
    }

    for index in 0..bands {
        let plane = if data.ndim() == 2 {
            data.view()
        } else {
            data.index_axis(Axis(0), index)
        };
        let values: Vec<T::Stored> = plane.iter().map(|v| v.to_stored()).collect();
        let mut buffer = Buffer::new((width, height), values);

        let mut band = dataset
            .rasterband(index + 1)
            .map_err(|e| ModisError::write(path, e))?;
        if no_data.is_some() {
            band.set_no_data_value(no_data)
                .map_err(|e| ModisError::write(path, e))?;
        }
        band.write((0, 0), (width, height), &mut buffer)
            .map_err(|e| ModisError::write(path, e))?;
    }

    debug!(
        "Wrote {} band(s) of {}x{} to {}",
        bands,
        width,
        height,
        path.display()
    );

    Ok(())
}
