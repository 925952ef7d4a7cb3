use gdal::cpl::CslStringList;
use gdal::vector::LayerAccess;
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};
use log::{debug, info};
use std::ffi::{CStr, CString, c_int};
use std::path::{Path, PathBuf};

use crate::acquisition::AcquisitionPeriod;
use crate::error::{ModisError, ModisResult};
use crate::extent::Extent;
use crate::inputs::{self, Selection};
use crate::raster;

#[derive(Debug, Clone)]
pub struct ClipJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub boundary_path: PathBuf,
    pub suffix: String,
    /// Written to pixels outside the boundary and flagged as no-data.
    pub nodata: Option<f64>,
    pub period: AcquisitionPeriod,
}

/// Polygon layer used as a cutline. Opened once per batch to fail early on a
/// missing or unreadable boundary.
#[derive(Debug, Clone)]
pub struct VectorBoundary {
    pub path: PathBuf,
    pub extent: Extent,
}

impl VectorBoundary {
    pub fn open(path: &Path) -> ModisResult<Self> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_VECTOR,
            ..Default::default()
        };
        let dataset = Dataset::open_ex(path, options).map_err(|source| ModisError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let layer = dataset.layer(0)?;
        let extent = Extent::from_envelope(&layer.get_extent()?)
            .map_err(|e| ModisError::InvalidData(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            extent,
        })
    }
}

struct WarpAppOptions {
    options: *mut gdal_sys::GDALWarpAppOptions,
}

impl WarpAppOptions {
    fn new(args: &[String]) -> ModisResult<Self> {
        let mut c_args = CslStringList::new();
        for arg in args {
            c_args.add_string(arg)?;
        }

        let options =
            unsafe { gdal_sys::GDALWarpAppOptionsNew(c_args.as_ptr(), std::ptr::null_mut()) };
        if options.is_null() {
            return Err(ModisError::InvalidData(format!(
                "invalid warp arguments: {:?}",
                args
            )));
        }

        Ok(Self { options })
    }
}

impl Drop for WarpAppOptions {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALWarpAppOptionsFree(self.options);
        }
    }
}

fn warp_arguments(boundary: &VectorBoundary, nodata: Option<f64>) -> Vec<String> {
    let mut args = vec![
        "-of".to_string(),
        "GTiff".to_string(),
        "-cutline".to_string(),
        boundary.path.to_string_lossy().into_owned(),
        "-crop_to_cutline".to_string(),
    ];
    if let Some(nodata) = nodata {
        args.push("-dstnodata".to_string());
        args.push(nodata.to_string());
    }
    args
}

fn last_gdal_error() -> String {
    let message = unsafe { CStr::from_ptr(gdal_sys::CPLGetLastErrorMsg()) };
    message.to_string_lossy().into_owned()
}

/// Warps `source` into `output`, cropped to the boundary's extent with
/// exterior pixels masked.
pub fn clip_file(
    source: &Path,
    output: &Path,
    boundary: &VectorBoundary,
    nodata: Option<f64>,
) -> ModisResult<()> {
    let source_dataset = raster::open(source)?;
    let options = WarpAppOptions::new(&warp_arguments(boundary, nodata))?;
    let destination = CString::new(output.to_string_lossy().as_ref())
        .map_err(|_| ModisError::InvalidPath(output.to_path_buf()))?;

    let mut sources = [source_dataset.c_dataset()];
    let mut user_error: c_int = 0;
    let clipped = unsafe {
        gdal_sys::GDALWarp(
            destination.as_ptr(),
            std::ptr::null_mut(),
            1,
            sources.as_mut_ptr(),
            options.options,
            &mut user_error,
        )
    };

    if user_error != 0 {
        return Err(ModisError::write(output, "invalid warp arguments"));
    }
    if clipped.is_null() {
        return Err(ModisError::write(output, last_gdal_error()));
    }

    // Closing the handle flushes the GeoTIFF to disk.
    let clipped = unsafe { Dataset::from_c_dataset(clipped) };
    let (width, height) = clipped.raster_size();
    if let Ok(geo_transform) = clipped.geo_transform() {
        debug!(
            "{}: {}x{} pixels covering {:?}",
            output.display(),
            width,
            height,
            Extent::from_geo_transform(&geo_transform, width, height)
        );
    }

    Ok(())
}

/// Clips every `.tif` of `job.input_dir`. Stops at the first failure.
pub fn run(job: &ClipJob) -> ModisResult<Vec<PathBuf>> {
    let boundary = VectorBoundary::open(&job.boundary_path)?;
    let files = inputs::list_inputs(&job.input_dir, Selection::Extension("tif"), &job.period)?;
    info!(
        "Clipping {} raster(s) in {} to {} ({:?})",
        files.len(),
        job.input_dir.display(),
        boundary.path.display(),
        boundary.extent
    );

    inputs::ensure_output_dir(&job.output_dir)?;
    let mut outputs = Vec::with_capacity(files.len());
    for path in &files {
        let output = inputs::output_path(&job.output_dir, path, &job.suffix)?;
        clip_file(path, &output, &boundary, job.nodata)?;
        info!("{} done", output.display());
        outputs.push(output);
    }

    Ok(outputs)
}
