use log::info;
use ndarray::{Array2, Array3, Axis};
use std::path::PathBuf;

use crate::acquisition::{self, AcquisitionPeriod};
use crate::error::{ModisError, ModisResult};
use crate::inputs::{self, Selection};
use crate::raster::{self, Shape};
use crate::utils::RasterStats;

#[derive(Debug, Clone)]
pub struct AggregateJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reference_raster: PathBuf,
    /// Output file name; defaults to `<reference stem><suffix>.tif`.
    pub output_name: Option<String>,
    pub suffix: String,
    pub period: AcquisitionPeriod,
}

impl AggregateJob {
    pub fn output_path(&self) -> ModisResult<PathBuf> {
        match &self.output_name {
            Some(name) => Ok(self.output_dir.join(name)),
            None => inputs::output_path(&self.output_dir, &self.reference_raster, &self.suffix),
        }
    }
}

/// Rasters stacked along axis 0. Pixels flagged as no-data in their source
/// are stored as NaN.
#[derive(Debug, Clone)]
pub struct RasterStack {
    pub values: Array3<f64>,
    /// No-data value of the first flagged input, reused for the output.
    pub no_data: Option<f64>,
}

/// Reads each raster into its own slot of a `(files, height, width)` stack.
///
/// Every raster must be single-band and exactly `height x width`.
pub fn stack(files: &[PathBuf], height: usize, width: usize) -> ModisResult<RasterStack> {
    let expected = Shape::single_band(height, width);
    let mut values = Array3::<f64>::zeros((files.len(), height, width));
    let mut no_data = None;

    for (slot, path) in files.iter().enumerate() {
        let image = raster::read::<f64, _>(path)?;
        if image.shape() != expected {
            return Err(ModisError::ShapeMismatch {
                path: path.clone(),
                expected,
                found: image.shape(),
            });
        }

        let mut plane = values.index_axis_mut(Axis(0), slot);
        plane.assign(&image.band(0));
        if let Some(value) = image.no_data {
            plane.mapv_inplace(|v| if v == value { f64::NAN } else { v });
            no_data.get_or_insert(value);
        }
    }

    Ok(RasterStack { values, no_data })
}

/// Per-pixel sum over the file axis, skipping NaN. A pixel that is NaN in
/// every slot stays NaN.
pub fn sum_stack(stack: &Array3<f64>) -> Array2<f64> {
    stack.map_axis(Axis(0), |pixel| {
        pixel
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |total, &v| Some(total.unwrap_or(0.0) + v))
            .unwrap_or(f64::NAN)
    })
}

fn log_period(files: &[PathBuf]) {
    let mut dates = files.iter().filter_map(|p| acquisition::acquisition_date(p));
    let Some(first) = dates.next() else {
        return;
    };
    let (first, last) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    info!("Acquisitions span {} to {}", first, last);
}

/// Sums every `.tif` of `job.input_dir` into one raster georeferenced like
/// the reference raster.
pub fn run(job: &AggregateJob) -> ModisResult<PathBuf> {
    let reference = raster::read_metadata(&job.reference_raster)?;
    let files = inputs::list_inputs(&job.input_dir, Selection::Extension("tif"), &job.period)?;
    if files.is_empty() {
        return Err(ModisError::NoInputs {
            dir: job.input_dir.clone(),
        });
    }

    info!(
        "Summing {} raster(s) of {}x{} from {}",
        files.len(),
        reference.width,
        reference.height,
        job.input_dir.display()
    );
    log_period(&files);

    let stacked = stack(&files, reference.height, reference.width)?;
    let mut total = sum_stack(&stacked.values);
    let stats = RasterStats::from_values(total.iter().copied());
    if let Some(no_data) = stacked.no_data {
        total.mapv_inplace(|v| if v.is_nan() { no_data } else { v });
    }

    inputs::ensure_output_dir(&job.output_dir)?;
    let output = job.output_path()?;
    raster::write_with_no_data(
        &output,
        &reference.projection,
        &reference.geo_transform,
        &total,
        stacked.no_data,
    )?;

    stats.log(&output.display().to_string());
    Ok(output)
}
