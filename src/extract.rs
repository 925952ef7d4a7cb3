use gdal::{Dataset, Metadata};
use log::{debug, info};
use ndarray::{ArrayBase, DataMut, Dimension};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::acquisition::AcquisitionPeriod;
use crate::error::{ModisError, ModisResult};
use crate::inputs::{self, Selection};
use crate::raster::{self, RasterMetadata};

/// Stored values outside `[min, max]` are fill/sentinel values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ValidRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ValidRange {
    fn default() -> Self {
        Self {
            min: -32761.0,
            max: 32761.0,
        }
    }
}

impl ValidRange {
    pub fn excludes(&self, value: f32) -> bool {
        value < self.min || value > self.max
    }
}

#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reference_raster: PathBuf,
    /// Zero-based position in the container's subdataset list.
    pub subdataset_index: usize,
    pub scale_factor: f32,
    pub valid_range: ValidRange,
    pub suffix: String,
    pub period: AcquisitionPeriod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subdataset {
    pub name: String,
    pub description: String,
}

/// Subdatasets of a container in GDAL's numbering order.
pub fn subdatasets(dataset: &Dataset) -> Vec<Subdataset> {
    dataset
        .metadata_domain("SUBDATASETS")
        .map(|entries| parse_subdatasets(&entries))
        .unwrap_or_default()
}

/// Parses `SUBDATASET_<n>_NAME=` / `SUBDATASET_<n>_DESC=` metadata entries.
/// Entries with a malformed key or without a name are ignored.
pub fn parse_subdatasets<S: AsRef<str>>(entries: &[S]) -> Vec<Subdataset> {
    let mut by_index: BTreeMap<usize, (Option<String>, String)> = BTreeMap::new();

    for entry in entries {
        let Some((key, value)) = entry.as_ref().split_once('=') else {
            continue;
        };
        let Some(rest) = key.strip_prefix("SUBDATASET_") else {
            continue;
        };
        let Some((index, kind)) = rest.split_once('_') else {
            continue;
        };
        let Ok(index) = index.parse::<usize>() else {
            continue;
        };

        let slot = by_index.entry(index).or_default();
        match kind {
            "NAME" => slot.0 = Some(value.to_string()),
            "DESC" => slot.1 = value.to_string(),
            _ => {}
        }
    }

    by_index
        .into_values()
        .filter_map(|(name, description)| name.map(|name| Subdataset { name, description }))
        .collect()
}

pub fn select_subdataset(path: &Path, dataset: &Dataset, index: usize) -> ModisResult<Subdataset> {
    let mut available = subdatasets(dataset);
    let count = available.len();

    if index >= count {
        return Err(ModisError::Subdataset {
            path: path.to_path_buf(),
            index,
            available: count,
        });
    }

    Ok(available.swap_remove(index))
}

/// Zeroes values outside `range`, then multiplies by `scale_factor`.
pub fn mask_and_scale<S, D>(data: &mut ArrayBase<S, D>, range: &ValidRange, scale_factor: f32)
where
    S: DataMut<Elem = f32>,
    D: Dimension,
{
    data.mapv_inplace(|value| {
        if range.excludes(value) {
            0.0
        } else {
            value * scale_factor
        }
    });
}

/// Reads one subdataset (or any GDAL raster name), masks and scales it, and
/// writes it with the reference raster's georeferencing.
pub fn convert_subdataset(
    source: &str,
    output: &Path,
    job: &ExtractJob,
    reference: &RasterMetadata,
) -> ModisResult<()> {
    let mut image = raster::read::<f32, _>(source)?;
    mask_and_scale(&mut image.data, &job.valid_range, job.scale_factor);
    debug!("{} after masking and scaling:\n{}", source, image);

    raster::write(
        output,
        &reference.projection,
        &reference.geo_transform,
        &image.data,
    )
}

pub fn extract_file(
    path: &Path,
    job: &ExtractJob,
    reference: &RasterMetadata,
) -> ModisResult<PathBuf> {
    let container = raster::open(path)?;
    let subdataset = select_subdataset(path, &container, job.subdataset_index)?;
    debug!(
        "{}: using subdataset {} ({})",
        path.display(),
        subdataset.name,
        subdataset.description
    );

    let output = inputs::output_path(&job.output_dir, path, &job.suffix)?;
    convert_subdataset(&subdataset.name, &output, job, reference)?;

    info!("{} done", output.display());
    Ok(output)
}

/// Extracts every file of `job.input_dir`. Stops at the first failure.
pub fn run(job: &ExtractJob) -> ModisResult<Vec<PathBuf>> {
    let reference = raster::read_metadata(&job.reference_raster)?;
    let files = inputs::list_inputs(&job.input_dir, Selection::AnyFile, &job.period)?;
    info!(
        "Extracting subdataset {} from {} file(s) in {}",
        job.subdataset_index,
        files.len(),
        job.input_dir.display()
    );

    inputs::ensure_output_dir(&job.output_dir)?;
    files
        .iter()
        .map(|path| extract_file(path, job, &reference))
        .collect()
}
