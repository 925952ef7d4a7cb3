use chrono::NaiveDate;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::acquisition::AcquisitionPeriod;
use crate::aggregate::AggregateJob;
use crate::clip::ClipJob;
use crate::extract::{ExtractJob, ValidRange};

pub mod error;
pub use error::ConfigError;

pub mod step;
pub use step::Step;

/// File name suffixes appended to each step's outputs.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Suffixes {
    pub extract: String,
    pub clip: String,
    pub aggregate: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            extract: "_pro".to_string(),
            clip: "_cut".to_string(),
            aggregate: "_sum".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    hdf_directory: Option<PathBuf>,
    extracted_directory: Option<PathBuf>,
    clipped_directory: Option<PathBuf>,
    aggregate_directory: Option<PathBuf>,
    boundary_path: Option<PathBuf>,
    reference_raster: Option<PathBuf>,
    subdataset_index: usize,
    scale_factor: f32,
    valid_range: ValidRange,
    suffixes: Suffixes,
    aggregate_name: Option<String>,
    clip_nodata: Option<f64>,
    steps: Vec<Step>,
    period: AcquisitionPeriod,
    gdal_options: BTreeMap<String, String>,
}

// Deserializes a Config, parsing the optional acquisition dates and checking
// that the value range, scale factor and period are usable.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            hdf_directory: Option<PathBuf>,
            extracted_directory: Option<PathBuf>,
            clipped_directory: Option<PathBuf>,
            aggregate_directory: Option<PathBuf>,
            boundary_path: Option<PathBuf>,
            reference_raster: Option<PathBuf>,
            #[serde(default = "default_subdataset_index")]
            subdataset_index: usize,
            #[serde(default = "default_scale_factor")]
            scale_factor: f32,
            #[serde(default)]
            valid_range: ValidRange,
            #[serde(default)]
            suffixes: Suffixes,
            aggregate_name: Option<String>,
            clip_nodata: Option<f64>,
            steps: Option<Vec<Step>>,
            start_date: Option<String>,
            end_date: Option<String>,
            #[serde(default)]
            gdal_options: BTreeMap<String, String>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let parse_date = |field: &'static str, value: Option<String>| {
            value
                .map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d"))
                .transpose()
                .map_err(|source| D::Error::custom(ConfigError::DateParse { field, source }))
        };
        let start_date = parse_date("start_date", helper.start_date)?;
        let end_date = parse_date("end_date", helper.end_date)?;
        let period = AcquisitionPeriod::new(start_date, end_date).map_err(D::Error::custom)?;

        let ValidRange { min, max } = helper.valid_range;
        if min.is_nan() || max.is_nan() || min > max {
            return Err(D::Error::custom(ConfigError::ValidRange { min, max }));
        }

        if !helper.scale_factor.is_finite() || helper.scale_factor == 0.0 {
            return Err(D::Error::custom(ConfigError::ScaleFactor(
                helper.scale_factor,
            )));
        }

        // Steps always run in pipeline order, each at most once.
        let mut steps = helper.steps.unwrap_or_else(|| Step::ALL.to_vec());
        steps.sort();
        steps.dedup();

        Ok(Config {
            hdf_directory: helper.hdf_directory,
            extracted_directory: helper.extracted_directory,
            clipped_directory: helper.clipped_directory,
            aggregate_directory: helper.aggregate_directory,
            boundary_path: helper.boundary_path,
            reference_raster: helper.reference_raster,
            subdataset_index: helper.subdataset_index,
            scale_factor: helper.scale_factor,
            valid_range: helper.valid_range,
            suffixes: helper.suffixes,
            aggregate_name: helper.aggregate_name,
            clip_nodata: helper.clip_nodata,
            steps,
            period,
            gdal_options: helper.gdal_options,
        })
    }
}

fn default_subdataset_index() -> usize {
    1
}

fn default_scale_factor() -> f32 {
    0.0001
}

fn required(
    value: &Option<PathBuf>,
    step: Step,
    field: &'static str,
) -> Result<PathBuf, ConfigError> {
    value
        .clone()
        .ok_or(ConfigError::MissingPath { step, field })
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn gdal_options(&self) -> &BTreeMap<String, String> {
        &self.gdal_options
    }

    pub fn period(&self) -> AcquisitionPeriod {
        self.period
    }

    pub fn extract_job(&self) -> Result<ExtractJob, ConfigError> {
        let step = Step::Extract;
        Ok(ExtractJob {
            input_dir: required(&self.hdf_directory, step, "hdf_directory")?,
            output_dir: required(&self.extracted_directory, step, "extracted_directory")?,
            reference_raster: required(&self.reference_raster, step, "reference_raster")?,
            subdataset_index: self.subdataset_index,
            scale_factor: self.scale_factor,
            valid_range: self.valid_range,
            suffix: self.suffixes.extract.clone(),
            period: self.period,
        })
    }

    pub fn clip_job(&self) -> Result<ClipJob, ConfigError> {
        let step = Step::Clip;
        Ok(ClipJob {
            input_dir: required(&self.extracted_directory, step, "extracted_directory")?,
            output_dir: required(&self.clipped_directory, step, "clipped_directory")?,
            boundary_path: required(&self.boundary_path, step, "boundary_path")?,
            suffix: self.suffixes.clip.clone(),
            nodata: self.clip_nodata,
            period: self.period,
        })
    }

    pub fn aggregate_job(&self) -> Result<AggregateJob, ConfigError> {
        let step = Step::Aggregate;
        Ok(AggregateJob {
            input_dir: required(&self.clipped_directory, step, "clipped_directory")?,
            output_dir: required(&self.aggregate_directory, step, "aggregate_directory")?,
            reference_raster: required(&self.reference_raster, step, "reference_raster")?,
            output_name: self.aggregate_name.clone(),
            suffix: self.suffixes.aggregate.clone(),
            period: self.period,
        })
    }
}
