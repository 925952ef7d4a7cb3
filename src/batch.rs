use log::info;
use std::path::PathBuf;

use crate::aggregate::{self, AggregateJob};
use crate::clip::{self, ClipJob};
use crate::config::{Config, ConfigError, Step};
use crate::error::ModisResult;
use crate::extract::{self, ExtractJob};

#[derive(Debug, Default)]
pub struct RunSummary {
    pub extracted: Vec<PathBuf>,
    pub clipped: Vec<PathBuf>,
    pub aggregate: Option<PathBuf>,
}

/// Runs the enabled steps in order: extract, clip, aggregate.
#[derive(Debug)]
pub struct BatchRunner {
    extract: Option<ExtractJob>,
    clip: Option<ClipJob>,
    aggregate: Option<AggregateJob>,
}

impl BatchRunner {
    /// Resolves every enabled step up front so a misconfigured step fails
    /// before any file is written.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let steps = config.steps();
        let enabled = |step: Step| steps.contains(&step);

        Ok(BatchRunner {
            extract: enabled(Step::Extract)
                .then(|| config.extract_job())
                .transpose()?,
            clip: enabled(Step::Clip).then(|| config.clip_job()).transpose()?,
            aggregate: enabled(Step::Aggregate)
                .then(|| config.aggregate_job())
                .transpose()?,
        })
    }

    pub fn run(&self) -> ModisResult<RunSummary> {
        let mut summary = RunSummary::default();

        if let Some(job) = &self.extract {
            info!(
                "Step {}: {} -> {}",
                Step::Extract,
                job.input_dir.display(),
                job.output_dir.display()
            );
            summary.extracted = extract::run(job)?;
        }

        if let Some(job) = &self.clip {
            info!(
                "Step {}: {} -> {}",
                Step::Clip,
                job.input_dir.display(),
                job.output_dir.display()
            );
            summary.clipped = clip::run(job)?;
        }

        if let Some(job) = &self.aggregate {
            info!(
                "Step {}: {} -> {}",
                Step::Aggregate,
                job.input_dir.display(),
                job.output_dir.display()
            );
            summary.aggregate = Some(aggregate::run(job)?);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModisError;
    use crate::raster;
    use crate::test_support::{write_boundary, write_constant};
    use std::path::Path;
    use tempfile::tempdir;

    fn config_for(root: &Path, steps: &str, clip_nodata: f64) -> Config {
        let json = format!(
            r#"{{
                "hdf_directory": "{root}/hdf",
                "extracted_directory": "{root}/pro",
                "clipped_directory": "{root}/cut",
                "aggregate_directory": "{root}/sum",
                "boundary_path": "{root}/boundary.shp",
                "reference_raster": "{root}/reference.tif",
                "clip_nodata": {clip_nodata},
                "steps": {steps}
            }}"#,
            root = root.display(),
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_clip_then_aggregate() {
        let root = tempdir().unwrap();
        let config = config_for(root.path(), r#"["clip", "aggregate"]"#, 0.0);
        std::fs::create_dir_all(root.path().join("pro")).unwrap();
        write_boundary(&root.path().join("boundary.shp"), "POLYGON ((2 2, 6 2, 6 6, 2 6, 2 2))");
        write_constant(&root.path().join("reference.tif"), 4, 4, 0.0);
        for (name, value) in [("a.tif", 1.0), ("b.tif", 2.0), ("c.tif", 3.0)] {
            write_constant(&root.path().join("pro").join(name), 10, 10, value);
        }

        let runner = BatchRunner::new(&config).unwrap();
        let summary = runner.run().unwrap();

        assert!(summary.extracted.is_empty());
        assert_eq!(summary.clipped.len(), 3);
        let output = summary.aggregate.unwrap();
        assert_eq!(output, root.path().join("sum").join("reference_sum.tif"));

        let image = raster::read::<f32, _>(&output).unwrap();
        assert_eq!((image.height(), image.width()), (4, 4));
        assert!(image.band(0).iter().all(|&v| v == 6.0));
    }

    #[test]
    fn test_clip_no_data_is_kept_out_of_the_sum() {
        let root = tempdir().unwrap();
        let config = config_for(root.path(), r#"["clip", "aggregate"]"#, -9999.0);
        std::fs::create_dir_all(root.path().join("pro")).unwrap();
        write_boundary(&root.path().join("boundary.shp"), "POLYGON ((2 2, 6 2, 2 6, 2 2))");
        write_constant(&root.path().join("reference.tif"), 4, 4, 0.0);
        for (name, value) in [("a.tif", 1.0), ("b.tif", 2.0), ("c.tif", 3.0)] {
            write_constant(&root.path().join("pro").join(name), 10, 10, value);
        }

        let summary = BatchRunner::new(&config).unwrap().run().unwrap();

        let image = raster::read::<f32, _>(summary.aggregate.unwrap()).unwrap();
        let band = image.band(0);
        // Pixel centres at (2.5, 2.5) inside, (5.5, 5.5) outside the triangle.
        assert_eq!(band[[3, 0]], 6.0);
        assert_eq!(band[[0, 3]], -9999.0);
        assert_eq!(image.no_data, Some(-9999.0));
    }

    #[test]
    fn test_misconfigured_step_fails_before_running() {
        let config: Config = serde_json::from_str(r#"{"steps": ["extract"]}"#).unwrap();

        let result = BatchRunner::new(&config);

        assert!(matches!(
            result,
            Err(ConfigError::MissingPath {
                step: Step::Extract,
                ..
            })
        ));
    }

    #[test]
    fn test_failure_stops_later_steps() {
        let root = tempdir().unwrap();
        let config = config_for(root.path(), r#"["clip", "aggregate"]"#, 0.0);
        std::fs::create_dir_all(root.path().join("pro")).unwrap();
        write_constant(&root.path().join("reference.tif"), 4, 4, 0.0);

        let runner = BatchRunner::new(&config).unwrap();
        let result = runner.run();

        // No boundary file was written.
        assert!(matches!(result, Err(ModisError::Open { .. })));
        assert!(!root.path().join("sum").exists());
    }
}
