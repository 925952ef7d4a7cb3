use log::info;

/// Summary of a raster's finite values; NaN pixels are counted but ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub valid: usize,
    pub total: usize,
}

impl RasterStats {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut valid = 0;
        let mut total = 0;

        for value in values {
            total += 1;
            if value.is_nan() {
                continue;
            }
            valid += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if valid == 0 {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                valid,
                total,
            };
        }

        Self {
            min,
            max,
            mean: sum / valid as f64,
            valid,
            total,
        }
    }

    pub fn log(&self, label: &str) {
        info!("{label}:");
        info!("  Min: {:.4}", self.min);
        info!("  Max: {:.4}", self.max);
        info!("  Mean: {:.4}", self.mean);
        info!(
            "  Valid pixels: {} / {} ({:.1}%)",
            self.valid,
            self.total,
            if self.total == 0 {
                0.0
            } else {
                100.0 * self.valid as f64 / self.total as f64
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_ignore_nan() {
        let stats = RasterStats::from_values([1.0, f64::NAN, 3.0, 2.0]);

        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
        assert_eq!((stats.valid, stats.total), (3, 4));
    }

    #[test]
    fn test_stats_of_empty_input() {
        let stats = RasterStats::from_values(std::iter::empty());

        assert!(stats.min.is_nan() && stats.max.is_nan() && stats.mean.is_nan());
        assert_eq!((stats.valid, stats.total), (0, 0));
    }
}
