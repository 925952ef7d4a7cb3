use chrono::NaiveDate;
use std::path::Path;

use crate::config::ConfigError;

/// Acquisition date encoded in a MODIS product name.
///
/// Product names carry a `AYYYYDDD` token (year and day of year), e.g.
/// `MOD17A2H.A2021361.h27v05.006.2022005050243.hdf` was acquired on
/// 2021-12-27. Derived names such as `..._pro_cut.tif` keep the token.
pub fn acquisition_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    name.split('.').find_map(parse_token)
}

fn parse_token(token: &str) -> Option<NaiveDate> {
    let digits = token.strip_prefix('A')?;
    if digits.len() != 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = digits[..4].parse().ok()?;
    let ordinal: u32 = digits[4..].parse().ok()?;
    NaiveDate::from_yo_opt(year, ordinal)
}

/// Inclusive acquisition window used to select which products a step sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionPeriod {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl AcquisitionPeriod {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ConfigError> {
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(ConfigError::DateOrder);
        }

        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// Undated files only pass when no window is set.
    pub fn includes(&self, path: &Path) -> bool {
        if self.is_unbounded() {
            return true;
        }

        acquisition_date(path).is_some_and(|date| self.contains(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("Invalid date")
    }

    #[test]
    fn test_acquisition_date_from_product_names() {
        let hdf = Path::new("/data/MOD17A2H.A2021361.h27v05.006.2022005050243.hdf");
        assert_eq!(acquisition_date(hdf), Some(date(2021, 12, 27)));

        let clipped = Path::new("MOD16A2.A2020001.h27v05.061.2020256_pro_cut.tif");
        assert_eq!(acquisition_date(clipped), Some(date(2020, 1, 1)));

        // 2020 is a leap year
        let leap = Path::new("MOD16A2.A2020366.h27v05.tif");
        assert_eq!(acquisition_date(leap), Some(date(2020, 12, 31)));
    }

    #[test]
    fn test_acquisition_date_rejects_malformed_tokens() {
        assert_eq!(acquisition_date(Path::new("reference.tif")), None);
        assert_eq!(acquisition_date(Path::new("MOD17.A20213.tif")), None);
        assert_eq!(acquisition_date(Path::new("MOD17.A2021400.tif")), None);
        assert_eq!(acquisition_date(Path::new("MOD17.B2021001.tif")), None);
    }

    #[test]
    fn test_period_order_is_validated() {
        let result = AcquisitionPeriod::new(Some(date(2021, 2, 1)), Some(date(2021, 1, 1)));
        assert!(matches!(result, Err(ConfigError::DateOrder)));
    }

    #[test]
    fn test_period_bounds_are_inclusive() {
        let period =
            AcquisitionPeriod::new(Some(date(2021, 1, 1)), Some(date(2021, 1, 31))).unwrap();

        assert!(period.contains(date(2021, 1, 1)));
        assert!(period.contains(date(2021, 1, 31)));
        assert!(!period.contains(date(2020, 12, 31)));
        assert!(!period.contains(date(2021, 2, 1)));
    }

    #[test]
    fn test_open_ended_period() {
        let period = AcquisitionPeriod::new(Some(date(2021, 6, 1)), None).unwrap();

        assert!(period.includes(Path::new("MOD16A2.A2021361.h27v05.hdf")));
        assert!(!period.includes(Path::new("MOD16A2.A2021001.h27v05.hdf")));
        assert!(!period.includes(Path::new("undated.hdf")));
    }

    #[test]
    fn test_unbounded_period_includes_everything() {
        let period = AcquisitionPeriod::unbounded();

        assert!(period.includes(Path::new("undated.hdf")));
        assert!(period.includes(Path::new("MOD16A2.A2021001.h27v05.hdf")));
    }
}
