//! One-time GDAL process setup: route CPL messages through `log` and apply
//! configuration options.

use gdal::errors::CplErrType;
use log::{debug, error, trace, warn};
use std::collections::BTreeMap;

use crate::error::ModisResult;

pub fn init(options: &BTreeMap<String, String>) -> ModisResult<()> {
    gdal::config::set_error_handler(|class, number, message| match class {
        CplErrType::None => trace!("GDAL [{number}]: {message}"),
        CplErrType::Debug => debug!("GDAL [{number}]: {message}"),
        CplErrType::Warning => warn!("GDAL [{number}]: {message}"),
        CplErrType::Failure | CplErrType::Fatal => error!("GDAL [{number}]: {message}"),
    });

    for (key, value) in options {
        debug!("GDAL config {key}={value}");
        gdal::config::set_config_option(key, value)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_applies_config_options() {
        let options = BTreeMap::from([("MODIS_BATCH_TEST_OPTION".to_string(), "YES".to_string())]);

        init(&options).unwrap();

        assert_eq!(
            gdal::config::get_config_option("MODIS_BATCH_TEST_OPTION", "").unwrap(),
            "YES"
        );
    }
}
