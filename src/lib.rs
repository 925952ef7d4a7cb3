pub mod acquisition;
pub mod aggregate;
pub mod batch;
pub mod clip;
pub mod config;
pub mod error;
pub mod extent;
pub mod extract;
pub mod gdal_env;
pub mod inputs;
pub mod raster;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use error::{ModisError, ModisResult};
