pub mod io;
pub mod pixel;
pub mod types;

pub use io::{open, read, read_dataset, read_metadata, write, write_with_no_data};
pub use pixel::OutputPixel;
pub use types::{RasterImage, RasterMetadata, Shape};
