//! Fixtures shared by the unit tests: small GeoTIFFs, polygon shapefiles and
//! multi-table GeoPackages standing in for HDF containers.

use gdal::DriverManager;
use gdal::cpl::CslStringList;
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{Geometry, LayerAccess, LayerOptions, OGRwkbGeometryType};
use ndarray::Array2;
use std::path::Path;

use crate::raster;

/// 1 m pixels, origin at (0, 10), north-up.
pub const GEO_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 10.0, 0.0, -1.0];

const EPSG: u32 = 3857;

pub fn projection() -> String {
    SpatialRef::from_epsg(EPSG).unwrap().to_wkt().unwrap()
}

pub fn write_constant(path: &Path, height: usize, width: usize, value: f32) {
    let data = Array2::from_elem((height, width), value);
    raster::write(path, &projection(), &GEO_TRANSFORM, &data).unwrap();
}

pub fn write_boundary(path: &Path, wkt: &str) {
    let driver = DriverManager::get_driver_by_name("ESRI Shapefile").unwrap();
    let mut dataset = driver.create_vector_only(path).unwrap();
    let srs = SpatialRef::from_epsg(EPSG).unwrap();

    let mut layer = dataset
        .create_layer(LayerOptions {
            name: "boundary",
            srs: Some(&srs),
            ty: OGRwkbGeometryType::wkbPolygon,
            ..Default::default()
        })
        .unwrap();
    layer
        .create_feature(Geometry::from_wkt(wkt).unwrap())
        .unwrap();
}

/// Writes one Float32 raster table per entry. GDAL lists the tables as
/// `SUBDATASET_1`, `SUBDATASET_2`, ... in the order given.
pub fn write_container(path: &Path, tables: &[(&str, &Array2<f32>)]) {
    let driver = DriverManager::get_driver_by_name("GPKG").unwrap();

    for (position, (table, data)) in tables.iter().enumerate() {
        let (height, width) = data.dim();
        let mut options = CslStringList::new();
        options.set_name_value("RASTER_TABLE", table).unwrap();
        if position > 0 {
            options.set_name_value("APPEND_SUBDATASET", "YES").unwrap();
        }

        let mut dataset = driver
            .create_with_band_type_with_options::<f32, _>(path, width, height, 1, &options)
            .unwrap();
        dataset.set_geo_transform(&GEO_TRANSFORM).unwrap();
        dataset.set_projection(&projection()).unwrap();

        let mut buffer = Buffer::new((width, height), data.iter().copied().collect());
        dataset
            .rasterband(1)
            .unwrap()
            .write((0, 0), (width, height), &mut buffer)
            .unwrap();
    }
}
