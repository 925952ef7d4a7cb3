use gdal::GeoTransform;
use gdal::vector::Envelope;

/// Axis-aligned bounding extent in the raster's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, String> {
        if ![xmin, xmax, ymin, ymax].iter().all(|v| v.is_finite()) {
            return Err("Extent coordinates must be finite".to_string());
        }

        if xmin > xmax || ymin > ymax {
            return Err("Min values must be <= max values".to_string());
        }

        Ok(Extent {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Extent covered by a `width x height` raster (north-up or south-up).
    pub fn from_geo_transform(geo_transform: &GeoTransform, width: usize, height: usize) -> Self {
        let x0 = geo_transform[0];
        let y0 = geo_transform[3];
        let x1 = x0 + geo_transform[1] * width as f64 + geo_transform[2] * height as f64;
        let y1 = y0 + geo_transform[4] * width as f64 + geo_transform[5] * height as f64;

        Extent {
            xmin: x0.min(x1),
            xmax: x0.max(x1),
            ymin: y0.min(y1),
            ymax: y0.max(y1),
        }
    }

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, String> {
        Extent::new(envelope.MinX, envelope.MaxX, envelope.MinY, envelope.MaxY)
    }

    pub fn approx_eq(&self, other: &Extent, tolerance: f64) -> bool {
        (self.xmin - other.xmin).abs() <= tolerance
            && (self.xmax - other.xmax).abs() <= tolerance
            && (self.ymin - other.ymin).abs() <= tolerance
            && (self.ymax - other.ymax).abs() <= tolerance
    }
}

#[cfg(test)]
mod test {
    use crate::extent::Extent;
    use gdal::vector::Envelope;

    #[test]
    fn test_extent_validation() {
        assert!(Extent::new(-67.2, -58.7, 70.9, 73.3).is_ok());

        // min > max
        assert!(Extent::new(10.0, 0.0, 0.0, 10.0).is_err());
        assert!(Extent::new(0.0, 10.0, 10.0, 0.0).is_err());

        assert!(Extent::new(f64::NAN, 10.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_extent_from_north_up_geo_transform() {
        let geo_transform = [100.0, 10.0, 0.0, 500.0, 0.0, -10.0];
        let extent = Extent::from_geo_transform(&geo_transform, 4, 3);

        assert_eq!(extent, Extent::new(100.0, 140.0, 470.0, 500.0).unwrap());
    }

    #[test]
    fn test_extent_from_envelope() {
        let envelope = Envelope {
            MinX: 2.0,
            MaxX: 6.0,
            MinY: 2.0,
            MaxY: 6.0,
        };
        assert_eq!(
            Extent::from_envelope(&envelope),
            Extent::new(2.0, 6.0, 2.0, 6.0)
        );

        // OGR reports an unset envelope as inverted infinities.
        let unset = Envelope {
            MinX: f64::INFINITY,
            MaxX: f64::NEG_INFINITY,
            MinY: f64::INFINITY,
            MaxY: f64::NEG_INFINITY,
        };
        assert!(Extent::from_envelope(&unset).is_err());
    }

    #[test]
    fn test_extent_approx_eq() {
        let a = Extent::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let b = Extent::new(1e-9, 1.0, 0.0, 1.0 - 1e-9).unwrap();

        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&b, 1e-12));
    }
}
