use gdal::raster::GdalType;

/// Maps an in-memory element type to the pixel type stored on disk.
///
/// 8-bit integers are written as GDAL `Byte`, 16-bit integers as `UInt16`
/// and every other type as `Float32`. Signed values are clamped into the
/// unsigned range the same way GDAL clamps on a type-converting write.
pub trait OutputPixel: Copy {
    type Stored: GdalType + Copy;

    fn to_stored(self) -> Self::Stored;
}

impl OutputPixel for u8 {
    type Stored = u8;

    fn to_stored(self) -> u8 {
        self
    }
}

impl OutputPixel for i8 {
    type Stored = u8;

    fn to_stored(self) -> u8 {
        self.max(0) as u8
    }
}

impl OutputPixel for u16 {
    type Stored = u16;

    fn to_stored(self) -> u16 {
        self
    }
}

impl OutputPixel for i16 {
    type Stored = u16;

    fn to_stored(self) -> u16 {
        self.max(0) as u16
    }
}

macro_rules! float32_output {
    ($($ty:ty),*) => {
        $(
            impl OutputPixel for $ty {
                type Stored = f32;

                fn to_stored(self) -> f32 {
                    self as f32
                }
            }
        )*
    };
}

float32_output!(u32, i32, u64, i64, f32, f64);
