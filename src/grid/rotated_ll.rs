use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, LatLonGridDefinition, Projection, ScanningMode};

/// Grid definition template 3.1 - rotated latitude/longitude (or
/// equidistant cylindrical, or Plate Carree).
#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct RotatedLatLonGridDefinition {
    pub rotated: LatLonGridDefinition,
    /// Latitude of the southern pole of projection.
    pub south_pole_lat: i32,
    /// Longitude of the southern pole of projection.
    pub south_pole_lon: i32,
    /// Angle of rotation of projection.
    pub rot_angle: f32,
}

impl Projection for RotatedLatLonGridDefinition {
    fn grid_shape(&self) -> (u32, u32) {
        self.rotated.grid_shape()
    }

    fn scanning_mode(&self) -> ScanningMode {
        self.rotated.scanning_mode
    }

    fn earth_shape(&self) -> &EarthShapeDefinition {
        &self.rotated.earth_shape
    }

    fn short_name(&self) -> &'static str {
        "rotated_ll"
    }
}
