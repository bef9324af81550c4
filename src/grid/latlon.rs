use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, Projection, ScanningMode};

/// Grid definition template 3.0 - latitude/longitude (or equidistant
/// cylindrical, or Plate Carree).
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct LatLonGridDefinition {
    pub earth_shape: EarthShapeDefinition,
    /// Ni - number of points along a parallel.
    pub ni: u32,
    /// Nj - number of points along a meridian.
    pub nj: u32,
    /// Basic angle of the initial production domain.
    pub basic_angle: u32,
    /// Subdivisions of basic angle used to define extreme longitudes and
    /// latitudes, and direction increments.
    pub basic_angle_subdivisions: u32,
    /// La1 - latitude of first grid point.
    pub first_point_lat: i32,
    /// Lo1 - longitude of first grid point.
    pub first_point_lon: i32,
    /// Resolution and component flags (see Flag table 3.3).
    pub resolution_flags: u8,
    /// La2 - latitude of last grid point.
    pub last_point_lat: i32,
    /// Lo2 - longitude of last grid point.
    pub last_point_lon: i32,
    /// Di - i direction increment.
    pub i_direction_inc: u32,
    /// Dj - j direction increment.
    pub j_direction_inc: u32,
    /// Scanning mode (flags - see Flag table 3.4).
    pub scanning_mode: ScanningMode,
}

impl Projection for LatLonGridDefinition {
    /// Examples
    ///
    /// ```
    /// use grib2_sections::Projection;
    ///
    /// let def = grib2_sections::LatLonGridDefinition {
    ///     ni: 2,
    ///     nj: 3,
    ///     ..Default::default()
    /// };
    /// assert_eq!(def.grid_shape(), (2, 3));
    /// ```
    fn grid_shape(&self) -> (u32, u32) {
        (self.ni, self.nj)
    }

    fn scanning_mode(&self) -> ScanningMode {
        self.scanning_mode
    }

    fn earth_shape(&self) -> &EarthShapeDefinition {
        &self.earth_shape
    }

    fn short_name(&self) -> &'static str {
        "regular_ll"
    }
}
