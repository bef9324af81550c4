use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, Projection, ScanningMode};

/// Grid definition template 3.32768 - rotated latitude/longitude with
/// Arakawa staggered E-grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct ArakawaEGridDefinition {
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
    /// Lat0 - latitude of the centre of the rotated grid.
    pub center_lat: i32,
    /// Lon0 - longitude of the centre of the rotated grid.
    pub center_lon: i32,
    /// Di - i direction increment.
    pub i_direction_inc: u32,
    /// Dj - j direction increment.
    pub j_direction_inc: u32,
    /// Scanning mode (flags - see Flag table 3.4).
    pub scanning_mode: ScanningMode,
}

impl Projection for ArakawaEGridDefinition {
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
        "arakawa_e"
    }
}

/// Grid definition template 3.32769 - rotated latitude/longitude with
/// Arakawa non-E staggered grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct ArakawaNonEGridDefinition {
    pub staggered: ArakawaEGridDefinition,
    /// La2 - latitude of last grid point.
    pub last_point_lat: i32,
    /// Lo2 - longitude of last grid point.
    pub last_point_lon: i32,
}

impl Projection for ArakawaNonEGridDefinition {
    fn grid_shape(&self) -> (u32, u32) {
        self.staggered.grid_shape()
    }

    fn scanning_mode(&self) -> ScanningMode {
        self.staggered.scanning_mode
    }

    fn earth_shape(&self) -> &EarthShapeDefinition {
        &self.staggered.earth_shape
    }

    fn short_name(&self) -> &'static str {
        "arakawa_non_e"
    }
}
