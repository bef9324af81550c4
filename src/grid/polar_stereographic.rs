use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, Projection, ProjectionCentreFlag, ScanningMode};

/// Grid definition template 3.20 - polar stereographic projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct PolarStereographicGridDefinition {
    pub earth_shape: EarthShapeDefinition,
    /// Nx - number of points along the x-axis.
    pub ni: u32,
    /// Ny - number of points along the y-axis.
    pub nj: u32,
    /// La1 - latitude of first grid point.
    pub first_point_lat: i32,
    /// Lo1 - longitude of first grid point.
    pub first_point_lon: i32,
    /// Resolution and component flags (see Flag table 3.3).
    pub resolution_flags: u8,
    /// LaD - latitude where Dx and Dy are specified.
    pub lad: i32,
    /// LoV - orientation of the grid.
    pub lov: i32,
    /// Dx - x-direction grid length.
    pub dx: u32,
    /// Dy - y-direction grid length.
    pub dy: u32,
    /// Projection centre flag (see Flag table 3.5).
    pub projection_centre: ProjectionCentreFlag,
    /// Scanning mode (see Flag table 3.4).
    pub scanning_mode: ScanningMode,
}

impl Projection for PolarStereographicGridDefinition {
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
        "polar_stereographic"
    }
}
