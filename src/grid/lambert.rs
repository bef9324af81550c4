use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, Projection, ProjectionCentreFlag, ScanningMode};

/// Grid definition template 3.30 - Lambert conformal.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct LambertGridDefinition {
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
    /// LoV - longitude of meridian parallel to y-axis along which
    /// latitude increases as the y-coordinate increases.
    pub lov: i32,
    /// Dx - x-direction grid length.
    pub dx: u32,
    /// Dy - y-direction grid length.
    pub dy: u32,
    /// Projection centre flag (see Flag table 3.5).
    pub projection_centre: ProjectionCentreFlag,
    /// Scanning mode (see Flag table 3.4).
    pub scanning_mode: ScanningMode,
    /// Latin 1 - first latitude from the pole at which the secant cone
    /// cuts the sphere.
    pub latin1: i32,
    /// Latin 2 - second latitude from the pole at which the secant cone
    /// cuts the sphere.
    pub latin2: i32,
    /// Latitude of the southern pole of projection.
    pub south_pole_lat: i32,
    /// Longitude of the southern pole of projection.
    pub south_pole_lon: i32,
}

impl Projection for LambertGridDefinition {
    /// Examples
    ///
    /// ```
    /// use grib2_sections::Projection;
    ///
    /// let def = grib2_sections::LambertGridDefinition {
    ///     earth_shape: grib2_sections::EarthShapeDefinition {
    ///         shape_of_the_earth: 1,
    ///         scale_factor_of_radius_of_spherical_earth: 0,
    ///         scaled_value_of_radius_of_spherical_earth: 6371200,
    ///         scale_factor_of_earth_major_axis: 0,
    ///         scaled_value_of_earth_major_axis: 0,
    ///         scale_factor_of_earth_minor_axis: 0,
    ///         scaled_value_of_earth_minor_axis: 0,
    ///     },
    ///     ni: 2,
    ///     nj: 3,
    ///     dx: 1000,
    ///     dy: 1000,
    ///     scanning_mode: grib2_sections::ScanningMode(0b01000000),
    ///     ..Default::default()
    /// };
    /// assert_eq!(def.grid_shape(), (2, 3));
    ///
    /// let mut ij = def.ij().unwrap();
    /// assert_eq!(ij.next(), Some((0, 0)));
    /// assert_eq!(ij.next(), Some((1, 0)));
    /// assert_eq!(ij.next(), Some((0, 1)));
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
        "lambert"
    }
}
