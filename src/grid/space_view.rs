use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, Projection, ScanningMode};

/// Grid definition template 3.90 - space view perspective or orthographic.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct SpaceViewGridDefinition {
    pub earth_shape: EarthShapeDefinition,
    /// Nx - number of points along the x-axis (columns).
    pub nx: u32,
    /// Ny - number of points along the y-axis (rows or lines).
    pub ny: u32,
    /// Lap - latitude of sub-satellite point.
    pub sub_satellite_lat: i32,
    /// Lop - longitude of sub-satellite point.
    pub sub_satellite_lon: i32,
    /// Resolution and component flags (see Flag table 3.3).
    pub resolution_flags: u8,
    /// dx - apparent diameter of Earth in grid lengths, in x-direction.
    pub dx: u32,
    /// dy - apparent diameter of Earth in grid lengths, in y-direction.
    pub dy: u32,
    /// Xp - x-coordinate of sub-satellite point (in units of 10^-3 grid
    /// length expressed as an integer).
    pub xp: u32,
    /// Yp - y-coordinate of sub-satellite point (in units of 10^-3 grid
    /// length expressed as an integer).
    pub yp: u32,
    /// Scanning mode (flags - see Flag table 3.4).
    pub scanning_mode: ScanningMode,
    /// Orientation of the grid; i.e. the angle between the increasing y-axis
    /// and the meridian of the sub-satellite point in the direction of
    /// increasing latitude.
    pub orientation: u32,
    /// Nr - altitude of the camera from the Earth's centre, measured in
    /// units of the Earth's (equatorial) radius multiplied by a scale
    /// factor of 10^6.
    pub nr: u32,
    /// Xo - x-coordinate of origin of sector image.
    pub xo: u32,
    /// Yo - y-coordinate of origin of sector image.
    pub yo: u32,
}

impl SpaceViewGridDefinition {
    /// Returns `true` if the camera is infinitely distant, i.e. the view is
    /// an orthographic projection.
    pub fn is_orthographic(&self) -> bool {
        self.nr == u32::MAX
    }
}

impl Projection for SpaceViewGridDefinition {
    fn grid_shape(&self) -> (u32, u32) {
        (self.nx, self.ny)
    }

    fn scanning_mode(&self) -> ScanningMode {
        self.scanning_mode
    }

    fn earth_shape(&self) -> &EarthShapeDefinition {
        &self.earth_shape
    }

    fn short_name(&self) -> &'static str {
        "space_view"
    }
}

#[cfg(test)]
mod tests {
    use grib2_template_helpers::{OctetSize, TryFromSlice, WriteToSlice};

    use super::*;

    #[test]
    fn space_view_template_round_trip() {
        let def = SpaceViewGridDefinition {
            nx: 3712,
            ny: 3712,
            sub_satellite_lon: 140_700_000,
            dx: 3622,
            dy: 3622,
            xp: 1_856_000,
            yp: 1_856_000,
            nr: 6_610_700,
            scanning_mode: ScanningMode(0b00000000),
            ..Default::default()
        };
        assert!(!def.is_orthographic());

        let mut buf = vec![0_u8; def.octet_size()];
        assert_eq!(buf.len(), 66);
        let mut pos = 0;
        def.write_to_slice(&mut buf, &mut pos).unwrap();
        assert_eq!(&buf[54..58], &6_610_700_u32.to_be_bytes());

        let mut pos = 0;
        let actual = SpaceViewGridDefinition::try_from_slice(&buf, &mut pos).unwrap();
        assert_eq!(actual, def);
        assert_eq!(actual.grid_shape(), (3712, 3712));
    }
}
