use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{EarthShapeDefinition, Projection, ScanningMode};

/// Grid definition template 3.10 - Mercator.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct MercatorGridDefinition {
    pub earth_shape: EarthShapeDefinition,
    /// Ni - number of points along a parallel.
    pub ni: u32,
    /// Nj - number of points along a meridian.
    pub nj: u32,
    /// La1 - latitude of first grid point.
    pub first_point_lat: i32,
    /// Lo1 - longitude of first grid point.
    pub first_point_lon: i32,
    /// Resolution and component flags (see Flag table 3.3).
    pub resolution_flags: u8,
    /// LaD - latitude(s) at which the Mercator projection intersects the
    /// Earth.
    pub lad: i32,
    /// La2 - latitude of last grid point.
    pub last_point_lat: i32,
    /// Lo2 - longitude of last grid point.
    pub last_point_lon: i32,
    /// Scanning mode (flags - see Flag table 3.4).
    pub scanning_mode: ScanningMode,
    /// Orientation of the grid, angle between i direction on the map and
    /// the equator.
    pub grid_orientation: u32,
    /// Di - longitudinal direction grid length.
    pub di: u32,
    /// Dj - latitudinal direction grid length.
    pub dj: u32,
}

impl Projection for MercatorGridDefinition {
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
        "mercator"
    }
}

#[cfg(test)]
mod tests {
    use grib2_template_helpers::{OctetSize, TryFromSlice};

    use super::*;

    #[test]
    fn reading_mercator_template() {
        let mut buf = [0_u8; 58];
        buf[0] = 6;
        buf[16..20].copy_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        buf[20..24].copy_from_slice(&[0x00, 0x00, 0x00, 0x80]);
        buf[33..37].copy_from_slice(&[0x01, 0x31, 0x2d, 0x00]);
        buf[45] = 0b01000000;
        buf[50..54].copy_from_slice(&[0x00, 0x00, 0x27, 0x10]);

        let mut pos = 0;
        let def = MercatorGridDefinition::try_from_slice(&buf, &mut pos).unwrap();
        assert_eq!(pos, 58);
        assert_eq!(def.octet_size(), 58);
        assert_eq!(def.grid_shape(), (256, 128));
        assert_eq!(def.lad, 20_000_000);
        assert_eq!(def.scanning_mode, ScanningMode(0b01000000));
        assert_eq!(def.di, 10_000);
        assert_eq!(def.earth_shape().radii(), Some((6_371_229., 6_371_229.)));

        let mut ij = def.ij().unwrap();
        assert_eq!(ij.next(), Some((0, 0)));
        assert_eq!(ij.next(), Some((1, 0)));
        assert_eq!(ij.count(), 256 * 128 - 2);
    }
}
