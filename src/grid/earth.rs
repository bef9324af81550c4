use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use crate::codetables::Table3_2;

/// Shape of the Earth, common to all grid definition templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct EarthShapeDefinition {
    /// Shape of the Earth (see Code table 3.2).
    pub shape_of_the_earth: u8,
    /// Scale factor of radius of spherical Earth.
    pub scale_factor_of_radius_of_spherical_earth: u8,
    /// Scaled value of radius of spherical Earth.
    pub scaled_value_of_radius_of_spherical_earth: u32,
    /// Scale factor of major axis of oblate spheroid Earth.
    pub scale_factor_of_earth_major_axis: u8,
    /// Scaled value of major axis of oblate spheroid Earth.
    pub scaled_value_of_earth_major_axis: u32,
    /// Scale factor of minor axis of oblate spheroid Earth.
    pub scale_factor_of_earth_minor_axis: u8,
    /// Scaled value of minor axis of oblate spheroid Earth.
    pub scaled_value_of_earth_minor_axis: u32,
}

impl EarthShapeDefinition {
    /// Returns the major and minor radii of the Earth in metres, or `None`
    /// for a shape not defined in Code Table 3.2 or one this crate has no
    /// parameters for.
    pub fn radii(&self) -> Option<(f64, f64)> {
        let radii = match Table3_2::try_from(self.shape_of_the_earth).ok()? {
            Table3_2::SphericalRadius6367470 => (6367470.0, 6367470.0),
            Table3_2::SphericalRadiusSpecified => {
                let radius = unscale(
                    self.scaled_value_of_radius_of_spherical_earth,
                    self.scale_factor_of_radius_of_spherical_earth,
                );
                (radius, radius)
            }
            Table3_2::OblateIau1965 => (6378160.0, 6356775.0),
            Table3_2::OblateAxesSpecifiedInKm => {
                let (major, minor) = self.radii_defined();
                (major * 1000., minor * 1000.)
            }
            Table3_2::OblateIagGrs80 => (6378137.0, 6356752.314),
            Table3_2::Wgs84 => (6378137.0, 6356752.3142),
            Table3_2::SphericalRadius6371229 => (6371229.0, 6371229.0),
            Table3_2::OblateAxesSpecifiedInM => self.radii_defined(),
            Table3_2::SphericalRadius6371200Wgs84Datum => (6371200.0, 6371200.0),
            Table3_2::OsgbAiry1830 => return None,
        };
        Some(radii)
    }

    fn radii_defined(&self) -> (f64, f64) {
        let major = unscale(
            self.scaled_value_of_earth_major_axis,
            self.scale_factor_of_earth_major_axis,
        );
        let minor = unscale(
            self.scaled_value_of_earth_minor_axis,
            self.scale_factor_of_earth_minor_axis,
        );
        (major, minor)
    }
}

// value = scaled value * 10^-(scale factor)
fn unscale(scaled_value: u32, scale_factor: u8) -> f64 {
    f64::from(scaled_value) / 10_f64.powi(i32::from(scale_factor))
}

#[cfg(test)]
mod tests {
    use grib2_template_helpers::{OctetSize, TryFromSlice};

    use super::*;

    #[test]
    fn radii_for_shape_1() {
        let earth = EarthShapeDefinition {
            shape_of_the_earth: 1,
            scale_factor_of_radius_of_spherical_earth: 0,
            scaled_value_of_radius_of_spherical_earth: 6371200,
            scale_factor_of_earth_major_axis: 0,
            scaled_value_of_earth_major_axis: 0,
            scale_factor_of_earth_minor_axis: 0,
            scaled_value_of_earth_minor_axis: 0,
        };
        assert_eq!(earth.radii(), Some((6_371_200., 6_371_200.)));
    }

    #[test]
    fn radii_for_shape_3() {
        let earth = EarthShapeDefinition {
            shape_of_the_earth: 3,
            scaled_value_of_earth_major_axis: 6378,
            scaled_value_of_earth_minor_axis: 6357,
            ..Default::default()
        };
        assert_eq!(earth.radii(), Some((6_378_000., 6_357_000.)));
    }

    #[test]
    fn radii_for_shape_7_with_scale_factors() {
        let earth = EarthShapeDefinition {
            shape_of_the_earth: 7,
            scale_factor_of_earth_major_axis: 1,
            scaled_value_of_earth_major_axis: 63781370,
            scale_factor_of_earth_minor_axis: 2,
            scaled_value_of_earth_minor_axis: 635675231,
            ..Default::default()
        };
        let (major, minor) = earth.radii().unwrap();
        assert!((major - 6_378_137.).abs() < 1e-6);
        assert!((minor - 6_356_752.31).abs() < 1e-6);
    }

    #[test]
    fn radii_for_undefined_shapes() {
        for shape in [9, 10, 255] {
            let earth = EarthShapeDefinition {
                shape_of_the_earth: shape,
                ..Default::default()
            };
            assert_eq!(earth.radii(), None);
        }
    }

    #[test]
    fn reading_earth_shape() {
        let buf = [
            0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let mut pos = 0;
        let earth = EarthShapeDefinition::try_from_slice(&buf, &mut pos).unwrap();
        assert_eq!(pos, 16);
        assert_eq!(earth.octet_size(), 16);
        assert_eq!(earth.radii(), Some((6_371_229., 6_371_229.)));
    }
}
