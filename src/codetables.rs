//! WMO code tables consulted while decoding and encoding sections 3 and 5.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Code Table 3.1: Grid definition template number.
///
/// All templates defined by WMO are listed, whether this crate implements them
/// or not, so that the dispatch can tell an unimplemented template from an
/// unknown one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Table3_1 {
    LatitudeLongitude = 0,
    RotatedLatitudeLongitude = 1,
    StretchedLatitudeLongitude = 2,
    StretchedAndRotatedLatitudeLongitude = 3,
    VariableResolutionLatitudeLongitude = 4,
    VariableResolutionRotatedLatitudeLongitude = 5,
    Mercator = 10,
    TransverseMercator = 12,
    MercatorWithModellingSubdomains = 13,
    PolarStereographic = 20,
    PolarStereographicWithModellingSubdomains = 23,
    LambertConformal = 30,
    AlbersEqualArea = 31,
    LambertConformalWithModellingSubdomains = 33,
    GaussianLatitudeLongitude = 40,
    RotatedGaussianLatitudeLongitude = 41,
    StretchedGaussianLatitudeLongitude = 42,
    StretchedAndRotatedGaussianLatitudeLongitude = 43,
    SphericalHarmonicCoefficients = 50,
    RotatedSphericalHarmonicCoefficients = 51,
    StretchedSphericalHarmonicCoefficients = 52,
    StretchedAndRotatedSphericalHarmonicCoefficients = 53,
    SpectralMercatorWithModellingSubdomains = 61,
    SpectralPolarStereographicWithModellingSubdomains = 62,
    SpectralLambertConformalWithModellingSubdomains = 63,
    SpaceViewPerspective = 90,
    TriangularGridBasedOnIcosahedron = 100,
    GeneralUnstructuredGrid = 101,
    EquatorialAzimuthalEquidistant = 110,
    AzimuthRange = 120,
    LambertAzimuthalEqualArea = 140,
    HealpixGrid = 150,
    CurvilinearOrthogonal = 204,
    CrossSectionGrid = 1000,
    HovmollerDiagramGrid = 1100,
    TimeSectionGrid = 1200,
    RotatedLatitudeLongitudeArakawaStaggeredE = 32768,
    RotatedLatitudeLongitudeArakawaNonE = 32769,
}

/// Code Table 5.0: Data representation template number.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Table5_0 {
    SimplePacking = 0,
    MatrixValueSimplePacking = 1,
    ComplexPacking = 2,
    ComplexPackingAndSpatialDifferencing = 3,
    IeeeFloatingPoint = 4,
    Jpeg2000 = 40,
    Png = 41,
    Ccsds = 42,
    SpectralSimplePacking = 50,
    SphericalHarmonicsComplexPacking = 51,
    SpectralLimitedAreaComplexPacking = 53,
    SimplePackingWithLogarithmPreprocessing = 61,
    RunLengthPackingWithLevelValues = 200,
    Jpeg2000Local = 40000,
    PngLocal = 40010,
}

/// Code Table 5.6: Order of spatial differencing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table5_6 {
    FirstOrderSpatialDifferencing = 1,
    SecondOrderSpatialDifferencing = 2,
}

impl Table5_6 {
    /// Number of leading values stored verbatim as seeds.
    pub fn num_first_values(&self) -> usize {
        match self {
            Self::FirstOrderSpatialDifferencing => 1,
            Self::SecondOrderSpatialDifferencing => 2,
        }
    }
}

/// Code Table 3.2: Shape of the Earth.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table3_2 {
    SphericalRadius6367470 = 0,
    SphericalRadiusSpecified = 1,
    OblateIau1965 = 2,
    OblateAxesSpecifiedInKm = 3,
    OblateIagGrs80 = 4,
    Wgs84 = 5,
    SphericalRadius6371229 = 6,
    OblateAxesSpecifiedInM = 7,
    SphericalRadius6371200Wgs84Datum = 8,
    OsgbAiry1830 = 9,
}

#[cfg(test)]
mod tests {
    use num_enum::TryFromPrimitiveError;

    use super::*;

    #[test]
    fn num_enum_conversion() {
        assert_eq!(Table5_0::try_from(3_u16), Ok(Table5_0::ComplexPackingAndSpatialDifferencing));
        assert_eq!(Table5_0::try_from(40010_u16), Ok(Table5_0::PngLocal));
        assert_eq!(
            Table5_0::try_from(99_u16),
            Err(TryFromPrimitiveError { number: 99 })
        );
        assert_eq!(
            Table3_1::try_from(32769_u16),
            Ok(Table3_1::RotatedLatitudeLongitudeArakawaNonE)
        );
        assert_eq!(
            Table3_1::try_from(65535_u16),
            Err(TryFromPrimitiveError { number: 65535 })
        );
    }

    #[test]
    fn num_enum_equivalence() {
        assert_eq!(2_u8.try_into(), Ok(Table5_6::SecondOrderSpatialDifferencing));
        assert_eq!(u16::from(Table3_1::LambertConformal), 30);
    }

    #[test]
    fn number_of_first_values_for_spatial_differencing() {
        assert_eq!(Table5_6::FirstOrderSpatialDifferencing.num_first_values(), 1);
        assert_eq!(Table5_6::SecondOrderSpatialDifferencing.num_first_values(), 2);
    }
}
