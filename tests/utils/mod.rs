use grib2_sections::{
    EarthShapeDefinition, GridDefinitionSection, LatLonGridDefinition, ProjectionTemplate,
    ScanningMode,
};

pub(crate) fn earth_shape() -> EarthShapeDefinition {
    EarthShapeDefinition {
        shape_of_the_earth: 6,
        scale_factor_of_radius_of_spherical_earth: 0xff,
        scaled_value_of_radius_of_spherical_earth: 0xffffffff,
        scale_factor_of_earth_major_axis: 0xff,
        scaled_value_of_earth_major_axis: 0xffffffff,
        scale_factor_of_earth_minor_axis: 0xff,
        scaled_value_of_earth_minor_axis: 0xffffffff,
    }
}

/// A regular latitude/longitude grid of `ni` x `nj` points at 0.5 degree
/// spacing, scanned from the north-west corner.
pub(crate) fn latlon_gds(ni: u32, nj: u32) -> GridDefinitionSection {
    let projection = ProjectionTemplate::LatLon(LatLonGridDefinition {
        earth_shape: earth_shape(),
        ni,
        nj,
        basic_angle: 0,
        basic_angle_subdivisions: 0xffffffff,
        first_point_lat: 40_000_000,
        first_point_lon: 135_000_000,
        resolution_flags: 0b00110000,
        last_point_lat: 40_000_000 - (nj as i32 - 1) * 500_000,
        last_point_lon: 135_000_000 + (ni as i32 - 1) * 500_000,
        i_direction_inc: 500_000,
        j_direction_inc: 500_000,
        scanning_mode: ScanningMode(0b00000000),
    });
    GridDefinitionSection::new(projection).unwrap()
}

/// A smooth field with a ridge, rounded to one decimal place.
pub(crate) fn smooth_field(ni: usize, nj: usize) -> Vec<f32> {
    (0..nj)
        .flat_map(|j| {
            (0..ni).map(move |i| {
                let x = i as f32 - ni as f32 / 2.;
                let y = j as f32 - nj as f32 / 3.;
                let raw = 280. - 0.05 * (x * x + y * y) + 0.3 * j as f32;
                (raw * 10.).round() / 10.
            })
        })
        .collect()
}

/// Asserts that every value equals its original to within `tolerance`.
pub(crate) fn assert_values_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "value at {i}: {a} differs from {e} by more than {tolerance}"
        );
    }
}
