use grib2_sections::{
    DataRepresentationSection, FieldCodec, GridDefinitionSection, PackingOptions, Section,
    encode_field,
};

mod utils;

const NI: u32 = 23;
const NJ: u32 = 17;

fn assert_section_round_trip<S: Section + PartialEq + std::fmt::Debug>(section: &S) {
    let buf = section.to_vec().unwrap();
    assert_eq!(buf.len(), section.packed_len());
    let declared = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    assert_eq!(declared as usize, buf.len());
    assert_eq!(buf[4], S::SECTION_NUMBER);

    let unpacked = S::unpack(&buf).unwrap();
    assert_eq!(&unpacked, section);
}

macro_rules! test_field_round_trip {
    ($(($name:ident, $template_num:expr, $options:expr),)*) => ($(
        #[test]
        fn $name() {
            let gds = utils::latlon_gds(NI, NJ);
            assert_section_round_trip(&gds);

            let values = utils::smooth_field(NI as usize, NJ as usize);
            let options: PackingOptions = $options;
            let (drs, payload) = encode_field(&gds, $template_num, &values, &options).unwrap();
            assert_eq!(drs.template_num, $template_num);
            assert_section_round_trip(&drs);

            let buf = drs.to_vec().unwrap();
            let drs = DataRepresentationSection::unpack(&buf).unwrap();
            let codec = FieldCodec::new(&gds, &drs).unwrap();
            let decoded = codec.decode(&payload).unwrap();
            utils::assert_values_close(&decoded, &values, 0.05);

            // Packing the decoded values again reproduces the packed integers.
            let (drs_again, payload_again) =
                encode_field(&gds, $template_num, &decoded, &options).unwrap();
            assert_eq!(drs_again, drs);
            assert_eq!(payload_again, payload);
        }
    )*);
}

test_field_round_trip! {
    (
        simple_packing_round_trip,
        0,
        PackingOptions::default().decimal_scale(1)
    ),
    (
        simple_packing_round_trip_with_fixed_bits,
        0,
        PackingOptions::default().decimal_scale(1).num_bits(16)
    ),
    (
        complex_packing_round_trip,
        2,
        PackingOptions::default().decimal_scale(1).group_len(10)
    ),
    (
        complex_packing_round_trip_with_single_group,
        2,
        PackingOptions::default().decimal_scale(1).group_len(NI * NJ)
    ),
    (
        complex_packing_with_first_order_spatial_differencing_round_trip,
        3,
        PackingOptions::default().decimal_scale(1).spatial_diff_order(1)
    ),
    (
        complex_packing_with_second_order_spatial_differencing_round_trip,
        3,
        PackingOptions::default().decimal_scale(1).spatial_diff_order(2).group_len(7)
    ),
}

#[cfg(feature = "jpeg2000-with-openjpeg")]
test_field_round_trip! {
    (
        jpeg2000_round_trip,
        40,
        PackingOptions::default().decimal_scale(1).image_shape(NI, NJ)
    ),
    (
        local_jpeg2000_round_trip,
        40000,
        PackingOptions::default().decimal_scale(1)
    ),
}

#[cfg(feature = "png-with-png-crate")]
test_field_round_trip! {
    (
        png_round_trip,
        41,
        PackingOptions::default().decimal_scale(1).image_shape(NI, NJ)
    ),
    (
        local_png_round_trip,
        40010,
        PackingOptions::default().decimal_scale(1)
    ),
}

#[test]
fn constant_field_round_trip_with_every_template() {
    let gds = utils::latlon_gds(4, 4);
    let values = vec![273.2_f32; 16];
    let mut template_nums = vec![0, 2, 3];
    if cfg!(feature = "jpeg2000-with-openjpeg") {
        template_nums.push(40);
    }
    if cfg!(feature = "png-with-png-crate") {
        template_nums.push(41);
    }

    for template_num in template_nums {
        let options = PackingOptions::default().decimal_scale(1);
        let (drs, payload) = encode_field(&gds, template_num, &values, &options).unwrap();
        assert_eq!(drs.template.simple().num_bits, 0);
        assert!(payload.is_empty());
        let decoded = drs.decode(&payload).unwrap();
        utils::assert_values_close(&decoded, &values, 1e-4);
    }
}

#[test]
fn quasi_regular_grid_round_trip() {
    let projection = grib2_sections::ProjectionTemplate::Gaussian(
        grib2_sections::GaussianGridDefinition {
            earth_shape: utils::earth_shape(),
            ni: u32::MAX,
            nj: 6,
            n: 3,
            i_direction_inc: u32::MAX,
            ..Default::default()
        },
    );
    let counts = vec![8, 16, 20, 20, 16, 8];
    let gds = GridDefinitionSection::quasi_regular(projection, counts.clone()).unwrap();
    assert_eq!(gds.num_points, 88);
    assert_section_round_trip(&gds);

    let values = utils::smooth_field(88, 1);
    let options = PackingOptions::default().decimal_scale(1);
    let (drs, payload) = encode_field(&gds, 3, &values, &options).unwrap();
    let codec = FieldCodec::new(&gds, &drs).unwrap();
    utils::assert_values_close(&codec.decode(&payload).unwrap(), &values, 0.05);
    assert_eq!(codec.grid_definition().row_point_counts(), Some(&counts[..]));
}
