use grib2_template_helpers::OctetSize;

#[derive(Default, grib2_template_derive::OctetSize)]
pub struct Params {
    field1: u8,
    field2: u32,
    field3: InnerParams,
    field4: Option<u16>,
}

#[derive(Default, grib2_template_derive::OctetSize)]
pub struct InnerParams {
    field1: i16,
    field2: f32,
}

fn main() {
    let params = Params::default();
    assert_eq!(params.octet_size(), 11);

    let params = Params {
        field4: Some(7),
        ..Default::default()
    };
    assert_eq!(params.octet_size(), 13);
}
