//! Data representation templates (section 5) and the packing of section 7
//! payloads they describe.

use std::{borrow::Cow, io::Write};

use grib2_template_helpers::{Dump, OctetSize, WriteToSlice, WriteToSliceResult};

pub use self::{
    complex::{ComplexPackingTemplate, ComplexSpatialPackingTemplate},
    jpeg2000::Jpeg2000PackingTemplate,
    param::{ComplexPackingParam, SimplePackingParam, SpatialDifferencingParam},
    png::PngPackingTemplate,
    simple::SimplePackingTemplate,
};
use crate::{
    codetables::Table5_0,
    error::{GribError, TemplateCode},
    helpers::read_template,
};

const SECTION_NUMBER: u8 = 5;

/// Options controlling how a field is quantized and packed.
///
/// ```
/// use grib2_sections::PackingOptions;
///
/// let options = PackingOptions::default()
///     .decimal_scale(1)
///     .num_bits(12)
///     .group_len(8);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingOptions {
    pub(crate) decimal_scale: i16,
    pub(crate) num_bits: Option<u8>,
    pub(crate) group_len: u32,
    pub(crate) spatial_diff_order: u8,
    pub(crate) image_shape: Option<(u32, u32)>,
}

impl Default for PackingOptions {
    fn default() -> Self {
        Self {
            decimal_scale: 0,
            num_bits: None,
            group_len: 16,
            spatial_diff_order: 2,
            image_shape: None,
        }
    }
}

impl PackingOptions {
    /// Sets the decimal scale factor D; values are multiplied by 10^D before
    /// quantization.
    pub fn decimal_scale(self, decimal_scale: i16) -> Self {
        Self {
            decimal_scale,
            ..self
        }
    }

    /// Fixes the number of bits per packed value. A binary scale factor is
    /// then chosen so that the range of the field fits.
    ///
    /// Without this, the smallest width holding the scaled range exactly is
    /// used.
    pub fn num_bits(self, num_bits: u8) -> Self {
        Self {
            num_bits: Some(num_bits),
            ..self
        }
    }

    /// Sets the number of values per group for complex packing.
    pub fn group_len(self, group_len: u32) -> Self {
        Self { group_len, ..self }
    }

    /// Sets the order (1 or 2) of spatial differencing.
    pub fn spatial_diff_order(self, spatial_diff_order: u8) -> Self {
        Self {
            spatial_diff_order,
            ..self
        }
    }

    /// Sets the width and height of the image that JPEG 2000 and PNG codecs
    /// compress. Defaults to a single row.
    pub fn image_shape(self, width: u32, height: u32) -> Self {
        Self {
            image_shape: Some((width, height)),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), GribError> {
        if let Some(num_bits) = self.num_bits {
            if !(1..=32).contains(&num_bits) {
                return Err(GribError::InvalidValue(format!(
                    "number of bits per value must be between 1 and 32, not {num_bits}"
                )));
            }
        }
        if self.group_len == 0 {
            return Err(GribError::InvalidValue(
                "group length must be positive".to_owned(),
            ));
        }
        if let Some((width, height)) = self.image_shape {
            if width == 0 || height == 0 {
                return Err(GribError::InvalidValue(format!(
                    "image shape {width}x{height} is empty"
                )));
            }
        }
        Ok(())
    }

    /// Returns the image dimensions for `num_values` values.
    pub(crate) fn image_shape_for(&self, num_values: usize) -> Result<(u32, u32), GribError> {
        match self.image_shape {
            Some((width, height)) => {
                if u64::from(width) * u64::from(height) != num_values as u64 {
                    return Err(GribError::InvalidValue(format!(
                        "image shape {width}x{height} does not hold {num_values} values"
                    )));
                }
                Ok((width, height))
            }
            None => {
                let width = u32::try_from(num_values).map_err(|_| {
                    GribError::InvalidValue(format!("{num_values} values do not fit in a row"))
                })?;
                Ok((width, 1))
            }
        }
    }
}

/// A data representation template, one variant per supported packing.
#[derive(Debug, Clone, PartialEq)]
pub enum PackingTemplate {
    /// Template 5.0.
    Simple(SimplePackingTemplate),
    /// Template 5.2.
    Complex(ComplexPackingTemplate),
    /// Template 5.3.
    ComplexSpatial(ComplexSpatialPackingTemplate),
    /// Template 5.40 and its local equivalent 5.40000.
    Jpeg2000(Jpeg2000PackingTemplate),
    /// Template 5.41 and its local equivalent 5.40010.
    Png(PngPackingTemplate),
}

impl PackingTemplate {
    /// Reads the template numbered `num` at `pos`.
    ///
    /// Numbers defined in Code Table 5.0 without a variant here give
    /// [`GribError::TemplateNotImplemented`]; any other number gives
    /// [`GribError::TemplateUnknown`]. Nothing is read in either case.
    pub fn try_from_slice_with_num(
        num: u16,
        slice: &[u8],
        pos: &mut usize,
    ) -> Result<Self, GribError> {
        let template = match supported_table5_0(num)? {
            Table5_0::SimplePacking => Self::Simple(read_template(slice, pos)?),
            Table5_0::ComplexPacking => Self::Complex(read_template(slice, pos)?),
            Table5_0::ComplexPackingAndSpatialDifferencing => {
                Self::ComplexSpatial(read_template(slice, pos)?)
            }
            Table5_0::Jpeg2000 | Table5_0::Jpeg2000Local => {
                Self::Jpeg2000(read_template(slice, pos)?)
            }
            Table5_0::Png | Table5_0::PngLocal => Self::Png(read_template(slice, pos)?),
            _ => return Err(GribError::TemplateNotImplemented(code(num))),
        };
        Ok(template)
    }

    /// Quantizes `values` and packs them with the template numbered `num`,
    /// returning the template and the section 7 payload.
    pub fn encode(
        num: u16,
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        options.validate()?;
        let packed = match supported_table5_0(num)? {
            Table5_0::SimplePacking => {
                let (template, payload) = SimplePackingTemplate::encode(values, options)?;
                (Self::Simple(template), payload)
            }
            Table5_0::ComplexPacking => {
                let (template, payload) = ComplexPackingTemplate::encode(values, options)?;
                (Self::Complex(template), payload)
            }
            Table5_0::ComplexPackingAndSpatialDifferencing => {
                let (template, payload) = ComplexSpatialPackingTemplate::encode(values, options)?;
                (Self::ComplexSpatial(template), payload)
            }
            Table5_0::Jpeg2000 | Table5_0::Jpeg2000Local => {
                let (template, payload) = Jpeg2000PackingTemplate::encode(values, options)?;
                (Self::Jpeg2000(template), payload)
            }
            Table5_0::Png | Table5_0::PngLocal => {
                let (template, payload) = PngPackingTemplate::encode(values, options)?;
                (Self::Png(template), payload)
            }
            _ => return Err(GribError::TemplateNotImplemented(code(num))),
        };
        Ok(packed)
    }

    /// Unpacks `num_encoded` values from a section 7 payload.
    pub fn decode(&self, num_encoded: usize, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        match self {
            Self::Simple(template) => template.decode(num_encoded, payload),
            Self::Complex(template) => template.decode(num_encoded, payload),
            Self::ComplexSpatial(template) => template.decode(num_encoded, payload),
            Self::Jpeg2000(template) => template.decode(num_encoded, payload),
            Self::Png(template) => template.decode(num_encoded, payload),
        }
    }

    /// Template number written when none is given explicitly.
    pub fn template_num(&self) -> u16 {
        let table = match self {
            Self::Simple(_) => Table5_0::SimplePacking,
            Self::Complex(_) => Table5_0::ComplexPacking,
            Self::ComplexSpatial(_) => Table5_0::ComplexPackingAndSpatialDifferencing,
            Self::Jpeg2000(_) => Table5_0::Jpeg2000,
            Self::Png(_) => Table5_0::Png,
        };
        table.into()
    }

    /// Returns `true` if `num` designates this variant.
    pub fn is_designated_by(&self, num: u16) -> bool {
        matches!(
            (self, Table5_0::try_from(num)),
            (Self::Simple(_), Ok(Table5_0::SimplePacking))
                | (Self::Complex(_), Ok(Table5_0::ComplexPacking))
                | (
                    Self::ComplexSpatial(_),
                    Ok(Table5_0::ComplexPackingAndSpatialDifferencing)
                )
                | (
                    Self::Jpeg2000(_),
                    Ok(Table5_0::Jpeg2000 | Table5_0::Jpeg2000Local)
                )
                | (Self::Png(_), Ok(Table5_0::Png | Table5_0::PngLocal))
        )
    }

    /// Scaling parameters shared by every variant.
    pub fn simple(&self) -> &SimplePackingParam {
        match self {
            Self::Simple(template) => &template.simple,
            Self::Complex(template) => &template.simple,
            Self::ComplexSpatial(template) => &template.simple,
            Self::Jpeg2000(template) => &template.simple,
            Self::Png(template) => &template.simple,
        }
    }
}

impl OctetSize for PackingTemplate {
    fn octet_size(&self) -> usize {
        match self {
            Self::Simple(template) => template.octet_size(),
            Self::Complex(template) => template.octet_size(),
            Self::ComplexSpatial(template) => template.octet_size(),
            Self::Jpeg2000(template) => template.octet_size(),
            Self::Png(template) => template.octet_size(),
        }
    }
}

impl WriteToSlice for PackingTemplate {
    fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
        match self {
            Self::Simple(template) => template.write_to_slice(slice, pos),
            Self::Complex(template) => template.write_to_slice(slice, pos),
            Self::ComplexSpatial(template) => template.write_to_slice(slice, pos),
            Self::Jpeg2000(template) => template.write_to_slice(slice, pos),
            Self::Png(template) => template.write_to_slice(slice, pos),
        }
    }
}

impl Dump for PackingTemplate {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), std::io::Error> {
        match self {
            Self::Simple(template) => template.dump(parent, pos, output),
            Self::Complex(template) => template.dump(parent, pos, output),
            Self::ComplexSpatial(template) => template.dump(parent, pos, output),
            Self::Jpeg2000(template) => template.dump(parent, pos, output),
            Self::Png(template) => template.dump(parent, pos, output),
        }
    }
}

fn code(num: u16) -> TemplateCode {
    TemplateCode::new(SECTION_NUMBER, num)
}

fn supported_table5_0(num: u16) -> Result<Table5_0, GribError> {
    Table5_0::try_from(num).map_err(|_| GribError::TemplateUnknown(code(num)))
}

mod complex;
mod jpeg2000;
mod param;
mod png;
mod simple;
mod stream;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_packing_template_dispatch {
        ($(($name:ident, $num:expr, $expected:pat),)*) => ($(
            #[test]
            fn $name() {
                let buf = [0_u8; 64];
                let mut pos = 0;
                let actual = PackingTemplate::try_from_slice_with_num($num, &buf, &mut pos);
                assert!(matches!(actual, $expected));
            }
        )*);
    }

    test_packing_template_dispatch! {
        (dispatch_to_simple_packing, 0, Ok(PackingTemplate::Simple(_))),
        (dispatch_to_complex_packing, 2, Ok(PackingTemplate::Complex(_))),
        (
            dispatch_to_complex_spatial_packing,
            3,
            Ok(PackingTemplate::ComplexSpatial(_))
        ),
        (dispatch_to_jpeg2000_packing, 40, Ok(PackingTemplate::Jpeg2000(_))),
        (dispatch_to_local_jpeg2000_packing, 40000, Ok(PackingTemplate::Jpeg2000(_))),
        (dispatch_to_png_packing, 41, Ok(PackingTemplate::Png(_))),
        (dispatch_to_local_png_packing, 40010, Ok(PackingTemplate::Png(_))),
        (
            dispatch_of_matrix_packing,
            1,
            Err(GribError::TemplateNotImplemented(TemplateCode { section: 5, number: 1 }))
        ),
        (
            dispatch_of_ieee_packing,
            4,
            Err(GribError::TemplateNotImplemented(TemplateCode { section: 5, number: 4 }))
        ),
        (
            dispatch_of_ccsds_packing,
            42,
            Err(GribError::TemplateNotImplemented(TemplateCode { section: 5, number: 42 }))
        ),
        (
            dispatch_of_run_length_packing,
            200,
            Err(GribError::TemplateNotImplemented(TemplateCode { section: 5, number: 200 }))
        ),
        (
            dispatch_of_unknown_template,
            99,
            Err(GribError::TemplateUnknown(TemplateCode { section: 5, number: 99 }))
        ),
    }

    #[test]
    fn dispatch_failure_does_not_consume_octets() {
        let buf = [0_u8; 64];
        let mut pos = 3;
        let _ = PackingTemplate::try_from_slice_with_num(99, &buf, &mut pos);
        assert_eq!(pos, 3);
    }

    #[test]
    fn template_sizes() {
        let buf = [0_u8; 64];
        for (num, size) in [(0, 10), (2, 36), (3, 38), (40, 12), (41, 10)] {
            let mut pos = 0;
            let template = PackingTemplate::try_from_slice_with_num(num, &buf, &mut pos).unwrap();
            assert_eq!(pos, size);
            assert_eq!(template.octet_size(), size);
        }
    }

    #[test]
    fn reading_template_from_short_slice() {
        let buf = [0_u8; 20];
        let mut pos = 11;
        let actual = PackingTemplate::try_from_slice_with_num(2, &buf, &mut pos);
        assert_eq!(
            actual,
            Err(GribError::TruncatedSection {
                declared: 47,
                available: 20
            })
        );
    }

    #[test]
    fn template_designation() {
        let template = PackingTemplate::Png(PngPackingTemplate::default());
        assert_eq!(template.template_num(), 41);
        assert!(template.is_designated_by(41));
        assert!(template.is_designated_by(40010));
        assert!(!template.is_designated_by(40));
    }

    macro_rules! test_invalid_packing_options {
        ($(($name:ident, $options:expr),)*) => ($(
            #[test]
            fn $name() {
                let actual = $options.validate();
                assert!(matches!(actual, Err(GribError::InvalidValue(_))));
            }
        )*);
    }

    test_invalid_packing_options! {
        (packing_options_with_zero_bits, PackingOptions::default().num_bits(0)),
        (packing_options_with_too_many_bits, PackingOptions::default().num_bits(33)),
        (packing_options_with_empty_groups, PackingOptions::default().group_len(0)),
        (packing_options_with_empty_image, PackingOptions::default().image_shape(0, 4)),
    }

    #[test]
    fn image_shape_defaults_to_single_row() {
        let options = PackingOptions::default();
        assert_eq!(options.image_shape_for(12), Ok((12, 1)));
        let options = options.image_shape(4, 3);
        assert_eq!(options.image_shape_for(12), Ok((4, 3)));
        assert!(options.image_shape_for(11).is_err());
    }

    #[test]
    fn encoding_with_template_without_variant_fails() {
        let actual = PackingTemplate::encode(99, &[1.0], &PackingOptions::default());
        assert_eq!(
            actual,
            Err(GribError::TemplateUnknown(TemplateCode::new(5, 99)))
        );
        let actual = PackingTemplate::encode(50, &[1.0], &PackingOptions::default());
        assert_eq!(
            actual,
            Err(GribError::TemplateNotImplemented(TemplateCode::new(5, 50)))
        );
    }
}
