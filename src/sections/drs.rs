use std::io::{self, Write};

use grib2_template_helpers::{Dump, DumpField, OctetSize, WriteToSlice};
use log::debug;

use super::{Section, SECTION_HEADER_LEN, check_trailing_octets, section_slice, write_error};
use crate::{
    error::GribError,
    helpers::read_template,
    packing::{PackingOptions, PackingTemplate},
};

/// Section 5 - Data representation section.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRepresentationSection {
    /// Number of data points where one or more values are specified in
    /// section 7 when a bit map is present, total number of data points when
    /// a bit map is absent.
    pub num_encoded_points: u32,
    /// Data representation template number (see Code table 5.0).
    pub template_num: u16,
    pub template: PackingTemplate,
}

impl DataRepresentationSection {
    /// Packs `values` with the template numbered `template_num`, returning
    /// the section and the section 7 payload.
    ///
    /// ```
    /// use grib2_sections::{DataRepresentationSection, PackingOptions};
    ///
    /// let values = [1.5, 2.0, 2.5, 3.0];
    /// let options = PackingOptions::default().decimal_scale(1);
    /// let (drs, payload) = DataRepresentationSection::encode(0, &values, &options).unwrap();
    /// assert_eq!(drs.num_encoded_points, 4);
    /// assert_eq!(drs.decode(&payload).unwrap(), values);
    /// ```
    pub fn encode(
        template_num: u16,
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        let num_encoded_points = u32::try_from(values.len()).map_err(|_| {
            GribError::InvalidValue(format!("{} values exceed 32-bit count", values.len()))
        })?;
        let (template, payload) = PackingTemplate::encode(template_num, values, options)?;
        debug!(
            "packed {num_encoded_points} values with template 5.{template_num} into {} octets",
            payload.len()
        );
        let section = Self {
            num_encoded_points,
            template_num,
            template,
        };
        Ok((section, payload))
    }

    /// Unpacks the values in a section 7 payload.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        self.template.decode(self.num_encoded_points as usize, payload)
    }
}

impl Section for DataRepresentationSection {
    const SECTION_NUMBER: u8 = 5;
    const NAME: &'static str = "Data representation section";

    fn unpack(buf: &[u8]) -> Result<Self, GribError> {
        let section = section_slice(buf, Self::SECTION_NUMBER)?;
        let mut pos = SECTION_HEADER_LEN;
        let num_encoded_points = read_template(section, &mut pos)?;
        let template_num = read_template(section, &mut pos)?;
        let template = PackingTemplate::try_from_slice_with_num(template_num, section, &mut pos)?;
        check_trailing_octets(section, pos, Self::SECTION_NUMBER);

        Ok(Self {
            num_encoded_points,
            template_num,
            template,
        })
    }

    fn body_len(&self) -> usize {
        4 + 2 + self.template.octet_size()
    }

    fn pack_body(&self, buf: &mut [u8], pos: &mut usize) -> Result<(), GribError> {
        if !self.template.is_designated_by(self.template_num) {
            return Err(GribError::InvalidValue(format!(
                "template number 5.{} does not designate the template held (5.{})",
                self.template_num,
                self.template.template_num()
            )));
        }
        self.num_encoded_points
            .write_to_slice(buf, pos)
            .map_err(write_error)?;
        self.template_num
            .write_to_slice(buf, pos)
            .map_err(write_error)?;
        self.template.write_to_slice(buf, pos).map_err(write_error)
    }

    fn dump_body<W: Write>(&self, pos: &mut usize, out: &mut W) -> io::Result<()> {
        self.num_encoded_points.dump_field(
            "num_encoded_points",
            None,
            "Number of data points where one or more values are specified in Section 7",
            pos,
            out,
        )?;
        self.template_num.dump_field(
            "template_num",
            None,
            "Data representation template number (see Code table 5.0)",
            pos,
            out,
        )?;
        self.template.dump(None, pos, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::TemplateCode,
        packing::{SimplePackingParam, SimplePackingTemplate},
    };

    // Simple packing of 12 values with R = 100.0, E = 0, D = 1 and 8 bits.
    const SECTION_BYTES: [u8; 21] = [
        0x00, 0x00, 0x00, 0x15, 0x05, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x00, 0x42, 0xc8, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00,
    ];

    fn simple_section() -> DataRepresentationSection {
        DataRepresentationSection {
            num_encoded_points: 12,
            template_num: 0,
            template: PackingTemplate::Simple(SimplePackingTemplate {
                simple: SimplePackingParam {
                    ref_val: 100.0,
                    exp: 0,
                    dec: 1,
                    num_bits: 8,
                    orig_field_type: 0,
                },
            }),
        }
    }

    #[test]
    fn unpacking_simple_packing_section() {
        let actual = DataRepresentationSection::unpack(&SECTION_BYTES).unwrap();
        assert_eq!(actual, simple_section());
    }

    #[test]
    fn packing_simple_packing_section() {
        let section = simple_section();
        assert_eq!(section.packed_len(), 21);
        let mut buf = [0xff_u8; 32];
        let len = section.pack(&mut buf).unwrap();
        assert_eq!(len, 21);
        assert_eq!(&buf[..21], &SECTION_BYTES);
        assert_eq!(&buf[21..], &[0xff; 11]);
    }

    #[test]
    fn unpacking_ignores_octets_after_section() {
        let mut buf = SECTION_BYTES.to_vec();
        buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x09, 0x06]);
        let actual = DataRepresentationSection::unpack(&buf).unwrap();
        assert_eq!(actual, simple_section());
    }

    #[test]
    fn unpacking_skips_unread_octets_inside_section() {
        let mut buf = SECTION_BYTES.to_vec();
        buf[3] = 0x17;
        buf.extend_from_slice(&[0xde, 0xad]);
        let actual = DataRepresentationSection::unpack(&buf).unwrap();
        assert_eq!(actual, simple_section());
    }

    #[test]
    fn packing_into_small_buffer() {
        let mut buf = [0_u8; 20];
        let actual = simple_section().pack(&mut buf);
        assert_eq!(
            actual,
            Err(GribError::BufferTooSmall {
                required: 21,
                available: 20
            })
        );
        assert_eq!(buf, [0; 20]);
    }

    #[test]
    fn packing_with_template_number_of_other_variant() {
        let mut section = simple_section();
        section.template_num = 2;
        assert!(matches!(
            section.to_vec(),
            Err(GribError::InvalidValue(_))
        ));
    }

    #[test]
    fn unpacking_local_jpeg2000_template_number() {
        let mut section = simple_section();
        section.template_num = 40000;
        section.template = PackingTemplate::Jpeg2000(crate::packing::Jpeg2000PackingTemplate {
            simple: SimplePackingParam {
                num_bits: 12,
                ..Default::default()
            },
            compression_type: 0,
            compression_ratio: 0xff,
        });
        let buf = section.to_vec().unwrap();
        assert_eq!(buf.len(), 23);
        assert_eq!(&buf[9..11], &[0x9c, 0x40]);
        assert_eq!(DataRepresentationSection::unpack(&buf).unwrap(), section);
    }

    macro_rules! test_unpacking_failure {
        ($(($name:ident, $modify:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                let mut buf = SECTION_BYTES.to_vec();
                let modify: fn(&mut Vec<u8>) = $modify;
                modify(&mut buf);
                assert_eq!(DataRepresentationSection::unpack(&buf), Err($expected));
            }
        )*);
    }

    test_unpacking_failure! {
        (
            unpacking_with_wrong_section_number,
            |buf| buf[4] = 3,
            GribError::WrongSectionNumber {
                expected: 5,
                actual: 3
            }
        ),
        (
            unpacking_truncated_section,
            |buf| buf.truncate(15),
            GribError::TruncatedSection {
                declared: 21,
                available: 15
            }
        ),
        (
            unpacking_with_unknown_template,
            |buf| buf[10] = 99,
            GribError::TemplateUnknown(TemplateCode::new(5, 99))
        ),
        (
            unpacking_with_unimplemented_template,
            |buf| buf[10] = 42,
            GribError::TemplateNotImplemented(TemplateCode::new(5, 42))
        ),
        (
            unpacking_with_section_too_short_for_template,
            |buf| {
                buf[3] = 0x12;
                buf.truncate(18);
            },
            GribError::TruncatedSection {
                declared: 21,
                available: 18
            }
        ),
    }

    #[test]
    fn printing_section() {
        let mut out = Vec::new();
        let ref_time = crate::ReferenceTime::new(2024, 2, 29, 18, 0, 0);
        simple_section().print(&mut out, Some(&ref_time)).unwrap();
        let out = String::from_utf8(out).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("# Reference time: 2024-02-29 18:00:00 UTC"));
        assert_eq!(lines.next(), Some("## Section 5 - Data representation section"));
        assert_eq!(
            lines.next(),
            Some("1-4       len = 21  // Length of section in octets (nn).")
        );
        assert_eq!(
            lines.next(),
            Some("5         sect_num = 5  // Number of section.")
        );
        assert!(out.contains("12-15     simple.ref_val = 100.0"));
        assert!(out.contains("21        simple.orig_field_type = 0"));
    }
}
