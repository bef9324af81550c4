//! Length-prefixed GRIB2 sections handled by this crate.

use std::io::{self, Write};

use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};
use grib2_template_helpers::{Dump, WriteToSlice};
use log::{debug, warn};

pub use self::{drs::DataRepresentationSection, gds::GridDefinitionSection};
use crate::{error::GribError, helpers::read_template, time::ReferenceTime};

pub(crate) const SECTION_HEADER_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct SectionHeader {
    /// Length of section in octets (nn).
    pub len: u32,
    /// Number of section.
    pub sect_num: u8,
}

/// A section with a fixed section number, packed and unpacked as a whole.
pub trait Section: Sized {
    const SECTION_NUMBER: u8;
    const NAME: &'static str;

    /// Reads the section at the start of `buf`.
    ///
    /// `buf` may extend past the section; only the number of octets given by
    /// the length field is read. Octets inside the section that follow
    /// everything the template defines are skipped with a warning, not
    /// rejected.
    fn unpack(buf: &[u8]) -> Result<Self, GribError>;

    /// Number of octets following the section header.
    fn body_len(&self) -> usize;

    /// Writes everything following the section header.
    fn pack_body(&self, buf: &mut [u8], pos: &mut usize) -> Result<(), GribError>;

    /// Dumps everything following the section header.
    fn dump_body<W: Write>(&self, pos: &mut usize, out: &mut W) -> io::Result<()>;

    fn packed_len(&self) -> usize {
        SECTION_HEADER_LEN + self.body_len()
    }

    /// Writes the section at the start of `buf` and returns the number of
    /// octets written.
    ///
    /// Nothing is written if `buf` is shorter than [`Section::packed_len`].
    fn pack(&self, buf: &mut [u8]) -> Result<usize, GribError> {
        let len = self.packed_len();
        let available = buf.len();
        let buf = buf.get_mut(..len).ok_or(GribError::BufferTooSmall {
            required: len,
            available,
        })?;

        let mut pos = SECTION_HEADER_LEN;
        self.pack_body(buf, &mut pos)?;
        if pos != len {
            return Err(GribError::InvalidValue(format!(
                "section {} body occupies {pos} octets instead of {len}",
                Self::SECTION_NUMBER
            )));
        }

        let header = SectionHeader {
            len: u32::try_from(len).map_err(|_| {
                GribError::InvalidValue(format!("section length {len} exceeds 32 bits"))
            })?,
            sect_num: Self::SECTION_NUMBER,
        };
        header.write_to_slice(buf, &mut 0).map_err(write_error)?;
        debug!("packed section {} ({len} octets)", Self::SECTION_NUMBER);
        Ok(len)
    }

    fn to_vec(&self) -> Result<Vec<u8>, GribError> {
        let mut buf = vec![0; self.packed_len()];
        self.pack(&mut buf)?;
        Ok(buf)
    }

    /// Prints every field with its octet positions. `ref_time` is printed as
    /// a heading when given.
    fn print<W: Write>(&self, out: &mut W, ref_time: Option<&ReferenceTime>) -> io::Result<()> {
        if let Some(ref_time) = ref_time {
            writeln!(out, "# Reference time: {ref_time}")?;
        }
        writeln!(out, "## Section {} - {}", Self::SECTION_NUMBER, Self::NAME)?;
        let header = SectionHeader {
            len: u32::try_from(self.packed_len()).unwrap_or(u32::MAX),
            sect_num: Self::SECTION_NUMBER,
        };
        let mut pos = 1;
        header.dump(None, &mut pos, out)?;
        self.dump_body(&mut pos, out)
    }
}

/// Checks the header at the start of `buf` and returns the octets of the
/// section.
pub(crate) fn section_slice(buf: &[u8], section_number: u8) -> Result<&[u8], GribError> {
    let mut pos = 0;
    let header: SectionHeader = read_template(buf, &mut pos)?;
    if header.sect_num != section_number {
        return Err(GribError::WrongSectionNumber {
            expected: section_number,
            actual: header.sect_num,
        });
    }

    let len = header.len as usize;
    let section = buf.get(..len).ok_or(GribError::TruncatedSection {
        declared: len,
        available: buf.len(),
    })?;
    if len < SECTION_HEADER_LEN {
        return Err(GribError::InvalidValue(format!(
            "section length {len} is shorter than the section header"
        )));
    }
    debug!("unpacking section {section_number} ({len} octets)");
    Ok(section)
}

/// Logs octets left unread at the end of a section.
pub(crate) fn check_trailing_octets(section: &[u8], pos: usize, section_number: u8) {
    if pos < section.len() {
        warn!(
            "section {section_number}: {} trailing octets left unread",
            section.len() - pos
        );
    }
}

pub(crate) fn write_error(message: &'static str) -> GribError {
    GribError::InvalidValue(message.to_owned())
}

mod drs;
mod gds;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_slice_is_limited_to_section_length() {
        let buf = [0x00, 0x00, 0x00, 0x06, 0x05, 0xaa, 0xbb];
        let actual = section_slice(&buf, 5);
        assert_eq!(actual, Ok(&buf[..6]));
    }

    macro_rules! test_section_slice_failure {
        ($(($name:ident, $buf:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                let buf: &[u8] = &$buf;
                assert_eq!(section_slice(buf, 5), Err($expected));
            }
        )*);
    }

    test_section_slice_failure! {
        (
            section_slice_with_wrong_section_number,
            [0x00, 0x00, 0x00, 0x05, 0x03],
            GribError::WrongSectionNumber {
                expected: 5,
                actual: 3
            }
        ),
        (
            section_slice_shorter_than_declared,
            [0x00, 0x00, 0x00, 0x15, 0x05, 0x00, 0x00],
            GribError::TruncatedSection {
                declared: 21,
                available: 7
            }
        ),
        (
            section_slice_without_header,
            [0x00, 0x00, 0x00],
            GribError::TruncatedSection {
                declared: 5,
                available: 3
            }
        ),
        (
            section_slice_with_too_short_length,
            [0x00, 0x00, 0x00, 0x02, 0x05],
            GribError::InvalidValue(
                "section length 2 is shorter than the section header".to_owned()
            )
        ),
    }
}
