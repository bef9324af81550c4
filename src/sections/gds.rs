use std::io::{self, Write};

use grib2_template_helpers::{Dump, DumpField, OctetSize, WriteToSlice, write_position_column};
use log::warn;

use super::{Section, SECTION_HEADER_LEN, check_trailing_octets, section_slice, write_error};
use crate::{
    error::GribError,
    grid::{Projection, ProjectionTemplate, ScanningMode},
    helpers::read_template,
};

// Code Table 3.11: numbers define number of points corresponding to full
// coordinate circles (i.e. parallels).
const LIST_OF_POINTS_PER_PARALLEL: u8 = 1;

/// Section 3 - Grid definition section.
///
/// Octets are laid out as follows:
///
/// | octets | field |
/// |---|---|
/// | 1-4 | length of the section |
/// | 5 | number of the section (3) |
/// | 6 | [`source`](Self::source) |
/// | 7-10 | [`num_points`](Self::num_points) |
/// | 11 | [`list_octets`](Self::list_octets) |
/// | 12 | [`list_interpretation`](Self::list_interpretation) |
/// | 13-14 | template number, derived from [`projection`](Self::projection) |
/// | 15-nn | [`projection`](Self::projection) |
/// | nn+1- | [`optional_list`](Self::optional_list), `list_octets` octets per entry |
#[derive(Debug, Clone, PartialEq)]
pub struct GridDefinitionSection {
    /// Source of grid definition (see Code table 3.0).
    pub source: u8,
    /// Number of data points.
    pub num_points: u32,
    /// Number of octets for optional list of numbers defining number of
    /// points.
    pub list_octets: u8,
    /// Interpretation of list of numbers defining number of points (see Code
    /// table 3.11).
    pub list_interpretation: u8,
    pub projection: ProjectionTemplate,
    /// Optional list of numbers defining number of points, e.g. per row of a
    /// quasi-regular grid.
    pub optional_list: Vec<u32>,
}

impl GridDefinitionSection {
    /// Creates a section for a regular grid whose point count is the product
    /// of its dimensions.
    pub fn new(projection: ProjectionTemplate) -> Result<Self, GribError> {
        let (width, height) = projection.grid_shape();
        let num_points = width.checked_mul(height).ok_or_else(|| {
            GribError::InvalidValue(format!("grid of {width}x{height} points is too large"))
        })?;
        Ok(Self {
            source: 0,
            num_points,
            list_octets: 0,
            list_interpretation: 0,
            projection,
            optional_list: Vec::new(),
        })
    }

    /// Creates a section for a quasi-regular grid with `row_point_counts`
    /// points on successive parallels.
    pub fn quasi_regular(
        projection: ProjectionTemplate,
        row_point_counts: Vec<u32>,
    ) -> Result<Self, GribError> {
        let num_points = row_point_counts
            .iter()
            .try_fold(0_u32, |sum, count| sum.checked_add(*count))
            .ok_or_else(|| GribError::InvalidValue("too many grid points".to_owned()))?;
        let max_count = row_point_counts.iter().copied().max().unwrap_or(0);
        let list_octets = (max_count.checked_ilog2().unwrap_or(0) / 8 + 1) as u8;
        Ok(Self {
            source: 0,
            num_points,
            list_octets,
            list_interpretation: LIST_OF_POINTS_PER_PARALLEL,
            projection,
            optional_list: row_point_counts,
        })
    }

    /// Grid definition template number (see Code table 3.1).
    pub fn template_num(&self) -> u16 {
        self.projection.template_num()
    }

    pub fn width(&self) -> u32 {
        self.projection.width()
    }

    pub fn height(&self) -> u32 {
        self.projection.height()
    }

    pub fn scanning_mode(&self) -> ScanningMode {
        self.projection.scanning_mode()
    }

    /// Returns the numbers of points on successive rows of a quasi-regular
    /// grid, or `None` if the grid is regular.
    ///
    /// For the number of values to expect in the data section,
    /// [`GridDefinitionSection::num_points`] stays authoritative.
    pub fn row_point_counts(&self) -> Option<&[u32]> {
        if self.optional_list.is_empty() {
            None
        } else {
            Some(&self.optional_list)
        }
    }

    fn check_optional_list(&self) -> Result<(), GribError> {
        if self.optional_list.is_empty() {
            return Ok(());
        }
        if !(1..=4).contains(&self.list_octets) {
            return Err(GribError::InvalidValue(format!(
                "optional list entries of {} octets",
                self.list_octets
            )));
        }
        let max = u64::MAX >> (64 - u32::from(self.list_octets) * 8);
        if let Some(count) = self
            .optional_list
            .iter()
            .find(|count| u64::from(**count) > max)
        {
            return Err(GribError::InvalidValue(format!(
                "{count} does not fit in {} octets",
                self.list_octets
            )));
        }
        Ok(())
    }
}

impl Section for GridDefinitionSection {
    const SECTION_NUMBER: u8 = 3;
    const NAME: &'static str = "Grid definition section";

    fn unpack(buf: &[u8]) -> Result<Self, GribError> {
        let section = section_slice(buf, Self::SECTION_NUMBER)?;
        let mut pos = SECTION_HEADER_LEN;
        let source = read_template(section, &mut pos)?;
        if source != 0 {
            return Err(GribError::NotSupported(format!(
                "GRIB2 code table 3.0 (source of grid definition): {source}"
            )));
        }
        let num_points = read_template(section, &mut pos)?;
        let list_octets = read_template(section, &mut pos)?;
        let list_interpretation = read_template(section, &mut pos)?;
        let template_num = read_template(section, &mut pos)?;
        let projection =
            ProjectionTemplate::try_from_slice_with_num(template_num, section, &mut pos)?;
        let optional_list = read_optional_list(section, &mut pos, list_octets)?;
        check_trailing_octets(section, pos, Self::SECTION_NUMBER);

        let num_listed = optional_list.iter().map(|count| u64::from(*count)).sum::<u64>();
        if !optional_list.is_empty() && num_listed != u64::from(num_points) {
            warn!("optional list sums to {num_listed} points while {num_points} are declared");
        }

        Ok(Self {
            source,
            num_points,
            list_octets,
            list_interpretation,
            projection,
            optional_list,
        })
    }

    fn body_len(&self) -> usize {
        1 + 4 + 1 + 1 + 2
            + self.projection.octet_size()
            + self.optional_list.len() * usize::from(self.list_octets)
    }

    fn pack_body(&self, buf: &mut [u8], pos: &mut usize) -> Result<(), GribError> {
        self.check_optional_list()?;
        self.source.write_to_slice(buf, pos).map_err(write_error)?;
        self.num_points.write_to_slice(buf, pos).map_err(write_error)?;
        self.list_octets.write_to_slice(buf, pos).map_err(write_error)?;
        self.list_interpretation
            .write_to_slice(buf, pos)
            .map_err(write_error)?;
        self.template_num()
            .write_to_slice(buf, pos)
            .map_err(write_error)?;
        self.projection
            .write_to_slice(buf, pos)
            .map_err(write_error)?;

        let num_octets = usize::from(self.list_octets);
        for count in &self.optional_list {
            let end = *pos + num_octets;
            let dest = buf
                .get_mut(*pos..end)
                .ok_or_else(|| write_error("slice capacity is too small"))?;
            dest.copy_from_slice(&count.to_be_bytes()[4 - num_octets..]);
            *pos = end;
        }
        Ok(())
    }

    fn dump_body<W: Write>(&self, pos: &mut usize, out: &mut W) -> io::Result<()> {
        self.source.dump_field(
            "source",
            None,
            "Source of grid definition (see Code table 3.0)",
            pos,
            out,
        )?;
        self.num_points
            .dump_field("num_points", None, "Number of data points", pos, out)?;
        self.list_octets.dump_field(
            "list_octets",
            None,
            "Number of octets for optional list of numbers defining number of points",
            pos,
            out,
        )?;
        self.list_interpretation.dump_field(
            "list_interpretation",
            None,
            "Interpretation of list of numbers defining number of points (see Code table 3.11)",
            pos,
            out,
        )?;
        self.template_num().dump_field(
            "template_num",
            None,
            "Grid definition template number (see Code table 3.1)",
            pos,
            out,
        )?;
        self.projection.dump(None, pos, out)?;

        for (i, count) in self.optional_list.iter().enumerate() {
            write_position_column(out, pos, usize::from(self.list_octets))?;
            writeln!(out, "optional_list[{i}] = {count}")?;
        }
        Ok(())
    }
}

fn read_optional_list(
    section: &[u8],
    pos: &mut usize,
    list_octets: u8,
) -> Result<Vec<u32>, GribError> {
    let rest = &section[*pos..];
    if list_octets == 0 || rest.is_empty() {
        return Ok(Vec::new());
    }
    if list_octets > 4 {
        return Err(GribError::NotSupported(format!(
            "optional list entries of {list_octets} octets"
        )));
    }

    let num_octets = usize::from(list_octets);
    if rest.len() % num_octets != 0 {
        return Err(GribError::InvalidValue(format!(
            "{} octets do not divide into list entries of {num_octets} octets",
            rest.len()
        )));
    }
    let list = rest
        .chunks_exact(num_octets)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0_u32, |acc, byte| (acc << 8) | u32::from(*byte))
        })
        .collect();
    *pos = section.len();
    Ok(list)
}
