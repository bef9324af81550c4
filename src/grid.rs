//! Grid definition templates (section 3) and the storage order of grid
//! points they describe.

use std::{borrow::Cow, io::Write};

use grib2_template_helpers::{
    Dump, DumpField, OctetSize, TryFromSlice, TryFromSliceResult, WriteToSlice,
    WriteToSliceResult, write_position_column,
};

pub use self::{
    arakawa::{ArakawaEGridDefinition, ArakawaNonEGridDefinition},
    earth::EarthShapeDefinition,
    gaussian::GaussianGridDefinition,
    lambert::LambertGridDefinition,
    latlon::LatLonGridDefinition,
    mercator::MercatorGridDefinition,
    polar_stereographic::PolarStereographicGridDefinition,
    rotated_ll::RotatedLatLonGridDefinition,
    space_view::SpaceViewGridDefinition,
};
use crate::{
    codetables::Table3_1,
    error::{GribError, TemplateCode},
    helpers::read_template,
};

const SECTION_NUMBER: u8 = 3;

/// Properties shared by every grid definition template.
pub trait Projection {
    /// Returns the shape of the grid, i.e. a tuple of the number of grids in
    /// the i and j directions.
    fn grid_shape(&self) -> (u32, u32);

    fn scanning_mode(&self) -> ScanningMode;

    fn earth_shape(&self) -> &EarthShapeDefinition;

    /// Returns the grid type.
    fn short_name(&self) -> &'static str;

    /// Returns an iterator over `(i, j)` of grid points in storage order.
    ///
    /// Note that this is a low-level API and it is not checked that the number
    /// of iterator iterations is consistent with the number of grid points
    /// defined in the data.
    fn ij(&self) -> Result<GridPointIndexIterator, GribError> {
        let scanning_mode = self.scanning_mode();
        if scanning_mode.has_unsupported_flags() {
            let ScanningMode(mode) = scanning_mode;
            return Err(GribError::NotSupported(format!("scanning mode {mode}")));
        }

        let (ni, nj) = self.grid_shape();
        if ni == u32::MAX || nj == u32::MAX {
            return Err(GribError::NotSupported(
                "grid points of quasi-regular grids".to_owned(),
            ));
        }
        let iter = GridPointIndexIterator::new(ni as usize, nj as usize, scanning_mode);
        Ok(iter)
    }
}

/// A grid definition template, one variant per supported projection.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionTemplate {
    /// Template 3.0.
    LatLon(LatLonGridDefinition),
    /// Template 3.1.
    RotatedLatLon(RotatedLatLonGridDefinition),
    /// Template 3.10.
    Mercator(MercatorGridDefinition),
    /// Template 3.20.
    PolarStereographic(PolarStereographicGridDefinition),
    /// Template 3.30.
    Lambert(LambertGridDefinition),
    /// Template 3.40.
    Gaussian(GaussianGridDefinition),
    /// Template 3.90.
    SpaceView(SpaceViewGridDefinition),
    /// Template 3.32768.
    ArakawaE(ArakawaEGridDefinition),
    /// Template 3.32769.
    ArakawaNonE(ArakawaNonEGridDefinition),
}

macro_rules! for_each_template {
    ($value:expr, $template:ident => $expr:expr) => {
        match $value {
            ProjectionTemplate::LatLon($template) => $expr,
            ProjectionTemplate::RotatedLatLon($template) => $expr,
            ProjectionTemplate::Mercator($template) => $expr,
            ProjectionTemplate::PolarStereographic($template) => $expr,
            ProjectionTemplate::Lambert($template) => $expr,
            ProjectionTemplate::Gaussian($template) => $expr,
            ProjectionTemplate::SpaceView($template) => $expr,
            ProjectionTemplate::ArakawaE($template) => $expr,
            ProjectionTemplate::ArakawaNonE($template) => $expr,
        }
    };
}

impl ProjectionTemplate {
    /// Reads the template numbered `num` at `pos`.
    ///
    /// Numbers defined in Code Table 3.1 without a variant here give
    /// [`GribError::TemplateNotImplemented`]; any other number gives
    /// [`GribError::TemplateUnknown`]. Nothing is read in either case.
    pub fn try_from_slice_with_num(
        num: u16,
        slice: &[u8],
        pos: &mut usize,
    ) -> Result<Self, GribError> {
        let code = TemplateCode::new(SECTION_NUMBER, num);
        let table = Table3_1::try_from(num).map_err(|_| GribError::TemplateUnknown(code))?;
        let template = match table {
            Table3_1::LatitudeLongitude => Self::LatLon(read_template(slice, pos)?),
            Table3_1::RotatedLatitudeLongitude => Self::RotatedLatLon(read_template(slice, pos)?),
            Table3_1::Mercator => Self::Mercator(read_template(slice, pos)?),
            Table3_1::PolarStereographic => Self::PolarStereographic(read_template(slice, pos)?),
            Table3_1::LambertConformal => Self::Lambert(read_template(slice, pos)?),
            Table3_1::GaussianLatitudeLongitude => Self::Gaussian(read_template(slice, pos)?),
            Table3_1::SpaceViewPerspective => Self::SpaceView(read_template(slice, pos)?),
            Table3_1::RotatedLatitudeLongitudeArakawaStaggeredE => {
                Self::ArakawaE(read_template(slice, pos)?)
            }
            Table3_1::RotatedLatitudeLongitudeArakawaNonE => {
                Self::ArakawaNonE(read_template(slice, pos)?)
            }
            _ => return Err(GribError::TemplateNotImplemented(code)),
        };
        Ok(template)
    }

    pub fn template_num(&self) -> u16 {
        let table = match self {
            Self::LatLon(_) => Table3_1::LatitudeLongitude,
            Self::RotatedLatLon(_) => Table3_1::RotatedLatitudeLongitude,
            Self::Mercator(_) => Table3_1::Mercator,
            Self::PolarStereographic(_) => Table3_1::PolarStereographic,
            Self::Lambert(_) => Table3_1::LambertConformal,
            Self::Gaussian(_) => Table3_1::GaussianLatitudeLongitude,
            Self::SpaceView(_) => Table3_1::SpaceViewPerspective,
            Self::ArakawaE(_) => Table3_1::RotatedLatitudeLongitudeArakawaStaggeredE,
            Self::ArakawaNonE(_) => Table3_1::RotatedLatitudeLongitudeArakawaNonE,
        };
        table.into()
    }

    /// Number of points along the i direction.
    pub fn width(&self) -> u32 {
        self.grid_shape().0
    }

    /// Number of points along the j direction.
    pub fn height(&self) -> u32 {
        self.grid_shape().1
    }
}

impl Projection for ProjectionTemplate {
    fn grid_shape(&self) -> (u32, u32) {
        for_each_template!(self, template => template.grid_shape())
    }

    fn scanning_mode(&self) -> ScanningMode {
        for_each_template!(self, template => template.scanning_mode())
    }

    fn earth_shape(&self) -> &EarthShapeDefinition {
        for_each_template!(self, template => template.earth_shape())
    }

    fn short_name(&self) -> &'static str {
        for_each_template!(self, template => template.short_name())
    }
}

impl OctetSize for ProjectionTemplate {
    fn octet_size(&self) -> usize {
        for_each_template!(self, template => template.octet_size())
    }
}

impl WriteToSlice for ProjectionTemplate {
    fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
        for_each_template!(self, template => template.write_to_slice(slice, pos))
    }
}

impl Dump for ProjectionTemplate {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), std::io::Error> {
        for_each_template!(self, template => template.dump(parent, pos, output))
    }
}

/// Scanning mode (Flag Table 3.4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScanningMode(pub u8);

impl ScanningMode {
    /// Returns `true` if points of the first row or column scan in the `+i`
    /// (`+x`) direction.
    ///
    /// # Examples
    ///
    /// ```
    /// assert_eq!(grib2_sections::ScanningMode(0b00000000).scans_positively_for_i(), true);
    /// assert_eq!(grib2_sections::ScanningMode(0b10000000).scans_positively_for_i(), false);
    /// ```
    pub fn scans_positively_for_i(&self) -> bool {
        self.0 & 0b10000000 == 0
    }

    /// Returns `true` if points of the first row or column scan in the `+j`
    /// (`+y`) direction.
    pub fn scans_positively_for_j(&self) -> bool {
        self.0 & 0b01000000 != 0
    }

    /// Returns `true` if adjacent points in `i` (`x`) direction are
    /// consecutive.
    pub fn is_consecutive_for_i(&self) -> bool {
        self.0 & 0b00100000 == 0
    }

    /// Returns `true` if adjacent rows scan in the opposite direction.
    pub fn scans_alternating_rows(&self) -> bool {
        self.0 & 0b00010000 != 0
    }

    /// Returns `true` if any of the offset flags for odd and even rows, or
    /// the `Ni`/`Nj` reduction flag, is set.
    pub fn has_unsupported_flags(&self) -> bool {
        self.0 & 0b00001111 != 0
    }
}

/// Projection centre (Flag Table 3.5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProjectionCentreFlag(pub u8);

impl ProjectionCentreFlag {
    /// Returns `true` if the North Pole is on the projection plane, and
    /// `false` if the South Pole is.
    pub fn contains_north_pole_on_projection_plane(&self) -> bool {
        self.0 & 0b10000000 == 0
    }

    /// Returns `true` if the projection is bipolar and symmetric.
    pub fn is_bipolar(&self) -> bool {
        self.0 & 0b01000000 != 0
    }
}

macro_rules! impl_octet_flags {
    ($($ty:ident,)*) => ($(
        impl TryFromSlice for $ty {
            fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self> {
                u8::try_from_slice(slice, pos).map(Self)
            }
        }

        impl WriteToSlice for $ty {
            fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
                self.0.write_to_slice(slice, pos)
            }
        }

        impl OctetSize for $ty {
            fn octet_size(&self) -> usize {
                1
            }
        }

        impl DumpField for $ty {
            fn dump_field<W: Write>(
                &self,
                name: &str,
                parent: Option<&Cow<str>>,
                doc: &str,
                pos: &mut usize,
                output: &mut W,
            ) -> Result<(), std::io::Error> {
                let size = self.octet_size();
                write_position_column(output, pos, size)?;
                if let Some(parent) = parent {
                    write!(output, "{parent}.")?;
                }
                write!(output, "{name} = {:#010b}", self.0)?;
                if doc.is_empty() {
                    writeln!(output)
                } else {
                    writeln!(output, "  // {doc}")
                }
            }
        }
    )*);
}

impl_octet_flags![ScanningMode, ProjectionCentreFlag,];

/// An iterator over `(i, j)` indices of grid points in the order they are
/// stored.
///
/// Indices count from the first grid point, whatever the directions in which
/// `i` and `j` scan.
///
/// # Examples
///
/// ```
/// use grib2_sections::{GridPointIndexIterator, ScanningMode};
///
/// let mut ij = GridPointIndexIterator::new(2, 3, ScanningMode(0b00010000));
/// assert_eq!(ij.next(), Some((0, 0)));
/// assert_eq!(ij.next(), Some((1, 0)));
/// assert_eq!(ij.next(), Some((1, 1)));
/// assert_eq!(ij.next(), Some((0, 1)));
/// ```
#[derive(Debug, Clone)]
pub struct GridPointIndexIterator {
    major_len: usize,
    minor_len: usize,
    scanning_mode: ScanningMode,
    major_pos: usize,
    minor_pos: usize,
    increments: bool,
}

impl GridPointIndexIterator {
    pub fn new(i_len: usize, j_len: usize, scanning_mode: ScanningMode) -> Self {
        let (major_len, minor_len) = if scanning_mode.is_consecutive_for_i() {
            (j_len, i_len)
        } else {
            (i_len, j_len)
        };

        Self {
            major_len,
            minor_len,
            scanning_mode,
            minor_pos: 0,
            major_pos: 0,
            increments: true,
        }
    }
}

impl Iterator for GridPointIndexIterator {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.major_pos >= self.major_len || self.minor_len == 0 {
            return None;
        }

        let minor = if self.increments {
            self.minor_pos
        } else {
            self.minor_len - self.minor_pos - 1
        };
        let major = self.major_pos;

        self.minor_pos += 1;
        if self.minor_pos == self.minor_len {
            self.major_pos += 1;
            self.minor_pos = 0;
            if self.scanning_mode.scans_alternating_rows() {
                self.increments = !self.increments;
            }
        }

        if self.scanning_mode.is_consecutive_for_i() {
            Some((minor, major))
        } else {
            Some((major, minor))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.major_len.saturating_sub(self.major_pos) * self.minor_len)
            .saturating_sub(self.minor_pos);
        (len, Some(len))
    }
}

mod arakawa;
mod earth;
mod gaussian;
mod lambert;
mod latlon;
mod mercator;
mod polar_stereographic;
mod rotated_ll;
mod space_view;
