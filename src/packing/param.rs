use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use crate::error::GribError;

#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct SimplePackingParam {
    /// Reference value (R) (IEEE 32-bit floating-point value).
    pub ref_val: f32,
    /// Binary scale factor (E).
    pub exp: i16,
    /// Decimal scale factor (D).
    pub dec: i16,
    /// Number of bits used for each packed value for simple packing, or for
    /// each group reference value for complex packing or spatial
    /// differencing.
    pub num_bits: u8,
    /// Type of original field values (see Code table 5.1).
    pub orig_field_type: u8,
}

impl SimplePackingParam {
    pub(crate) fn is_supported(&self) -> Result<(), GribError> {
        if self.orig_field_type != 0 {
            return Err(GribError::NotSupported(format!(
                "GRIB2 code table 5.1 (type of original field values): {}",
                self.orig_field_type
            )));
        }
        Ok(())
    }

    /// Value of every point of a field packed with zero bits.
    pub fn zero_bit_reference_value(&self) -> f32 {
        (f64::from(self.ref_val) / 10_f64.powi(i32::from(self.dec))) as f32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct ComplexPackingParam {
    /// Group splitting method used (see Code table 5.4).
    pub group_splitting_method: u8,
    /// Missing value management used (see Code table 5.5).
    pub missing_value_management: u8,
    /// Primary missing value substitute.
    pub primary_missing_value: u32,
    /// Secondary missing value substitute.
    pub secondary_missing_value: u32,
    /// NG - number of groups of data values into which field is split.
    pub num_groups: u32,
    /// Reference for group widths.
    pub group_width_ref: u8,
    /// Number of bits used for the group widths (after the reference value
    /// has been removed).
    pub num_group_width_bits: u8,
    /// Reference for group lengths.
    pub group_len_ref: u32,
    /// Length increment for the group lengths.
    pub group_len_inc: u8,
    /// True length of last group.
    pub group_len_last: u32,
    /// Number of bits used for the scaled group lengths (after subtraction
    /// of the reference value and division by the length increment).
    pub num_group_len_bits: u8,
}

impl ComplexPackingParam {
    pub(crate) fn is_supported(&self) -> Result<(), GribError> {
        if self.group_splitting_method != 1 {
            return Err(GribError::NotSupported(format!(
                "GRIB2 code table 5.4 (group splitting method): {}",
                self.group_splitting_method
            )));
        }
        if self.missing_value_management > 2 {
            return Err(GribError::NotSupported(format!(
                "GRIB2 code table 5.5 (missing value management for complex packing): {}",
                self.missing_value_management
            )));
        }
        if self.num_group_width_bits > 32 || self.num_group_len_bits > 32 {
            return Err(GribError::InvalidValue(format!(
                "group descriptor widths {} and {} exceed 32 bits",
                self.num_group_width_bits, self.num_group_len_bits
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct SpatialDifferencingParam {
    /// Order of spatial differencing (see Code table 5.6).
    pub order: u8,
    /// Number of octets required in the data section to specify extra
    /// descriptors needed for spatial differencing.
    pub num_extra_desc_octets: u8,
}
