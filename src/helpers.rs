use grib2_template_helpers::{AsGribSigned, OctetSize, TryFromSlice};

use crate::error::GribError;

/// Reads a sign-and-magnitude integer of 1 to 4 octets.
pub(crate) fn grib_int_from_bytes(bytes: &[u8]) -> Option<i32> {
    match *bytes {
        [a] => Some(i32::from(a.as_grib_signed())),
        [a, b] => Some(i32::from(u16::from_be_bytes([a, b]).as_grib_signed())),
        [a, b, c] => {
            let positive = a.leading_zeros() != 0;
            let abs = i32::from(a & 0x7f) << 16 | i32::from(b) << 8 | i32::from(c);
            Some(if positive { abs } else { -abs })
        }
        [a, b, c, d] => Some(u32::from_be_bytes([a, b, c, d]).as_grib_signed()),
        _ => None,
    }
}

/// Writes a sign-and-magnitude integer into `num_octets` octets.
///
/// Returns `None` if `num_octets` is not between 1 and 4 or the magnitude of
/// `value` does not fit in the remaining bits.
pub(crate) fn grib_int_to_bytes(value: i32, num_octets: usize) -> Option<Vec<u8>> {
    if !(1..=4).contains(&num_octets) {
        return None;
    }
    let magnitude = value.unsigned_abs();
    let num_bits = num_octets * 8 - 1;
    if num_bits_for(u64::from(magnitude)) > num_bits {
        return None;
    }
    let mut word = magnitude;
    if value < 0 {
        word |= 1 << num_bits;
    }
    Some(word.to_be_bytes()[4 - num_octets..].to_vec())
}

/// Number of bits required to represent `value`; 0 for 0.
pub(crate) fn num_bits_for(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()) as usize
}

/// Number of octets required to hold `num_values` values of `num_bits` bits.
pub(crate) fn num_octets(num_values: usize, num_bits: usize) -> usize {
    (num_values * num_bits).div_ceil(8)
}

/// Reads a fixed-layout structure, reporting a short slice as a truncated
/// section. `pos` is left unchanged on failure.
pub(crate) fn read_template<T>(slice: &[u8], pos: &mut usize) -> Result<T, GribError>
where
    T: TryFromSlice + OctetSize + Default,
{
    let start = *pos;
    T::try_from_slice(slice, pos).map_err(|_| {
        *pos = start;
        GribError::TruncatedSection {
            declared: start + T::default().octet_size(),
            available: slice.len(),
        }
    })
}
