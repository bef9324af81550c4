use crate::as_grib_signed::AsGribSigned;

/// A deserializer that reads a slice and stores output data in a struct.
///
/// # Examples
///
/// ```
/// use grib2_template_helpers::{TryFromSlice, TryFromSliceResult};
///
/// #[derive(Debug, PartialEq, Eq)]
/// struct VariableLength {
///     len: u8,
///     seq: Vec<u8>,
/// }
///
/// impl TryFromSlice for VariableLength {
///     fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self> {
///         let len = u8::try_from_slice(slice, pos)?;
///         let end = *pos + usize::from(len);
///         if slice.len() < end {
///             return Err("too short slice");
///         }
///         let seq = slice[*pos..end].to_vec();
///         *pos = end;
///         Ok(Self { len, seq })
///     }
/// }
///
/// let mut pos = 0;
/// let actual = VariableLength::try_from_slice(&[3, 1, 2, 3], &mut pos);
/// let expected = Ok(VariableLength {
///     len: 3,
///     seq: vec![1, 2, 3],
/// });
/// assert_eq!(actual, expected);
/// assert_eq!(pos, 4);
/// ```
pub trait TryFromSlice {
    /// Performs reading. The `pos` argument is a variable storing the starting
    /// position for reading within the slice.
    ///
    /// As reading proceeds, this `pos` changes, allowing the user to track how
    /// far they have read. On failure, `pos` is left unchanged for primitive
    /// values.
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self>
    where
        Self: Sized;
}

pub type TryFromSliceResult<T> = Result<T, &'static str>;

impl<const N: usize> TryFromSlice for [u8; N] {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<[u8; N]> {
        let start = *pos;
        let end = start.checked_add(N).ok_or("slice position overflow")?;
        let bytes = slice.get(start..end).ok_or("slice length is too short")?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        *pos = end;
        Ok(out)
    }
}

macro_rules! add_impl_for_unsigned_integer_and_float_types {
    ($($ty:ty,)*) => ($(
        impl TryFromSlice for $ty {
            fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<$ty> {
                let n = <$ty>::from_be_bytes(TryFromSlice::try_from_slice(slice, pos)?);
                Ok(n)
            }
        }
    )*);
}

add_impl_for_unsigned_integer_and_float_types![u8, u16, u32, u64, f32, f64,];

macro_rules! add_impl_for_signed_integer_types {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl TryFromSlice for $ty_dst {
            fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<$ty_dst> {
                let n = <$ty_src>::from_be_bytes(TryFromSlice::try_from_slice(slice, pos)?)
                    .as_grib_signed();
                Ok(n)
            }
        }
    )*);
}

add_impl_for_signed_integer_types![(u8, i8), (u16, i16), (u32, i32), (u64, i64),];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_numbers_in_sequence() {
        let slice = [0x00, 0x01, 0x80, 0x02, 0x3f, 0x80, 0x00, 0x00, 0xff];
        let mut pos = 0;
        assert_eq!(u16::try_from_slice(&slice, &mut pos), Ok(1));
        assert_eq!(i16::try_from_slice(&slice, &mut pos), Ok(-2));
        assert_eq!(f32::try_from_slice(&slice, &mut pos), Ok(1.0));
        assert_eq!(u8::try_from_slice(&slice, &mut pos), Ok(0xff));
        assert_eq!(pos, slice.len());
    }

    #[test]
    fn reading_past_the_end_fails_without_moving() {
        let slice = [0x00, 0x01, 0x02];
        let mut pos = 1;
        assert_eq!(
            u32::try_from_slice(&slice, &mut pos),
            Err("slice length is too short")
        );
        assert_eq!(pos, 1);
    }
}
