use crate::as_grib_signed::ToGribUnsigned;

/// A serializer that writes a value into a slice at a cursor position.
///
/// Writing never goes past the end of the slice; if the value does not fit,
/// an error is returned and nothing is written.
///
/// # Examples
///
/// ```
/// use grib2_template_helpers::WriteToSlice;
///
/// let mut buf = [0_u8; 4];
/// let mut pos = 0;
/// 0x0102_u16.write_to_slice(&mut buf, &mut pos).unwrap();
/// (-3_i16).write_to_slice(&mut buf, &mut pos).unwrap();
/// assert_eq!(buf, [0x01, 0x02, 0x80, 0x03]);
/// assert!(1_u8.write_to_slice(&mut buf, &mut pos).is_err());
/// ```
pub trait WriteToSlice {
    fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult;
}

pub type WriteToSliceResult = Result<(), &'static str>;

impl<const N: usize> WriteToSlice for [u8; N] {
    fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
        let start = *pos;
        let end = start.checked_add(N).ok_or("slice position overflow")?;
        let dest = slice
            .get_mut(start..end)
            .ok_or("slice capacity is too small")?;
        dest.copy_from_slice(self);
        *pos = end;
        Ok(())
    }
}

macro_rules! add_impl_for_unsigned_integer_and_float_types {
    ($($ty:ty,)*) => ($(
        impl WriteToSlice for $ty {
            fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
                self.to_be_bytes().write_to_slice(slice, pos)
            }
        }
    )*);
}

add_impl_for_unsigned_integer_and_float_types![u8, u16, u32, u64, f32, f64,];

macro_rules! add_impl_for_signed_integer_types {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl WriteToSlice for $ty_dst {
            fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
                let n: $ty_src = self
                    .to_grib_unsigned()
                    .ok_or("magnitude does not fit in sign-and-magnitude form")?;
                n.write_to_slice(slice, pos)
            }
        }
    )*);
}

add_impl_for_signed_integer_types![(u8, i8), (u16, i16), (u32, i32), (u64, i64),];

impl<T: WriteToSlice> WriteToSlice for Option<T> {
    fn write_to_slice(&self, slice: &mut [u8], pos: &mut usize) -> WriteToSliceResult {
        match self {
            Some(inner) => inner.write_to_slice(slice, pos),
            None => Ok(()),
        }
    }
}
