/// Conversion of a raw unsigned integer into a GRIB signed integer.
///
/// GRIB2 stores negative integers in sign-and-magnitude form: the most
/// significant bit is the sign and the remaining bits hold the absolute value.
///
/// # Examples
///
/// ```
/// use grib2_template_helpers::AsGribSigned;
///
/// assert_eq!(0b1000_0001_u8.as_grib_signed(), -1_i8);
/// assert_eq!(0x8000_u16.as_grib_signed(), 0_i16);
/// assert_eq!(0x0064_u16.as_grib_signed(), 100_i16);
/// ```
pub trait AsGribSigned<I> {
    fn as_grib_signed(&self) -> I;
}

/// Conversion of a signed integer into its GRIB sign-and-magnitude bit
/// pattern. Returns `None` if the magnitude does not fit into the bits left
/// after the sign bit.
///
/// # Examples
///
/// ```
/// use grib2_template_helpers::ToGribUnsigned;
///
/// assert_eq!((-1_i8).to_grib_unsigned(), Some(0b1000_0001_u8));
/// assert_eq!(100_i16.to_grib_unsigned(), Some(0x0064_u16));
/// assert_eq!(i16::MIN.to_grib_unsigned(), None);
/// ```
pub trait ToGribUnsigned<U> {
    fn to_grib_unsigned(&self) -> Option<U>;
}

macro_rules! add_impl_for_ints {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl AsGribSigned<$ty_dst> for $ty_src {
            fn as_grib_signed(&self) -> $ty_dst {
                if self.leading_zeros() == 0 {
                    let abs = (self << 1 >> 1) as $ty_dst;
                    -abs
                } else {
                    *self as $ty_dst
                }
            }
        }

        impl ToGribUnsigned<$ty_src> for $ty_dst {
            fn to_grib_unsigned(&self) -> Option<$ty_src> {
                let abs = <$ty_src>::try_from(self.unsigned_abs()).ok()?;
                if abs.leading_zeros() == 0 {
                    return None;
                }
                if *self < 0 {
                    Some(abs | !(<$ty_src>::MAX >> 1))
                } else {
                    Some(abs)
                }
            }
        }
    )*);
}

add_impl_for_ints! {
    (u8, i8),
    (u16, i16),
    (u32, i32),
    (u64, i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_sign_magnitude_conversion {
        ($(($name:ident, $unsigned:expr, $signed:expr),)*) => ($(
            #[test]
            fn $name() {
                assert_eq!($unsigned.as_grib_signed(), $signed);
                assert_eq!($signed.to_grib_unsigned(), Some($unsigned));
            }
        )*);
    }

    test_sign_magnitude_conversion! {
        (sign_magnitude_for_positive_u8, 0b0100_0000_u8, 64_i8),
        (sign_magnitude_for_negative_u8, 0b1100_0000_u8, -64_i8),
        (sign_magnitude_for_positive_u16, 0x0001_u16, 1_i16),
        (sign_magnitude_for_negative_u16, 0x8001_u16, -1_i16),
        (sign_magnitude_for_negative_u32, 0x8000_0064_u32, -100_i32),
        (sign_magnitude_for_positive_u64, 0x7fff_ffff_ffff_ffff_u64, i64::MAX),
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        assert_eq!(0x80_u8.as_grib_signed(), 0_i8);
        assert_eq!(0_i8.to_grib_unsigned(), Some(0_u8));
    }

    #[test]
    fn minimum_values_are_not_representable() {
        assert_eq!(i8::MIN.to_grib_unsigned(), None);
        assert_eq!(i32::MIN.to_grib_unsigned(), None);
        assert_eq!((-i32::MAX).to_grib_unsigned(), Some(u32::MAX));
    }
}
