/// Number of octets a value occupies once encoded.
pub trait OctetSize {
    fn octet_size(&self) -> usize;
}

macro_rules! add_impl_of_octet_size_for_number_types {
    ($($ty:ty,)*) => ($(
        impl OctetSize for $ty {
            fn octet_size(&self) -> usize {
                std::mem::size_of::<Self>()
            }
        }
    )*);
}

add_impl_of_octet_size_for_number_types![u8, u16, u32, u64, i8, i16, i32, i64, f32, f64,];

impl<T: OctetSize> OctetSize for Option<T> {
    fn octet_size(&self) -> usize {
        self.as_ref().map_or(0, OctetSize::octet_size)
    }
}
