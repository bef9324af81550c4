//! Traits shared by every fixed-layout GRIB2 structure: big-endian reading
//! and writing at a cursor, encoded size, and octet-positioned dumping.

pub use crate::{
    as_grib_signed::{AsGribSigned, ToGribUnsigned},
    dump::{Dump, DumpField, dump_nested, write_position_column},
    octet_size::OctetSize,
    try_from_slice::{TryFromSlice, TryFromSliceResult},
    write_to_slice::{WriteToSlice, WriteToSliceResult},
};

mod as_grib_signed;
mod dump;
mod octet_size;
mod try_from_slice;
mod write_to_slice;
