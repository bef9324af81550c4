use std::{
    borrow::Cow,
    io::{Error, Write},
};

use crate::OctetSize;

pub trait Dump {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error>;
}

pub trait DumpField: OctetSize {
    fn dump_field<W: Write>(
        &self,
        name: &str,
        parent: Option<&Cow<str>>,
        doc: &str,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error>;
}

macro_rules! add_impl_of_dump_field_for_number_types {
    ($($ty:ty,)*) => ($(
        impl DumpField for $ty {
            fn dump_field<W: Write>(
                &self,
                name: &str,
                parent: Option<&Cow<str>>,
                doc: &str,
                pos: &mut usize,
                output: &mut W,
            ) -> Result<(), Error> {
                let size = self.octet_size();
                write_position_column(output, pos, size)?;
                if let Some(parent) = parent {
                    write!(output, "{}.", parent)?;
                }
                write!(output, "{} = {:?}", name, self)?;
                if doc.is_empty() {
                    writeln!(output)
                } else {
                    writeln!(output, "  // {}", doc)
                }
            }
        }
    )*);
}

add_impl_of_dump_field_for_number_types![
    u8,
    u16,
    u32,
    u64,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
];

impl<T: DumpField> DumpField for Option<T> {
    fn dump_field<W: Write>(
        &self,
        name: &str,
        parent: Option<&Cow<str>>,
        doc: &str,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error> {
        match self {
            Some(inner) => inner.dump_field(name, parent, doc, pos, output),
            None => Ok(()),
        }
    }
}

/// Dumps a nested structure as a field, prefixing the names of its members
/// with `parent.name`.
pub fn dump_nested<T: Dump, W: Write>(
    value: &T,
    name: &str,
    parent: Option<&Cow<str>>,
    pos: &mut usize,
    output: &mut W,
) -> Result<(), Error> {
    let parent = parent
        .map(|s| Cow::Owned(format!("{}.{}", s, name)))
        .unwrap_or(Cow::Borrowed(name));
    value.dump(Some(&parent), pos, output)
}

/// Writes the 1-based octet range of a field, left-aligned in a fixed-width
/// column, and advances `pos` by `size`.
pub fn write_position_column<W: Write>(
    output: &mut W,
    pos: &mut usize,
    size: usize,
) -> Result<(), Error> {
    let str_len = |i: usize| -> usize {
        let mut i = i;
        let mut len = 1;
        while i >= 10 {
            i /= 10;
            len += 1;
        }
        len
    };

    const COLUMN_WIDTH: usize = 10;
    let mut pad_width = COLUMN_WIDTH;
    let pad = |size| " ".repeat(size);

    let start = *pos;
    *pos += size;
    pad_width = pad_width.saturating_sub(str_len(start));
    if size == 1 {
        write!(output, "{}{}", start, pad(pad_width))?;
    } else {
        let end = *pos - 1;
        pad_width = pad_width.saturating_sub(str_len(end) + 1);
        write!(output, "{}-{}{}", start, end, pad(pad_width))?;
    }
    Ok(())
}
