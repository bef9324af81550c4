use crate::{
    error::GribError,
    helpers::num_bits_for,
    packing::{param::ComplexPackingParam, stream::NBitwiseWriter},
};

/// Splits `values` into groups of `group_len` values (the last one possibly
/// shorter) and appends group references, group widths and packed group
/// values to `writer`.
///
/// Each group's reference is its minimum and its width the number of bits of
/// its range. All groups but the last share the reference length, so that
/// no scaled group lengths need to be stored.
///
/// Returns the complex packing parameters and the number of bits used for the
/// group references.
pub(crate) fn pack_groups(
    values: &[u32],
    group_len: u32,
    writer: &mut NBitwiseWriter,
) -> Result<(ComplexPackingParam, u8), GribError> {
    if group_len == 0 {
        return Err(GribError::InvalidValue("group length must be positive".to_owned()));
    }
    if values.is_empty() {
        return Ok((ComplexPackingParam::constant_field(), 0));
    }

    let groups = values
        .chunks(group_len as usize)
        .map(Group::from_values)
        .collect::<Vec<_>>();
    let num_groups = u32::try_from(groups.len())
        .map_err(|_| GribError::InvalidValue(format!("{} groups", groups.len())))?;

    let max_ref = groups.iter().map(|g| g.reference).max().unwrap_or(0);
    let ref_bits = num_bits_for(u64::from(max_ref)).max(1);
    let width_ref = groups.iter().map(|g| g.width).min().unwrap_or(0);
    let max_width = groups.iter().map(|g| g.width).max().unwrap_or(0);
    let width_bits = num_bits_for(u64::from(max_width - width_ref));
    let last_len = groups.last().map_or(0, |g| g.values.len());

    writer.write_all(groups.iter().map(|g| g.reference), ref_bits);
    writer.pad_to_octet();
    writer.write_all(groups.iter().map(|g| u32::from(g.width - width_ref)), width_bits);
    writer.pad_to_octet();
    for group in groups.iter() {
        let width = usize::from(group.width);
        writer.write_all(group.values.iter().map(|v| v - group.reference), width);
    }

    let param = ComplexPackingParam {
        group_splitting_method: 1,
        missing_value_management: 0,
        primary_missing_value: 0,
        secondary_missing_value: 0,
        num_groups,
        group_width_ref: width_ref,
        num_group_width_bits: width_bits as u8,
        group_len_ref: group_len,
        group_len_inc: 1,
        group_len_last: last_len as u32,
        num_group_len_bits: 0,
    };
    Ok((param, ref_bits as u8))
}

impl ComplexPackingParam {
    /// Parameters of a field without any group, whose every point equals the
    /// reference value.
    pub(crate) fn constant_field() -> Self {
        Self {
            group_splitting_method: 1,
            ..Default::default()
        }
    }
}

struct Group<'a> {
    values: &'a [u32],
    reference: u32,
    width: u8,
}

impl<'a> Group<'a> {
    fn from_values(values: &'a [u32]) -> Self {
        let reference = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        let width = num_bits_for(u64::from(max - reference)) as u8;
        Self {
            values,
            reference,
            width,
        }
    }
}
