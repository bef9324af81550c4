use std::iter;

use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};
use num::ToPrimitive;

use self::{
    diff::{SpatialDifferencingDecodeIterator, SpatialDifferencingExtraDescriptors},
    missing::{
        DecodedValue::{self, Normal},
        MissingValueClassifier,
    },
};
use super::{
    PackingOptions,
    param::{ComplexPackingParam, SimplePackingParam, SpatialDifferencingParam},
    simple::{NonZeroSimplePackingDecoder, ScaledField, SimplePackingDecoder},
    stream::{BitStream, NBitwiseIterator, NBitwiseWriter},
};
use crate::{codetables::Table5_6, error::GribError, helpers::num_octets};

/// Data representation template 5.2 - Grid point data - complex packing.
#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct ComplexPackingTemplate {
    pub simple: SimplePackingParam,
    pub complex: ComplexPackingParam,
}

/// Data representation template 5.3 - Grid point data - complex packing and
/// spatial differencing.
#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct ComplexSpatialPackingTemplate {
    pub simple: SimplePackingParam,
    pub complex: ComplexPackingParam,
    pub spatial: SpatialDifferencingParam,
}

impl ComplexPackingTemplate {
    pub(crate) fn decode(&self, num_encoded: usize, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        self.simple.is_supported()?;
        self.complex.is_supported()?;

        if self.complex.num_groups == 0 {
            return Ok(constant_field(&self.simple, num_encoded));
        }

        let unpacked =
            decode_complex_packing(&self.complex, payload, self.simple.num_bits, 0, num_encoded)?;
        let decoder = NonZeroSimplePackingDecoder::new(unpacked.into_iter(), &self.simple);
        Ok(SimplePackingDecoder::NonZeroLength(decoder).collect())
    }

    pub(crate) fn encode(
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        let field = ScaledField::quantize(values, options)?;
        if field.is_constant() {
            let template = Self {
                simple: field.param,
                complex: ComplexPackingParam::constant_field(),
            };
            return Ok((template, Vec::new()));
        }

        let mut writer = NBitwiseWriter::new();
        let (complex, ref_bits) =
            grouping::pack_groups(&field.values, options.group_len, &mut writer)?;
        let template = Self {
            simple: SimplePackingParam {
                num_bits: ref_bits,
                ..field.param
            },
            complex,
        };
        Ok((template, writer.into_bytes()))
    }
}

impl ComplexSpatialPackingTemplate {
    pub(crate) fn decode(&self, num_encoded: usize, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        self.simple.is_supported()?;
        self.complex.is_supported()?;
        let order = spatial_differencing_order(self.spatial.order)?;

        if self.complex.num_groups == 0 {
            return Ok(constant_field(&self.simple, num_encoded));
        }

        let descriptors = SpatialDifferencingExtraDescriptors::from_payload(
            payload,
            order,
            self.spatial.num_extra_desc_octets,
        )?;
        let unpacked = decode_complex_packing(
            &self.complex,
            &payload[descriptors.len()..],
            self.simple.num_bits,
            descriptors.minimum(),
            num_encoded,
        )?;

        let spdiff_unpacked = SpatialDifferencingDecodeIterator::new(
            order,
            unpacked.into_iter(),
            descriptors.first_values(),
        );
        let decoder = NonZeroSimplePackingDecoder::new(spdiff_unpacked, &self.simple);
        Ok(SimplePackingDecoder::NonZeroLength(decoder).collect())
    }

    pub(crate) fn encode(
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        let order = spatial_differencing_order(options.spatial_diff_order)?;
        let field = ScaledField::quantize(values, options)?;
        if field.is_constant() {
            let template = Self {
                simple: field.param,
                complex: ComplexPackingParam::constant_field(),
                spatial: SpatialDifferencingParam {
                    order: order.into(),
                    num_extra_desc_octets: 0,
                },
            };
            return Ok((template, Vec::new()));
        }

        let diffs = diff::encode_spatial_differences(&field.values, order)?;
        let mut writer = NBitwiseWriter::new();
        writer.extend_from_slice(&diffs.descriptors.to_bytes());
        let (complex, ref_bits) =
            grouping::pack_groups(&diffs.values, options.group_len, &mut writer)?;
        let template = Self {
            simple: SimplePackingParam {
                num_bits: ref_bits,
                ..field.param
            },
            complex,
            spatial: SpatialDifferencingParam {
                order: order.into(),
                num_extra_desc_octets: diffs.descriptors.num_octets() as u8,
            },
        };
        Ok((template, writer.into_bytes()))
    }
}

fn spatial_differencing_order(order: u8) -> Result<Table5_6, GribError> {
    Table5_6::try_from(order).map_err(|e| {
        GribError::NotSupported(format!(
            "GRIB2 code table 5.6 (order of spatial differencing): {}",
            e.number
        ))
    })
}

fn constant_field(simple: &SimplePackingParam, num_encoded: usize) -> Vec<f32> {
    SimplePackingDecoder::<iter::Empty<u32>>::zero_length(simple, num_encoded).collect()
}

fn check_length(actual: u64, expected: usize) -> Result<(), GribError> {
    if actual != expected as u64 {
        return Err(GribError::InvalidValue(format!(
            "group lengths add up to {actual} values while {expected} are declared"
        )));
    }
    Ok(())
}

/// Unpacks group references, widths and lengths, then the grouped values,
/// adding `z_min` to every non-missing value.
///
/// Group lengths must add up to `num_encoded` before any group is unpacked.
fn decode_complex_packing(
    complex: &ComplexPackingParam,
    data: &[u8],
    nbit: u8,
    z_min: i64,
    num_encoded: usize,
) -> Result<Vec<DecodedValue<i64>>, GribError> {
    let ngroup = complex.num_groups as usize;
    if ngroup > num_encoded {
        return Err(GribError::InvalidValue(format!(
            "{ngroup} groups for {num_encoded} values"
        )));
    }
    if nbit > 32 {
        return Err(GribError::InvalidValue(format!(
            "{nbit} bits per group reference cannot be unpacked"
        )));
    }

    let group_refs_end = num_octets(ngroup, usize::from(nbit));
    let group_widths_end =
        group_refs_end + num_octets(ngroup, usize::from(complex.num_group_width_bits));
    let group_lens_end =
        group_widths_end + num_octets(ngroup, usize::from(complex.num_group_len_bits));
    if data.len() < group_lens_end {
        return Err(GribError::TruncatedSection {
            declared: group_lens_end,
            available: data.len(),
        });
    }

    let group_refs = BitStream::new(&data[..group_refs_end], usize::from(nbit), ngroup)
        .take(ngroup)
        .collect::<Vec<_>>();
    let group_widths = WithOffset::new(
        BitStream::new(
            &data[group_refs_end..group_widths_end],
            usize::from(complex.num_group_width_bits),
            ngroup,
        ),
        u32::from(complex.group_width_ref),
        1,
    )
    .take(ngroup)
    .collect::<Vec<_>>();
    let group_lens = WithOffset::new(
        BitStream::new(
            &data[group_widths_end..group_lens_end],
            usize::from(complex.num_group_len_bits),
            ngroup - 1,
        ),
        complex.group_len_ref,
        u32::from(complex.group_len_inc),
    )
    .take(ngroup - 1)
    .chain(iter::once(u64::from(complex.group_len_last)))
    .collect::<Vec<_>>();

    if group_refs.len() != ngroup
        || group_widths.len() != ngroup
        || group_lens.len() != ngroup
    {
        return Err(GribError::TruncatedSection {
            declared: group_lens_end,
            available: data.len(),
        });
    }
    let num_grouped = group_lens.iter().fold(0_u64, |sum, l| sum.saturating_add(*l));
    check_length(num_grouped, num_encoded)?;
    if let Some(width) = group_widths.iter().find(|w| **w > 32) {
        return Err(GribError::InvalidValue(format!(
            "group width {width} exceeds 32 bits"
        )));
    }

    let values_bits = group_widths
        .iter()
        .zip(group_lens.iter())
        .map(|(w, l)| w.saturating_mul(*l))
        .fold(0_u64, u64::saturating_add);
    let values_end = group_lens_end as u64 + values_bits.div_ceil(8);
    if (data.len() as u64) < values_end {
        return Err(GribError::TruncatedSection {
            declared: values_end.to_usize().unwrap_or(usize::MAX),
            available: data.len(),
        });
    }

    let decoded = ComplexPackingValueDecodeIterator::new(
        group_refs.into_iter(),
        group_widths.into_iter(),
        group_lens.into_iter(),
        MissingValueClassifier::new(complex.missing_value_management),
        nbit,
        z_min,
        &data[group_lens_end..],
    )
    .flatten()
    .collect();
    Ok(decoded)
}

// Types of closures with captures cannot be denoted.
// Waiting for `type_alias_impl_trait` (TAIT) getting into stable.
pub(crate) struct WithOffset<T> {
    stream: BitStream<T>,
    offset: u32,
    inc: u32,
}

impl<T> WithOffset<T> {
    fn new(stream: BitStream<T>, offset: u32, inc: u32) -> Self {
        Self {
            stream,
            offset,
            inc,
        }
    }
}

impl<T> Iterator for WithOffset<T>
where
    T: AsRef<[u8]>,
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream
            .next()
            .map(|v| u64::from(v) * u64::from(self.inc) + u64::from(self.offset))
    }
}

pub(crate) struct ComplexPackingValueDecodeIterator<'d, I, J, K> {
    ref_iter: I,
    width_iter: J,
    length_iter: K,
    missing: MissingValueClassifier,
    nbit: u8,
    z_min: i64,
    data: &'d [u8],
    pos: usize,
    start_offset_bits: usize,
}

impl<'d, I, J, K> ComplexPackingValueDecodeIterator<'d, I, J, K> {
    pub(crate) fn new(
        ref_iter: I,
        width_iter: J,
        length_iter: K,
        missing: MissingValueClassifier,
        nbit: u8,
        z_min: i64,
        data: &'d [u8],
    ) -> Self {
        Self {
            ref_iter,
            width_iter,
            length_iter,
            missing,
            nbit,
            z_min,
            data,
            pos: 0,
            start_offset_bits: 0,
        }
    }
}

impl<I, J, K> Iterator for ComplexPackingValueDecodeIterator<'_, I, J, K>
where
    I: Iterator<Item = u32>,
    J: Iterator<Item = u64>,
    K: Iterator<Item = u64>,
{
    type Item = Vec<DecodedValue<i64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (group_ref, width, length) = (
            self.ref_iter.next()?,
            self.width_iter.next()?.to_usize()?,
            self.length_iter.next()?.to_usize()?,
        );

        if width == 0 {
            // For groups with a constant value, the associated field width is 0
            // and no incremental data are physically present.
            let value = self
                .missing
                .classify(u64::from(group_ref), usize::from(self.nbit))
                .unwrap_or(Normal(i64::from(group_ref) + self.z_min));
            return Some(vec![value; length]);
        }

        let bits = self.start_offset_bits + width * length;
        let (pos_end, offset_bits) = (self.pos + bits / 8, bits % 8);
        let offset_byte = usize::from(offset_bits > 0);
        let slice = self.data.get(self.pos..pos_end + offset_byte)?;
        let group_values = NBitwiseIterator::new(slice, width)
            .with_offset(self.start_offset_bits)
            .take(length)
            .map(|v| {
                self.missing
                    .classify(u64::from(v), width)
                    .unwrap_or(Normal(i64::from(v) + i64::from(group_ref) + self.z_min))
            })
            .collect::<Vec<_>>();
        self.pos = pos_end;
        self.start_offset_bits = offset_bits;
        Some(group_values)
    }
}

mod diff;
mod grouping;
mod missing;
