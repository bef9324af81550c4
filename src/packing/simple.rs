use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};
use num::ToPrimitive;

use super::{
    PackingOptions,
    param::SimplePackingParam,
    stream::{FixedValueIterator, NBitwiseIterator, NBitwiseWriter},
};
use crate::{
    error::GribError,
    helpers::{num_bits_for, num_octets},
};

/// Data representation template 5.0 - Grid point data - simple packing.
#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct SimplePackingTemplate {
    pub simple: SimplePackingParam,
}

impl SimplePackingTemplate {
    pub(crate) fn decode(&self, num_encoded: usize, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        let param = &self.simple;
        param.is_supported()?;

        if param.num_bits == 0 {
            let decoder =
                SimplePackingDecoder::<std::iter::Empty<u32>>::zero_length(param, num_encoded);
            return Ok(decoder.collect());
        }
        if param.num_bits > 32 {
            return Err(GribError::InvalidValue(format!(
                "{} bits per value cannot be unpacked",
                param.num_bits
            )));
        }

        let required = num_octets(num_encoded, usize::from(param.num_bits));
        if payload.len() < required {
            return Err(GribError::TruncatedSection {
                declared: required,
                available: payload.len(),
            });
        }
        let iter = NBitwiseIterator::new(payload, usize::from(param.num_bits)).take(num_encoded);
        let decoder = SimplePackingDecoder::NonZeroLength(NonZeroSimplePackingDecoder::new(
            iter, param,
        ));
        Ok(decoder.collect())
    }

    pub(crate) fn encode(
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        let field = ScaledField::quantize(values, options)?;
        let mut writer = NBitwiseWriter::new();
        writer.write_all(field.values, usize::from(field.param.num_bits));
        let template = Self {
            simple: field.param,
        };
        Ok((template, writer.into_bytes()))
    }
}

pub(crate) enum SimplePackingDecoder<I> {
    // Based on the implementation of wgrib2, if nbits equals 0, return a constant
    // field where the data value at each grid point is the reference value.
    ZeroLength(FixedValueIterator<f32>),
    NonZeroLength(NonZeroSimplePackingDecoder<I>),
}

impl<I> SimplePackingDecoder<I> {
    pub(crate) fn zero_length(param: &SimplePackingParam, length: usize) -> Self {
        Self::ZeroLength(FixedValueIterator::new(
            param.zero_bit_reference_value(),
            length,
        ))
    }
}

impl<I, N> Iterator for SimplePackingDecoder<I>
where
    I: Iterator<Item = N>,
    N: ToPrimitive,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::ZeroLength(inner) => inner.next(),
            Self::NonZeroLength(inner) => inner.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::ZeroLength(inner) => inner.size_hint(),
            Self::NonZeroLength(inner) => inner.size_hint(),
        }
    }
}

/// Applies `(R + X * 2^E) / 10^D` to each packed integer `X`.
///
/// Items whose integer cannot be represented (missing values) decode to NaN.
pub(crate) struct NonZeroSimplePackingDecoder<I> {
    iter: I,
    ref_val: f64,
    exp_factor: f64,
    dec_factor: f64,
}

impl<I> NonZeroSimplePackingDecoder<I> {
    pub(crate) fn new(iter: I, param: &SimplePackingParam) -> Self {
        Self {
            iter,
            ref_val: f64::from(param.ref_val),
            exp_factor: 2_f64.powi(i32::from(param.exp)),
            dec_factor: 10_f64.powi(i32::from(param.dec)),
        }
    }
}

impl<I: Iterator<Item = N>, N: ToPrimitive> Iterator for NonZeroSimplePackingDecoder<I> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let encoded = self.iter.next()?;
        let encoded = encoded.to_f64().unwrap_or(f64::NAN);
        let value = (self.ref_val + encoded * self.exp_factor) / self.dec_factor;
        Some(value as f32)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

const MAX_NUM_BITS: u8 = 32;

/// A field scaled to non-negative integers together with the simple packing
/// parameters that map them back.
#[derive(Debug, PartialEq)]
pub(crate) struct ScaledField {
    pub(crate) param: SimplePackingParam,
    pub(crate) values: Vec<u32>,
}

impl ScaledField {
    /// Chooses `R`, `E` and the bit width for `values` at the decimal scale
    /// of `options`.
    ///
    /// `R` is the floor of the scaled minimum, so that the integers stay
    /// exact. `E` is 0 unless the range does not fit in the bit width. A
    /// field whose integers are all equal gets zero bits, with `R` holding
    /// the constant.
    pub(crate) fn quantize(values: &[f32], options: &PackingOptions) -> Result<Self, GribError> {
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(GribError::InvalidValue(format!(
                "non-finite value {v} cannot be packed"
            )));
        }

        let dec = options.decimal_scale;
        let dec_factor = 10_f64.powi(i32::from(dec));
        let scaled = values
            .iter()
            .map(|v| f64::from(*v) * dec_factor)
            .collect::<Vec<_>>();
        if let Some(i) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(GribError::InvalidValue(format!(
                "value {} cannot be scaled by 10^{dec}",
                values[i]
            )));
        }
        let (min, max) = scaled
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        if scaled.is_empty() {
            return Ok(Self::constant(0.0, dec, 0));
        }
        if min == max {
            return Ok(Self::constant(reference_value(min)?, dec, scaled.len()));
        }

        let ref_val = reference_value(floor_of_scaled(min))?;
        let reference = f64::from(ref_val);
        let range = max - reference;
        if !range.is_finite() {
            return Err(GribError::InvalidValue(format!(
                "range of scaled values from {min} to {max} is too wide"
            )));
        }
        let (num_bits, exp) = match options.num_bits {
            Some(num_bits) => (num_bits, binary_scale_for(range, num_bits)?),
            None => {
                let num_bits = num_bits_for(range.round() as u64).max(1);
                match u8::try_from(num_bits) {
                    Ok(n) if n <= MAX_NUM_BITS => (n, 0),
                    _ => (MAX_NUM_BITS, binary_scale_for(range, MAX_NUM_BITS)?),
                }
            }
        };

        let exp_factor = 2_f64.powi(i32::from(exp));
        let cap = f64::from(max_value_for(num_bits));
        let ints = scaled
            .iter()
            .map(|v| ((v - reference) / exp_factor).round().clamp(0.0, cap) as u32)
            .collect::<Vec<_>>();

        let first = ints[0];
        if ints.iter().all(|x| *x == first) {
            let ref_val = reference_value(reference + f64::from(first) * exp_factor)?;
            return Ok(Self::constant(ref_val, dec, ints.len()));
        }

        let param = SimplePackingParam {
            ref_val,
            exp,
            dec,
            num_bits,
            orig_field_type: 0,
        };
        Ok(Self {
            param,
            values: ints,
        })
    }

    fn constant(ref_val: f32, dec: i16, len: usize) -> Self {
        let param = SimplePackingParam {
            ref_val,
            exp: 0,
            dec,
            num_bits: 0,
            orig_field_type: 0,
        };
        Self {
            param,
            values: vec![0; len],
        }
    }

    pub(crate) fn is_constant(&self) -> bool {
        self.param.num_bits == 0
    }
}

// Scaled values carry the rounding error of single precision, so a minimum
// within that error of an integer is taken as the integer itself.
fn floor_of_scaled(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() <= nearest.abs().max(1.0) * 1e-6 {
        nearest
    } else {
        value.floor()
    }
}

fn max_value_for(num_bits: u8) -> u32 {
    match num_bits {
        0 => 0,
        n if n >= 32 => u32::MAX,
        n => (1 << n) - 1,
    }
}

// The reference value is stored in single precision.
fn reference_value(scaled: f64) -> Result<f32, GribError> {
    let ref_val = scaled as f32;
    if !ref_val.is_finite() {
        return Err(GribError::InvalidValue(format!(
            "reference value {scaled} does not fit in single precision"
        )));
    }
    Ok(ref_val)
}

// 2^E stays finite in double precision up to E = 1023.
const MAX_BINARY_SCALE: i16 = 1023;

fn binary_scale_for(range: f64, num_bits: u8) -> Result<i16, GribError> {
    let cap = f64::from(max_value_for(num_bits));
    let mut exp = 0_i16;
    while (range / 2_f64.powi(i32::from(exp))).round() > cap {
        if exp == MAX_BINARY_SCALE {
            return Err(GribError::InvalidValue(format!(
                "range {range} does not fit in {num_bits} bits"
            )));
        }
        exp += 1;
    }
    Ok(exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple_packing() {
        let param = SimplePackingParam {
            ref_val: f32::from_be_bytes([0x35, 0x3e, 0x6b, 0xf6]),
            exp: -26,
            dec: 0,
            num_bits: 16,
            orig_field_type: 0,
        };
        let input: Vec<u8> = vec![0x00, 0x06, 0x00, 0x0d];
        let expected: Vec<f32> = vec![7.987_831_6e-7, 9.030_913e-7];

        let iter = NBitwiseIterator::new(&input, usize::from(param.num_bits));
        let actual = NonZeroSimplePackingDecoder::new(iter, &param).collect::<Vec<_>>();

        assert_eq!(actual.len(), expected.len());
        let mut i = 0;
        while i < actual.len() {
            assert!(actual[i] < expected[i] + 0.00000001);
            assert!(actual[i] > expected[i] - 0.00000001);
            i += 1;
        }
    }

    #[test]
    fn decode_simple_packing_when_nbit_is_zero() {
        let template = SimplePackingTemplate {
            simple: SimplePackingParam {
                ref_val: 273.0,
                dec: 1,
                ..Default::default()
            },
        };
        let actual = template.decode(4, &[]).unwrap();
        assert_eq!(actual, vec![27.3_f32; 4]);
    }

    #[test]
    fn decode_simple_packing_from_truncated_payload() {
        let template = SimplePackingTemplate {
            simple: SimplePackingParam {
                num_bits: 12,
                ..Default::default()
            },
        };
        let actual = template.decode(3, &[0, 0, 0]);
        assert_eq!(
            actual,
            Err(GribError::TruncatedSection {
                declared: 5,
                available: 3
            })
        );
    }

    macro_rules! test_quantization {
        ($((
            $name:ident,
            $values:expr,
            $options:expr,
            $expected_ref:expr,
            $expected_exp:expr,
            $expected_bits:expr,
            $expected_ints:expr
        ),)*) => ($(
            #[test]
            fn $name() {
                let field = ScaledField::quantize(&$values, &$options).unwrap();
                assert_eq!(field.param.ref_val, $expected_ref);
                assert_eq!(field.param.exp, $expected_exp);
                assert_eq!(field.param.num_bits, $expected_bits);
                assert_eq!(field.values, $expected_ints);
            }
        )*);
    }

    test_quantization! {
        (
            quantization_with_automatic_bit_width,
            [1.0_f32, 2.5, 4.0],
            PackingOptions::default().decimal_scale(1),
            10.0,
            0,
            5,
            vec![0, 15, 30]
        ),
        (
            quantization_with_negative_values,
            [-3.7_f32, 0.0, 2.2],
            PackingOptions::default(),
            -4.0,
            0,
            3,
            vec![0, 4, 6]
        ),
        (
            quantization_with_binary_scaling,
            [0.0_f32, 1000.0],
            PackingOptions::default().num_bits(8),
            0.0,
            2,
            8,
            vec![0, 250]
        ),
        (
            quantization_of_constant_field,
            [5.5_f32, 5.5, 5.5],
            PackingOptions::default().num_bits(8),
            5.5,
            0,
            0,
            vec![0, 0, 0]
        ),
        (
            quantization_of_values_rounding_to_same_integer,
            [0.2_f32, 0.3],
            PackingOptions::default(),
            0.0,
            0,
            0,
            vec![0, 0]
        ),
        (
            quantization_of_empty_field,
            [] as [f32; 0],
            PackingOptions::default(),
            0.0,
            0,
            0,
            Vec::<u32>::new()
        ),
    }

    macro_rules! test_quantization_failure {
        ($(($name:ident, $values:expr, $options:expr),)*) => ($(
            #[test]
            fn $name() {
                let actual = ScaledField::quantize(&$values, &$options);
                assert!(matches!(actual, Err(GribError::InvalidValue(_))));
            }
        )*);
    }

    test_quantization_failure! {
        (
            quantization_of_values_overflowing_reference_value,
            [1.0e37_f32, 3.0e38],
            PackingOptions::default().decimal_scale(2)
        ),
        (
            quantization_with_overflowing_decimal_scale,
            [1.0_f32, -1.0],
            PackingOptions::default().decimal_scale(400)
        ),
        (
            quantization_of_constant_field_overflowing_reference_value,
            [3.0e38_f32, 3.0e38],
            PackingOptions::default().decimal_scale(1)
        ),
        (
            quantization_of_zero_with_overflowing_decimal_scale,
            [0.0_f32, 0.0],
            PackingOptions::default().decimal_scale(400)
        ),
    }

    #[test]
    fn binary_scale_search_is_bounded() {
        assert_eq!(binary_scale_for(1000.0, 8), Ok(2));
        assert_eq!(binary_scale_for(f64::MAX, 2), Ok(MAX_BINARY_SCALE));
        assert!(matches!(
            binary_scale_for(f64::INFINITY, 1),
            Err(GribError::InvalidValue(_))
        ));
    }

    #[test]
    fn encoding_values_overflowing_reference_value() {
        let options = PackingOptions::default().decimal_scale(2);
        let actual = SimplePackingTemplate::encode(&[1.0e37, 3.0e38], &options);
        assert!(matches!(actual, Err(GribError::InvalidValue(_))));
    }

    #[test]
    fn quantization_rejects_nan() {
        let actual = ScaledField::quantize(&[1.0, f32::NAN], &PackingOptions::default());
        assert!(matches!(actual, Err(GribError::InvalidValue(_))));
    }

    #[test]
    fn encoding_and_decoding_simple_packing() {
        let values = vec![10.0_f32, 12.3, 35.0, 21.7, 10.1];
        let options = PackingOptions::default().decimal_scale(1);
        let (template, payload) = SimplePackingTemplate::encode(&values, &options).unwrap();
        assert_eq!(template.simple.num_bits, 8);
        assert_eq!(payload.len(), 5);
        let actual = template.decode(values.len(), &payload).unwrap();
        assert_eq!(actual, values);
    }
}
