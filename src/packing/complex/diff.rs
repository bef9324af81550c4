use super::missing::DecodedValue::{self, Normal};
use crate::{
    codetables::Table5_6,
    error::GribError,
    helpers::{grib_int_from_bytes, grib_int_to_bytes, num_bits_for},
};

/// Extra descriptors at the head of a section 7 payload packed with spatial
/// differencing: the first values of the original field followed by the
/// overall minimum of the differences, each `num_octets` long.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SpatialDifferencingExtraDescriptors {
    first_values: Vec<i64>,
    minimum: i64,
    num_octets: usize,
}

impl SpatialDifferencingExtraDescriptors {
    pub(crate) fn from_payload(
        payload: &[u8],
        order: Table5_6,
        num_octets: u8,
    ) -> Result<Self, GribError> {
        if num_octets == 0 || num_octets > 4 {
            return Err(GribError::NotSupported(format!(
                "{num_octets} octets for spatial differencing extra descriptors"
            )));
        }
        let num_octets = usize::from(num_octets);
        let byte_length = (order.num_first_values() + 1) * num_octets;
        let slice = payload
            .get(..byte_length)
            .ok_or(GribError::TruncatedSection {
                declared: byte_length,
                available: payload.len(),
            })?;

        let mut descriptors = slice
            .chunks_exact(num_octets)
            .filter_map(grib_int_from_bytes)
            .map(i64::from)
            .collect::<Vec<_>>();
        let minimum = descriptors.pop().unwrap_or_default();
        Ok(Self {
            first_values: descriptors,
            minimum,
            num_octets,
        })
    }

    // total number of octets for descriptors
    pub(crate) fn len(&self) -> usize {
        (self.first_values.len() + 1) * self.num_octets
    }

    // overall minimum of the differences
    pub(crate) fn minimum(&self) -> i64 {
        self.minimum
    }

    pub(crate) fn first_values(&self) -> std::vec::IntoIter<i64> {
        self.first_values.clone().into_iter()
    }

    pub(crate) fn num_octets(&self) -> usize {
        self.num_octets
    }

    /// Serializes the descriptors with the smallest width (1 to 4 octets) able
    /// to hold each of them in sign-and-magnitude form.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.first_values
            .iter()
            .chain(std::iter::once(&self.minimum))
            .filter_map(|v| i32::try_from(*v).ok())
            .filter_map(|v| grib_int_to_bytes(v, self.num_octets))
            .flatten()
            .collect()
    }
}

/// Result of differencing a field of non-negative integers.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SpatialDifferences {
    pub(crate) descriptors: SpatialDifferencingExtraDescriptors,
    /// Differences with the minimum removed; the leading seed positions hold 0.
    pub(crate) values: Vec<u32>,
}

/// Computes first- or second-order differences of `values` in storage order.
///
/// Exactly `order` first values are kept (0 for positions beyond the end of a
/// very short field), so that a decoder always finds them.
pub(crate) fn encode_spatial_differences(
    values: &[u32],
    order: Table5_6,
) -> Result<SpatialDifferences, GribError> {
    let num_first = order.num_first_values();
    let z = values.iter().map(|v| i64::from(*v)).collect::<Vec<_>>();
    let diffs = (0..z.len())
        .map(|i| match order {
            _ if i < num_first => 0,
            Table5_6::FirstOrderSpatialDifferencing => z[i] - z[i - 1],
            Table5_6::SecondOrderSpatialDifferencing => z[i] - 2 * z[i - 1] + z[i - 2],
        })
        .collect::<Vec<_>>();
    let minimum = diffs.iter().skip(num_first).copied().min().unwrap_or(0);

    let stored = diffs
        .iter()
        .enumerate()
        .map(|(i, d)| if i < num_first { 0 } else { d - minimum })
        .map(|d| {
            u32::try_from(d).map_err(|_| {
                GribError::InvalidValue(format!("spatial difference {d} exceeds 32 bits"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first_values = (0..num_first)
        .map(|i| z.get(i).copied().unwrap_or(0))
        .collect::<Vec<_>>();

    let largest = first_values
        .iter()
        .chain(std::iter::once(&minimum))
        .map(|v| v.unsigned_abs())
        .max()
        .unwrap_or(0);
    let num_bits = num_bits_for(largest) + 1;
    if num_bits > 32 {
        return Err(GribError::InvalidValue(format!(
            "spatial differencing descriptor {largest} exceeds 31 bits"
        )));
    }
    let num_octets = num_bits.div_ceil(8).clamp(1, 4);

    Ok(SpatialDifferences {
        descriptors: SpatialDifferencingExtraDescriptors {
            first_values,
            minimum,
            num_octets,
        },
        values: stored,
    })
}

pub(crate) enum SpatialDifferencingDecodeIterator<I, J> {
    FirstOrder(FirstOrderSpatialDifferencingDecodeIterator<I, J>),
    SecondOrder(SecondOrderSpatialDifferencingDecodeIterator<I, J>),
}

impl<I, J> SpatialDifferencingDecodeIterator<I, J> {
    pub(crate) fn new(order: Table5_6, iter: I, first_values: J) -> Self {
        match order {
            Table5_6::FirstOrderSpatialDifferencing => Self::FirstOrder(
                FirstOrderSpatialDifferencingDecodeIterator::new(iter, first_values),
            ),
            Table5_6::SecondOrderSpatialDifferencing => Self::SecondOrder(
                SecondOrderSpatialDifferencingDecodeIterator::new(iter, first_values),
            ),
        }
    }
}

impl<I, J> Iterator for SpatialDifferencingDecodeIterator<I, J>
where
    I: Iterator<Item = DecodedValue<i64>>,
    J: Iterator<Item = i64>,
{
    type Item = DecodedValue<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::FirstOrder(iter) => iter.next(),
            Self::SecondOrder(iter) => iter.next(),
        }
    }
}

pub(crate) struct FirstOrderSpatialDifferencingDecodeIterator<I, J> {
    iter: I,
    first_values: J,
    count: u32,
    prev: i64,
}

impl<I, J> FirstOrderSpatialDifferencingDecodeIterator<I, J> {
    pub(crate) fn new(iter: I, first_values: J) -> Self {
        Self {
            iter,
            first_values,
            count: 0,
            prev: 0,
        }
    }
}

impl<I, J> Iterator for FirstOrderSpatialDifferencingDecodeIterator<I, J>
where
    I: Iterator<Item = DecodedValue<i64>>,
    J: Iterator<Item = i64>,
{
    type Item = DecodedValue<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            None => None,
            Some(Normal(v)) => match self.count {
                0 => {
                    self.prev = self.first_values.next().unwrap_or(v);
                    self.count += 1;
                    Some(Normal(self.prev))
                }
                _ => {
                    let v = v + self.prev;
                    self.prev = v;
                    Some(Normal(v))
                }
            },
            Some(missing) => Some(missing),
        }
    }
}

pub(crate) struct SecondOrderSpatialDifferencingDecodeIterator<I, J> {
    iter: I,
    first_values: J,
    count: u32,
    prev1: i64,
    prev2: i64,
}

impl<I, J> SecondOrderSpatialDifferencingDecodeIterator<I, J> {
    pub(crate) fn new(iter: I, first_values: J) -> Self {
        Self {
            iter,
            first_values,
            count: 0,
            prev1: 0,
            prev2: 0,
        }
    }
}

impl<I, J> Iterator for SecondOrderSpatialDifferencingDecodeIterator<I, J>
where
    I: Iterator<Item = DecodedValue<i64>>,
    J: Iterator<Item = i64>,
{
    type Item = DecodedValue<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            None => None,
            Some(Normal(v)) => match self.count {
                0 => {
                    self.prev2 = self.first_values.next().unwrap_or(v);
                    self.count += 1;
                    Some(Normal(self.prev2))
                }
                1 => {
                    self.prev1 = self.first_values.next().unwrap_or(v);
                    self.count += 1;
                    Some(Normal(self.prev1))
                }
                _ => {
                    let v = v + 2 * self.prev1 - self.prev2;
                    self.prev2 = self.prev1;
                    self.prev1 = v;
                    Some(Normal(v))
                }
            },
            Some(missing) => Some(missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::complex::missing::DecodedValue::{Missing1, Missing2};

    macro_rules! test_spdiff_descriptors {
        ($(($name:ident, $num_octets:expr, $expected_first:expr, $expected_minimum:expr),)*) => ($(
            #[test]
            fn $name() {
                let octets = (0x00..0x10).collect::<Vec<_>>();
                let descriptors = SpatialDifferencingExtraDescriptors::from_payload(
                    &octets,
                    Table5_6::SecondOrderSpatialDifferencing,
                    $num_octets,
                )
                .unwrap();
                assert_eq!(descriptors.first_values().collect::<Vec<_>>(), $expected_first);
                assert_eq!(descriptors.minimum(), $expected_minimum);
                assert_eq!(descriptors.len(), 3 * $num_octets);
            }
        )*);
    }

    test_spdiff_descriptors! {
        (spdiff_descriptors_when_num_octets_is_1, 1, vec![0x00, 0x01], 0x02),
        (spdiff_descriptors_when_num_octets_is_2, 2, vec![0x00_01, 0x02_03], 0x04_05),
        (
            spdiff_descriptors_when_num_octets_is_3,
            3,
            vec![0x00_01_02, 0x03_04_05],
            0x06_07_08
        ),
        (
            spdiff_descriptors_when_num_octets_is_4,
            4,
            vec![0x00_01_02_03, 0x04_05_06_07],
            0x08_09_0a_0b
        ),
    }

    #[test]
    fn spdiff_descriptors_from_short_payload() {
        let actual = SpatialDifferencingExtraDescriptors::from_payload(
            &[0, 1, 2],
            Table5_6::FirstOrderSpatialDifferencing,
            2,
        );
        assert_eq!(
            actual,
            Err(GribError::TruncatedSection {
                declared: 4,
                available: 3
            })
        );
    }

    #[test]
    fn spdiff_descriptors_with_invalid_width() {
        let actual = SpatialDifferencingExtraDescriptors::from_payload(
            &[0; 16],
            Table5_6::FirstOrderSpatialDifferencing,
            5,
        );
        assert!(matches!(actual, Err(GribError::NotSupported(_))));
    }

    macro_rules! test_spatial_diff_1st_order_decoding {
        ($(($name:ident, $input:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                let input: Vec<DecodedValue<i64>> = $input.into_iter().collect();
                let first_values = vec![100_i64].into_iter();
                let iter = FirstOrderSpatialDifferencingDecodeIterator::new(
                    input.into_iter(),
                    first_values,
                );
                assert_eq!(iter.collect::<Vec<_>>(), $expected);
            }
        )*);
    }

    test_spatial_diff_1st_order_decoding! {
        (
            spatial_diff_1st_order_decoding_consisting_of_normal_values,
            (0_u32..6).map(|n| Normal(i64::from(n) * (-1_i64).pow(n))),
            vec![
                Normal(100),
                Normal(99),
                Normal(101),
                Normal(98),
                Normal(102),
                Normal(97),
            ]
        ),
        (
            spatial_diff_1st_order_decoding_with_missing_values_in_first_values,
            vec![Missing1, Normal(0), Normal(-1), Normal(2)],
            vec![Missing1, Normal(100), Normal(99), Normal(101)]
        ),
        (
            spatial_diff_1st_order_decoding_with_missing_values_in_non_first_values,
            vec![Normal(0), Normal(-1), Missing1, Normal(2), Missing2, Normal(-3)],
            vec![Normal(100), Normal(99), Missing1, Normal(101), Missing2, Normal(98)]
        ),
    }

    macro_rules! test_spatial_diff_2nd_order_decoding {
        ($(($name:ident, $input:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                let input: Vec<DecodedValue<i64>> = $input.into_iter().collect();
                let first_values = vec![100_i64, 99].into_iter();
                let iter = SecondOrderSpatialDifferencingDecodeIterator::new(
                    input.into_iter(),
                    first_values,
                );
                assert_eq!(iter.collect::<Vec<_>>(), $expected);
            }
        )*);
    }

    test_spatial_diff_2nd_order_decoding! {
        (
            spatial_diff_2nd_order_decoding_consisting_of_normal_values,
            (0_u32..6).map(|n| Normal(i64::from(n) * (-1_i64).pow(n))),
            vec![
                Normal(100),
                Normal(99),
                Normal(100),
                Normal(98),
                Normal(100),
                Normal(97),
            ]
        ),
        (
            spatial_diff_2nd_order_decoding_with_missing_values_in_first_values,
            vec![Missing1, Missing2, Normal(0), Normal(-1), Normal(2), Normal(-3)],
            vec![Missing1, Missing2, Normal(100), Normal(99), Normal(100), Normal(98)]
        ),
    }

    macro_rules! test_spatial_differencing_round_trip {
        ($(($name:ident, $order:expr, $values:expr),)*) => ($(
            #[test]
            fn $name() {
                let values: Vec<u32> = $values;
                let diffs = encode_spatial_differences(&values, $order).unwrap();
                let minimum = diffs.descriptors.minimum();
                let input = diffs.values.iter().map(|v| Normal(i64::from(*v) + minimum));
                let decoded = SpatialDifferencingDecodeIterator::new(
                    $order,
                    input,
                    diffs.descriptors.first_values(),
                )
                .collect::<Vec<_>>();
                let expected = values
                    .iter()
                    .map(|v| Normal(i64::from(*v)))
                    .collect::<Vec<_>>();
                assert_eq!(decoded, expected);
            }
        )*);
    }

    test_spatial_differencing_round_trip! {
        (
            spatial_differencing_round_trip_1st_order,
            Table5_6::FirstOrderSpatialDifferencing,
            vec![5, 9, 2, 2, 40, 0, 17]
        ),
        (
            spatial_differencing_round_trip_2nd_order,
            Table5_6::SecondOrderSpatialDifferencing,
            vec![5, 9, 2, 2, 40, 0, 17]
        ),
        (
            spatial_differencing_round_trip_1st_order_single_value,
            Table5_6::FirstOrderSpatialDifferencing,
            vec![7]
        ),
        (
            spatial_differencing_round_trip_2nd_order_single_value,
            Table5_6::SecondOrderSpatialDifferencing,
            vec![7]
        ),
        (
            spatial_differencing_round_trip_2nd_order_two_values,
            Table5_6::SecondOrderSpatialDifferencing,
            vec![7, 3]
        ),
        (
            spatial_differencing_round_trip_2nd_order_three_values,
            Table5_6::SecondOrderSpatialDifferencing,
            vec![7, 3, 12]
        ),
    }

    #[test]
    fn spatial_differences_of_short_field_pad_first_values() {
        let diffs =
            encode_spatial_differences(&[7], Table5_6::SecondOrderSpatialDifferencing).unwrap();
        assert_eq!(diffs.descriptors.first_values().collect::<Vec<_>>(), vec![7, 0]);
        assert_eq!(diffs.descriptors.minimum(), 0);
        assert_eq!(diffs.values, vec![0]);
    }

    #[test]
    fn spatial_difference_descriptors_are_serialized_with_smallest_width() {
        let diffs = encode_spatial_differences(
            &[300, 100, 50],
            Table5_6::FirstOrderSpatialDifferencing,
        )
        .unwrap();
        assert_eq!(diffs.descriptors.minimum(), -200);
        assert_eq!(diffs.descriptors.num_octets(), 2);
        assert_eq!(diffs.values, vec![0, 0, 150]);
        assert_eq!(diffs.descriptors.to_bytes(), vec![0x01, 0x2c, 0x80, 0xc8]);
    }
}
