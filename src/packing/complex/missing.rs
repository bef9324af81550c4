use num::ToPrimitive;

use self::DecodedValue::{Missing1, Missing2, Normal};

/// An unpacked integer of a complex-packed field, or one of the two missing
/// value markers of Code Table 5.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodedValue<N: ToPrimitive> {
    Normal(N),
    Missing1,
    Missing2,
}

impl<N: ToPrimitive> ToPrimitive for DecodedValue<N> {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Normal(v) => v.to_i64(),
            Missing1 | Missing2 => None,
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            Normal(v) => v.to_u64(),
            Missing1 | Missing2 => None,
        }
    }

    fn to_f32(&self) -> Option<f32> {
        match self {
            Normal(v) => v.to_f32(),
            Missing1 | Missing2 => Some(f32::NAN),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            Normal(v) => v.to_f64(),
            Missing1 | Missing2 => Some(f64::NAN),
        }
    }
}

/// Classifies raw integers of a given bit width according to the missing
/// value management in use.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MissingValueClassifier {
    management: u8,
}

impl MissingValueClassifier {
    pub(crate) fn new(management: u8) -> Self {
        Self { management }
    }

    /// Returns `None` if `raw` is an ordinary value, or the missing marker it
    /// stands for otherwise. All bits set means primary missing, all bits but
    /// the lowest means secondary missing.
    pub(crate) fn classify(&self, raw: u64, num_bits: usize) -> Option<DecodedValue<i64>> {
        if num_bits == 0 || num_bits > 63 {
            return None;
        }
        let missing1 = (1_u64 << num_bits) - 1;
        let missing2 = missing1 - 1;
        if self.management > 0 && raw == missing1 {
            Some(Missing1)
        } else if self.management == 2 && raw == missing2 {
            Some(Missing2)
        } else {
            None
        }
    }
}
