//! Per-value scaling transforms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScalingType {
    #[default]
    None,
    /// `log2(v + ε)`
    Log2,
    /// `log10(v + ε)`
    Log10,
    /// `2^v`
    AntiLog2,
    /// `10^v`
    AntiLog10,
    /// `asin(v)`
    ArcSin,
}

/// Offset added before taking logarithms: half the smallest strictly
/// positive value in `values`.
///
/// Falls back to the smallest positive subnormal when nothing is positive.
pub fn scaling_epsilon(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|&v| v > 0.0 && v.is_finite())
        .min_by(f64::total_cmp)
        .map_or(f64::from_bits(1), |smallest| smallest * 0.5)
}

#[inline]
pub fn scale_value(scaling: ScalingType, value: f64, epsilon: f64) -> f64 {
    match scaling {
        ScalingType::None => value,
        ScalingType::Log2 => (value + epsilon).log2(),
        ScalingType::Log10 => (value + epsilon).log10(),
        ScalingType::AntiLog2 => value.exp2(),
        ScalingType::AntiLog10 => 10f64.powf(value),
        ScalingType::ArcSin => value.asin(),
    }
}

/// Scale every value in place, deriving epsilon from the whole slice.
pub fn scale(values: &mut [f64], scaling: ScalingType) {
    if scaling == ScalingType::None {
        return;
    }

    let epsilon = scaling_epsilon(values);
    for value in values.iter_mut() {
        *value = scale_value(scaling, *value, epsilon);
    }
}
