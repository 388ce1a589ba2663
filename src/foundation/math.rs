use xxhash_rust::xxh3::xxh3_64_with_seed;

const NOISE_SEED: u64 = 0x6b69_6e65_7479_7065;

/// How [`interpolate`] treats inputs outside the input range on either side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extrapolate {
    Extend,
    Clamp,
}

/// Map `x` from `[in0, in1]` to `[out0, out1]`.
///
/// A degenerate input range maps everything to `out0` (or `out1` once `x` has reached `in1`).
pub fn interpolate(
    x: f64,
    input: [f64; 2],
    output: [f64; 2],
    left: Extrapolate,
    right: Extrapolate,
) -> f64 {
    let [in0, in1] = input;
    let [out0, out1] = output;
    let span = in1 - in0;
    if span.abs() <= f64::EPSILON {
        return if x >= in1 { out1 } else { out0 };
    }
    let mut t = (x - in0) / span;
    if t < 0.0 && left == Extrapolate::Clamp {
        t = 0.0;
    }
    if t > 1.0 && right == Extrapolate::Clamp {
        t = 1.0;
    }
    out0 + (out1 - out0) * t
}

pub fn interpolate_clamped(x: f64, input: [f64; 2], output: [f64; 2]) -> f64 {
    interpolate(x, input, output, Extrapolate::Clamp, Extrapolate::Clamp)
}

/// Deterministic noise sample in `[0, 1)` for a tuple of integer keys.
///
/// Equal keys always produce the same value, on every platform.
pub fn noise01(keys: &[i64]) -> f64 {
    let mut bytes = Vec::with_capacity(keys.len() * 8);
    for k in keys {
        bytes.extend_from_slice(&k.to_le_bytes());
    }
    let h = xxh3_64_with_seed(&bytes, NOISE_SEED);
    // Top 53 bits give a uniformly spaced f64 in [0, 1).
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// Floor division for possibly negative frame counters.
pub fn floor_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
