//! Common

use num_traits::Num;
use std::ops::{Add, Mul};

/// Use 64-bit precision for floating point numbers.
pub type Float = f64;

/// PI (π)
pub const PI: Float = std::f64::consts::PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// Clamps a value to the closed interval [min, max].
///
/// * `x`   - The value to clamp.
/// * `min` - Lower bound.
/// * `max` - Upper bound.
#[inline(always)]
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Returns the index of the last node for which `pred` holds, clamped so that
/// `index + 1` is always a valid node. Requires `size >= 2` and `pred` to be
/// true for a prefix of the nodes.
///
/// * `size` - Number of nodes.
/// * `pred` - The predicate.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first.saturating_sub(1), 0, size.saturating_sub(2))
}

/// Returns `n` evenly spaced values over the closed interval [start, end].
/// A single value yields `start`.
///
/// * `start` - First value.
/// * `end`   - Last value.
/// * `n`     - Number of values.
pub fn linspace(start: Float, end: Float, n: usize) -> Vec<Float> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let last = (n - 1) as Float;
            (0..n).map(|i| lerp(i as Float / last, start, end)).collect()
        }
    }
}
