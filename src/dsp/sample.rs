//! Numeric sample types accepted by the processors.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign};

/// Floating point sample type.
pub trait Sample:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + AddAssign
    + Mul<Output = Self>
    + MulAssign
    + Send
    + Sync
    + 'static
{
    /// Silence.
    const EQUILIBRIUM: Self;

    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;
}

impl Sample for f32 {
    const EQUILIBRIUM: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const EQUILIBRIUM: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
