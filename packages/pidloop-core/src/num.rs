//! Numeric backends.
//!
//! The controller is written once against [`PidValue`] and instantiated per backend, so the
//! choice between fixed-point and floating-point arithmetic costs nothing at runtime.
//!
//! Two flavours of each arithmetic operation are provided:
//!
//! - *Saturating* operations never fail. Fixed-point types clamp to `MIN`/`MAX` instead of
//!   wrapping, and a division by zero yields `MAX`, `MIN` or zero depending on the sign of the
//!   dividend. Floating-point types follow IEEE-754, so overflow produces an infinity and a
//!   division by zero produces an infinity or NaN.
//! - *Checked* operations return [`None`] whenever the result is not representable. For floats
//!   this means any non-finite result; for every backend a zero divisor is rejected.
//!
//! | Value type | Accumulator type |
//! |------------|------------------|
//! | `f32`      | `f64`            |
//! | `f64`      | `f64` (no wider hardware float exists, so the widths match) |
//! | [`I16F16`] | [`I32F32`]       |
//! | [`I32F32`] | [`I64F64`]       |

use core::{
    cmp::Ordering,
    fmt::Debug,
    ops::{Add, Div, Mul, Sub},
};

use ::num::Zero;
use fixed::types::{I16F16, I32F32, I64F64};

/// Arithmetic required by the controller from both its value type and its accumulator type.
pub trait PidNumber:
    Copy
    + Debug
    + PartialOrd
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Adds `rhs`, saturating at the bounds of the type.
    #[must_use]
    fn saturating_add(self, rhs: Self) -> Self;

    /// Subtracts `rhs`, saturating at the bounds of the type.
    #[must_use]
    fn saturating_sub(self, rhs: Self) -> Self;

    /// Multiplies by `rhs`, saturating at the bounds of the type.
    #[must_use]
    fn saturating_mul(self, rhs: Self) -> Self;

    /// Divides by `rhs`, saturating at the bounds of the type.
    ///
    /// This never panics, even when `rhs` is zero.
    #[must_use]
    fn saturating_div(self, rhs: Self) -> Self;

    /// Adds `rhs`, returning [`None`] if the result is not representable.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Subtracts `rhs`, returning [`None`] if the result is not representable.
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// Multiplies by `rhs`, returning [`None`] if the result is not representable.
    fn checked_mul(self, rhs: Self) -> Option<Self>;

    /// Divides by `rhs`, returning [`None`] if `rhs` is zero or the result is not representable.
    fn checked_div(self, rhs: Self) -> Option<Self>;
}

/// A controller value type paired with a wider accumulator type.
///
/// Gains, setpoints, measurements, time steps and outputs are all `Self`. The integral term is
/// kept in [`PidValue::Accum`] so that long runs of small errors lose less precision and
/// overflow later than they would in the value type.
pub trait PidValue: PidNumber {
    /// Wider type used for the integral term and for summing the output.
    type Accum: PidNumber;

    /// Converts into the accumulator type without loss.
    fn widen(self) -> Self::Accum;

    /// Converts an accumulator back into the value type, saturating if it does not fit.
    fn narrow(accum: Self::Accum) -> Self;
}

macro_rules! impl_float_number {
    ($($ty:ty),*) => {
        $(
            impl PidNumber for $ty {
                #[inline]
                fn saturating_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn saturating_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn saturating_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline]
                fn saturating_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs).filter(|v| v.is_finite())
                }

                #[inline]
                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    Some(self - rhs).filter(|v| v.is_finite())
                }

                #[inline]
                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    Some(self * rhs).filter(|v| v.is_finite())
                }

                #[inline]
                fn checked_div(self, rhs: Self) -> Option<Self> {
                    if rhs == 0.0 {
                        return None;
                    }
                    Some(self / rhs).filter(|v| v.is_finite())
                }
            }
        )*
    };
}

macro_rules! impl_fixed_number {
    ($($ty:ty),*) => {
        $(
            impl PidNumber for $ty {
                #[inline]
                fn saturating_add(self, rhs: Self) -> Self {
                    <$ty>::saturating_add(self, rhs)
                }

                #[inline]
                fn saturating_sub(self, rhs: Self) -> Self {
                    <$ty>::saturating_sub(self, rhs)
                }

                #[inline]
                fn saturating_mul(self, rhs: Self) -> Self {
                    <$ty>::saturating_mul(self, rhs)
                }

                #[inline]
                fn saturating_div(self, rhs: Self) -> Self {
                    if rhs == <$ty>::ZERO {
                        return match self.cmp(&<$ty>::ZERO) {
                            Ordering::Greater => <$ty>::MAX,
                            Ordering::Less => <$ty>::MIN,
                            Ordering::Equal => <$ty>::ZERO,
                        };
                    }
                    <$ty>::saturating_div(self, rhs)
                }

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }

                #[inline]
                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_sub(self, rhs)
                }

                #[inline]
                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_mul(self, rhs)
                }

                #[inline]
                fn checked_div(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_div(self, rhs)
                }
            }
        )*
    };
}

impl_float_number!(f32, f64);
impl_fixed_number!(I16F16, I32F32, I64F64);

impl PidValue for f32 {
    type Accum = f64;

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    // Out of range values become infinities, matching IEEE overflow.
    #[inline]
    fn narrow(accum: f64) -> Self {
        accum as f32
    }
}

impl PidValue for f64 {
    type Accum = f64;

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(accum: f64) -> Self {
        accum
    }
}

macro_rules! impl_fixed_value {
    ($($ty:ty => $accum:ty),*) => {
        $(
            impl PidValue for $ty {
                type Accum = $accum;

                #[inline]
                fn widen(self) -> $accum {
                    <$accum>::from_num(self)
                }

                #[inline]
                fn narrow(accum: $accum) -> Self {
                    <$ty>::saturating_from_num(accum)
                }
            }
        )*
    };
}

impl_fixed_value!(I16F16 => I32F32, I32F32 => I64F64);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_saturates_instead_of_wrapping() {
        assert_eq!(PidNumber::saturating_add(I16F16::MAX, I16F16::ONE), I16F16::MAX);
        assert_eq!(PidNumber::saturating_sub(I16F16::MIN, I16F16::ONE), I16F16::MIN);
        assert_eq!(
            PidNumber::saturating_mul(I16F16::from_num(1000), I16F16::from_num(-1000)),
            I16F16::MIN
        );
    }

    #[test]
    fn fixed_division_by_zero_saturates_by_sign() {
        let zero = I16F16::ZERO;
        assert_eq!(PidNumber::saturating_div(I16F16::from_num(3), zero), I16F16::MAX);
        assert_eq!(PidNumber::saturating_div(I16F16::from_num(-3), zero), I16F16::MIN);
        assert_eq!(PidNumber::saturating_div(zero, zero), zero);
        assert_eq!(PidNumber::checked_div(I16F16::ONE, zero), None);
    }

    #[test]
    fn fixed_checked_reports_overflow() {
        assert_eq!(PidNumber::checked_add(I16F16::MAX, I16F16::DELTA), None);
        assert_eq!(
            PidNumber::checked_mul(I16F16::from_num(2), I16F16::from_num(3)),
            Some(I16F16::from_num(6))
        );
    }

    #[test]
    fn float_division_by_zero_follows_ieee() {
        assert_eq!(PidNumber::saturating_div(1.0_f32, 0.0), f32::INFINITY);
        assert_eq!(PidNumber::saturating_div(-1.0_f32, 0.0), f32::NEG_INFINITY);
        assert!(PidNumber::saturating_div(0.0_f64, 0.0).is_nan());
        assert_eq!(PidNumber::checked_div(1.0_f64, 0.0), None);
    }

    #[test]
    fn float_checked_rejects_non_finite() {
        assert_eq!(PidNumber::checked_mul(f32::MAX, 2.0), None);
        assert_eq!(PidNumber::checked_add(f64::NAN, 1.0), None);
        assert_eq!(PidNumber::checked_sub(3.0_f32, 1.0), Some(2.0));
    }

    #[test]
    fn widening_is_lossless() {
        assert_eq!(I16F16::MAX.widen(), I32F32::from_num(I16F16::MAX));
        assert_eq!(I16F16::DELTA.widen(), I32F32::from_bits(1 << 16));
        assert_eq!(0.1_f32.widen(), f64::from(0.1_f32));
    }

    #[test]
    fn narrowing_saturates() {
        let big = I32F32::from_num(100_000);
        assert_eq!(I16F16::narrow(big), I16F16::MAX);
        assert_eq!(I16F16::narrow(-big), I16F16::MIN);
        assert_eq!(I16F16::narrow(I32F32::from_num(-2.5)), I16F16::from_num(-2.5));

        let huge = I64F64::from_num(1_u64 << 40);
        assert_eq!(I32F32::narrow(huge), I32F32::MAX);

        assert_eq!(f32::narrow(1e300), f32::INFINITY);
        assert_eq!(f32::narrow(0.5), 0.5);
    }
}
