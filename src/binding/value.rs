use std::fmt::Debug;

use crate::binding::mode::BindingMode;

/// A value type a [`BoundValue`](crate::binding::BoundValue) can carry.
///
/// Every type supports the discrete modes. Numeric types additionally opt into
/// `ContinuousRange` and `Increment` by setting `NUMERIC` and providing the
/// scalar conversions.
pub trait BindableValue: Clone + PartialEq + Debug + Default + Send + 'static {
    const NUMERIC: bool = false;

    fn to_scalar(&self) -> Option<f64> {
        None
    }

    fn from_scalar(_scalar: f64) -> Option<Self> {
        None
    }

    /// `self + delta`, saturating at the bounds of the type.
    fn offset(&self, delta: f64) -> Option<Self> {
        Self::from_scalar(self.to_scalar()? + delta)
    }

    fn supports(mode: BindingMode) -> bool {
        Self::NUMERIC || !mode.is_numeric_only()
    }
}

macro_rules! integer_value {
    ($($t:ty),*) => {$(
        impl BindableValue for $t {
            const NUMERIC: bool = true;

            fn to_scalar(&self) -> Option<f64> {
                Some(*self as f64)
            }

            fn from_scalar(scalar: f64) -> Option<Self> {
                // float to int `as` saturates at the type bounds
                Some(scalar.round() as $t)
            }
        }
    )*};
}

macro_rules! float_value {
    ($($t:ty),*) => {$(
        impl BindableValue for $t {
            const NUMERIC: bool = true;

            fn to_scalar(&self) -> Option<f64> {
                Some(*self as f64)
            }

            fn from_scalar(scalar: f64) -> Option<Self> {
                Some(scalar as $t)
            }
        }
    )*};
}

integer_value!(u8, i32, i64);
float_value!(f32, f64);

impl BindableValue for bool {}

impl BindableValue for String {}
