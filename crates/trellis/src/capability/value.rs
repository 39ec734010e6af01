//! Widget values.
//!
//! A value-bearing widget stores a [`ValueState<T>`]: the current value plus
//! an optional validator and an optional transfer function. The window
//! keeps it type-erased behind [`ValueModel`]; typed access goes through
//! `Window::value` / `Window::set_value`.
//!
//! # Validation
//!
//! [`RangeValidator`] clamps numeric values to `[min, max]` and quantizes
//! them to the nearest multiple of `step` counted from `min`. A step of zero
//! disables quantization.
//!
//! # Transfer functions
//!
//! A [`ValueTransfer`] maps the external value (what the application sees,
//! e.g. a frequency in Hz) to the internal display domain (e.g. a linear
//! slider position) and back. Both directions must be inverse to each other
//! over the widget's range.

use std::any::{type_name, Any};
use std::fmt;

/// Numbers a [`RangeValidator`] can work with.
pub trait Numeric: Copy + PartialOrd + fmt::Debug + 'static {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $t
            }
        }
    )*};
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value.round() as $t
            }
        }
    )*};
}

impl_numeric_float!(f32, f64);
impl_numeric_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// Constrains a value before it is stored.
pub trait Validatable<T> {
    /// Map `value` into the set of acceptable values.
    fn validate(&self, value: T) -> T;
}

impl<T, F> Validatable<T> for F
where
    F: Fn(T) -> T,
{
    fn validate(&self, value: T) -> T {
        self(value)
    }
}

/// Range clamp plus step quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValidator<T> {
    min: T,
    max: T,
    step: T,
}

impl<T: Numeric> RangeValidator<T> {
    /// Create a validator. Returns `None` when `min > max` or a bound is
    /// not a number.
    pub fn new(min: T, max: T, step: T) -> Option<Self> {
        let (lo, hi, s) = (min.to_f64(), max.to_f64(), step.to_f64());
        if !lo.is_finite() || !hi.is_finite() || !s.is_finite() || lo > hi {
            return None;
        }
        Some(Self { min, max, step })
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn step(&self) -> T {
        self.step
    }

    /// Same range with another step.
    pub fn with_step(self, step: T) -> Option<Self> {
        Self::new(self.min, self.max, step)
    }
}

/// Relative slack, in steps, for floating-point error on the step grid.
const GRID_EPSILON: f64 = 1e-9;

impl<T: Numeric> Validatable<T> for RangeValidator<T> {
    fn validate(&self, value: T) -> T {
        let lo = self.min.to_f64();
        let hi = self.max.to_f64();
        let step = self.step.to_f64().abs();
        let v = value.to_f64();
        if v.is_nan() {
            return self.min;
        }

        let clamped = v.clamp(lo, hi);
        if step == 0.0 {
            return T::from_f64(clamped);
        }

        // Grid points within this distance of `max` count as `max`.
        let tolerance = step * GRID_EPSILON;
        let mut quantized = lo + ((clamped - lo) / step).round() * step;
        if quantized > hi + tolerance {
            // Top of the range is not on the step grid.
            quantized = lo + ((hi - lo) / step + GRID_EPSILON).floor() * step;
        }
        T::from_f64(quantized.min(hi))
    }
}

/// A pair of inverse functions between the external and internal value
/// domains.
pub struct ValueTransfer<T> {
    transfer: Box<dyn Fn(&T) -> T>,
    re_transfer: Box<dyn Fn(&T) -> T>,
}

impl<T> ValueTransfer<T> {
    pub fn new(
        transfer: impl Fn(&T) -> T + 'static,
        re_transfer: impl Fn(&T) -> T + 'static,
    ) -> Self {
        Self {
            transfer: Box::new(transfer),
            re_transfer: Box::new(re_transfer),
        }
    }

    /// External to internal.
    pub fn transfer(&self, value: &T) -> T {
        (self.transfer)(value)
    }

    /// Internal to external.
    pub fn re_transfer(&self, value: &T) -> T {
        (self.re_transfer)(value)
    }
}

impl<T: Clone + 'static> ValueTransfer<T> {
    pub fn identity() -> Self {
        Self::new(T::clone, T::clone)
    }
}

impl ValueTransfer<f64> {
    /// Logarithmic mapping: internal = log10(external).
    pub fn log10() -> Self {
        Self::new(|v: &f64| v.log10(), |v: &f64| 10f64.powf(*v))
    }
}

impl<T> fmt::Debug for ValueTransfer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTransfer").finish_non_exhaustive()
    }
}

/// The stored value of a widget.
pub struct ValueState<T> {
    value: T,
    validator: Option<Box<dyn Validatable<T>>>,
    range: Option<RangeValidator<f64>>,
    transfer: Option<ValueTransfer<T>>,
}

impl<T: Clone + PartialEq + 'static> ValueState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            validator: None,
            range: None,
            transfer: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Validate and store `value`. Returns `true` when the stored value
    /// changed.
    pub fn set(&mut self, value: T) -> bool {
        let value = self.validate(value);
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// `value` as it would be stored.
    pub fn validate(&self, value: T) -> T {
        match &self.validator {
            Some(validator) => validator.validate(value),
            None => value,
        }
    }

    /// Install a validator and revalidate the current value.
    ///
    /// Returns `true` when revalidation changed the stored value.
    pub fn set_validator(&mut self, validator: impl Validatable<T> + 'static) -> bool {
        self.validator = Some(Box::new(validator));
        self.range = None;
        let current = self.value.clone();
        self.set(current)
    }

    pub fn clear_validator(&mut self) {
        self.validator = None;
        self.range = None;
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    pub fn set_transfer(&mut self, transfer: ValueTransfer<T>) {
        self.transfer = Some(transfer);
    }

    pub fn transfer_function(&self) -> Option<&ValueTransfer<T>> {
        self.transfer.as_ref()
    }

    /// The current value in the internal domain.
    pub fn transferred(&self) -> T {
        match &self.transfer {
            Some(t) => t.transfer(&self.value),
            None => self.value.clone(),
        }
    }

    /// Map an internal-domain value back to the external domain.
    pub fn re_transfer(&self, internal: &T) -> T {
        match &self.transfer {
            Some(t) => t.re_transfer(internal),
            None => internal.clone(),
        }
    }
}

impl<T: Numeric + PartialEq> ValueState<T> {
    /// Install a [`RangeValidator`]. Returns `true` when the stored value
    /// changed.
    pub fn set_range(&mut self, range: RangeValidator<T>) -> bool {
        let changed = self.set_validator(range);
        self.range = RangeValidator::new(range.min().to_f64(), range.max().to_f64(), range.step().to_f64());
        changed
    }

    /// The installed range as `(min, max, step)`.
    pub fn range(&self) -> Option<(T, T, T)> {
        self.range
            .map(|r| (T::from_f64(r.min()), T::from_f64(r.max()), T::from_f64(r.step())))
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueState")
            .field("value", &self.value)
            .field("validated", &self.validator.is_some())
            .field("range", &self.range)
            .field("transfer", &self.transfer.is_some())
            .finish()
    }
}

/// Type-erased access to a widget's [`ValueState`].
pub trait ValueModel: Any {
    fn value_type(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// The current value boxed, for value-changed events.
    fn boxed_value(&self) -> Box<dyn Any>;
    fn is_validated(&self) -> bool;
    fn has_transfer(&self) -> bool;
}

impl<T: Clone + PartialEq + 'static> ValueModel for ValueState<T> {
    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn boxed_value(&self) -> Box<dyn Any> {
        Box::new(self.value.clone())
    }

    fn is_validated(&self) -> bool {
        self.validator.is_some()
    }

    fn has_transfer(&self) -> bool {
        self.transfer.is_some()
    }
}

impl dyn ValueModel {
    pub fn downcast_ref<T: Clone + PartialEq + 'static>(&self) -> Option<&ValueState<T>> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Clone + PartialEq + 'static>(&mut self) -> Option<&mut ValueState<T>> {
        self.as_any_mut().downcast_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rounds_to_nearest_step() {
        let range = RangeValidator::<f64>::new(0.0, 1.0, 0.1).unwrap();
        assert!((range.validate(0.47) - 0.5).abs() < 1e-9);
        assert!((range.validate(0.44) - 0.4).abs() < 1e-9);
        assert_eq!(range.validate(-3.0), 0.0);
        assert!((range.validate(7.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_top_on_decimal_grid() {
        for (hi, step) in [(0.7, 0.1), (0.3, 0.1), (0.9, 0.3), (1.1, 0.1)] {
            let range = RangeValidator::<f64>::new(0.0, hi, step).unwrap();
            for v in [hi, hi + step / 3.0, 5.0] {
                let q = range.validate(v);
                assert!((q - hi).abs() < 1e-12, "[0,{hi}]/{step}: {v} -> {q}");
            }
        }
        let range = RangeValidator::<f64>::new(0.0, 0.7, 0.1).unwrap();
        assert!((range.validate(0.64) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_range_top_off_grid() {
        let range = RangeValidator::<f64>::new(0.0, 1.0, 0.4).unwrap();
        let v = range.validate(1.0);
        assert!((v - 0.8).abs() < 1e-9, "{v}");
    }

    #[test]
    fn test_zero_step_only_clamps() {
        let range = RangeValidator::<f64>::new(-1.0, 1.0, 0.0).unwrap();
        assert_eq!(range.validate(0.123), 0.123);
        assert_eq!(range.validate(2.0), 1.0);
    }

    #[test]
    fn test_negative_step_uses_magnitude() {
        let range = RangeValidator::<f64>::new(0.0, 10.0, -2.0).unwrap();
        assert_eq!(range.validate(4.9), 4.0);
    }

    #[test]
    fn test_integer_range() {
        let range = RangeValidator::new(0_i32, 100, 5).unwrap();
        assert_eq!(range.validate(42), 40);
        assert_eq!(range.validate(43), 45);
        assert_eq!(range.validate(-7), 0);
    }

    #[test]
    fn test_invalid_range() {
        assert!(RangeValidator::<f64>::new(1.0, 0.0, 0.1).is_none());
        assert!(RangeValidator::<f64>::new(f64::NAN, 1.0, 0.1).is_none());
    }

    #[test]
    fn test_state_reports_change() {
        let mut state = ValueState::new(0.3_f64);
        state.set_range(RangeValidator::<f64>::new(0.0, 1.0, 0.1).unwrap());
        assert!(state.set(0.47));
        assert!(!state.set(0.5));
        assert_eq!(state.range().map(|r| r.1), Some(1.0));
    }

    #[test]
    fn test_log_transfer_is_invertible() {
        let t = ValueTransfer::log10();
        for v in [20.0, 440.0, 1000.0, 20_000.0] {
            assert!((t.re_transfer(&t.transfer(&v)) - v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_closure_validator() {
        let mut state = ValueState::new(String::from("a"));
        state.set_validator(|s: String| s.to_uppercase());
        assert_eq!(state.value(), "A");
        state.set("b".into());
        assert_eq!(state.value(), "B");
    }

    #[test]
    fn test_erased_downcast() {
        let model: Box<dyn ValueModel> = Box::new(ValueState::new(3_u8));
        assert!(model.downcast_ref::<u8>().is_some());
        assert!(model.downcast_ref::<f64>().is_none());
        assert_eq!(model.value_type(), "u8");
    }
}
