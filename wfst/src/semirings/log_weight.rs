use std::borrow::Borrow;
use std::f32;
use std::fmt;

use anyhow::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use nom::IResult;

use crate::semirings::utils_float::{float_approx_equal, log_plus_f32, quantize_f32};
use crate::semirings::{
    DivideType, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Log semiring: (log+, +, ∞, 0) with values stored as negated natural logs.
#[derive(Clone, Debug, PartialOrd, Default, Copy)]
pub struct LogWeight {
    value: f32,
}

impl LogWeight {
    /// Sentinel outside the semiring domain; `member()` is false.
    pub fn no_weight() -> Self {
        Self::new(f32::NAN)
    }
}

impl Semiring for LogWeight {
    type Type = f32;
    type ReverseWeight = LogWeight;

    fn zero() -> Self {
        Self {
            value: f32::INFINITY,
        }
    }

    fn one() -> Self {
        Self { value: 0.0 }
    }

    fn new(value: <Self as Semiring>::Type) -> Self {
        LogWeight { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if !self.member() || !rhs.member() {
            *self = Self::no_weight();
        } else {
            self.value = log_plus_f32(self.value, rhs.value);
        }
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if !self.member() || !rhs.member() {
            *self = Self::no_weight();
        } else if self.is_zero() || rhs.is_zero() {
            *self = Self::zero();
        } else {
            self.value += rhs.value;
        }
        Ok(())
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        float_approx_equal(self.value, rhs.borrow().value, delta)
    }

    fn member(&self) -> bool {
        !self.value.is_nan() && self.value != f32::NEG_INFINITY
    }

    fn value(&self) -> &<Self as Semiring>::Type {
        &self.value
    }

    fn take_value(self) -> <Self as Semiring>::Type {
        self.value
    }

    fn set_value(&mut self, value: <Self as Semiring>::Type) {
        self.value = value
    }

    fn reverse(&self) -> Result<Self::ReverseWeight> {
        Ok(*self)
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::LEFT_SEMIRING
            | SemiringProperties::RIGHT_SEMIRING
            | SemiringProperties::COMMUTATIVE
    }
}

impl ReverseBack<LogWeight> for LogWeight {
    fn reverse_back(&self) -> Result<LogWeight> {
        Ok(*self)
    }
}

impl WeaklyDivisibleSemiring for LogWeight {
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) -> Result<()> {
        if !self.member() || !rhs.member() || rhs.is_zero() {
            *self = Self::no_weight();
        } else if self.is_zero() {
            *self = Self::zero();
        } else {
            self.value -= rhs.value;
        }
        Ok(())
    }
}

impl WeightQuantize for LogWeight {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        self.value = quantize_f32(self.value, delta);
        Ok(())
    }
}

impl From<f32> for LogWeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

partial_eq_f32!(LogWeight);
display_semiring!(LogWeight);
float_weight_serialization!(LogWeight, "log");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_weight_plus() -> Result<()> {
        let w = LogWeight::new(2.0).plus(LogWeight::new(2.0))?;
        // -ln(2 * exp(-2))
        assert!(w.approx_equal(LogWeight::new(2.0 - 2.0f32.ln()), crate::KDELTA));
        assert_eq!(LogWeight::zero().plus(LogWeight::new(0.3))?, LogWeight::new(0.3));
        Ok(())
    }

    #[test]
    fn test_log_weight_times() -> Result<()> {
        let w = LogWeight::new(1.5).times(LogWeight::new(2.5))?;
        assert_eq!(w, LogWeight::new(4.0));
        assert_eq!(
            LogWeight::new(1.5).times(LogWeight::zero())?,
            LogWeight::zero()
        );
        Ok(())
    }
}
