use std::borrow::Borrow;
use std::f32;
use std::fmt;

use anyhow::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use nom::IResult;

use crate::semirings::utils_float::{float_approx_equal, quantize_f32};
use crate::semirings::{
    DivideType, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Tropical semiring: (min, +, ∞, 0).
#[derive(Clone, Debug, PartialOrd, Default, Copy)]
pub struct TropicalWeight {
    value: f32,
}

impl TropicalWeight {
    /// Sentinel outside the semiring domain; `member()` is false.
    pub fn no_weight() -> Self {
        Self::new(f32::NAN)
    }
}

impl Semiring for TropicalWeight {
    type Type = f32;
    type ReverseWeight = TropicalWeight;

    fn zero() -> Self {
        Self {
            value: f32::INFINITY,
        }
    }

    fn one() -> Self {
        Self { value: 0.0 }
    }

    fn new(value: <Self as Semiring>::Type) -> Self {
        TropicalWeight { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if !self.member() || !rhs.member() {
            *self = Self::no_weight();
        } else if rhs.value < self.value {
            self.value = rhs.value;
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
            | SemiringProperties::IDEMPOTENT
            | SemiringProperties::PATH
    }
}

impl ReverseBack<TropicalWeight> for TropicalWeight {
    fn reverse_back(&self) -> Result<TropicalWeight> {
        Ok(*self)
    }
}

impl WeaklyDivisibleSemiring for TropicalWeight {
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

impl WeightQuantize for TropicalWeight {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        self.value = quantize_f32(self.value, delta);
        Ok(())
    }
}

impl From<f32> for TropicalWeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

partial_eq_f32!(TropicalWeight);
display_semiring!(TropicalWeight);
float_weight_serialization!(TropicalWeight, "tropical");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tropical_weight_ops() -> Result<()> {
        let w1 = TropicalWeight::new(1.2);
        let w2 = TropicalWeight::new(3.4);
        assert_eq!(w1.plus(&w2)?, w1);
        assert_eq!(w2.plus(&w1)?, w1);
        assert_eq!(w1.times(&w2)?, TropicalWeight::new(4.6));
        assert_eq!(w1.times(&TropicalWeight::zero())?, TropicalWeight::zero());
        assert_eq!(w1.plus(&TropicalWeight::zero())?, w1);
        assert_eq!(w1.times(&TropicalWeight::one())?, w1);
        Ok(())
    }

    #[test]
    fn test_tropical_weight_member() {
        assert!(!TropicalWeight::no_weight().member());
        assert!(!TropicalWeight::new(f32::NEG_INFINITY).member());
        assert!(TropicalWeight::zero().member());
    }

    #[test]
    fn test_tropical_weight_divide() -> Result<()> {
        let w = TropicalWeight::new(4.6);
        let q = w.divide(&TropicalWeight::new(1.2), DivideType::DivideAny)?;
        assert!(q.approx_equal(TropicalWeight::new(3.4), crate::KDELTA));
        Ok(())
    }
}
