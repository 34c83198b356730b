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

/// Probability semiring: (+, ×, 0.0, 1.0).
#[derive(Clone, Debug, PartialOrd, Default, Copy)]
pub struct ProbabilityWeight {
    value: f32,
}

impl ProbabilityWeight {
    /// Sentinel outside the semiring domain; `member()` is false.
    pub fn no_weight() -> Self {
        Self::new(f32::NAN)
    }
}

impl Semiring for ProbabilityWeight {
    type Type = f32;
    type ReverseWeight = ProbabilityWeight;

    fn zero() -> Self {
        Self { value: 0.0 }
    }

    fn one() -> Self {
        Self { value: 1.0 }
    }

    fn new(value: <Self as Semiring>::Type) -> Self {
        ProbabilityWeight { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if !self.member() || !rhs.member() {
            *self = Self::no_weight();
        } else {
            self.value += rhs.value;
        }
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if !self.member() || !rhs.member() {
            *self = Self::no_weight();
        } else {
            self.value *= rhs.value;
        }
        Ok(())
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        float_approx_equal(self.value, rhs.borrow().value, delta)
    }

    fn member(&self) -> bool {
        !self.value.is_nan()
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

impl ReverseBack<ProbabilityWeight> for ProbabilityWeight {
    fn reverse_back(&self) -> Result<ProbabilityWeight> {
        Ok(*self)
    }
}

impl WeaklyDivisibleSemiring for ProbabilityWeight {
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) -> Result<()> {
        if !self.member() || !rhs.member() || rhs.is_zero() {
            *self = Self::no_weight();
        } else {
            self.value /= rhs.value;
        }
        Ok(())
    }
}

impl WeightQuantize for ProbabilityWeight {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        self.value = quantize_f32(self.value, delta);
        Ok(())
    }
}

impl From<f32> for ProbabilityWeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

partial_eq_f32!(ProbabilityWeight);
display_semiring!(ProbabilityWeight);
float_weight_serialization!(ProbabilityWeight, "probability");
