use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use nom::IResult;

use crate::semirings::utils_float::{log_minus_f32, log_plus_f32};
use crate::semirings::{
    DivideType, LogWeight, ProductWeight, ReverseBack, Semiring, SemiringProperties,
    SerializableSemiring, TropicalWeight, WeaklyDivisibleSemiring, WeightQuantize,
};

/// Log semiring extended with a sign: the first component carries the sign
/// (`1` positive, `-1` negative), the second the magnitude as a negated log.
/// ⊕ performs signed addition in the log domain, ⊗ multiplies magnitudes and
/// signs.
#[derive(Clone, Debug, PartialOrd, Default)]
pub struct SignedLogWeight {
    weight: ProductWeight<TropicalWeight, LogWeight>,
}

impl SignedLogWeight {
    pub fn new_signed(positive: bool, magnitude: LogWeight) -> Self {
        let sign = if positive { 1.0 } else { -1.0 };
        Self {
            weight: ProductWeight::new((TropicalWeight::new(sign), magnitude)),
        }
    }

    pub fn sign(&self) -> &TropicalWeight {
        self.weight.value1()
    }

    pub fn magnitude(&self) -> &LogWeight {
        self.weight.value2()
    }

    fn is_positive(&self) -> bool {
        *self.sign().value() > 0.0
    }
}

impl Semiring for SignedLogWeight {
    type Type = (TropicalWeight, LogWeight);
    type ReverseWeight = SignedLogWeight;

    fn zero() -> Self {
        Self {
            weight: ProductWeight::new((TropicalWeight::new(1.0), LogWeight::zero())),
        }
    }

    fn one() -> Self {
        Self {
            weight: ProductWeight::new((TropicalWeight::new(1.0), LogWeight::one())),
        }
    }

    fn new(weight: <Self as Semiring>::Type) -> Self {
        Self {
            weight: ProductWeight::new(weight),
        }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if !self.member() || !rhs.member() {
            self.weight.set_value2(LogWeight::no_weight());
            return Ok(());
        }
        let f1 = *self.magnitude().value();
        let f2 = *rhs.magnitude().value();
        let same_sign = self.is_positive() == rhs.is_positive();
        let (sign, magnitude) = if same_sign {
            (self.is_positive(), log_plus_f32(f1, f2))
        } else if f1 == f2 {
            // Exact cancellation.
            *self = Self::zero();
            return Ok(());
        } else if f1 < f2 {
            (self.is_positive(), log_minus_f32(f1, f2))
        } else {
            (rhs.is_positive(), log_minus_f32(f2, f1))
        };
        *self = Self::new_signed(sign, LogWeight::new(magnitude));
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        let positive = self.is_positive() == rhs.is_positive();
        let magnitude = self.magnitude().times(rhs.magnitude())?;
        *self = Self::new_signed(positive, magnitude);
        Ok(())
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        if self.magnitude().is_zero() && rhs.magnitude().is_zero() {
            return true;
        }
        self.is_positive() == rhs.is_positive()
            && self.magnitude().approx_equal(rhs.magnitude(), delta)
    }

    fn member(&self) -> bool {
        self.magnitude().member()
    }

    fn value(&self) -> &<Self as Semiring>::Type {
        self.weight.value()
    }

    fn take_value(self) -> <Self as Semiring>::Type {
        self.weight.take_value()
    }

    fn set_value(&mut self, value: <Self as Semiring>::Type) {
        self.weight.set_value(value);
    }

    fn reverse(&self) -> Result<Self::ReverseWeight> {
        Ok(self.clone())
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::LEFT_SEMIRING
            | SemiringProperties::RIGHT_SEMIRING
            | SemiringProperties::COMMUTATIVE
    }
}

impl PartialEq for SignedLogWeight {
    fn eq(&self, other: &Self) -> bool {
        // Both signed zeros compare equal whatever their sign.
        if self.magnitude().is_zero() && other.magnitude().is_zero() {
            return true;
        }
        self.is_positive() == other.is_positive() && self.magnitude() == other.magnitude()
    }
}

impl ReverseBack<SignedLogWeight> for SignedLogWeight {
    fn reverse_back(&self) -> Result<SignedLogWeight> {
        Ok(self.clone())
    }
}

impl WeaklyDivisibleSemiring for SignedLogWeight {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        let positive = self.is_positive() == rhs.is_positive();
        let mut magnitude = self.magnitude().clone();
        magnitude.divide_assign(rhs.magnitude(), divide_type)?;
        *self = Self::new_signed(positive, magnitude);
        Ok(())
    }
}

impl WeightQuantize for SignedLogWeight {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        let mut magnitude = self.magnitude().clone();
        magnitude.quantize_assign(delta)?;
        self.weight.set_value2(magnitude);
        Ok(())
    }
}

impl fmt::Display for SignedLogWeight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.weight)
    }
}

impl SerializableSemiring for SignedLogWeight {
    fn weight_type() -> String {
        "signed_log".to_string()
    }

    fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, weight) = ProductWeight::parse_binary(i)?;
        Ok((i, Self { weight }))
    }

    fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
        self.weight.write_binary(writer)
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        let (i, weight) = ProductWeight::parse_text(i)?;
        Ok((i, Self { weight }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_log_plus_opposite_signs() -> Result<()> {
        // 1.0 + (-0.5) = 0.5 in the probability domain.
        let a = SignedLogWeight::new_signed(true, LogWeight::new(0.0));
        let b = SignedLogWeight::new_signed(false, LogWeight::new(0.5f32.recip().ln()));
        let c = a.plus(&b)?;
        assert!(c.is_positive());
        let expected = -(0.5f32.ln());
        assert!(c.magnitude().approx_equal(LogWeight::new(expected), 1e-3));
        Ok(())
    }

    #[test]
    fn test_signed_log_cancellation() -> Result<()> {
        let a = SignedLogWeight::new_signed(true, LogWeight::new(1.5));
        let b = SignedLogWeight::new_signed(false, LogWeight::new(1.5));
        assert_eq!(a.plus(&b)?, SignedLogWeight::zero());
        Ok(())
    }

    #[test]
    fn test_signed_log_times_signs() -> Result<()> {
        let a = SignedLogWeight::new_signed(false, LogWeight::new(1.0));
        let b = SignedLogWeight::new_signed(false, LogWeight::new(2.0));
        let c = a.times(&b)?;
        assert!(c.is_positive());
        assert_eq!(c.magnitude(), &LogWeight::new(3.0));
        Ok(())
    }
}
