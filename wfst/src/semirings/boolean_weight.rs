use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use byteorder::WriteBytesExt;
use nom::IResult;

use crate::semirings::{
    ReverseBack, Semiring, SemiringProperties, SerializableSemiring, WeightQuantize,
};

/// Boolean semiring: (∨, ∧, false, true).
#[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Default, Copy, Hash)]
pub struct BooleanWeight {
    value: bool,
}

impl Semiring for BooleanWeight {
    type Type = bool;
    type ReverseWeight = BooleanWeight;

    fn zero() -> Self {
        Self { value: false }
    }

    fn one() -> Self {
        Self { value: true }
    }

    fn new(value: <Self as Semiring>::Type) -> Self {
        BooleanWeight { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        self.value |= rhs.borrow().value;
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        self.value &= rhs.borrow().value;
        Ok(())
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
    }
}

impl ReverseBack<BooleanWeight> for BooleanWeight {
    fn reverse_back(&self) -> Result<BooleanWeight> {
        Ok(*self)
    }
}

impl WeightQuantize for BooleanWeight {
    fn quantize_assign(&mut self, _delta: f32) -> Result<()> {
        Ok(())
    }
}

impl From<bool> for BooleanWeight {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for BooleanWeight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value as u8)
    }
}

impl SerializableSemiring for BooleanWeight {
    fn weight_type() -> String {
        "boolean".to_string()
    }

    fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, value) = nom::number::complete::le_u8(i)?;
        Ok((i, Self::new(value != 0)))
    }

    fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
        writer.write_u8(self.value as u8)?;
        Ok(())
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        let (i, value) = crate::parsers::weight_parser::parse_i32_text(i)?;
        Ok((i, Self::new(value != 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_weight() -> Result<()> {
        let b_true = BooleanWeight::new(true);
        let b_false = BooleanWeight::new(false);

        assert_eq!(b_true.plus(&b_true)?, b_true);
        assert_eq!(b_true.plus(&b_false)?, b_true);
        assert_eq!(b_false.plus(&b_true)?, b_true);
        assert_eq!(b_false.plus(&b_false)?, b_false);

        assert_eq!(b_true.times(&b_true)?, b_true);
        assert_eq!(b_true.times(&b_false)?, b_false);
        assert_eq!(b_false.times(&b_true)?, b_false);
        assert_eq!(b_false.times(&b_false)?, b_false);
        Ok(())
    }
}
