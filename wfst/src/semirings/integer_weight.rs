use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use nom::IResult;

use crate::semirings::{
    ReverseBack, Semiring, SemiringProperties, SerializableSemiring, WeightQuantize,
};

/// Semiring of the integers under the usual addition and multiplication.
#[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Default, Copy, Hash)]
pub struct IntegerWeight {
    value: i32,
}

impl Semiring for IntegerWeight {
    type Type = i32;
    type ReverseWeight = IntegerWeight;

    fn zero() -> Self {
        Self { value: 0 }
    }

    fn one() -> Self {
        Self { value: 1 }
    }

    fn new(value: <Self as Semiring>::Type) -> Self {
        IntegerWeight { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        self.value = self.value.wrapping_add(rhs.borrow().value);
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        self.value = self.value.wrapping_mul(rhs.borrow().value);
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
    }
}

impl ReverseBack<IntegerWeight> for IntegerWeight {
    fn reverse_back(&self) -> Result<IntegerWeight> {
        Ok(*self)
    }
}

impl WeightQuantize for IntegerWeight {
    fn quantize_assign(&mut self, _delta: f32) -> Result<()> {
        Ok(())
    }
}

impl From<i32> for IntegerWeight {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for IntegerWeight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl SerializableSemiring for IntegerWeight {
    fn weight_type() -> String {
        "integer".to_string()
    }

    fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, value) = nom::number::complete::le_i32(i)?;
        Ok((i, Self::new(value)))
    }

    fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.value)?;
        Ok(())
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        let (i, value) = crate::parsers::weight_parser::parse_i32_text(i)?;
        Ok((i, Self::new(value)))
    }
}
