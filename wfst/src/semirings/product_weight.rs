use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use nom::IResult;

use crate::semirings::{
    DivideType, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Product semiring of two weights: ⊕ and ⊗ apply component-wise.
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct ProductWeight<W1, W2> {
    pub(crate) weight: (W1, W2),
}

impl<W1: Semiring, W2: Semiring> ProductWeight<W1, W2> {
    pub fn value1(&self) -> &W1 {
        &self.weight.0
    }

    pub fn value2(&self) -> &W2 {
        &self.weight.1
    }

    pub fn set_value1(&mut self, w: W1) {
        self.weight.0 = w;
    }

    pub fn set_value2(&mut self, w: W2) {
        self.weight.1 = w;
    }
}

impl<W1: Semiring, W2: Semiring> Semiring for ProductWeight<W1, W2> {
    type Type = (W1, W2);
    type ReverseWeight = ProductWeight<W1::ReverseWeight, W2::ReverseWeight>;

    fn zero() -> Self {
        Self {
            weight: (W1::zero(), W2::zero()),
        }
    }

    fn one() -> Self {
        Self {
            weight: (W1::one(), W2::one()),
        }
    }

    fn new(weight: <Self as Semiring>::Type) -> Self {
        Self { weight }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        self.weight.0.plus_assign(&rhs.weight.0)?;
        self.weight.1.plus_assign(&rhs.weight.1)?;
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        self.weight.0.times_assign(&rhs.weight.0)?;
        self.weight.1.times_assign(&rhs.weight.1)?;
        Ok(())
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        self.weight.0.approx_equal(&rhs.weight.0, delta)
            && self.weight.1.approx_equal(&rhs.weight.1, delta)
    }

    fn member(&self) -> bool {
        self.weight.0.member() && self.weight.1.member()
    }

    fn value(&self) -> &<Self as Semiring>::Type {
        &self.weight
    }

    fn take_value(self) -> <Self as Semiring>::Type {
        self.weight
    }

    fn set_value(&mut self, value: <Self as Semiring>::Type) {
        self.weight = value;
    }

    fn reverse(&self) -> Result<Self::ReverseWeight> {
        Ok(ProductWeight {
            weight: (self.weight.0.reverse()?, self.weight.1.reverse()?),
        })
    }

    fn properties() -> SemiringProperties {
        W1::properties()
            & W2::properties()
            & (SemiringProperties::LEFT_SEMIRING
                | SemiringProperties::RIGHT_SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT)
    }
}

impl<W1: Semiring, W2: Semiring> ReverseBack<ProductWeight<W1, W2>>
    for ProductWeight<W1::ReverseWeight, W2::ReverseWeight>
{
    fn reverse_back(&self) -> Result<ProductWeight<W1, W2>> {
        Ok(ProductWeight {
            weight: (
                self.weight.0.reverse_back()?,
                self.weight.1.reverse_back()?,
            ),
        })
    }
}

impl<W1, W2> WeaklyDivisibleSemiring for ProductWeight<W1, W2>
where
    W1: WeaklyDivisibleSemiring,
    W2: WeaklyDivisibleSemiring,
{
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        self.weight.0.divide_assign(&rhs.weight.0, divide_type)?;
        self.weight.1.divide_assign(&rhs.weight.1, divide_type)?;
        Ok(())
    }
}

impl<W1: WeightQuantize, W2: WeightQuantize> WeightQuantize for ProductWeight<W1, W2> {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        self.weight.0.quantize_assign(delta)?;
        self.weight.1.quantize_assign(delta)?;
        Ok(())
    }
}

impl<W1: Semiring, W2: Semiring> From<(W1, W2)> for ProductWeight<W1, W2> {
    fn from(weight: (W1, W2)) -> Self {
        Self { weight }
    }
}

impl<W1: Semiring, W2: Semiring> fmt::Display for ProductWeight<W1, W2> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.weight.0, self.weight.1)
    }
}

impl<W1, W2> SerializableSemiring for ProductWeight<W1, W2>
where
    W1: SerializableSemiring,
    W2: SerializableSemiring,
{
    fn weight_type() -> String {
        format!("{}_X_{}", W1::weight_type(), W2::weight_type())
    }

    fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, w1) = W1::parse_binary(i)?;
        let (i, w2) = W2::parse_binary(i)?;
        Ok((i, Self { weight: (w1, w2) }))
    }

    fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
        self.weight.0.write_binary(writer)?;
        self.weight.1.write_binary(writer)?;
        Ok(())
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        let (i, (w1, w2)) = crate::parsers::weight_parser::parse_pair_text(i, ',')?;
        Ok((i, Self { weight: (w1, w2) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::{LogWeight, TropicalWeight};

    #[test]
    fn test_product_weight_componentwise() -> Result<()> {
        type W = ProductWeight<TropicalWeight, LogWeight>;
        let w1 = W::new((TropicalWeight::new(1.0), LogWeight::new(2.0)));
        let w2 = W::new((TropicalWeight::new(3.0), LogWeight::new(4.0)));
        let t = w1.times(&w2)?;
        assert_eq!(t.value1(), &TropicalWeight::new(4.0));
        assert_eq!(t.value2(), &LogWeight::new(6.0));
        assert_eq!(w1.plus(&W::zero())?, w1);
        assert_eq!(w1.times(&W::one())?, w1);
        Ok(())
    }
}
