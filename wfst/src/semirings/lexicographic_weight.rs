use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use nom::IResult;

use crate::semirings::{
    DivideType, ProductWeight, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Lexicographic semiring over a pair of weights: ⊕ keeps the operand whose
/// pair is smaller in the natural order of `W1`, ties broken by `W2`; ⊗ is
/// component-wise. Both components must declare the `PATH` property for the
/// natural order to be total.
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct LexicographicWeight<W1, W2> {
    weight: ProductWeight<W1, W2>,
}

/// `w1` strictly before `w2` in the natural ⊕-order.
fn natural_less<W: Semiring>(w1: &W, w2: &W) -> Result<bool> {
    Ok(&w1.plus(w2)? == w1 && w1 != w2)
}

impl<W1: Semiring, W2: Semiring> LexicographicWeight<W1, W2> {
    pub fn value1(&self) -> &W1 {
        self.weight.value1()
    }

    pub fn value2(&self) -> &W2 {
        self.weight.value2()
    }

    fn less(&self, rhs: &Self) -> Result<bool> {
        if natural_less(self.value1(), rhs.value1())? {
            return Ok(true);
        }
        if natural_less(rhs.value1(), self.value1())? {
            return Ok(false);
        }
        natural_less(self.value2(), rhs.value2())
    }
}

impl<W1: Semiring, W2: Semiring> Semiring for LexicographicWeight<W1, W2> {
    type Type = (W1, W2);
    type ReverseWeight = LexicographicWeight<W1::ReverseWeight, W2::ReverseWeight>;

    fn zero() -> Self {
        Self {
            weight: ProductWeight::zero(),
        }
    }

    fn one() -> Self {
        Self {
            weight: ProductWeight::one(),
        }
    }

    fn new(weight: <Self as Semiring>::Type) -> Self {
        debug_assert!(W1::properties().contains(SemiringProperties::PATH));
        debug_assert!(W2::properties().contains(SemiringProperties::PATH));
        Self {
            weight: ProductWeight::new(weight),
        }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        if self.is_zero() {
            *self = rhs.clone();
        } else if !rhs.is_zero() && rhs.less(self)? {
            *self = rhs.clone();
        }
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        self.weight.times_assign(&rhs.borrow().weight)
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        self.weight.approx_equal(&rhs.borrow().weight, delta)
    }

    fn member(&self) -> bool {
        self.weight.member()
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
        Ok(LexicographicWeight {
            weight: self.weight.reverse()?,
        })
    }

    fn properties() -> SemiringProperties {
        W1::properties()
            & W2::properties()
            & (SemiringProperties::LEFT_SEMIRING
                | SemiringProperties::RIGHT_SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT
                | SemiringProperties::PATH)
    }
}

impl<W1: Semiring, W2: Semiring> ReverseBack<LexicographicWeight<W1, W2>>
    for LexicographicWeight<W1::ReverseWeight, W2::ReverseWeight>
{
    fn reverse_back(&self) -> Result<LexicographicWeight<W1, W2>> {
        Ok(LexicographicWeight {
            weight: self.weight.reverse_back()?,
        })
    }
}

impl<W1, W2> WeaklyDivisibleSemiring for LexicographicWeight<W1, W2>
where
    W1: WeaklyDivisibleSemiring,
    W2: WeaklyDivisibleSemiring,
{
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        self.weight.divide_assign(&rhs.weight, divide_type)
    }
}

impl<W1: WeightQuantize, W2: WeightQuantize> WeightQuantize for LexicographicWeight<W1, W2> {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        self.weight.quantize_assign(delta)
    }
}

impl<W1: Semiring, W2: Semiring> fmt::Display for LexicographicWeight<W1, W2> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.weight)
    }
}

impl<W1, W2> SerializableSemiring for LexicographicWeight<W1, W2>
where
    W1: SerializableSemiring,
    W2: SerializableSemiring,
{
    fn weight_type() -> String {
        format!("{}_LT_{}", W1::weight_type(), W2::weight_type())
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
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_lexicographic_plus_picks_operand() -> Result<()> {
        type W = LexicographicWeight<TropicalWeight, TropicalWeight>;
        let w1 = W::new((TropicalWeight::new(1.0), TropicalWeight::new(9.0)));
        let w2 = W::new((TropicalWeight::new(1.0), TropicalWeight::new(2.0)));
        assert_eq!(w1.plus(&w2)?, w2);
        let w3 = W::new((TropicalWeight::new(0.5), TropicalWeight::new(9.0)));
        assert_eq!(w1.plus(&w3)?, w3);
        assert_eq!(w1.plus(&W::zero())?, w1);
        Ok(())
    }
}
