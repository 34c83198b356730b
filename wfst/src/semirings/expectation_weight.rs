use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use nom::IResult;

use crate::semirings::{
    ProductWeight, ReverseBack, Semiring, SemiringProperties, SerializableSemiring, WeightQuantize,
};

/// Expectation semiring over a probability-like semiring `W1` and a value
/// semiring `W2` sharing the same scalar type:
/// `(a1, b1) ⊗ (a2, b2) = (a1 ⊗ a2, a1·b2 ⊕ a2·b1)` where `a·b` scales a `W2`
/// value by a `W1` weight. `One = (W1::one, W2::zero)`.
///
/// Division is undefined in this semiring, so `WeaklyDivisibleSemiring` is
/// deliberately not implemented. Components must be their own reverse weight.
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct ExpectationWeight<W1, W2> {
    weight: ProductWeight<W1, W2>,
}

impl<W1, W2> ExpectationWeight<W1, W2>
where
    W1: Semiring<ReverseWeight = W1>,
    W2: Semiring<Type = <W1 as Semiring>::Type, ReverseWeight = W2>,
{
    pub fn value1(&self) -> &W1 {
        self.weight.value1()
    }

    pub fn value2(&self) -> &W2 {
        self.weight.value2()
    }

    /// Scales `v` by the probability-side weight `p`, using the ⊗ of `W2`.
    fn scale(p: &W1, v: &W2) -> Result<W2> {
        W2::new(p.value().clone()).times(v)
    }
}

impl<W1, W2> Semiring for ExpectationWeight<W1, W2>
where
    W1: Semiring<ReverseWeight = W1>,
    W2: Semiring<Type = <W1 as Semiring>::Type, ReverseWeight = W2>,
{
    type Type = (W1, W2);
    type ReverseWeight = ExpectationWeight<W1, W2>;

    fn zero() -> Self {
        Self {
            weight: ProductWeight::new((W1::zero(), W2::zero())),
        }
    }

    fn one() -> Self {
        Self {
            weight: ProductWeight::new((W1::one(), W2::zero())),
        }
    }

    fn new(weight: <Self as Semiring>::Type) -> Self {
        Self {
            weight: ProductWeight::new(weight),
        }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        self.weight.plus_assign(&rhs.borrow().weight)
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        let mut expectation = Self::scale(self.value1(), rhs.value2())?;
        expectation.plus_assign(Self::scale(rhs.value1(), self.value2())?)?;
        let probability = self.value1().times(rhs.value1())?;
        self.weight.set_value1(probability);
        self.weight.set_value2(expectation);
        Ok(())
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
        Ok(ExpectationWeight {
            weight: ProductWeight::new((
                self.weight.value1().reverse()?,
                self.weight.value2().reverse()?,
            )),
        })
    }

    fn properties() -> SemiringProperties {
        W1::properties()
            & W2::properties()
            & (SemiringProperties::LEFT_SEMIRING
                | SemiringProperties::RIGHT_SEMIRING
                | SemiringProperties::COMMUTATIVE)
    }
}

impl<W1, W2> ReverseBack<ExpectationWeight<W1, W2>> for ExpectationWeight<W1, W2>
where
    W1: Semiring<ReverseWeight = W1>,
    W2: Semiring<Type = <W1 as Semiring>::Type, ReverseWeight = W2>,
{
    fn reverse_back(&self) -> Result<ExpectationWeight<W1, W2>> {
        self.reverse()
    }
}

impl<W1, W2> WeightQuantize for ExpectationWeight<W1, W2>
where
    W1: WeightQuantize + Semiring<ReverseWeight = W1>,
    W2: WeightQuantize + Semiring<Type = <W1 as Semiring>::Type, ReverseWeight = W2>,
{
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        self.weight.quantize_assign(delta)
    }
}

impl<W1, W2> fmt::Display for ExpectationWeight<W1, W2>
where
    W1: Semiring,
    W2: Semiring,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.weight)
    }
}

impl<W1, W2> SerializableSemiring for ExpectationWeight<W1, W2>
where
    W1: SerializableSemiring + Semiring<ReverseWeight = W1>,
    W2: SerializableSemiring + Semiring<Type = <W1 as Semiring>::Type, ReverseWeight = W2>,
{
    fn weight_type() -> String {
        format!("expectation_{}_{}", W1::weight_type(), W2::weight_type())
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
    use crate::semirings::{LogWeight, ProbabilityWeight};

    #[test]
    fn test_expectation_times() -> Result<()> {
        // Probability side in the log semiring (⊗ is +), value side a scalar.
        type W = ExpectationWeight<LogWeight, ProbabilityWeight>;
        let w1 = W::new((LogWeight::new(2.0), ProbabilityWeight::new(3.0)));
        let w2 = W::new((LogWeight::new(5.0), ProbabilityWeight::new(7.0)));
        let t = w1.times(&w2)?;
        assert_eq!(t.value1(), &LogWeight::new(7.0));
        // p1·v2 + p2·v1 = 2·7 + 5·3
        assert_eq!(t.value2(), &ProbabilityWeight::new(29.0));
        Ok(())
    }

    #[test]
    fn test_expectation_one() -> Result<()> {
        type W = ExpectationWeight<LogWeight, ProbabilityWeight>;
        assert_eq!(
            W::one().value(),
            &(LogWeight::one(), ProbabilityWeight::zero())
        );
        let w = W::new((LogWeight::new(2.0), ProbabilityWeight::new(3.0)));
        assert_eq!(w.times(&W::one())?, w);
        assert_eq!(W::one().times(&w)?, w);
        Ok(())
    }
}
