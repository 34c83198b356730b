use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use nom::IResult;

use crate::semirings::tuple_weight::TupleWeight;
use crate::semirings::{
    DivideType, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Cartesian power of a semiring: a fixed-length vector of weights with ⊕ and
/// ⊗ applied component-wise.
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct PowerWeight<W: Semiring, const N: usize> {
    weight: TupleWeight<W, N>,
}

impl<W: Semiring, const N: usize> PowerWeight<W, N> {
    pub fn value_at(&self, index: usize) -> &W {
        self.weight.value(index)
    }

    pub fn set_value_at(&mut self, index: usize, w: W) {
        self.weight.set_value(index, w);
    }
}

impl<W: Semiring, const N: usize> Semiring for PowerWeight<W, N> {
    type Type = TupleWeight<W, N>;
    type ReverseWeight = PowerWeight<W::ReverseWeight, N>;

    fn zero() -> Self {
        Self {
            weight: TupleWeight::from_fn(|_| W::zero()),
        }
    }

    fn one() -> Self {
        Self {
            weight: TupleWeight::from_fn(|_| W::one()),
        }
    }

    fn new(weight: <Self as Semiring>::Type) -> Self {
        Self { weight }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        for idx in 0..N {
            self.weight.values[idx].plus_assign(&rhs.weight.values[idx])?;
        }
        Ok(())
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
        let rhs = rhs.borrow();
        for idx in 0..N {
            self.weight.values[idx].times_assign(&rhs.weight.values[idx])?;
        }
        Ok(())
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        self.weight
            .iter()
            .zip(rhs.weight.iter())
            .all(|(w1, w2)| w1.approx_equal(w2, delta))
    }

    fn member(&self) -> bool {
        self.weight.iter().all(|w| w.member())
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
        Ok(PowerWeight {
            weight: self.weight.try_map(|w| w.reverse())?,
        })
    }

    fn properties() -> SemiringProperties {
        W::properties()
            & (SemiringProperties::LEFT_SEMIRING
                | SemiringProperties::RIGHT_SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT)
    }
}

impl<W: Semiring, const N: usize> ReverseBack<PowerWeight<W, N>>
    for PowerWeight<W::ReverseWeight, N>
{
    fn reverse_back(&self) -> Result<PowerWeight<W, N>> {
        Ok(PowerWeight {
            weight: self.weight.try_map(|w| w.reverse_back())?,
        })
    }
}

impl<W: WeaklyDivisibleSemiring, const N: usize> WeaklyDivisibleSemiring for PowerWeight<W, N> {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        for idx in 0..N {
            self.weight.values[idx].divide_assign(&rhs.weight.values[idx], divide_type)?;
        }
        Ok(())
    }
}

impl<W: WeightQuantize, const N: usize> WeightQuantize for PowerWeight<W, N> {
    fn quantize_assign(&mut self, delta: f32) -> Result<()> {
        for idx in 0..N {
            self.weight.values[idx].quantize_assign(delta)?;
        }
        Ok(())
    }
}

impl<W: Semiring, const N: usize> fmt::Display for PowerWeight<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.weight)
    }
}

impl<W: SerializableSemiring, const N: usize> SerializableSemiring for PowerWeight<W, N> {
    fn weight_type() -> String {
        format!("{}_^{}", W::weight_type(), N)
    }

    fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, weight) = TupleWeight::parse_binary(i)?;
        Ok((i, Self { weight }))
    }

    fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
        self.weight.write_binary(writer)
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        let mut rest = i;
        let mut out = Vec::with_capacity(N);
        for idx in 0..N {
            if idx > 0 {
                rest = crate::parsers::weight_parser::expect_char(rest, ',')?;
            }
            let (r, w) = W::parse_text(rest)?;
            rest = r;
            out.push(w);
        }
        let mut weight = TupleWeight::default();
        for (idx, w) in out.into_iter().enumerate() {
            weight.set_value(idx, w);
        }
        Ok((rest, Self { weight }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_power_weight_componentwise() -> Result<()> {
        type W = PowerWeight<TropicalWeight, 3>;
        let w1 = W::new(TupleWeight::from_fn(|i| TropicalWeight::new(i as f32)));
        let w2 = W::new(TupleWeight::from_fn(|_| TropicalWeight::new(1.0)));
        let t = w1.times(&w2)?;
        assert_eq!(t.value_at(2), &TropicalWeight::new(3.0));
        assert_eq!(w1.plus(&W::zero())?, w1);
        assert_eq!(w1.times(&W::one())?, w1);
        Ok(())
    }
}
