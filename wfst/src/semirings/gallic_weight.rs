use std::borrow::Borrow;
use std::fmt;

use anyhow::Result;
use nom::IResult;

use crate::semirings::{
    DivideType, ProductWeight, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    StringWeightLeft, StringWeightRestrict, StringWeightRight, WeaklyDivisibleSemiring,
    WeightQuantize,
};

/// Gallic semirings pair an output-label string weight with the original
/// weight, turning a transducer into an acceptor over its input labels. One
/// variant per string semiring.
#[derive(Clone, Debug, PartialOrd, Default, PartialEq)]
pub struct GallicWeightLeft<W> {
    weight: ProductWeight<StringWeightLeft, W>,
}

#[derive(Clone, Debug, PartialOrd, Default, PartialEq)]
pub struct GallicWeightRight<W> {
    weight: ProductWeight<StringWeightRight, W>,
}

#[derive(Clone, Debug, PartialOrd, Default, PartialEq)]
pub struct GallicWeightRestrict<W> {
    weight: ProductWeight<StringWeightRestrict, W>,
}

macro_rules! gallic_weight {
    ($semiring: ty, $string_weight: ty, $reverse_semiring: ty, $weight_type: expr) => {
        impl<W: Semiring> $semiring {
            pub fn labels(&self) -> &$string_weight {
                self.weight.value1()
            }

            pub fn weight(&self) -> &W {
                self.weight.value2()
            }
        }

        impl<W: Semiring> Semiring for $semiring {
            type Type = ($string_weight, W);
            type ReverseWeight = $reverse_semiring;

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
                Self {
                    weight: ProductWeight::new(weight),
                }
            }

            fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
                self.weight.plus_assign(&rhs.borrow().weight)
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
                Ok(<Self::ReverseWeight as Semiring>::new(
                    self.weight.reverse()?.take_value(),
                ))
            }

            fn properties() -> SemiringProperties {
                ProductWeight::<$string_weight, W>::properties()
            }
        }

        impl<W: WeaklyDivisibleSemiring> WeaklyDivisibleSemiring for $semiring
        where
            $string_weight: WeaklyDivisibleSemiring,
        {
            fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
                self.weight.divide_assign(&rhs.weight, divide_type)
            }
        }

        impl<W: WeightQuantize> WeightQuantize for $semiring {
            fn quantize_assign(&mut self, delta: f32) -> Result<()> {
                self.weight.quantize_assign(delta)
            }
        }

        impl<W: Semiring> fmt::Display for $semiring {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.weight)
            }
        }

        impl<W: SerializableSemiring> SerializableSemiring for $semiring {
            fn weight_type() -> String {
                format!("{}_{}", $weight_type, W::weight_type())
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
    };
}

gallic_weight!(
    GallicWeightLeft<W>,
    StringWeightLeft,
    GallicWeightRight<W::ReverseWeight>,
    "left_gallic"
);
gallic_weight!(
    GallicWeightRight<W>,
    StringWeightRight,
    GallicWeightLeft<W::ReverseWeight>,
    "right_gallic"
);
gallic_weight!(
    GallicWeightRestrict<W>,
    StringWeightRestrict,
    GallicWeightRestrict<W::ReverseWeight>,
    "restricted_gallic"
);

impl<W: Semiring> ReverseBack<GallicWeightLeft<W>> for GallicWeightRight<W::ReverseWeight> {
    fn reverse_back(&self) -> Result<GallicWeightLeft<W>> {
        Ok(GallicWeightLeft {
            weight: self.weight.reverse_back()?,
        })
    }
}

impl<W: Semiring> ReverseBack<GallicWeightRight<W>> for GallicWeightLeft<W::ReverseWeight> {
    fn reverse_back(&self) -> Result<GallicWeightRight<W>> {
        Ok(GallicWeightRight {
            weight: self.weight.reverse_back()?,
        })
    }
}

impl<W: Semiring> ReverseBack<GallicWeightRestrict<W>> for GallicWeightRestrict<W::ReverseWeight> {
    fn reverse_back(&self) -> Result<GallicWeightRestrict<W>> {
        Ok(GallicWeightRestrict {
            weight: self.weight.reverse_back()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_gallic_times_concatenates_labels() -> Result<()> {
        type W = GallicWeightRestrict<TropicalWeight>;
        let w1 = W::new((vec![1, 2].into(), TropicalWeight::new(0.5)));
        let w2 = W::new((vec![3].into(), TropicalWeight::new(1.0)));
        let t = w1.times(&w2)?;
        assert_eq!(t.labels(), &StringWeightRestrict::from(vec![1, 2, 3]));
        assert_eq!(t.weight(), &TropicalWeight::new(1.5));
        Ok(())
    }
}
