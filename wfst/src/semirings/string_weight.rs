use std::borrow::Borrow;
use std::fmt;

use anyhow::{bail, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use nom::IResult;

use crate::semirings::string_variant::StringWeightVariant;
use crate::semirings::{
    DivideType, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};
use crate::Label;

/// String semiring: (identity, concatenation, Infinity, Epsilon).
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct StringWeightRestrict {
    pub(crate) value: StringWeightVariant,
}

/// String semiring: (longest common prefix, concatenation, Infinity, Epsilon).
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct StringWeightLeft {
    pub(crate) value: StringWeightVariant,
}

/// String semiring: (longest common suffix, concatenation, Infinity, Epsilon).
#[derive(Clone, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct StringWeightRight {
    pub(crate) value: StringWeightVariant,
}

/// Determines whether to use the left or the right string semiring. Includes
/// a restricted version that signals an error if proper prefixes or suffixes
/// would otherwise be returned by Plus, useful with algorithms that require
/// functional transducer input.
pub enum StringType {
    StringRestrict,
    StringLeft,
    StringRight,
}

macro_rules! string_semiring {
    ($semiring: ty, $string_type: expr, $reverse_semiring: ty, $weight_type: expr) => {
        impl fmt::Display for $semiring {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match &self.value {
                    StringWeightVariant::Infinity => write!(f, "Infinity"),
                    StringWeightVariant::Labels(v) => {
                        if v.is_empty() {
                            write!(f, "Epsilon")
                        } else {
                            let s = v
                                .iter()
                                .map(|l| l.to_string())
                                .collect::<Vec<_>>()
                                .join("_");
                            write!(f, "{}", s)
                        }
                    }
                }
            }
        }

        impl Semiring for $semiring {
            type Type = StringWeightVariant;
            type ReverseWeight = $reverse_semiring;

            fn zero() -> Self {
                Self {
                    value: StringWeightVariant::Infinity,
                }
            }

            fn one() -> Self {
                Self {
                    value: StringWeightVariant::Labels(vec![]),
                }
            }

            fn new(value: <Self as Semiring>::Type) -> Self {
                Self { value }
            }

            fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
                let rhs = rhs.borrow();
                if self.is_zero() {
                    self.set_value(rhs.value().clone());
                } else if rhs.is_zero() {
                    // Do nothing
                } else {
                    let l1 = self.value.unwrap_labels();
                    let l2 = rhs.value.unwrap_labels();

                    match $string_type {
                        StringType::StringRestrict => {
                            if self != rhs {
                                bail!(
                                    "Unequal arguments : non-functional FST ? w1 = {:?} w2 = {:?}",
                                    &self,
                                    &rhs
                                );
                            }
                        }
                        StringType::StringLeft => {
                            let new_labels: Vec<_> = l1
                                .iter()
                                .zip(l2.iter())
                                .take_while(|(v1, v2)| v1 == v2)
                                .map(|(v1, _)| *v1)
                                .collect();
                            self.value = StringWeightVariant::Labels(new_labels);
                        }
                        StringType::StringRight => {
                            let new_labels: Vec<_> = l1
                                .iter()
                                .rev()
                                .zip(l2.iter().rev())
                                .take_while(|(v1, v2)| v1 == v2)
                                .map(|(v1, _)| *v1)
                                .collect();
                            let new_labels: Vec<_> = new_labels.into_iter().rev().collect();
                            self.value = StringWeightVariant::Labels(new_labels);
                        }
                    };
                };
                Ok(())
            }

            fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()> {
                if let StringWeightVariant::Labels(ref mut labels_left) = self.value {
                    match &rhs.borrow().value {
                        StringWeightVariant::Labels(labels_right) => {
                            labels_left.extend_from_slice(labels_right);
                        }
                        StringWeightVariant::Infinity => {
                            self.value = StringWeightVariant::Infinity;
                        }
                    }
                }
                Ok(())
            }

            fn value(&self) -> &<Self as Semiring>::Type {
                &self.value
            }

            fn take_value(self) -> <Self as Semiring>::Type {
                self.value
            }

            fn set_value(&mut self, value: <Self as Semiring>::Type) {
                self.value = value;
            }

            fn reverse(&self) -> Result<Self::ReverseWeight> {
                Ok(self.value.reverse().into())
            }

            fn properties() -> SemiringProperties {
                match $string_type {
                    StringType::StringRestrict => {
                        SemiringProperties::LEFT_SEMIRING
                            | SemiringProperties::RIGHT_SEMIRING
                            | SemiringProperties::IDEMPOTENT
                    }
                    StringType::StringLeft => {
                        SemiringProperties::LEFT_SEMIRING | SemiringProperties::IDEMPOTENT
                    }
                    StringType::StringRight => {
                        SemiringProperties::RIGHT_SEMIRING | SemiringProperties::IDEMPOTENT
                    }
                }
            }
        }

        impl $semiring {
            pub fn len_labels(&self) -> usize {
                match &self.value {
                    StringWeightVariant::Infinity => 0,
                    StringWeightVariant::Labels(l) => l.len(),
                }
            }
        }

        impl From<Vec<Label>> for $semiring {
            fn from(l: Vec<Label>) -> Self {
                Self::new(l.into())
            }
        }

        impl From<Label> for $semiring {
            fn from(l: Label) -> Self {
                Self::new(vec![l].into())
            }
        }

        impl From<StringWeightVariant> for $semiring {
            fn from(v: StringWeightVariant) -> Self {
                Self::new(v)
            }
        }

        impl WeightQuantize for $semiring {
            fn quantize_assign(&mut self, _delta: f32) -> Result<()> {
                // Nothing to do
                Ok(())
            }
        }

        impl SerializableSemiring for $semiring {
            fn weight_type() -> String {
                $weight_type.to_string()
            }

            fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
                let (i, n) = nom::number::complete::le_i32(i)?;
                if n < 0 {
                    return Ok((i, Self::zero()));
                }
                let (i, labels) =
                    nom::multi::count(nom::number::complete::le_i32, n as usize)(i)?;
                Ok((i, Self::new(StringWeightVariant::Labels(labels))))
            }

            fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
                match &self.value {
                    StringWeightVariant::Infinity => {
                        writer.write_i32::<LittleEndian>(-1)?;
                    }
                    StringWeightVariant::Labels(l) => {
                        writer.write_i32::<LittleEndian>(l.len() as i32)?;
                        for label in l {
                            writer.write_i32::<LittleEndian>(*label)?;
                        }
                    }
                }
                Ok(())
            }

            fn parse_text(i: &str) -> IResult<&str, Self> {
                let (i, variant) = crate::parsers::weight_parser::parse_string_variant_text(i)?;
                Ok((i, Self::new(variant)))
            }
        }
    };
}

string_semiring!(
    StringWeightRestrict,
    StringType::StringRestrict,
    StringWeightRestrict,
    "restricted_string"
);
string_semiring!(
    StringWeightLeft,
    StringType::StringLeft,
    StringWeightRight,
    "left_string"
);
string_semiring!(
    StringWeightRight,
    StringType::StringRight,
    StringWeightLeft,
    "right_string"
);

impl ReverseBack<StringWeightRestrict> for StringWeightRestrict {
    fn reverse_back(&self) -> Result<StringWeightRestrict> {
        self.reverse()
    }
}

impl ReverseBack<StringWeightLeft> for StringWeightRight {
    fn reverse_back(&self) -> Result<StringWeightLeft> {
        self.reverse()
    }
}

impl ReverseBack<StringWeightRight> for StringWeightLeft {
    fn reverse_back(&self) -> Result<StringWeightRight> {
        self.reverse()
    }
}

fn divide_left(w1: &StringWeightVariant, w2: &StringWeightVariant) -> Result<StringWeightVariant> {
    match (w1, w2) {
        (StringWeightVariant::Labels(l1), StringWeightVariant::Labels(l2)) => Ok(
            StringWeightVariant::Labels(l1.iter().skip(l2.len()).cloned().collect()),
        ),
        (StringWeightVariant::Infinity, StringWeightVariant::Labels(_)) => {
            Ok(StringWeightVariant::Infinity)
        }
        _ => bail!("Division by the infinite string"),
    }
}

fn divide_right(w1: &StringWeightVariant, w2: &StringWeightVariant) -> Result<StringWeightVariant> {
    match (w1, w2) {
        (StringWeightVariant::Labels(l1), StringWeightVariant::Labels(l2)) => Ok(
            StringWeightVariant::Labels(l1.iter().rev().skip(l2.len()).rev().cloned().collect()),
        ),
        (StringWeightVariant::Infinity, StringWeightVariant::Labels(_)) => {
            Ok(StringWeightVariant::Infinity)
        }
        _ => bail!("Division by the infinite string"),
    }
}

impl WeaklyDivisibleSemiring for StringWeightLeft {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        if divide_type != DivideType::DivideLeft {
            bail!("Only left division is defined.");
        }
        self.value = divide_left(&self.value, &rhs.value)?;
        Ok(())
    }
}

impl WeaklyDivisibleSemiring for StringWeightRight {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        if divide_type != DivideType::DivideRight {
            bail!("Only right division is defined.");
        }
        self.value = divide_right(&self.value, &rhs.value)?;
        Ok(())
    }
}

impl WeaklyDivisibleSemiring for StringWeightRestrict {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()> {
        self.value = match divide_type {
            DivideType::DivideLeft => divide_left(&self.value, &rhs.value)?,
            DivideType::DivideRight => divide_right(&self.value, &rhs.value)?,
            DivideType::DivideAny => bail!("Only explicit left or right division is defined."),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_left_plus_common_prefix() -> Result<()> {
        let w1 = StringWeightLeft::from(vec![1, 2, 3]);
        let w2 = StringWeightLeft::from(vec![1, 2, 4]);
        assert_eq!(w1.plus(&w2)?, StringWeightLeft::from(vec![1, 2]));
        Ok(())
    }

    #[test]
    fn test_string_restrict_plus_unequal_fails() {
        let w1 = StringWeightRestrict::from(vec![1]);
        let w2 = StringWeightRestrict::from(vec![2]);
        assert!(w1.plus(&w2).is_err());
    }

    #[test]
    fn test_string_times_concat() -> Result<()> {
        let w1 = StringWeightRestrict::from(vec![1, 2]);
        let w2 = StringWeightRestrict::from(vec![3]);
        assert_eq!(w1.times(&w2)?, StringWeightRestrict::from(vec![1, 2, 3]));
        assert_eq!(w1.times(StringWeightRestrict::zero())?, StringWeightRestrict::zero());
        Ok(())
    }
}
