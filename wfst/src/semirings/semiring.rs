use std::borrow::Borrow;
use std::fmt::{Debug, Display};
use std::io::Write;

use anyhow::Result;
use bitflags::bitflags;
use nom::IResult;

bitflags! {
    /// Algebraic properties declared by a semiring. Algorithms that require a
    /// property only accept semirings declaring it.
    pub struct SemiringProperties: u64 {
        /// ⊗ left-distributes over ⊕.
        const LEFT_SEMIRING = 0b1;
        /// ⊗ right-distributes over ⊕.
        const RIGHT_SEMIRING = 0b10;
        /// a ⊗ b = b ⊗ a.
        const COMMUTATIVE = 0b100;
        /// a ⊕ a = a.
        const IDEMPOTENT = 0b1000;
        /// a ⊕ b is either a or b.
        const PATH = 0b10000;
        const SEMIRING = Self::LEFT_SEMIRING.bits | Self::RIGHT_SEMIRING.bits;
    }
}

/// For some operations, the weight set associated to a wFST must have the
/// structure of a semiring. `(S, +, *, 0, 1)` is a semiring if `(S, +, 0)` is
/// a commutative monoid with identity element `0`, `(S, *, 1)` is a monoid
/// with identity element `1`, `*` distributes over `+` and `0` is an
/// annihilator for `*`. Thus, a semiring is a ring that may lack negation.
/// For more information : <https://cs.nyu.edu/~mohri/pub/hwa.pdf>
pub trait Semiring:
    Clone + PartialEq + PartialOrd + Debug + Display + Send + Sync + 'static
{
    type Type: Clone + Debug;
    type ReverseWeight: Semiring + ReverseBack<Self>;

    fn zero() -> Self;
    fn one() -> Self;

    fn new(value: Self::Type) -> Self;

    fn plus<P: Borrow<Self>>(&self, rhs: P) -> Result<Self> {
        let mut w = self.clone();
        w.plus_assign(rhs)?;
        Ok(w)
    }
    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()>;

    fn times<P: Borrow<Self>>(&self, rhs: P) -> Result<Self> {
        let mut w = self.clone();
        w.times_assign(rhs)?;
        Ok(w)
    }
    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) -> Result<()>;

    /// Equality up to `delta`. Exact equality unless the semiring carries
    /// floating values.
    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, _delta: f32) -> bool {
        self == rhs.borrow()
    }

    /// False signals a value outside the semiring domain (the bad-weight
    /// sentinel). Operations observing a non-member operand must not produce
    /// a member result.
    fn member(&self) -> bool {
        true
    }

    fn value(&self) -> &Self::Type;
    fn take_value(self) -> Self::Type;
    fn set_value(&mut self, value: Self::Type);

    /// Weight of the mirrored transition. An involution up to the reverse
    /// weight type.
    fn reverse(&self) -> Result<Self::ReverseWeight>;

    fn properties() -> SemiringProperties;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    fn is_one(&self) -> bool {
        *self == Self::one()
    }
}

/// Inverse of [`Semiring::reverse`].
pub trait ReverseBack<W> {
    fn reverse_back(&self) -> Result<W>;
}

/// Side of a semiring division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivideType {
    /// `Divide(Times(a, b), a, LEFT) = b`.
    DivideLeft,
    /// `Divide(Times(a, b), b, RIGHT) = a`.
    DivideRight,
    /// Either side; only defined in commutative semirings.
    DivideAny,
}

/// A semiring is said to be divisible if all non-0 elements admit an inverse,
/// that is if `S-{0}` is a group. `(S, +, *, 0, 1)` is said to be weakly
/// divisible if for any `x` and `y` in `S` such that `x + y != 0`, there
/// exists at least one `z` such that `x = (x+y)*z`.
pub trait WeaklyDivisibleSemiring: Semiring {
    fn divide(&self, rhs: &Self, divide_type: DivideType) -> Result<Self> {
        let mut w = self.clone();
        w.divide_assign(rhs, divide_type)?;
        Ok(w)
    }
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) -> Result<()>;
}

/// Rounding of a weight to a lattice of spacing `delta`. Idempotent.
pub trait WeightQuantize: Semiring {
    fn quantize_assign(&mut self, delta: f32) -> Result<()>;
    fn quantize(&self, delta: f32) -> Result<Self> {
        let mut w = self.clone();
        w.quantize_assign(delta)?;
        Ok(w)
    }
}

/// Binary and text serialization of a weight. The stream carries only the raw
/// payload; the weight type is recorded once in the FST header.
pub trait SerializableSemiring: Semiring {
    /// Stable string identifier of the weight type, e.g. `tropical`.
    fn weight_type() -> String;
    fn parse_binary(i: &[u8]) -> IResult<&[u8], Self>;
    fn write_binary<F: Write>(&self, writer: &mut F) -> Result<()>;
    /// Parses the textual form from the beginning of `i`, returning the
    /// remaining input.
    fn parse_text(i: &str) -> IResult<&str, Self>;
}

macro_rules! display_semiring {
    ($semiring:tt) => {
        impl fmt::Display for $semiring {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                if self.value.is_nan() {
                    write!(f, "BadNumber")
                } else if self.value == f32::INFINITY {
                    write!(f, "Infinity")
                } else if self.value == f32::NEG_INFINITY {
                    write!(f, "-Infinity")
                } else {
                    write!(f, "{}", self.value)
                }
            }
        }
    };
}

macro_rules! partial_eq_f32 {
    ($semiring:tt) => {
        impl PartialEq for $semiring {
            fn eq(&self, other: &Self) -> bool {
                let q1 = self.quantize(crate::KDELTA).unwrap();
                let q2 = other.quantize(crate::KDELTA).unwrap();
                q1.value == q2.value
            }
        }
    };
}

macro_rules! float_weight_serialization {
    ($semiring:tt, $weight_type: expr) => {
        impl SerializableSemiring for $semiring {
            fn weight_type() -> String {
                $weight_type.to_string()
            }

            fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
                let (i, value) = nom::number::complete::le_f32(i)?;
                Ok((i, Self::new(value)))
            }

            fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
                writer.write_f32::<LittleEndian>(self.value)?;
                Ok(())
            }

            fn parse_text(i: &str) -> IResult<&str, Self> {
                let (i, value) = crate::parsers::weight_parser::parse_float_text(i)?;
                Ok((i, Self::new(value)))
            }
        }
    };
}
