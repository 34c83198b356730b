use std::convert::TryInto;
use std::fmt;

use anyhow::{format_err, Result};
use nom::IResult;

use crate::semirings::{Semiring, SerializableSemiring};

/// Fixed-length homogeneous weight storage. Not a semiring by itself; the
/// semiring structure is added by [`crate::semirings::PowerWeight`].
#[derive(Clone, Debug, PartialOrd, PartialEq, Eq, Hash)]
pub struct TupleWeight<W, const N: usize> {
    pub(crate) values: [W; N],
}

impl<W: Semiring, const N: usize> TupleWeight<W, N> {
    pub fn new(values: [W; N]) -> Self {
        Self { values }
    }

    /// Builds a tuple by evaluating `f` at each position.
    pub fn from_fn<F: FnMut(usize) -> W>(mut f: F) -> Self {
        let mut idx = 0;
        Self {
            values: [(); N].map(|_| {
                let w = f(idx);
                idx += 1;
                w
            }),
        }
    }

    pub fn value(&self, index: usize) -> &W {
        &self.values[index]
    }

    pub fn set_value(&mut self, index: usize, w: W) {
        self.values[index] = w;
    }

    pub fn iter(&self) -> impl Iterator<Item = &W> {
        self.values.iter()
    }

    pub(crate) fn try_map<T, F>(&self, f: F) -> Result<TupleWeight<T, N>>
    where
        T: Semiring,
        F: Fn(&W) -> Result<T>,
    {
        let mut out = Vec::with_capacity(N);
        for w in &self.values {
            out.push(f(w)?);
        }
        let values: [T; N] = out
            .try_into()
            .map_err(|_| format_err!("Tuple arity mismatch"))?;
        Ok(TupleWeight { values })
    }
}

impl<W: Semiring, const N: usize> Default for TupleWeight<W, N> {
    fn default() -> Self {
        Self::from_fn(|_| W::zero())
    }
}

impl<W: Semiring, const N: usize> fmt::Display for TupleWeight<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, w) in self.values.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", w)?;
        }
        Ok(())
    }
}

impl<W: SerializableSemiring, const N: usize> TupleWeight<W, N> {
    pub(crate) fn parse_binary(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, values) = nom::multi::count(W::parse_binary, N)(i)?;
        let values: [W; N] = match values.try_into() {
            Ok(v) => v,
            Err(_) => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    i,
                    nom::error::ErrorKind::Count,
                )))
            }
        };
        Ok((i, Self { values }))
    }

    pub(crate) fn write_binary<F: std::io::Write>(&self, writer: &mut F) -> Result<()> {
        for w in &self.values {
            w.write_binary(writer)?;
        }
        Ok(())
    }
}
