use std::borrow::Borrow;
use std::marker::PhantomData;

use anyhow::Result;

use crate::semirings::utils_float::log_plus_f64;
use crate::semirings::{LogWeight, ProductWeight, Semiring};

/// Accumulator for ⊕-folds. `sum()` equals the `plus`-reduction of every
/// added weight, up to quantization; specialized adders trade exactness of
/// the fold order for numerical stability.
pub trait Adder<W: Semiring> {
    fn from_weight(w: W) -> Self;
    fn add<P: Borrow<W>>(&mut self, w: P) -> Result<()>;
    fn sum(&self) -> W;
    /// Clears the accumulator, restarting from `w`.
    fn reset(&mut self, w: W);
}

/// Plain `plus` folding; correct for any semiring.
#[derive(Debug, Clone)]
pub struct SimpleAdder<W: Semiring> {
    acc: W,
}

impl<W: Semiring> Default for SimpleAdder<W> {
    fn default() -> Self {
        Self { acc: W::zero() }
    }
}

impl<W: Semiring> Adder<W> for SimpleAdder<W> {
    fn from_weight(w: W) -> Self {
        Self { acc: w }
    }

    fn add<P: Borrow<W>>(&mut self, w: P) -> Result<()> {
        self.acc.plus_assign(w.borrow())
    }

    fn sum(&self) -> W {
        self.acc.clone()
    }

    fn reset(&mut self, w: W) {
        self.acc = w;
    }
}

/// Log-semiring accumulator carrying the running sum in double precision,
/// which keeps long ⊕-folds stable.
#[derive(Debug, Clone)]
pub struct LogAdder {
    acc: f64,
}

impl Default for LogAdder {
    fn default() -> Self {
        Self { acc: f64::INFINITY }
    }
}

impl Adder<LogWeight> for LogAdder {
    fn from_weight(w: LogWeight) -> Self {
        Self {
            acc: f64::from(*w.value()),
        }
    }

    fn add<P: Borrow<LogWeight>>(&mut self, w: P) -> Result<()> {
        self.acc = log_plus_f64(self.acc, f64::from(*w.borrow().value()));
        Ok(())
    }

    fn sum(&self) -> LogWeight {
        LogWeight::new(self.acc as f32)
    }

    fn reset(&mut self, w: LogWeight) {
        self.acc = f64::from(*w.value());
    }
}

/// Adder for a product weight, delegating to one adder per component.
#[derive(Debug, Clone)]
pub struct PairAdder<W1, W2, A1, A2> {
    adder1: A1,
    adder2: A2,
    ghost: PhantomData<(W1, W2)>,
}

impl<W1, W2, A1, A2> Default for PairAdder<W1, W2, A1, A2>
where
    W1: Semiring,
    W2: Semiring,
    A1: Adder<W1> + Default,
    A2: Adder<W2> + Default,
{
    fn default() -> Self {
        Self {
            adder1: A1::default(),
            adder2: A2::default(),
            ghost: PhantomData,
        }
    }
}

impl<W1, W2, A1, A2> Adder<ProductWeight<W1, W2>> for PairAdder<W1, W2, A1, A2>
where
    W1: Semiring,
    W2: Semiring,
    A1: Adder<W1>,
    A2: Adder<W2>,
{
    fn from_weight(w: ProductWeight<W1, W2>) -> Self {
        let (w1, w2) = w.take_value();
        Self {
            adder1: A1::from_weight(w1),
            adder2: A2::from_weight(w2),
            ghost: PhantomData,
        }
    }

    fn add<P: Borrow<ProductWeight<W1, W2>>>(&mut self, w: P) -> Result<()> {
        let w = w.borrow();
        self.adder1.add(w.value1())?;
        self.adder2.add(w.value2())?;
        Ok(())
    }

    fn sum(&self) -> ProductWeight<W1, W2> {
        ProductWeight::new((self.adder1.sum(), self.adder2.sum()))
    }

    fn reset(&mut self, w: ProductWeight<W1, W2>) {
        let (w1, w2) = w.take_value();
        self.adder1.reset(w1);
        self.adder2.reset(w2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_simple_adder_matches_plus_fold() -> Result<()> {
        let weights: Vec<_> = (0..10).map(|i| TropicalWeight::new(i as f32)).collect();
        let mut adder = SimpleAdder::from_weight(TropicalWeight::zero());
        let mut folded = TropicalWeight::zero();
        for w in &weights {
            adder.add(w)?;
            folded.plus_assign(w)?;
        }
        assert_eq!(adder.sum(), folded);
        Ok(())
    }

    #[test]
    fn test_log_adder_matches_plus_fold() -> Result<()> {
        let weights: Vec<_> = (1..50).map(|i| LogWeight::new(i as f32 * 0.1)).collect();
        let mut adder = LogAdder::from_weight(LogWeight::zero());
        let mut folded = LogWeight::zero();
        for w in &weights {
            adder.add(w)?;
            folded.plus_assign(w)?;
        }
        assert!(adder.sum().approx_equal(folded, crate::KDELTA));
        Ok(())
    }

    #[test]
    fn test_pair_adder_delegates() -> Result<()> {
        type W = ProductWeight<TropicalWeight, LogWeight>;
        let w1 = W::new((TropicalWeight::new(1.0), LogWeight::new(2.0)));
        let w2 = W::new((TropicalWeight::new(0.5), LogWeight::new(3.0)));
        let mut adder: PairAdder<_, _, SimpleAdder<TropicalWeight>, LogAdder> =
            PairAdder::from_weight(w1.clone());
        adder.add(&w2)?;
        assert!(adder.sum().approx_equal(w1.plus(&w2)?, crate::KDELTA));
        Ok(())
    }
}
