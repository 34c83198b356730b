//! Helpers to build linear automata from label sequences.

use crate::fst_impls::VectorFst;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::{Label, EPS_LABEL};

/// Turns a list of labels into a linear acceptor (same input and output
/// label on every transition). The single final state carries `weight`.
pub fn acceptor<W: Semiring>(labels: &[Label], weight: W) -> VectorFst<W> {
    let mut fst = VectorFst::new();
    let mut state = fst.add_state();
    unsafe { fst.set_start_unchecked(state) };
    for label in labels {
        let next = fst.add_state();
        unsafe { fst.add_tr_unchecked(state, Tr::new(*label, *label, W::one(), next)) };
        state = next;
    }
    unsafe { fst.set_final_unchecked(state, weight) };
    fst
}

/// Turns two label sequences into a linear transducer mapping one onto the
/// other. The shorter side is padded with epsilons.
pub fn transducer<W: Semiring>(ilabels: &[Label], olabels: &[Label], weight: W) -> VectorFst<W> {
    let mut fst = VectorFst::new();
    let mut state = fst.add_state();
    unsafe { fst.set_start_unchecked(state) };
    let n = ilabels.len().max(olabels.len());
    for idx in 0..n {
        let ilabel = ilabels.get(idx).copied().unwrap_or(EPS_LABEL);
        let olabel = olabels.get(idx).copied().unwrap_or(EPS_LABEL);
        let next = fst.add_state();
        unsafe { fst.add_tr_unchecked(state, Tr::new(ilabel, olabel, W::one(), next)) };
        state = next;
    }
    unsafe { fst.set_final_unchecked(state, weight) };
    fst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::CoreFst;
    use crate::semirings::TropicalWeight;
    use crate::Trs;

    #[test]
    fn test_acceptor() {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2, 3], TropicalWeight::new(0.5));
        assert_eq!(fst.start(), Some(0));
        let trs = fst.get_trs(0).unwrap();
        assert_eq!(trs.trs()[0].ilabel, 1);
        assert_eq!(trs.trs()[0].olabel, 1);
        assert_eq!(
            fst.final_weight(3).unwrap(),
            Some(TropicalWeight::new(0.5))
        );
    }

    #[test]
    fn test_transducer_pads_epsilons() {
        let fst: VectorFst<TropicalWeight> = transducer(&[1, 2], &[5], TropicalWeight::one());
        let trs = fst.get_trs(1).unwrap();
        assert_eq!(trs.trs()[0].ilabel, 2);
        assert_eq!(trs.trs()[0].olabel, EPS_LABEL);
    }
}
