use crate::fst_traits::{ExpandedFst, Fst, MutableFst};
use crate::semirings::Semiring;

/// Rebuilds a machine under another expanded representation, preserving
/// states, transitions, weights, symbol tables and property knowledge.
pub fn fst_convert_from_ref<W, F1, F2>(ifst: &F1) -> F2
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    let mut ofst = F2::new();
    ofst.add_states(ifst.num_states());

    if let Some(start) = ifst.start() {
        unsafe { ofst.set_start_unchecked(start) };

        for state in ifst.states_range() {
            unsafe {
                for tr in ifst.get_trs_unchecked(state).iter() {
                    ofst.add_tr_unchecked(state, tr.clone());
                }
                if let Some(final_weight) = ifst.final_weight_unchecked(state) {
                    ofst.set_final_unchecked(state, final_weight);
                }
            }
        }
    }

    if let Some(isymt) = ifst.input_symbols() {
        ofst.set_input_symbols(isymt.clone());
    }
    if let Some(osymt) = ifst.output_symbols() {
        ofst.set_output_symbols(osymt.clone());
    }
    ofst.set_properties(ifst.properties());
    ofst
}

pub fn fst_convert<W, F1, F2>(ifst: F1) -> F2
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    fst_convert_from_ref(&ifst)
}
