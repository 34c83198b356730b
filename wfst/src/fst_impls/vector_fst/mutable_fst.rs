use anyhow::{format_err, Result};

use crate::config::FstConfig;
use crate::fst_impls::vector_fst::VectorFstState;
use crate::fst_impls::VectorFst;
use crate::fst_properties::{
    add_state_properties, add_tr_properties, delete_all_states_properties,
    delete_states_properties, delete_trs_properties, set_final_properties, set_start_properties,
    FstProperties,
};
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::trs::Trs;
use crate::{StateId, EPS_LABEL, NO_STATE_ID};

impl<W: Semiring> VectorFst<W> {
    /// Creates an empty wFST honoring `config`; `MutableFst::new` uses the
    /// default configuration.
    pub fn with_config(config: &FstConfig) -> Self {
        VectorFst {
            states: vec![],
            start_state: None,
            isymt: None,
            osymt: None,
            properties: delete_all_states_properties(
                FstProperties::EXPANDED | FstProperties::MUTABLE,
            ),
            error_fatal: config.error_fatal,
        }
    }
}

impl<W: Semiring> MutableFst<W> for VectorFst<W> {
    fn new() -> Self {
        Self::with_config(&FstConfig::default())
    }

    fn set_start(&mut self, state_id: StateId) -> Result<()> {
        if self.states.get(state_id as usize).is_none() {
            return Err(format_err!("State {:?} doesn't exist", state_id));
        }
        self.start_state = Some(state_id);
        self.properties = set_start_properties(self.properties);
        Ok(())
    }

    unsafe fn set_start_unchecked(&mut self, state_id: StateId) {
        self.start_state = Some(state_id);
        self.properties = set_start_properties(self.properties);
    }

    fn set_final<S: Into<W>>(&mut self, state_id: StateId, final_weight: S) -> Result<()> {
        let final_weight = final_weight.into();
        if !final_weight.member() {
            if self.error_fatal {
                return Err(format_err!(
                    "Non-member final weight {:?} for state {:?}",
                    final_weight,
                    state_id
                ));
            }
            self.properties |= FstProperties::ERROR;
        }
        self.properties = set_final_properties(self.properties, &final_weight);
        let state = self.state_mut(state_id)?;
        // A zero final weight marks the state as non-final.
        state.final_weight = if final_weight.is_zero() {
            None
        } else {
            Some(final_weight)
        };
        Ok(())
    }

    unsafe fn set_final_unchecked<S: Into<W>>(&mut self, state_id: StateId, final_weight: S) {
        let final_weight = final_weight.into();
        if !final_weight.member() {
            self.properties |= FstProperties::ERROR;
        }
        self.properties = set_final_properties(self.properties, &final_weight);
        let state = self.state_unchecked_mut(state_id);
        state.final_weight = if final_weight.is_zero() {
            None
        } else {
            Some(final_weight)
        };
    }

    fn add_state(&mut self) -> StateId {
        let state_id = self.states.len() as StateId;
        self.states.push(VectorFstState::new());
        self.properties = add_state_properties(self.properties);
        state_id
    }

    fn add_states(&mut self, n: usize) {
        self.states.resize_with(self.states.len() + n, VectorFstState::new);
        self.properties = add_state_properties(self.properties);
    }

    fn add_tr(&mut self, source: StateId, tr: Tr<W>) -> Result<()> {
        if self.error_fatal && !tr.weight.member() {
            return Err(format_err!(
                "Non-member weight on the transition {:?} -> {:?}",
                source,
                tr.nextstate
            ));
        }
        if tr.nextstate < 0 || tr.nextstate as usize >= self.states.len() {
            return Err(format_err!(
                "Transition destination {:?} doesn't exist",
                tr.nextstate
            ));
        }
        if self.states.get(source as usize).is_none() {
            return Err(format_err!("State {:?} doesn't exist", source));
        }
        unsafe { self.add_tr_unchecked(source, tr) };
        Ok(())
    }

    unsafe fn add_tr_unchecked(&mut self, source: StateId, tr: Tr<W>) {
        if !tr.weight.member() {
            self.properties |= FstProperties::ERROR;
        }
        let prev = self
            .states
            .get(source as usize)
            .and_then(|s| s.trs.trs().last().cloned());
        self.properties = add_tr_properties(self.properties, &tr, prev.as_ref());
        let state = self.state_unchecked_mut(source);
        if tr.ilabel == EPS_LABEL {
            state.niepsilons += 1;
        }
        if tr.olabel == EPS_LABEL {
            state.noepsilons += 1;
        }
        state.trs.push(tr);
    }

    fn del_state(&mut self, state_id: StateId) -> Result<()> {
        self.del_states(std::iter::once(state_id))
    }

    fn del_states<T: IntoIterator<Item = StateId>>(&mut self, states: T) -> Result<()> {
        let mut deleted = vec![false; self.states.len()];
        for state_id in states {
            let slot = deleted
                .get_mut(state_id as usize)
                .ok_or_else(|| format_err!("State {:?} doesn't exist", state_id))?;
            *slot = true;
        }

        // Remaining states are renumbered to stay dense.
        let mut mapping = vec![NO_STATE_ID; self.states.len()];
        let mut next = 0 as StateId;
        for (old, is_deleted) in deleted.iter().enumerate() {
            if !is_deleted {
                mapping[old] = next;
                next += 1;
            }
        }

        let old_states = std::mem::take(&mut self.states);
        for (old_id, state) in old_states.into_iter().enumerate() {
            if deleted[old_id] {
                continue;
            }
            let mut new_state = VectorFstState::new();
            new_state.final_weight = state.final_weight;
            for tr in state.trs.trs() {
                let new_nextstate = mapping[tr.nextstate as usize];
                if new_nextstate == NO_STATE_ID {
                    continue;
                }
                if tr.ilabel == EPS_LABEL {
                    new_state.niepsilons += 1;
                }
                if tr.olabel == EPS_LABEL {
                    new_state.noepsilons += 1;
                }
                new_state.trs.push(Tr::new(
                    tr.ilabel,
                    tr.olabel,
                    tr.weight.clone(),
                    new_nextstate,
                ));
            }
            self.states.push(new_state);
        }

        self.start_state = self.start_state.and_then(|start| {
            let mapped = mapping[start as usize];
            if mapped == NO_STATE_ID {
                None
            } else {
                Some(mapped)
            }
        });
        self.properties = delete_states_properties(self.properties);
        Ok(())
    }

    fn del_all_states(&mut self) {
        self.states.clear();
        self.start_state = None;
        self.properties = delete_all_states_properties(self.properties);
    }

    fn delete_final_weight(&mut self, source: StateId) -> Result<()> {
        self.state_mut(source)?.final_weight = None;
        Ok(())
    }

    fn delete_trs(&mut self, source: StateId) -> Result<()> {
        let state = self.state_mut(source)?;
        state.trs = Default::default();
        state.niepsilons = 0;
        state.noepsilons = 0;
        self.properties = delete_trs_properties(self.properties);
        Ok(())
    }

    fn pop_trs(&mut self, source: StateId) -> Result<Vec<Tr<W>>> {
        let state = self.state_mut(source)?;
        let trs = state.trs.trs().to_vec();
        state.trs = Default::default();
        state.niepsilons = 0;
        state.noepsilons = 0;
        self.properties = delete_trs_properties(self.properties);
        Ok(trs)
    }

    fn take_final_weight(&mut self, state_id: StateId) -> Result<Option<W>> {
        Ok(self.state_mut(state_id)?.final_weight.take())
    }

    fn reserve_states(&mut self, n: usize) {
        self.states.reserve(n);
    }

    fn reserve_trs(&mut self, source: StateId, n: usize) -> Result<()> {
        let state = self.state_mut(source)?;
        if let Some(trs) = std::sync::Arc::get_mut(&mut state.trs.0) {
            trs.reserve(n);
        }
        Ok(())
    }

    fn set_properties(&mut self, props: FstProperties) {
        // The error bit is monotonic.
        let error = self.properties & FstProperties::ERROR;
        self.properties = props | error | FstProperties::EXPANDED | FstProperties::MUTABLE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_properties::verify_properties;
    use crate::fst_traits::{CoreFst, ExpandedFst};
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::Trs;

    fn diamond() -> Result<VectorFst<TropicalWeight>> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        let s3 = fst.add_state();
        fst.set_start(s0)?;
        fst.add_tr(s0, Tr::new(1, 1, TropicalWeight::new(1.0), s1))?;
        fst.add_tr(s0, Tr::new(2, 2, TropicalWeight::new(2.0), s2))?;
        fst.add_tr(s1, Tr::new(3, 3, TropicalWeight::new(3.0), s3))?;
        fst.add_tr(s2, Tr::new(4, 4, TropicalWeight::new(4.0), s3))?;
        fst.set_final(s3, TropicalWeight::one())?;
        Ok(fst)
    }

    #[test]
    fn test_del_states_renumbers_densely() -> Result<()> {
        let mut fst = diamond()?;
        fst.del_state(1)?;
        assert_eq!(fst.num_states(), 3);
        assert_eq!(fst.start(), Some(0));
        // Old state 2 is now state 1, old state 3 is state 2.
        let trs = fst.get_trs(0)?;
        assert_eq!(trs.trs().len(), 1);
        assert_eq!(trs.trs()[0].nextstate, 1);
        assert_eq!(fst.get_trs(1)?.trs()[0].nextstate, 2);
        assert_eq!(fst.final_weight(2)?, Some(TropicalWeight::one()));
        verify_properties(&fst)?;
        Ok(())
    }

    #[test]
    fn test_del_start_state_clears_start() -> Result<()> {
        let mut fst = diamond()?;
        fst.del_state(0)?;
        assert_eq!(fst.start(), None);
        Ok(())
    }

    #[test]
    fn test_set_final_zero_marks_non_final() -> Result<()> {
        let mut fst = diamond()?;
        fst.set_final(3, TropicalWeight::zero())?;
        assert_eq!(fst.final_weight(3)?, None);
        Ok(())
    }

    #[test]
    fn test_add_tr_to_missing_state_fails() -> Result<()> {
        let mut fst = diamond()?;
        assert!(fst
            .add_tr(12, Tr::new(1, 1, TropicalWeight::one(), 0))
            .is_err());
        assert!(fst
            .add_tr(0, Tr::new(1, 1, TropicalWeight::one(), 12))
            .is_err());
        Ok(())
    }

    #[test]
    fn test_non_member_weight_fatal_by_default() -> Result<()> {
        let mut fst = diamond()?;
        assert!(fst
            .add_tr(0, Tr::new(9, 9, TropicalWeight::no_weight(), 1))
            .is_err());
        assert!(fst.set_final(0, TropicalWeight::no_weight()).is_err());
        // The fatal path rejects the mutation without corrupting the machine.
        assert!(!fst.properties().contains(FstProperties::ERROR));
        assert_eq!(fst.num_trs(0)?, 2);
        Ok(())
    }

    #[test]
    fn test_non_member_weight_sets_error_bit() -> Result<()> {
        let config = FstConfig {
            error_fatal: false,
            ..FstConfig::default()
        };
        let mut fst = VectorFst::<TropicalWeight>::with_config(&config);
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.add_tr(s0, Tr::new(9, 9, TropicalWeight::no_weight(), s1))?;
        assert!(fst.properties().contains(FstProperties::ERROR));
        // The error bit sticks through later mutations.
        fst.del_state(s1)?;
        fst.compute_and_update_properties()?;
        assert!(fst.properties().contains(FstProperties::ERROR));
        Ok(())
    }

    #[test]
    fn test_incremental_properties_stay_consistent() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        verify_properties(&fst)?;
        fst.add_tr(s0, Tr::new(2, 2, TropicalWeight::one(), s1))?;
        verify_properties(&fst)?;
        // Unsorted append drops the sorted known-bit instead of lying.
        fst.add_tr(s0, Tr::new(1, 3, TropicalWeight::one(), s1))?;
        verify_properties(&fst)?;
        assert!(fst.properties().contains(FstProperties::NOT_I_LABEL_SORTED));
        assert!(fst.properties().contains(FstProperties::NOT_ACCEPTOR));
        fst.set_final(s1, TropicalWeight::new(0.5))?;
        verify_properties(&fst)?;
        assert!(fst.properties().contains(FstProperties::WEIGHTED));
        Ok(())
    }

    #[test]
    fn test_compute_properties_full_knowledge() -> Result<()> {
        let mut fst = diamond()?;
        let props = fst.compute_and_update_properties()?;
        assert_eq!(
            props.known_properties() & FstProperties::TRINARY,
            FstProperties::TRINARY
        );
        assert!(props.contains(FstProperties::ACCEPTOR));
        assert!(props.contains(FstProperties::ACYCLIC));
        assert!(props.contains(FstProperties::ACCESSIBLE));
        assert!(props.contains(FstProperties::NOT_STRING));
        Ok(())
    }
}
