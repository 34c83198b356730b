use std::collections::VecDeque;

use anyhow::{bail, Result};
use itertools::Itertools;

use crate::fst_properties::FstProperties;
use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::{StateId, Trs, EPS_LABEL};

/// Recomputes every property with a full pass over the machine. The returned
/// bitset has every pair known.
pub fn compute_fst_properties<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<FstProperties> {
    let nstates = fst.num_states();
    let mut props = FstProperties::ACCEPTOR
        | FstProperties::NO_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::UNWEIGHTED
        | FstProperties::ACYCLIC
        | FstProperties::ACCESSIBLE;
    props |= fst.properties() & (FstProperties::BINARY);

    let mut flip = |pos: FstProperties, neg: FstProperties| {
        props.remove(pos);
        props.insert(neg);
    };

    for state in 0..nstates as StateId {
        let trs = fst.get_trs(state)?;
        for tr in trs.trs() {
            if tr.ilabel != tr.olabel {
                flip(FstProperties::ACCEPTOR, FstProperties::NOT_ACCEPTOR);
            }
            if tr.ilabel == EPS_LABEL || tr.olabel == EPS_LABEL {
                flip(FstProperties::NO_EPSILONS, FstProperties::EPSILONS);
            }
            if !tr.weight.is_one() {
                flip(FstProperties::UNWEIGHTED, FstProperties::WEIGHTED);
            }
        }
        if trs.trs().iter().tuple_windows().any(|(a, b)| a.ilabel > b.ilabel) {
            flip(
                FstProperties::I_LABEL_SORTED,
                FstProperties::NOT_I_LABEL_SORTED,
            );
        }
        if trs.trs().iter().tuple_windows().any(|(a, b)| a.olabel > b.olabel) {
            flip(
                FstProperties::O_LABEL_SORTED,
                FstProperties::NOT_O_LABEL_SORTED,
            );
        }
        if let Some(final_weight) = fst.final_weight(state)? {
            if !final_weight.is_one() {
                flip(FstProperties::UNWEIGHTED, FstProperties::WEIGHTED);
            }
        }
    }
    drop(flip);

    if is_cyclic(fst)? {
        props.remove(FstProperties::ACYCLIC);
        props.insert(FstProperties::CYCLIC);
    }
    if !all_accessible(fst)? {
        props.remove(FstProperties::ACCESSIBLE);
        props.insert(FstProperties::NOT_ACCESSIBLE);
    }
    if is_string(fst)? {
        props.insert(FstProperties::STRING);
    } else {
        props.insert(FstProperties::NOT_STRING);
    }
    Ok(props)
}

/// Re-derives the properties and compares them against the machine's asserted
/// knowledge. A mismatch is a hard failure.
pub fn verify_properties<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<()> {
    let stored = fst.properties();
    let known = stored.known_properties() & FstProperties::TRINARY;
    let computed = compute_fst_properties(fst)?;
    let mismatch = (stored ^ computed) & known;
    if !mismatch.is_empty() {
        bail!(
            "Properties mismatch : stored {:?}, computed {:?}, diff {:?}",
            stored,
            computed,
            mismatch
        );
    }
    Ok(())
}

fn is_cyclic<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<bool> {
    let nstates = fst.num_states();
    // 0 = unseen, 1 = on stack, 2 = done.
    let mut color = vec![0u8; nstates];
    for root in 0..nstates as StateId {
        if color[root as usize] != 0 {
            continue;
        }
        let mut stack: Vec<(StateId, usize)> = vec![(root, 0)];
        color[root as usize] = 1;
        while let Some((state, pos)) = stack.pop() {
            let trs = fst.get_trs(state)?;
            if pos < trs.len() {
                stack.push((state, pos + 1));
                let next = trs.trs()[pos].nextstate;
                match color[next as usize] {
                    0 => {
                        color[next as usize] = 1;
                        stack.push((next, 0));
                    }
                    1 => return Ok(true),
                    _ => {}
                }
            } else {
                color[state as usize] = 2;
            }
        }
    }
    Ok(false)
}

fn all_accessible<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<bool> {
    let nstates = fst.num_states();
    if nstates == 0 {
        return Ok(true);
    }
    let start = match fst.start() {
        Some(s) => s,
        None => return Ok(false),
    };
    let mut seen = vec![false; nstates];
    let mut queue = VecDeque::new();
    seen[start as usize] = true;
    queue.push_back(start);
    let mut count = 1;
    while let Some(state) = queue.pop_front() {
        for tr in fst.get_trs(state)?.trs() {
            if !seen[tr.nextstate as usize] {
                seen[tr.nextstate as usize] = true;
                count += 1;
                queue.push_back(tr.nextstate);
            }
        }
    }
    Ok(count == nstates)
}

/// A string FST is one linear path: every state on the path has exactly one
/// out-transition except the single final state, which has none.
fn is_string<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<bool> {
    let nstates = fst.num_states();
    let start = match fst.start() {
        Some(s) => s,
        None => return Ok(false),
    };
    let mut state = start;
    let mut visited = 0;
    loop {
        visited += 1;
        if visited > nstates {
            // Cycle.
            return Ok(false);
        }
        let trs = fst.get_trs(state)?;
        let is_final = fst.final_weight(state)?.is_some();
        match trs.len() {
            0 => return Ok(is_final && visited == nstates),
            1 => {
                if is_final {
                    return Ok(false);
                }
                state = trs.trs()[0].nextstate;
            }
            _ => return Ok(false),
        }
    }
}
