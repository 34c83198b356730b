use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::EPS_LABEL;

/// Knowledge surviving `set_start`: a new start state invalidates
/// accessibility and string-ness.
pub fn set_start_properties(inprops: FstProperties) -> FstProperties {
    inprops.keep(
        FstProperties::TRINARY
            ^ (FstProperties::ACCESSIBLE
                | FstProperties::NOT_ACCESSIBLE
                | FstProperties::STRING
                | FstProperties::NOT_STRING),
    )
}

/// Knowledge surviving `set_final`: weights and string-ness may change.
pub fn set_final_properties<W: Semiring>(
    inprops: FstProperties,
    weight: &W,
) -> FstProperties {
    let mut outprops = inprops.keep(
        FstProperties::TRINARY
            ^ (FstProperties::WEIGHTED
                | FstProperties::UNWEIGHTED
                | FstProperties::STRING
                | FstProperties::NOT_STRING),
    );
    if !weight.is_one() && !weight.is_zero() {
        outprops |= FstProperties::WEIGHTED;
    } else if inprops.contains(FstProperties::UNWEIGHTED) {
        outprops |= FstProperties::UNWEIGHTED;
    }
    outprops
}

/// Knowledge surviving `add_state`. The fresh state is isolated, so
/// acyclicity is retained but accessibility is lost.
pub fn add_state_properties(inprops: FstProperties) -> FstProperties {
    inprops.keep(
        FstProperties::TRINARY
            ^ (FstProperties::ACCESSIBLE
                | FstProperties::STRING
                | FstProperties::NOT_STRING),
    )
}

/// Knowledge surviving `add_tr` on `state`, where `prev_tr` is the last
/// transition already leaving `state`, if any.
pub fn add_tr_properties<W: Semiring>(
    inprops: FstProperties,
    tr: &Tr<W>,
    prev_tr: Option<&Tr<W>>,
) -> FstProperties {
    let mut outprops = inprops.keep(
        FstProperties::ACCEPTOR
            | FstProperties::NOT_ACCEPTOR
            | FstProperties::EPSILONS
            | FstProperties::NO_EPSILONS
            | FstProperties::I_LABEL_SORTED
            | FstProperties::NOT_I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::NOT_O_LABEL_SORTED
            | FstProperties::WEIGHTED
            | FstProperties::UNWEIGHTED
            | FstProperties::CYCLIC,
    );

    if tr.ilabel != tr.olabel {
        outprops |= FstProperties::NOT_ACCEPTOR;
        outprops.remove(FstProperties::ACCEPTOR);
    }
    if tr.ilabel == EPS_LABEL || tr.olabel == EPS_LABEL {
        outprops |= FstProperties::EPSILONS;
        outprops.remove(FstProperties::NO_EPSILONS);
    }
    if !tr.weight.is_one() && !tr.weight.is_zero() {
        outprops |= FstProperties::WEIGHTED;
        outprops.remove(FstProperties::UNWEIGHTED);
    }
    if let Some(prev_tr) = prev_tr {
        if prev_tr.ilabel > tr.ilabel {
            outprops |= FstProperties::NOT_I_LABEL_SORTED;
            outprops.remove(FstProperties::I_LABEL_SORTED);
        }
        if prev_tr.olabel > tr.olabel {
            outprops |= FstProperties::NOT_O_LABEL_SORTED;
            outprops.remove(FstProperties::O_LABEL_SORTED);
        }
    }
    outprops
}

/// Knowledge surviving a state deletion: removals cannot introduce labels,
/// weights, epsilons or cycles, so the negative facts are retained.
pub fn delete_states_properties(inprops: FstProperties) -> FstProperties {
    inprops.keep(
        FstProperties::ACCEPTOR
            | FstProperties::NO_EPSILONS
            | FstProperties::I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::UNWEIGHTED
            | FstProperties::ACYCLIC,
    )
}

/// Properties of the empty machine: every positive universal fact holds
/// vacuously.
pub fn delete_all_states_properties(inprops: FstProperties) -> FstProperties {
    (inprops & FstProperties::BINARY)
        | FstProperties::ACCEPTOR
        | FstProperties::NO_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::UNWEIGHTED
        | FstProperties::ACYCLIC
        | FstProperties::ACCESSIBLE
        | FstProperties::NOT_STRING
}

/// Knowledge surviving the removal of all transitions leaving one state.
pub fn delete_trs_properties(inprops: FstProperties) -> FstProperties {
    delete_states_properties(inprops)
}
