use bitflags::bitflags;

bitflags! {
    /// Structural facts about an FST. Apart from the three binary bits at the
    /// bottom, properties come in positive/negative pairs: a pair with one
    /// bit set is known (asserted or denied), a pair with no bit set is
    /// unknown. Both bits of a pair set at once is invalid.
    pub struct FstProperties: u64 {
        /// The state set is materialized; `num_states` is well-defined.
        const EXPANDED = 0x0001;
        /// The representation supports in-place mutation.
        const MUTABLE = 0x0002;
        /// An invariant was violated; sticky once set.
        const ERROR = 0x0004;

        /// Every transition has identical input and output label.
        const ACCEPTOR = 0x0001_0000;
        const NOT_ACCEPTOR = 0x0002_0000;
        /// Some transition consumes or produces epsilon.
        const EPSILONS = 0x0004_0000;
        const NO_EPSILONS = 0x0008_0000;
        /// Out-transitions of every state are non-decreasing in input label.
        const I_LABEL_SORTED = 0x0010_0000;
        const NOT_I_LABEL_SORTED = 0x0020_0000;
        /// Out-transitions of every state are non-decreasing in output label.
        const O_LABEL_SORTED = 0x0040_0000;
        const NOT_O_LABEL_SORTED = 0x0080_0000;
        /// Some transition or final weight differs from `one`.
        const WEIGHTED = 0x0100_0000;
        const UNWEIGHTED = 0x0200_0000;
        const CYCLIC = 0x0400_0000;
        const ACYCLIC = 0x0800_0000;
        /// Every state is reachable from the start state.
        const ACCESSIBLE = 0x1000_0000;
        const NOT_ACCESSIBLE = 0x2000_0000;
        /// The machine is one linear path.
        const STRING = 0x4000_0000;
        const NOT_STRING = 0x8000_0000;

        const POS_TRINARY = Self::ACCEPTOR.bits
            | Self::EPSILONS.bits
            | Self::I_LABEL_SORTED.bits
            | Self::O_LABEL_SORTED.bits
            | Self::WEIGHTED.bits
            | Self::CYCLIC.bits
            | Self::ACCESSIBLE.bits
            | Self::STRING.bits;
        const NEG_TRINARY = Self::NOT_ACCEPTOR.bits
            | Self::NO_EPSILONS.bits
            | Self::NOT_I_LABEL_SORTED.bits
            | Self::NOT_O_LABEL_SORTED.bits
            | Self::UNWEIGHTED.bits
            | Self::ACYCLIC.bits
            | Self::NOT_ACCESSIBLE.bits
            | Self::NOT_STRING.bits;
        const TRINARY = Self::POS_TRINARY.bits | Self::NEG_TRINARY.bits;
        const BINARY = Self::EXPANDED.bits | Self::MUTABLE.bits | Self::ERROR.bits;
        const ALL = Self::BINARY.bits | Self::TRINARY.bits;
    }
}

impl FstProperties {
    /// Mask of the property bits whose value is known in `self`: the binary
    /// bits plus both bits of every pair with at least one bit set.
    pub fn known_properties(self) -> FstProperties {
        let mut known = FstProperties::BINARY;
        let pos = FstProperties::POS_TRINARY.bits();
        let neg = FstProperties::NEG_TRINARY.bits();
        // Pairs are laid out as adjacent (positive, negative) bits.
        let pairs = ((self.bits() & pos) << 1) | (self.bits() & neg);
        known |= FstProperties::from_bits_truncate(pairs | (pairs >> 1));
        known
    }

    pub fn contains_error(self) -> bool {
        self.contains(FstProperties::ERROR)
    }

    /// Keeps only the property knowledge surviving an operation that
    /// preserves `mask`, never dropping the binary bits.
    pub(crate) fn keep(self, mask: FstProperties) -> FstProperties {
        self & (mask | FstProperties::BINARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_properties_pairs() {
        let props = FstProperties::ACCEPTOR | FstProperties::NO_EPSILONS;
        let known = props.known_properties();
        assert!(known.contains(FstProperties::ACCEPTOR | FstProperties::NOT_ACCEPTOR));
        assert!(known.contains(FstProperties::EPSILONS | FstProperties::NO_EPSILONS));
        assert!(!known.contains(FstProperties::CYCLIC));
        assert!(known.contains(FstProperties::ERROR));
    }
}
