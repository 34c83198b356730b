use std::sync::Arc;

use anyhow::{bail, Result};
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::algorithms::lazy_fst::GcCache;
use crate::config::FstConfig;
use crate::fst_impls::compact_fst::compactor::superfinal_tr;
use crate::fst_impls::compact_fst::{Compactor, ExpandFlags};
use crate::fst_properties::{compute_fst_properties, FstProperties};
use crate::fst_traits::{CoreFst, ExpandedFst, Fst};
use crate::parsers::MappedRegion;
use crate::semirings::Semiring;
use crate::trs::Trs;
use crate::{StateId, SymbolTable, NO_STATE_ID};

/// Packed transition storage shared by the cheap clones of a compact
/// machine. The bytes may live on the heap or in a file mapping; elements are
/// decoded on access, so no alignment is demanded of the region itself.
///
/// Variable out-degree machines carry a `states` index of `num_states + 1`
/// little-endian u32 entries, where state `s` owns the compacts in
/// `states[s]..states[s + 1]` and `states[num_states] == ncompacts`. Fixed
/// out-degree `k` machines have no index; state `s` owns
/// `s * k..(s + 1) * k`.
#[derive(Debug)]
pub struct CompactStore {
    region: Arc<MappedRegion>,
    /// Whether the region carries a `states` index (variable out-degree).
    indexed: bool,
    states_offset: usize,
    compacts_offset: usize,
    num_states: usize,
    ncompacts: usize,
}

impl CompactStore {
    pub(crate) fn new(
        region: Arc<MappedRegion>,
        indexed: bool,
        states_offset: usize,
        compacts_offset: usize,
        num_states: usize,
        ncompacts: usize,
    ) -> Self {
        Self {
            region,
            indexed,
            states_offset,
            compacts_offset,
            num_states,
            ncompacts,
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn ncompacts(&self) -> usize {
        self.ncompacts
    }

    fn states_entry(&self, idx: usize) -> usize {
        let offset = self.states_offset + 4 * idx;
        LittleEndian::read_u32(&self.region.as_slice()[offset..offset + 4]) as usize
    }

    /// `(first_compact, len)` of the span owned by `state`.
    pub(crate) fn state_span(&self, state: StateId, size: i32) -> (usize, usize) {
        if size > 0 {
            let k = size as usize;
            (state as usize * k, k)
        } else {
            let begin = self.states_entry(state as usize);
            let end = self.states_entry(state as usize + 1);
            (begin, end - begin)
        }
    }

    pub(crate) fn element_bytes(&self, idx: usize, element_size: usize) -> &[u8] {
        let offset = self.compacts_offset + idx * element_size;
        &self.region.as_slice()[offset..offset + element_size]
    }

    pub(crate) fn states_bytes(&self) -> &[u8] {
        if !self.indexed {
            return &[];
        }
        let len = 4 * (self.num_states + 1);
        &self.region.as_slice()[self.states_offset..self.states_offset + len]
    }

    pub(crate) fn compacts_bytes(&self, element_size: usize) -> &[u8] {
        let offset = self.compacts_offset;
        &self.region.as_slice()[offset..offset + self.ncompacts * element_size]
    }

    /// Rejects a `states` index that is non-monotone or points outside the
    /// compacts array, so element lookups stay in bounds afterwards.
    pub(crate) fn check_index(&self) -> Result<()> {
        if !self.indexed {
            return Ok(());
        }
        let mut prev = 0usize;
        for idx in 0..=self.num_states {
            let entry = self.states_entry(idx);
            if entry < prev || entry > self.ncompacts {
                bail!("Corrupt states index at entry {}", idx);
            }
            prev = entry;
        }
        if self.states_entry(self.num_states) != self.ncompacts {
            bail!(
                "States index ends at {}, expected {}",
                self.states_entry(self.num_states),
                self.ncompacts
            );
        }
        Ok(())
    }
}

/// Read-only wFST in the compactor-packed representation. Clones are O(1)
/// and share the immutable store; each clone owns a fresh cache, so sharing a
/// machine across threads means handing each thread its own clone.
#[derive(Debug)]
pub struct CompactFst<W: Semiring, C: Compactor<W>> {
    pub(crate) compactor: Arc<C>,
    pub(crate) store: Arc<CompactStore>,
    pub(crate) cache: GcCache<W>,
    pub(crate) start_state: Option<StateId>,
    pub(crate) isymt: Option<Arc<SymbolTable>>,
    pub(crate) osymt: Option<Arc<SymbolTable>>,
    pub(crate) properties: FstProperties,
}

impl<W: Semiring, C: Compactor<W>> CompactFst<W, C> {
    /// Compacts an expanded machine. The source properties are fully
    /// recomputed and checked against the compactor's requirements.
    pub fn from_fst<F: ExpandedFst<W>>(fst: &F, compactor: C) -> Result<Self> {
        Self::from_fst_with_config(fst, compactor, &FstConfig::default())
    }

    /// Like [`CompactFst::from_fst`], but honoring `config`: when
    /// `error_fatal` is off, a machine the compactor cannot represent yields
    /// an empty machine carrying the `ERROR` property instead of a hard
    /// error.
    pub fn from_fst_with_config<F: ExpandedFst<W>>(
        fst: &F,
        compactor: C,
        config: &FstConfig,
    ) -> Result<Self> {
        match Self::compact_states(fst, &compactor) {
            Ok((data, compacts_offset, ncompacts, props)) => {
                let store = CompactStore::new(
                    Arc::new(MappedRegion::from_vec(data)),
                    compactor.size() < 0,
                    0,
                    compacts_offset,
                    fst.num_states(),
                    ncompacts,
                );
                let properties = (props | compactor.properties() | FstProperties::EXPANDED)
                    - FstProperties::MUTABLE;
                Ok(CompactFst {
                    compactor: Arc::new(compactor),
                    store: Arc::new(store),
                    cache: GcCache::from_config(config),
                    start_state: fst.start(),
                    isymt: fst.input_symbols().cloned(),
                    osymt: fst.output_symbols().cloned(),
                    properties,
                })
            }
            Err(e) => {
                if config.error_fatal {
                    return Err(e);
                }
                debug!("Compaction failed, marking the machine instead : {}", e);
                Ok(Self::error_machine(compactor, config))
            }
        }
    }

    /// Packs every transition, superfinal first per final state. Returns the
    /// serialized arrays, the offset of the compacts, their count and the
    /// source's fully known properties.
    fn compact_states<F: ExpandedFst<W>>(
        fst: &F,
        compactor: &C,
    ) -> Result<(Vec<u8>, usize, usize, FstProperties)> {
        let props = compute_fst_properties(fst)?;
        if !compactor.compatible(props) {
            bail!(
                "Machine incompatible with compactor {:?} (properties {:?})",
                compactor,
                props
            );
        }
        let size = compactor.size();
        let num_states = fst.num_states();

        let mut compacts = Vec::new();
        let mut state_index: Vec<u32> = Vec::with_capacity(num_states + 1);
        let mut ncompacts = 0usize;
        for state in fst.states_range() {
            if size < 0 {
                state_index.push(ncompacts as u32);
            }
            let mut count = 0usize;
            // The superfinal transition is stored first among a final state's
            // compacts.
            if let Some(final_weight) = fst.final_weight(state)? {
                let element = compactor.compact(state, &superfinal_tr(final_weight))?;
                compactor.write_element(&element, &mut compacts)?;
                count += 1;
            }
            for tr in fst.get_trs(state)?.trs() {
                let element = compactor.compact(state, tr)?;
                compactor.write_element(&element, &mut compacts)?;
                count += 1;
            }
            if size > 0 && count != size as usize {
                bail!(
                    "State {} holds {} compacts, the compactor requires exactly {}",
                    state,
                    count,
                    size
                );
            }
            ncompacts += count;
        }
        if size < 0 {
            state_index.push(ncompacts as u32);
        }

        let mut data = Vec::with_capacity(4 * state_index.len() + compacts.len());
        for entry in &state_index {
            data.extend_from_slice(&entry.to_le_bytes());
        }
        let compacts_offset = data.len();
        data.extend_from_slice(&compacts);
        Ok((data, compacts_offset, ncompacts, props))
    }

    /// Empty machine carrying the sticky `ERROR` property; what a failed
    /// compaction degrades to when errors are not fatal.
    fn error_machine(compactor: C, config: &FstConfig) -> Self {
        let indexed = compactor.size() < 0;
        let properties =
            compactor.properties() | FstProperties::EXPANDED | FstProperties::ERROR;
        let data = if indexed { vec![0u8; 4] } else { vec![] };
        let store = CompactStore::new(Arc::new(MappedRegion::from_vec(data)), indexed, 0, 0, 0, 0);
        CompactFst {
            compactor: Arc::new(compactor),
            store: Arc::new(store),
            cache: GcCache::from_config(config),
            start_state: None,
            isymt: None,
            osymt: None,
            properties,
        }
    }

    /// Builds a machine directly from a sequence of compacted elements, one
    /// per state; only defined for compactors with fixed out-degree 1. A
    /// sequence not ending in a superfinal element is extended with an
    /// implicit one, so the empty sequence yields the single-state machine
    /// accepting the empty string with weight one.
    pub fn from_compact_elements<I>(compactor: C, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = C::Element>,
    {
        if compactor.size() != 1 {
            bail!("Element sequences require a compactor with fixed out-degree 1");
        }
        let mut elements: Vec<C::Element> = elements.into_iter().collect();
        let needs_superfinal = match elements.last() {
            None => true,
            Some(element) => {
                let state = (elements.len() - 1) as StateId;
                compactor
                    .expand(state, element, ExpandFlags::NEXTSTATE)
                    .nextstate
                    != NO_STATE_ID
            }
        };
        if needs_superfinal {
            let state = elements.len() as StateId;
            elements.push(compactor.compact(state, &superfinal_tr(W::one()))?);
        }

        let num_states = elements.len();
        let mut data = Vec::with_capacity(num_states * compactor.element_size());
        for element in &elements {
            compactor.write_element(element, &mut data)?;
        }
        let store = CompactStore::new(
            Arc::new(MappedRegion::from_vec(data)),
            false,
            0,
            0,
            num_states,
            num_states,
        );
        let properties = compactor.properties() | FstProperties::EXPANDED | FstProperties::ACCESSIBLE;
        Ok(CompactFst {
            compactor: Arc::new(compactor),
            store: Arc::new(store),
            cache: GcCache::default(),
            start_state: Some(0),
            isymt: None,
            osymt: None,
            properties,
        })
    }

    pub fn compactor(&self) -> &Arc<C> {
        &self.compactor
    }

    pub fn store(&self) -> &Arc<CompactStore> {
        &self.store
    }

    /// Decodes one element. The store extent is validated at construction,
    /// so decoding cannot run out of bytes.
    pub(crate) fn element(&self, idx: usize) -> C::Element {
        let bytes = self.store.element_bytes(idx, self.compactor.element_size());
        let (_, element) = self
            .compactor
            .parse_element(bytes)
            .expect("compact store was validated at construction");
        element
    }

}

impl<W: Semiring, C: Compactor<W>> Clone for CompactFst<W, C> {
    fn clone(&self) -> Self {
        CompactFst {
            compactor: Arc::clone(&self.compactor),
            store: Arc::clone(&self.store),
            cache: GcCache::new(self.cache.gc(), self.cache.limit()),
            start_state: self.start_state,
            isymt: self.isymt.clone(),
            osymt: self.osymt.clone(),
            properties: self.properties,
        }
    }
}

/// Structural equality through the packed bytes: same start, same index,
/// same compacts.
impl<W: Semiring, C: Compactor<W>> PartialEq for CompactFst<W, C> {
    fn eq(&self, other: &Self) -> bool {
        let element_size = self.compactor.element_size();
        self.start_state == other.start_state
            && self.store.num_states == other.store.num_states
            && self.store.states_bytes() == other.store.states_bytes()
            && self.store.compacts_bytes(element_size)
                == other.store.compacts_bytes(element_size)
    }
}
