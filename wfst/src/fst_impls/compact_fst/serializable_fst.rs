use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, format_err, Result};
use nom::bytes::complete::take;

use crate::algorithms::lazy_fst::GcCache;
use crate::fst_impls::compact_fst::{CompactFst, CompactStore, Compactor};
use crate::fst_properties::FstProperties;
use crate::fst_traits::SerializableFst;
use crate::parsers::bin_fst::utils_serialization::{
    pad_align, parse_bin_i64, skip_align, write_bin_i64,
};
use crate::parsers::bin_fst::{FstFlags, FstHeader};
use crate::parsers::bin_symt::{parse_symbol_table, write_symbol_table};
use crate::parsers::MappedRegion;
use crate::semirings::SerializableSemiring;
use crate::{StateId, NO_STATE_ID};

pub(crate) const COMPACT_FILE_VERSION: i32 = 3;
pub(crate) const COMPACT_MIN_FILE_VERSION: i32 = 2;

impl<W: SerializableSemiring, C: Compactor<W> + 'static> SerializableFst<W> for CompactFst<W, C> {
    fn fst_type() -> String {
        format!("compact_{}", C::compactor_type())
    }

    fn load(data: &[u8]) -> Result<Self> {
        Self::from_region(Arc::new(MappedRegion::from_vec(data.to_vec())))
    }

    fn store<O: Write>(&self, writer: &mut O) -> Result<()> {
        // The body is assembled in memory first so that section padding can
        // be computed from absolute stream positions.
        let mut buffer = Vec::new();

        let mut flags = FstFlags::IS_ALIGNED;
        if self.isymt.is_some() {
            flags |= FstFlags::HAS_ISYMBOLS;
        }
        if self.osymt.is_some() {
            flags |= FstFlags::HAS_OSYMBOLS;
        }

        let num_states = self.store.num_states();
        let num_finals = (0..num_states as StateId)
            .filter(|s| self.final_tr(*s).is_some())
            .count();
        let header = FstHeader {
            fst_type: <Self as SerializableFst<W>>::fst_type(),
            tr_type: W::weight_type(),
            version: COMPACT_FILE_VERSION,
            flags,
            properties: self.properties.bits(),
            start: i64::from(self.start_state.unwrap_or(NO_STATE_ID)),
            num_states: num_states as i64,
            num_trs: (self.store.ncompacts() - num_finals) as i64,
        };
        header.write(&mut buffer)?;

        if let Some(isymt) = &self.isymt {
            write_symbol_table(&mut buffer, isymt)?;
        }
        if let Some(osymt) = &self.osymt {
            write_symbol_table(&mut buffer, osymt)?;
        }

        self.compactor.write(&mut buffer)?;
        write_bin_i64(&mut buffer, self.store.ncompacts() as i64)?;

        if self.compactor.size() < 0 {
            pad_align(&mut buffer, 4);
            buffer.extend_from_slice(self.store.states_bytes());
        }
        pad_align(&mut buffer, self.compactor.element_size());
        buffer.extend_from_slice(self.store.compacts_bytes(self.compactor.element_size()));

        writer.write_all(&buffer)?;
        Ok(())
    }
}

impl<W: SerializableSemiring, C: Compactor<W>> CompactFst<W, C> {
    /// Reads a machine by memory-mapping the file; the transition arrays are
    /// used in place, without copying.
    pub fn read_mapped<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_region(Arc::new(MappedRegion::map_path(path)?))
    }

    fn from_region(region: Arc<MappedRegion>) -> Result<Self> {
        let meta = parse_compact_meta::<W, C>(region.as_slice())?;
        let store = CompactStore::new(
            region,
            meta.compactor.size() < 0,
            meta.states_offset,
            meta.compacts_offset,
            meta.header.num_states as usize,
            meta.ncompacts,
        );
        store.check_index()?;
        let size = meta.compactor.size();
        if size > 0 && store.num_states() * size as usize != store.ncompacts() {
            bail!(
                "A fixed out-degree of {} does not cover {} states with {} compacts",
                size,
                store.num_states(),
                store.ncompacts()
            );
        }
        let start_state = if meta.header.start == i64::from(NO_STATE_ID) {
            None
        } else {
            Some(meta.header.start as StateId)
        };
        Ok(CompactFst {
            compactor: Arc::new(meta.compactor),
            store: Arc::new(store),
            cache: GcCache::default(),
            start_state,
            isymt: meta.isymt.map(Arc::new),
            osymt: meta.osymt.map(Arc::new),
            properties: FstProperties::from_bits_truncate(meta.header.properties)
                | FstProperties::EXPANDED,
        })
    }
}

struct CompactMeta<C> {
    header: FstHeader,
    compactor: C,
    isymt: Option<crate::SymbolTable>,
    osymt: Option<crate::SymbolTable>,
    states_offset: usize,
    compacts_offset: usize,
    ncompacts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::fst_convert_from_ref;
    use crate::fst_impls::compact_fst::{
        AcceptorCompactor, StringCompactor, UnweightedAcceptorCompactor, UnweightedCompactor,
        WeightedStringCompactor,
    };
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::{CoreFst, ExpandedFst, MutableFst};
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::utils::{acceptor, transducer};
    use crate::Tr;

    fn weighted_acceptor() -> Result<VectorFst<TropicalWeight>> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0)?;
        fst.add_tr(s0, Tr::new(1, 1, TropicalWeight::new(0.5), s1))?;
        fst.add_tr(s0, Tr::new(2, 2, TropicalWeight::new(1.5), s2))?;
        fst.add_tr(s1, Tr::new(3, 3, TropicalWeight::new(2.5), s2))?;
        fst.set_final(s2, TropicalWeight::new(0.25))?;
        Ok(fst)
    }

    fn assert_round_trip<C: Compactor<TropicalWeight>>(
        fst: &VectorFst<TropicalWeight>,
        compactor: C,
    ) -> Result<()> {
        let compact = CompactFst::from_fst(fst, compactor)?;
        // Compaction must be lossless.
        let expanded: VectorFst<TropicalWeight> = fst_convert_from_ref(&compact);
        assert_eq!(&expanded, fst);

        // And so must the binary format.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("machine.fst");
        compact.write(&path)?;
        let loaded = CompactFst::<TropicalWeight, C>::read(&path)?;
        assert_eq!(loaded, compact);

        // Memory mapping yields bit-identical transition enumeration.
        let mapped = CompactFst::<TropicalWeight, C>::read_mapped(&path)?;
        for state in loaded.states_range() {
            let heap_trs: Vec<_> = loaded.trs_iter(state)?.collect();
            let mapped_trs: Vec<_> = mapped.trs_iter(state)?.collect();
            assert_eq!(heap_trs, mapped_trs);
            assert_eq!(loaded.final_weight(state)?, mapped.final_weight(state)?);
        }
        Ok(())
    }

    #[test]
    fn test_compact_string_round_trip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2, 3], TropicalWeight::one());
        assert_round_trip(&fst, StringCompactor::new())
    }

    #[test]
    fn test_compact_weighted_string_round_trip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[4, 5], TropicalWeight::new(1.5));
        assert_round_trip(&fst, WeightedStringCompactor::new())
    }

    #[test]
    fn test_compact_unweighted_acceptor_round_trip() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> = acceptor(&[1, 2], TropicalWeight::one());
        let s0 = 0;
        fst.add_tr(s0, Tr::new(7, 7, TropicalWeight::one(), 1))?;
        assert_round_trip(&fst, UnweightedAcceptorCompactor::new())
    }

    #[test]
    fn test_compact_acceptor_round_trip() -> Result<()> {
        let fst = weighted_acceptor()?;
        assert_round_trip(&fst, AcceptorCompactor::new())
    }

    #[test]
    fn test_compact_unweighted_round_trip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = transducer(&[1, 2], &[3, 4], TropicalWeight::one());
        assert_round_trip(&fst, UnweightedCompactor::new())
    }

    #[test]
    fn test_compact_incompatible_machine_rejected() -> Result<()> {
        let fst = weighted_acceptor()?;
        assert!(CompactFst::from_fst(&fst, StringCompactor::new()).is_err());
        Ok(())
    }

    #[test]
    fn test_compact_incompatible_machine_marked_when_not_fatal() -> Result<()> {
        use crate::FstConfig;

        let fst = weighted_acceptor()?;
        let config = FstConfig {
            error_fatal: false,
            ..FstConfig::default()
        };
        let compact = CompactFst::from_fst_with_config(&fst, StringCompactor::new(), &config)?;
        assert!(compact.properties().contains(FstProperties::ERROR));
        assert_eq!(compact.num_states(), 0);
        assert_eq!(compact.start(), None);
        Ok(())
    }

    #[test]
    fn test_compact_string_empty_element_sequence() -> Result<()> {
        let compact = CompactFst::<TropicalWeight, _>::from_compact_elements(
            StringCompactor::new(),
            std::iter::empty(),
        )?;
        assert_eq!(compact.num_states(), 1);
        assert_eq!(compact.start(), Some(0));
        assert_eq!(compact.final_weight(0)?, Some(TropicalWeight::one()));
        assert_eq!(compact.num_trs(0)?, 0);
        Ok(())
    }

    #[test]
    fn test_compact_string_elements_get_implicit_superfinal() -> Result<()> {
        let compact = CompactFst::<TropicalWeight, _>::from_compact_elements(
            StringCompactor::new(),
            vec![1, 2],
        )?;
        assert_eq!(compact.num_states(), 3);
        assert_eq!(compact.final_weight(2)?, Some(TropicalWeight::one()));
        assert_eq!(compact.num_trs(0)?, 1);
        Ok(())
    }

    #[test]
    fn test_compact_trs_iter_bypasses_cache() -> Result<()> {
        let fst = weighted_acceptor()?;
        let compact = CompactFst::from_fst(&fst, AcceptorCompactor::new())?;
        let trs: Vec<_> = compact.trs_iter(0)?.collect();
        assert_eq!(trs.len(), 2);
        assert_eq!(trs[0], Tr::new(1, 1, TropicalWeight::new(0.5), 1));
        // The bypass iterator must not populate the cache.
        use crate::algorithms::lazy_fst::FstCache;
        assert!(!compact.cache.get_trs(0).is_computed());
        // The cached accessor returns the same transitions.
        use crate::trs::Trs;
        assert_eq!(compact.get_trs(0)?.trs(), trs.as_slice());
        Ok(())
    }
}

fn parse_compact_meta<W: SerializableSemiring, C: Compactor<W> + 'static>(
    data: &[u8],
) -> Result<CompactMeta<C>> {
    let (_, meta) = parse_compact_body::<W, C>(data, data.len())
        .map_err(|e| format_err!("Error while parsing compact fst : {:?}", e))?;
    meta.header.validate(
        &<CompactFst<W, C> as SerializableFst<W>>::fst_type(),
        COMPACT_MIN_FILE_VERSION,
        &W::weight_type(),
    )?;
    Ok(meta)
}

fn parse_compact_body<'a, W: SerializableSemiring, C: Compactor<W>>(
    i: &'a [u8],
    full_len: usize,
) -> nom::IResult<&'a [u8], CompactMeta<C>> {
    let (i, header) = FstHeader::parse(i)?;
    let (i, isymt) = if header.flags.contains(FstFlags::HAS_ISYMBOLS) {
        let (i, symt) = parse_symbol_table(i)?;
        (i, Some(symt))
    } else {
        (i, None)
    };
    let (i, osymt) = if header.flags.contains(FstFlags::HAS_OSYMBOLS) {
        let (i, symt) = parse_symbol_table(i)?;
        (i, Some(symt))
    } else {
        (i, None)
    };
    let (i, compactor) = C::read(i)?;
    let (i, ncompacts) = parse_bin_i64(i)?;
    let ncompacts = ncompacts as usize;
    let num_states = header.num_states as usize;

    let (i, states_offset) = if compactor.size() < 0 {
        let (i, _) = skip_align(i, full_len, 4)?;
        let offset = full_len - i.len();
        let (i, _) = take(4 * (num_states + 1))(i)?;
        (i, offset)
    } else {
        (i, 0)
    };

    let element_size = compactor.element_size();
    let (i, _) = skip_align(i, full_len, element_size)?;
    let compacts_offset = full_len - i.len();
    let (i, _) = take(ncompacts * element_size)(i)?;

    Ok((
        i,
        CompactMeta {
            header,
            compactor,
            isymt,
            osymt,
            states_offset,
            compacts_offset,
            ncompacts,
        },
    ))
}
