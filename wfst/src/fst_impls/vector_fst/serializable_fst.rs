use std::io::Write;
use std::sync::Arc;

use anyhow::{format_err, Result};
use nom::multi::count;
use nom::IResult;

use crate::config::FstConfig;
use crate::fst_impls::vector_fst::VectorFstState;
use crate::fst_impls::VectorFst;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{CoreFst, ExpandedFst, SerializableFst};
use crate::parsers::bin_fst::utils_serialization::{
    parse_bin_i32, parse_bin_i64, write_bin_i32, write_bin_i64,
};
use crate::parsers::bin_fst::{FstFlags, FstHeader};
use crate::parsers::bin_symt::{parse_symbol_table, write_symbol_table};
use crate::semirings::{Semiring, SerializableSemiring};
use crate::tr::Tr;
use crate::trs::Trs;
use crate::{StateId, EPS_LABEL, NO_STATE_ID};

pub(crate) const VECTOR_FILE_VERSION: i32 = 2;
pub(crate) const VECTOR_MIN_FILE_VERSION: i32 = 2;

impl<W: SerializableSemiring> SerializableFst<W> for VectorFst<W> {
    fn fst_type() -> String {
        "vector".to_string()
    }

    fn load(data: &[u8]) -> Result<Self> {
        let (_, fst) = parse_vector_fst(data)
            .map_err(|e| format_err!("Error while parsing vector fst : {:?}", e))?;
        fst.header_checks()?;
        Ok(fst)
    }

    fn store<O: Write>(&self, writer: &mut O) -> Result<()> {
        let mut flags = FstFlags::empty();
        if self.isymt.is_some() {
            flags |= FstFlags::HAS_ISYMBOLS;
        }
        if self.osymt.is_some() {
            flags |= FstFlags::HAS_OSYMBOLS;
        }
        let num_trs: usize = self.states.iter().map(|s| s.trs.len()).sum();
        let header = FstHeader {
            fst_type: Self::fst_type(),
            tr_type: W::weight_type(),
            version: VECTOR_FILE_VERSION,
            flags,
            properties: self.properties.bits(),
            start: i64::from(self.start_state.unwrap_or(NO_STATE_ID)),
            num_states: self.states.len() as i64,
            num_trs: num_trs as i64,
        };
        header.write(writer)?;

        if let Some(isymt) = &self.isymt {
            write_symbol_table(writer, isymt)?;
        }
        if let Some(osymt) = &self.osymt {
            write_symbol_table(writer, osymt)?;
        }

        for state in &self.states {
            let final_weight = state.final_weight.clone().unwrap_or_else(W::zero);
            final_weight.write_binary(writer)?;
            write_bin_i64(writer, state.trs.len() as i64)?;
            for tr in state.trs.trs() {
                write_bin_i32(writer, tr.ilabel)?;
                write_bin_i32(writer, tr.olabel)?;
                tr.weight.write_binary(writer)?;
                write_bin_i32(writer, tr.nextstate)?;
            }
        }
        Ok(())
    }
}

impl<W: SerializableSemiring> VectorFst<W> {
    fn header_checks(&self) -> Result<()> {
        for state in self.states_range() {
            for tr in self.get_trs(state)?.trs() {
                if tr.nextstate < 0 || tr.nextstate as usize >= self.num_states() {
                    return Err(format_err!(
                        "Transition to unknown state {:?}",
                        tr.nextstate
                    ));
                }
            }
        }
        Ok(())
    }
}

fn parse_vector_fst_tr<W: SerializableSemiring>(i: &[u8]) -> IResult<&[u8], Tr<W>> {
    let (i, ilabel) = parse_bin_i32(i)?;
    let (i, olabel) = parse_bin_i32(i)?;
    let (i, weight) = W::parse_binary(i)?;
    let (i, nextstate) = parse_bin_i32(i)?;
    Ok((i, Tr::new(ilabel, olabel, weight, nextstate)))
}

fn parse_vector_fst_state<W: SerializableSemiring>(i: &[u8]) -> IResult<&[u8], VectorFstState<W>> {
    let (i, final_weight) = W::parse_binary(i)?;
    let (i, num_trs) = parse_bin_i64(i)?;
    let (i, trs) = count(parse_vector_fst_tr::<W>, num_trs as usize)(i)?;
    let niepsilons = trs.iter().filter(|tr| tr.ilabel == EPS_LABEL).count();
    let noepsilons = trs.iter().filter(|tr| tr.olabel == EPS_LABEL).count();
    Ok((
        i,
        VectorFstState {
            final_weight: if final_weight.is_zero() {
                None
            } else {
                Some(final_weight)
            },
            trs: trs.into(),
            niepsilons,
            noepsilons,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::{Fst, MutableFst};
    use crate::semirings::{LogWeight, TropicalWeight};
    use crate::{SymbolTable, Tr};

    fn single_tr_fst() -> Result<VectorFst<TropicalWeight>> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Tr::new(5, 5, TropicalWeight::one(), s1))?;
        Ok(fst)
    }

    #[test]
    fn test_vector_fst_bin_round_trip() -> Result<()> {
        let fst = single_tr_fst()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("machine.fst");
        fst.write(&path)?;

        let data = std::fs::read(&path)?;
        let (_, header) = FstHeader::parse(&data)
            .map_err(|e| format_err!("Error while parsing header : {:?}", e))?;
        assert_eq!(header.fst_type, "vector");
        assert_eq!(header.num_states, 2);
        assert_eq!(header.num_trs, 1);
        assert_eq!(header.start, 0);

        let loaded = VectorFst::<TropicalWeight>::read(&path)?;
        assert_eq!(loaded, fst);
        assert_eq!(loaded.get_trs(0)?.trs()[0], Tr::new(5, 5, TropicalWeight::one(), 1));
        Ok(())
    }

    #[test]
    fn test_vector_fst_bin_round_trip_with_symt() -> Result<()> {
        let mut fst = single_tr_fst()?;
        let mut symt = SymbolTable::new();
        symt.add_symbol("five");
        fst.set_input_symbols(Arc::new(symt.clone()));
        fst.set_output_symbols(Arc::new(symt.clone()));

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("machine.fst");
        fst.write(&path)?;
        let loaded = VectorFst::<TropicalWeight>::read(&path)?;
        assert_eq!(loaded, fst);
        assert_eq!(loaded.input_symbols().map(|s| s.as_ref()), Some(&symt));
        Ok(())
    }

    #[test]
    fn test_vector_fst_read_rejects_wrong_weight_type() -> Result<()> {
        let fst = single_tr_fst()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("machine.fst");
        fst.write(&path)?;
        assert!(VectorFst::<LogWeight>::read(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_vector_fst_load_rejects_bad_magic() {
        let data = vec![0u8; 64];
        assert!(VectorFst::<TropicalWeight>::load(&data).is_err());
    }
}

fn parse_vector_fst<W: SerializableSemiring>(i: &[u8]) -> IResult<&[u8], VectorFst<W>> {
    let (i, header) = FstHeader::parse(i)?;
    if header.fst_type != "vector"
        || header.tr_type != W::weight_type()
        || header.version < VECTOR_MIN_FILE_VERSION
    {
        return Err(nom::Err::Error(nom::error::Error::new(
            i,
            nom::error::ErrorKind::Verify,
        )));
    }
    let (i, isymt) = if header.flags.contains(FstFlags::HAS_ISYMBOLS) {
        let (i, symt) = parse_symbol_table(i)?;
        (i, Some(Arc::new(symt)))
    } else {
        (i, None)
    };
    let (i, osymt) = if header.flags.contains(FstFlags::HAS_OSYMBOLS) {
        let (i, symt) = parse_symbol_table(i)?;
        (i, Some(Arc::new(symt)))
    } else {
        (i, None)
    };
    let (i, states) = count(parse_vector_fst_state::<W>, header.num_states as usize)(i)?;
    let start_state = if header.start == i64::from(NO_STATE_ID) {
        None
    } else {
        Some(header.start as StateId)
    };
    Ok((
        i,
        VectorFst {
            states,
            start_state,
            isymt,
            osymt,
            properties: FstProperties::from_bits_truncate(header.properties)
                | FstProperties::EXPANDED
                | FstProperties::MUTABLE,
            error_fatal: FstConfig::default().error_fatal,
        },
    ))
}
