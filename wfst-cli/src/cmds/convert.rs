use anyhow::{bail, format_err, Result};
use log::debug;

use wfst::algorithms::fst_convert_from_ref;
use wfst::fst_impls::compact_fst::{
    AcceptorCompactor, CompactFst, Compactor, StringCompactor, UnweightedAcceptorCompactor,
    UnweightedCompactor, WeightedStringCompactor,
};
use wfst::fst_impls::VectorFst;
use wfst::fst_traits::SerializableFst;
use wfst::parsers::bin_fst::FstHeader;
use wfst::semirings::{LogWeight, SerializableSemiring, TropicalWeight};
use wfst::FstConfig;

pub fn convert_cli(
    path_in: &str,
    path_out: &str,
    arc_type: &str,
    compactor: Option<&str>,
    config: &FstConfig,
) -> Result<()> {
    let data = crate::cmds::read_binary_input(path_in)?;
    let (_, header) = FstHeader::parse(&data)
        .map_err(|e| format_err!("Error while parsing header of {} : {:?}", path_in, e))?;
    debug!("Converting {} ({})", path_in, header.fst_type);

    match arc_type {
        "standard" => convert_typed::<TropicalWeight>(&data, &header, path_out, compactor, config),
        "log" => convert_typed::<LogWeight>(&data, &header, path_out, compactor, config),
        _ => bail!("Unknown arc type : {:?}", arc_type),
    }
}

fn convert_typed<W: SerializableSemiring>(
    data: &[u8],
    header: &FstHeader,
    path_out: &str,
    compactor: Option<&str>,
    config: &FstConfig,
) -> Result<()> {
    if header.fst_type == "vector" {
        let fst = VectorFst::<W>::load(data)?;
        return match compactor {
            None => write_output(&fst, path_out),
            Some("string") => compact_and_write(&fst, StringCompactor::new(), path_out, config),
            Some("weighted_string") => {
                compact_and_write(&fst, WeightedStringCompactor::new(), path_out, config)
            }
            Some("unweighted_acceptor") => {
                compact_and_write(&fst, UnweightedAcceptorCompactor::new(), path_out, config)
            }
            Some("acceptor") => compact_and_write(&fst, AcceptorCompactor::new(), path_out, config),
            Some("unweighted") => {
                compact_and_write(&fst, UnweightedCompactor::new(), path_out, config)
            }
            Some(other) => bail!("Unknown compactor : {:?}", other),
        };
    }

    match header.fst_type.as_str() {
        "compact_string" => expand_and_write::<W, StringCompactor<W>>(data, path_out),
        "compact_weighted_string" => {
            expand_and_write::<W, WeightedStringCompactor<W>>(data, path_out)
        }
        "compact_unweighted_acceptor" => {
            expand_and_write::<W, UnweightedAcceptorCompactor<W>>(data, path_out)
        }
        "compact_acceptor" => expand_and_write::<W, AcceptorCompactor<W>>(data, path_out),
        "compact_unweighted" => expand_and_write::<W, UnweightedCompactor<W>>(data, path_out),
        other => bail!("Unknown fst type : {:?}", other),
    }
}

fn write_output<W: SerializableSemiring, F: SerializableFst<W>>(
    fst: &F,
    path_out: &str,
) -> Result<()> {
    if path_out == "-" {
        let stdout = std::io::stdout();
        fst.store(&mut stdout.lock())
    } else {
        fst.write(path_out)
    }
}

fn compact_and_write<W: SerializableSemiring, C: Compactor<W>>(
    fst: &VectorFst<W>,
    compactor: C,
    path_out: &str,
    config: &FstConfig,
) -> Result<()> {
    let compact = CompactFst::from_fst_with_config(fst, compactor, config)?;
    write_output(&compact, path_out)
}

fn expand_and_write<W: SerializableSemiring, C: Compactor<W>>(
    data: &[u8],
    path_out: &str,
) -> Result<()> {
    let compact = CompactFst::<W, C>::load(data)?;
    let fst: VectorFst<W> = fst_convert_from_ref(&compact);
    write_output(&fst, path_out)
}
