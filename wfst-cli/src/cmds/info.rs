use anyhow::{format_err, Result};
use log::debug;

use wfst::fst_properties::FstProperties;
use wfst::parsers::bin_fst::FstHeader;

pub fn info_cli(path_in: &str) -> Result<()> {
    debug!("Reading header of {}", path_in);
    let data = crate::cmds::read_binary_input(path_in)?;
    let (_, header) = FstHeader::parse(&data)
        .map_err(|e| format_err!("Error while parsing header of {} : {:?}", path_in, e))?;

    println!("fst type\t{}", header.fst_type);
    println!("arc type\t{}", header.tr_type);
    println!("version\t{}", header.version);
    println!("# of states\t{}", header.num_states);
    println!("# of arcs\t{}", header.num_trs);
    println!("initial state\t{}", header.start);
    println!("aligned\t{}", header.flags.contains(wfst::parsers::bin_fst::FstFlags::IS_ALIGNED));

    let props = FstProperties::from_bits_truncate(header.properties);
    let known = props.known_properties();
    for (name, pos, neg) in &[
        ("acceptor", FstProperties::ACCEPTOR, FstProperties::NOT_ACCEPTOR),
        ("epsilons", FstProperties::EPSILONS, FstProperties::NO_EPSILONS),
        (
            "input label sorted",
            FstProperties::I_LABEL_SORTED,
            FstProperties::NOT_I_LABEL_SORTED,
        ),
        (
            "output label sorted",
            FstProperties::O_LABEL_SORTED,
            FstProperties::NOT_O_LABEL_SORTED,
        ),
        ("weighted", FstProperties::WEIGHTED, FstProperties::UNWEIGHTED),
        ("cyclic", FstProperties::CYCLIC, FstProperties::ACYCLIC),
        (
            "accessible",
            FstProperties::ACCESSIBLE,
            FstProperties::NOT_ACCESSIBLE,
        ),
        ("string", FstProperties::STRING, FstProperties::NOT_STRING),
    ] {
        let value = if !known.contains(*pos) {
            "?"
        } else if props.contains(*pos) {
            "y"
        } else {
            debug_assert!(props.contains(*neg));
            "n"
        };
        println!("{}\t{}", name, value);
    }
    println!("error\t{}", props.contains(FstProperties::ERROR));
    Ok(())
}
