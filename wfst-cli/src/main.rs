use anyhow::{bail, format_err, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use wfst::FstConfig;

mod cmds;

use crate::cmds::convert::convert_cli;
use crate::cmds::far::{far_create_cli, far_extract_cli, far_list_cli, far_print_cli};
use crate::cmds::info::info_cli;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error : {}", e);
        for cause in e.chain().skip(1) {
            eprintln!(" -> caused by : {}", cause);
        }
        std::process::exit(1);
    }
}

fn parse_config(matches: &ArgMatches) -> Result<FstConfig> {
    let parentheses = matches.value_of("fst_weight_parentheses").unwrap_or("");
    let weight_parentheses = match parentheses.chars().collect::<Vec<_>>().as_slice() {
        [] => None,
        [open, close] => Some((*open, *close)),
        _ => bail!("--fst_weight_parentheses expects exactly two characters"),
    };
    let separator = matches.value_of("fst_weight_separator").unwrap_or(",");
    let weight_separator = match separator.chars().collect::<Vec<_>>().as_slice() {
        [c] => *c,
        _ => bail!("--fst_weight_separator expects exactly one character"),
    };
    Ok(FstConfig {
        error_fatal: matches.value_of("fst_error_fatal").unwrap_or("true") == "true",
        weight_separator,
        weight_parentheses,
        cache_gc: matches.value_of("fst_default_cache_gc").unwrap_or("true") == "true",
        cache_gc_limit: matches
            .value_of("fst_default_cache_gc_limit")
            .unwrap_or("1048576")
            .parse()
            .map_err(|_| format_err!("--fst_default_cache_gc_limit expects an integer"))?,
    })
}

fn run() -> Result<()> {
    let app = App::new("wfst")
        .about("Weighted finite-state transducer tools")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("fst_error_fatal")
                .long("fst_error_fatal")
                .takes_value(true)
                .global(true)
                .help("Treat recoverable errors as fatal [true|false]"),
        )
        .arg(
            Arg::with_name("fst_weight_separator")
                .long("fst_weight_separator")
                .takes_value(true)
                .global(true)
                .help("Separator between composite weight components"),
        )
        .arg(
            Arg::with_name("fst_weight_parentheses")
                .long("fst_weight_parentheses")
                .takes_value(true)
                .global(true)
                .help("Two characters bracketing composite weights, empty for none"),
        )
        .arg(
            Arg::with_name("fst_default_cache_gc")
                .long("fst_default_cache_gc")
                .takes_value(true)
                .global(true)
                .help("Whether lazy-FST caches garbage collect [true|false]"),
        )
        .arg(
            Arg::with_name("fst_default_cache_gc_limit")
                .long("fst_default_cache_gc_limit")
                .takes_value(true)
                .global(true)
                .help("Cache byte budget before garbage collection"),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Prints the header and properties of an FST file")
                .arg(Arg::with_name("in.fst").required(true)),
        )
        .subcommand(
            SubCommand::with_name("convert")
                .about("Converts between the vector and compact representations")
                .arg(Arg::with_name("in.fst").required(true))
                .arg(Arg::with_name("out.fst").required(true))
                .arg(
                    Arg::with_name("arc_type")
                        .long("arc_type")
                        .takes_value(true)
                        .default_value("standard")
                        .help("Weight type of the machine [standard|log]"),
                )
                .arg(
                    Arg::with_name("compactor")
                        .long("compactor")
                        .takes_value(true)
                        .help(
                            "Target compactor for vector inputs \
                             [string|weighted_string|unweighted_acceptor|acceptor|unweighted]",
                        ),
                ),
        )
        .subcommand(
            SubCommand::with_name("far")
                .about("Finite-state archive tools")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("create")
                        .about("Compiles text files into an archive of string FSTs")
                        .arg(Arg::with_name("out.far").required(true))
                        .arg(Arg::with_name("in.txt").required(true).multiple(true))
                        .arg(
                            Arg::with_name("far_type")
                                .long("far_type")
                                .takes_value(true)
                                .default_value("default")
                                .help("Archive container [fst|stlist|sttable|default]"),
                        )
                        .arg(
                            Arg::with_name("entry_type")
                                .long("entry_type")
                                .takes_value(true)
                                .default_value("line")
                                .help("What one archive entry is [line|file]"),
                        )
                        .arg(
                            Arg::with_name("token_type")
                                .long("token_type")
                                .takes_value(true)
                                .default_value("byte")
                                .help("How text is tokenized [byte|utf8|symbol]"),
                        ),
                )
                .subcommand(
                    SubCommand::with_name("list")
                        .about("Lists the keys of an archive")
                        .arg(Arg::with_name("in.far").required(true).multiple(true)),
                )
                .subcommand(
                    SubCommand::with_name("extract")
                        .about("Extracts machines from an archive into FST files")
                        .arg(Arg::with_name("in.far").required(true).multiple(true))
                        .arg(
                            Arg::with_name("begin_key")
                                .long("begin_key")
                                .takes_value(true)
                                .help("First key to extract"),
                        )
                        .arg(
                            Arg::with_name("end_key")
                                .long("end_key")
                                .takes_value(true)
                                .help("Last key to extract"),
                        )
                        .arg(
                            Arg::with_name("outdir")
                                .long("outdir")
                                .takes_value(true)
                                .default_value(".")
                                .help("Directory receiving the <key>.fst files"),
                        ),
                )
                .subcommand(
                    SubCommand::with_name("print")
                        .about("Prints the strings held in an archive of string FSTs")
                        .arg(Arg::with_name("in.far").required(true).multiple(true))
                        .arg(
                            Arg::with_name("token_type")
                                .long("token_type")
                                .takes_value(true)
                                .default_value("byte")
                                .help("How labels map back to text [byte|utf8|symbol]"),
                        ),
                ),
        );

    let matches = app.get_matches();
    let config = parse_config(&matches)?;

    match matches.subcommand() {
        ("info", Some(m)) => info_cli(m.value_of("in.fst").unwrap()),
        ("convert", Some(m)) => convert_cli(
            m.value_of("in.fst").unwrap(),
            m.value_of("out.fst").unwrap(),
            m.value_of("arc_type").unwrap(),
            m.value_of("compactor"),
            &config,
        ),
        ("far", Some(far_matches)) => match far_matches.subcommand() {
            ("create", Some(m)) => far_create_cli(
                m.value_of("out.far").unwrap(),
                &m.values_of("in.txt").unwrap().collect::<Vec<_>>(),
                m.value_of("far_type").unwrap(),
                m.value_of("entry_type").unwrap(),
                m.value_of("token_type").unwrap(),
            ),
            ("list", Some(m)) => {
                far_list_cli(&m.values_of("in.far").unwrap().collect::<Vec<_>>())
            }
            ("extract", Some(m)) => far_extract_cli(
                &m.values_of("in.far").unwrap().collect::<Vec<_>>(),
                m.value_of("begin_key"),
                m.value_of("end_key"),
                m.value_of("outdir").unwrap(),
            ),
            ("print", Some(m)) => far_print_cli(
                &m.values_of("in.far").unwrap().collect::<Vec<_>>(),
                m.value_of("token_type").unwrap(),
            ),
            _ => unreachable!(),
        },
        _ => unreachable!(),
    }
}
