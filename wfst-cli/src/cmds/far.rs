use std::fs::read_to_string;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Result};
use log::debug;

use wfst::far::{EntryType, FarReader, FarType, FarWriter, StringCompiler, StringDecompiler, TokenType};
use wfst::fst_traits::{ExpandedFst, SerializableFst};
use wfst::semirings::TropicalWeight;

/// `-` means stdin.
fn read_text_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(read_to_string(path)?)
    }
}

fn parse_token_type(token_type: &str) -> Result<TokenType> {
    match token_type {
        // Symbol tokens need a symbol table, which these tools don't load.
        "symbol" => bail!("Symbol tokens are not supported by the archive tools"),
        other => TokenType::parse(other, None),
    }
}

pub fn far_create_cli(
    path_out: &str,
    paths_in: &[&str],
    far_type: &str,
    entry_type: &str,
    token_type: &str,
) -> Result<()> {
    let far_type = FarType::parse(far_type)?;
    let entry_type = EntryType::parse(entry_type)?;
    let token_type = parse_token_type(token_type)?;
    let compiler = StringCompiler::<TropicalWeight>::new(token_type);

    let mut writer = FarWriter::<TropicalWeight>::create(path_out, far_type)?;
    match entry_type {
        EntryType::Line => {
            let mut entry = 1usize;
            for path_in in paths_in {
                let content = read_text_input(path_in)?;
                for line in content.lines() {
                    let key = format!("{:08}", entry);
                    writer.add(&key, &compiler.compile(line)?)?;
                    entry += 1;
                }
            }
            debug!("Compiled {} entries into {}", entry - 1, path_out);
        }
        EntryType::File => {
            for path_in in paths_in {
                let content = read_text_input(path_in)?;
                let key = Path::new(path_in)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| (*path_in).to_string());
                writer.add(&key, &compiler.compile(content.trim_end_matches('\n'))?)?;
            }
        }
    }
    writer.close()
}

pub fn far_list_cli(paths_in: &[&str]) -> Result<()> {
    let mut reader = FarReader::<TropicalWeight>::open_sources(paths_in.iter())?;
    while !reader.done() {
        let fst = reader.get_fst()?;
        println!("{}\t{}", reader.get_key(), fst.num_states());
        reader.next();
    }
    Ok(())
}

fn in_range(key: &str, begin_key: Option<&str>, end_key: Option<&str>) -> bool {
    if let Some(begin) = begin_key {
        if key < begin {
            return false;
        }
    }
    if let Some(end) = end_key {
        if key > end {
            return false;
        }
    }
    true
}

pub fn far_extract_cli(
    paths_in: &[&str],
    begin_key: Option<&str>,
    end_key: Option<&str>,
    outdir: &str,
) -> Result<()> {
    let mut reader = FarReader::<TropicalWeight>::open_sources(paths_in.iter())?;
    while !reader.done() {
        let key = reader.get_key().to_string();
        if in_range(&key, begin_key, end_key) {
            let path_out = Path::new(outdir).join(format!("{}.fst", key));
            debug!("Extracting {} to {:?}", key, path_out);
            reader.get_fst()?.write(path_out)?;
        }
        reader.next();
    }
    Ok(())
}

pub fn far_print_cli(paths_in: &[&str], token_type: &str) -> Result<()> {
    let token_type = parse_token_type(token_type)?;
    let decompiler = StringDecompiler::new(token_type);
    let mut reader = FarReader::<TropicalWeight>::open_sources(paths_in.iter())?;
    while !reader.done() {
        let fst = reader.get_fst()?;
        println!("{}\t{}", reader.get_key(), decompiler.decompile(&fst)?);
        reader.next();
    }
    Ok(())
}
