use std::io::Write;

use anyhow::Result;
use nom::multi::count;
use nom::IResult;

use crate::parsers::bin_fst::utils_serialization::{
    parse_bin_i32, parse_bin_i64, parse_bin_string, write_bin_i32, write_bin_i64,
    write_bin_string,
};
use crate::SymbolTable;

pub(crate) const SYMBOL_TABLE_MAGIC_NUMBER: i32 = 0x7eb2_fdd2;

pub(crate) fn parse_symbol_table(i: &[u8]) -> IResult<&[u8], SymbolTable> {
    let (i, magic) = parse_bin_i32(i)?;
    if magic != SYMBOL_TABLE_MAGIC_NUMBER {
        return Err(nom::Err::Error(nom::error::Error::new(
            i,
            nom::error::ErrorKind::Verify,
        )));
    }
    let (i, size) = parse_bin_i64(i)?;
    let (i, pairs) = count(parse_symbol, size as usize)(i)?;
    let mut symt = SymbolTable::empty();
    for (symbol, _label) in pairs {
        // Symbols are written in label order, so insertion re-derives labels.
        symt.add_symbol(symbol);
    }
    Ok((i, symt))
}

fn parse_symbol(i: &[u8]) -> IResult<&[u8], (String, i64)> {
    let (i, symbol) = parse_bin_string(i)?;
    let (i, label) = parse_bin_i64(i)?;
    Ok((i, (symbol, label)))
}

pub(crate) fn write_symbol_table<O: Write>(writer: &mut O, symt: &SymbolTable) -> Result<()> {
    write_bin_i32(writer, SYMBOL_TABLE_MAGIC_NUMBER)?;
    write_bin_i64(writer, symt.len() as i64)?;
    for (label, symbol) in symt.iter() {
        write_bin_string(writer, symbol)?;
        write_bin_i64(writer, i64::from(label))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_round_trip() -> Result<()> {
        let mut symt = SymbolTable::new();
        symt.add_symbol("hello");
        symt.add_symbol("world");

        let mut buffer = Vec::new();
        write_symbol_table(&mut buffer, &symt)?;
        let (rest, parsed) = parse_symbol_table(&buffer)
            .map_err(|e| anyhow::format_err!("Parse error : {:?}", e))?;
        assert!(rest.is_empty());
        assert_eq!(parsed, symt);
        Ok(())
    }
}
