use std::io::Write;

use anyhow::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use nom::bytes::complete::take;
use nom::number::complete::{le_i32, le_i64, le_u64};
use nom::IResult;

pub(crate) fn write_bin_i32<O: Write>(writer: &mut O, value: i32) -> Result<()> {
    writer.write_i32::<LittleEndian>(value)?;
    Ok(())
}

pub(crate) fn write_bin_i64<O: Write>(writer: &mut O, value: i64) -> Result<()> {
    writer.write_i64::<LittleEndian>(value)?;
    Ok(())
}

pub(crate) fn write_bin_u64<O: Write>(writer: &mut O, value: u64) -> Result<()> {
    writer.write_u64::<LittleEndian>(value)?;
    Ok(())
}

/// 32-bit length followed by the raw bytes.
pub(crate) fn write_bin_string<O: Write>(writer: &mut O, s: &str) -> Result<()> {
    writer.write_i32::<LittleEndian>(s.len() as i32)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

pub(crate) fn parse_bin_i32(i: &[u8]) -> IResult<&[u8], i32> {
    le_i32(i)
}

pub(crate) fn parse_bin_i64(i: &[u8]) -> IResult<&[u8], i64> {
    le_i64(i)
}

pub(crate) fn parse_bin_u64(i: &[u8]) -> IResult<&[u8], u64> {
    le_u64(i)
}

pub(crate) fn parse_bin_string(i: &[u8]) -> IResult<&[u8], String> {
    let (i, n) = le_i32(i)?;
    let (i, bytes) = take(n as usize)(i)?;
    let s = String::from_utf8_lossy(bytes).into_owned();
    Ok((i, s))
}

/// Pads `buf` with NUL bytes until its length is a multiple of `alignment`.
pub(crate) fn pad_align(buf: &mut Vec<u8>, alignment: usize) {
    if alignment > 1 {
        while buf.len() % alignment != 0 {
            buf.push(0u8);
        }
    }
}

/// Consumes the padding preceding an aligned section. `full_len` is the total
/// input length, from which the current stream position is recovered.
pub(crate) fn skip_align(i: &[u8], full_len: usize, alignment: usize) -> IResult<&[u8], ()> {
    if alignment <= 1 {
        return Ok((i, ()));
    }
    let pos = full_len - i.len();
    let padding = (alignment - pos % alignment) % alignment;
    let (i, _) = take(padding)(i)?;
    Ok((i, ()))
}
