use std::io::Write;

use anyhow::{bail, Result};
use bitflags::bitflags;
use nom::IResult;

use crate::parsers::bin_fst::utils_serialization::{
    parse_bin_i32, parse_bin_i64, parse_bin_string, parse_bin_u64, write_bin_i32, write_bin_i64,
    write_bin_string, write_bin_u64,
};

/// Magic number introducing every FST binary file.
pub const FST_MAGIC_NUMBER: i32 = 0x7eb2_fdd4;

bitflags! {
    /// Header flags.
    pub struct FstFlags: u32 {
        const HAS_ISYMBOLS = 0b1;
        const HAS_OSYMBOLS = 0b10;
        /// The body sections are NUL-padded so that memory-mappable arrays
        /// start at an aligned offset.
        const IS_ALIGNED = 0b100;
    }
}

/// Fixed-layout header at the beginning of every FST file: magic, type
/// strings, version, flags, static properties, start state and counts.
/// Integers are little-endian; strings are length-prefixed.
#[derive(Debug, Clone, PartialEq)]
pub struct FstHeader {
    pub fst_type: String,
    pub tr_type: String,
    pub version: i32,
    pub flags: FstFlags,
    pub properties: u64,
    pub start: i64,
    pub num_states: i64,
    pub num_trs: i64,
}

impl FstHeader {
    pub fn parse(i: &[u8]) -> IResult<&[u8], FstHeader> {
        let (i, magic) = parse_bin_i32(i)?;
        if magic != FST_MAGIC_NUMBER {
            return Err(nom::Err::Error(nom::error::Error::new(
                i,
                nom::error::ErrorKind::Verify,
            )));
        }
        let (i, fst_type) = parse_bin_string(i)?;
        let (i, tr_type) = parse_bin_string(i)?;
        let (i, version) = parse_bin_i32(i)?;
        let (i, flags) = parse_bin_i32(i)?;
        let (i, properties) = parse_bin_u64(i)?;
        let (i, start) = parse_bin_i64(i)?;
        let (i, num_states) = parse_bin_i64(i)?;
        let (i, num_trs) = parse_bin_i64(i)?;
        Ok((
            i,
            FstHeader {
                fst_type,
                tr_type,
                version,
                flags: FstFlags::from_bits_truncate(flags as u32),
                properties,
                start,
                num_states,
                num_trs,
            },
        ))
    }

    pub fn write<O: Write>(&self, writer: &mut O) -> Result<()> {
        write_bin_i32(writer, FST_MAGIC_NUMBER)?;
        write_bin_string(writer, &self.fst_type)?;
        write_bin_string(writer, &self.tr_type)?;
        write_bin_i32(writer, self.version)?;
        write_bin_i32(writer, self.flags.bits() as i32)?;
        write_bin_u64(writer, self.properties)?;
        write_bin_i64(writer, self.start)?;
        write_bin_i64(writer, self.num_states)?;
        write_bin_i64(writer, self.num_trs)?;
        Ok(())
    }

    /// Checks type strings and version against what the caller supports.
    /// Versions are opaque per fst_type; unknown ones are refused.
    pub fn validate(&self, fst_type: &str, min_version: i32, tr_type: &str) -> Result<()> {
        if self.fst_type != fst_type {
            bail!(
                "Wrong fst_type : expected {}, found {}",
                fst_type,
                self.fst_type
            );
        }
        if self.tr_type != tr_type {
            bail!(
                "Wrong tr_type : expected {}, found {}",
                tr_type,
                self.tr_type
            );
        }
        if self.version < min_version {
            bail!(
                "Unsupported version {} for fst_type {} (minimum {})",
                self.version,
                fst_type,
                min_version
            );
        }
        Ok(())
    }
}
