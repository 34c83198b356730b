use std::fs::{read, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{format_err, Context, Result};

use crate::fst_traits::ExpandedFst;
use crate::semirings::SerializableSemiring;

/// Binary serialization of an expanded wFST, in the memory-mappable format
/// described by the file header.
pub trait SerializableFst<W: SerializableSemiring>: ExpandedFst<W> {
    /// Stable string identifier of the representation, stored in the file
    /// header, e.g. `vector`.
    fn fst_type() -> String;

    /// Parses a machine from in-memory bytes.
    fn load(data: &[u8]) -> Result<Self>;

    /// Serializes the machine to a stream.
    fn store<O: Write>(&self, writer: &mut O) -> Result<()>;

    /// Reads a machine from a binary file.
    fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = read(path.as_ref())
            .with_context(|| format_err!("Can't open {:?}", path.as_ref()))?;
        Self::load(&data)
    }

    /// Writes the machine to a binary file.
    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format_err!("Can't create {:?}", path.as_ref()))?;
        let mut writer = BufWriter::new(file);
        self.store(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
