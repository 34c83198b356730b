use std::fs::File;
use std::path::Path;

use anyhow::{format_err, Context, Result};
use memmap2::Mmap;

/// Owns a contiguous byte range backing a read-only machine. The address is
/// stable for the whole lifetime of the region; dropping it releases the
/// heap buffer or the OS mapping. Regions are shared between machines through
/// reference counting.
#[derive(Debug)]
pub enum MappedRegion {
    /// Heap-allocated copy of the bytes.
    Heap(Vec<u8>),
    /// Read-only OS memory mapping of a file, shareable across processes.
    Mmap(Mmap),
    /// Bytes owned by someone else; nothing released on drop.
    Borrowed(&'static [u8]),
}

impl MappedRegion {
    pub fn from_vec(data: Vec<u8>) -> Self {
        MappedRegion::Heap(data)
    }

    /// Maps a whole file read-only.
    pub fn map_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format_err!("Can't open {:?}", path.as_ref()))?;
        // Safety: the mapping is read-only and the file is not truncated by
        // this process while mapped.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format_err!("Can't map {:?}", path.as_ref()))?;
        Ok(MappedRegion::Mmap(mmap))
    }

    pub fn borrowed(data: &'static [u8]) -> Self {
        MappedRegion::Borrowed(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            MappedRegion::Heap(v) => v.as_slice(),
            MappedRegion::Mmap(m) => &m[..],
            MappedRegion::Borrowed(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}
