use std::fs::{read, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use anyhow::{bail, format_err, Context, Result};
use log::debug;

use crate::parsers::bin_fst::utils_serialization::{
    parse_bin_i32, parse_bin_i64, parse_bin_string, write_bin_i32, write_bin_i64,
    write_bin_string,
};
use crate::fst_traits::SerializableFst;
use crate::semirings::SerializableSemiring;

/// Magic number introducing a sorted-table archive.
pub const STTABLE_MAGIC_NUMBER: i32 = 0x71a8_c0e6;

/// Sorted-table archive writer. Keys must arrive in strictly increasing
/// byte order; `close` writes the tail index enabling binary-search lookup.
///
/// Layout: magic, then the concatenated `(key, fst-bytes)` entries, then the
/// index `(key, entry-offset)*`, then the index offset as a trailing i64.
pub struct STTableWriter<W: SerializableSemiring> {
    writer: BufWriter<File>,
    position: u64,
    index: Vec<(String, u64)>,
    w: PhantomData<W>,
}

impl<W: SerializableSemiring> STTableWriter<W> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())
            .with_context(|| format_err!("Can't create {:?}", path.as_ref()))?;
        let mut writer = BufWriter::new(file);
        write_bin_i32(&mut writer, STTABLE_MAGIC_NUMBER)?;
        Ok(Self {
            writer,
            position: 4,
            index: vec![],
            w: PhantomData,
        })
    }

    pub fn add<F: SerializableFst<W>>(&mut self, key: &str, fst: &F) -> Result<()> {
        if let Some((last_key, _)) = self.index.last() {
            if key.as_bytes() <= last_key.as_bytes() {
                bail!(
                    "Out-of-order key {:?} added after {:?} in a sorted table",
                    key,
                    last_key
                );
            }
        }
        self.index.push((key.to_string(), self.position));

        let mut entry = Vec::new();
        write_bin_string(&mut entry, key)?;
        fst.store(&mut entry)?;
        self.writer.write_all(&entry)?;
        self.position += entry.len() as u64;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        let index_offset = self.position;
        for (key, offset) in &self.index {
            write_bin_string(&mut self.writer, key)?;
            write_bin_i64(&mut self.writer, *offset as i64)?;
        }
        write_bin_i64(&mut self.writer, index_offset as i64)?;
        self.writer.flush()?;
        debug!("Sorted table closed with {} entries", self.index.len());
        Ok(())
    }
}

/// Sorted-table archive reader with random access through the tail index.
pub struct STTableReader<W: SerializableSemiring, F: SerializableFst<W>> {
    data: Vec<u8>,
    index: Vec<(String, u64)>,
    pos: usize,
    w: PhantomData<(W, F)>,
}

impl<W: SerializableSemiring, F: SerializableFst<W>> STTableReader<W, F> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = read(path.as_ref())
            .with_context(|| format_err!("Can't open {:?}", path.as_ref()))?;
        let (_, magic) = parse_bin_i32(&data)
            .map_err(|e| format_err!("Error while reading magic : {:?}", e))?;
        if magic != STTABLE_MAGIC_NUMBER {
            bail!("Wrong magic number for a sorted table : {:#x}", magic);
        }
        if data.len() < 12 {
            bail!("Truncated sorted table");
        }
        let (_, index_offset) = parse_bin_i64(&data[data.len() - 8..])
            .map_err(|e| format_err!("Error while reading index offset : {:?}", e))?;
        let index_offset = index_offset as usize;
        if index_offset > data.len() - 8 {
            bail!("Corrupt sorted table index offset");
        }

        let mut index = vec![];
        let mut i = &data[index_offset..data.len() - 8];
        while !i.is_empty() {
            let (rest, key) = parse_bin_string(i)
                .map_err(|e| format_err!("Error while reading index key : {:?}", e))?;
            let (rest, offset) = parse_bin_i64(rest)
                .map_err(|e| format_err!("Error while reading index entry : {:?}", e))?;
            index.push((key, offset as u64));
            i = rest;
        }

        Ok(Self {
            data,
            index,
            pos: 0,
            w: PhantomData,
        })
    }

    pub fn done(&self) -> bool {
        self.pos >= self.index.len()
    }

    pub fn next(&mut self) {
        self.pos += 1;
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn get_key(&self) -> &str {
        &self.index[self.pos].0
    }

    pub fn get_fst(&self) -> Result<F> {
        let offset = self.index[self.pos].1 as usize;
        let entry = &self.data[offset..];
        let (rest, _key) = parse_bin_string(entry)
            .map_err(|e| format_err!("Error while reading entry key : {:?}", e))?;
        F::load(rest)
    }

    /// Binary search over the index; on success the reader is left
    /// positioned on `key`, so a subsequent `next` visits the keys after it.
    pub fn find(&mut self, key: &str) -> bool {
        match self
            .index
            .binary_search_by(|(k, _)| k.as_bytes().cmp(key.as_bytes()))
        {
            Ok(pos) => {
                self.pos = pos;
                true
            }
            Err(_) => false,
        }
    }

    pub fn num_entries(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::utils::acceptor;

    #[test]
    fn test_sttable_rejects_out_of_order_keys() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("table.far");
        let fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::one());

        let mut writer = STTableWriter::<TropicalWeight>::create(&path)?;
        writer.add("a", &fst)?;
        writer.add("c", &fst)?;
        assert!(writer.add("b", &fst).is_err());
        assert!(writer.add("c", &fst).is_err());
        Ok(())
    }

    #[test]
    fn test_sttable_find_positions_reader() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("table.far");
        let fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::one());

        let mut writer = STTableWriter::<TropicalWeight>::create(&path)?;
        for key in &["k1", "k2", "k3", "k4"] {
            writer.add(key, &fst)?;
        }
        writer.close()?;

        let mut reader = STTableReader::<TropicalWeight, VectorFst<TropicalWeight>>::open(&path)?;
        assert!(reader.find("k2"));
        assert_eq!(reader.get_key(), "k2");
        reader.next();
        assert_eq!(reader.get_key(), "k3");
        assert!(!reader.find("missing"));
        Ok(())
    }
}
