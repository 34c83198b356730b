use std::fs::{read, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use anyhow::{bail, format_err, Context, Result};

use crate::fst_traits::SerializableFst;
use crate::parsers::bin_fst::utils_serialization::{
    parse_bin_i32, parse_bin_i64, parse_bin_string, write_bin_i32, write_bin_i64,
    write_bin_string,
};
use crate::semirings::SerializableSemiring;

/// Magic number introducing a streamable-list archive.
pub const STLIST_MAGIC_NUMBER: i32 = 0x3cb9_b4b8;

/// Streamable-list archive writer: entries are appended in any key order and
/// no index is kept, so the output can go to a file or straight to stdout.
///
/// Layout: magic, then concatenated `(key, fst-length, fst-bytes)` entries.
pub struct STListWriter<W: SerializableSemiring> {
    writer: Box<dyn Write>,
    w: PhantomData<W>,
}

impl<W: SerializableSemiring> STListWriter<W> {
    /// `-` means stdout.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer: Box<dyn Write> = if path.as_ref() == Path::new("-") {
            Box::new(std::io::stdout())
        } else {
            let file = File::create(path.as_ref())
                .with_context(|| format_err!("Can't create {:?}", path.as_ref()))?;
            Box::new(BufWriter::new(file))
        };
        let mut writer = writer;
        write_bin_i32(&mut writer, STLIST_MAGIC_NUMBER)?;
        Ok(Self {
            writer,
            w: PhantomData,
        })
    }

    pub fn add<F: SerializableFst<W>>(&mut self, key: &str, fst: &F) -> Result<()> {
        let mut fst_bytes = Vec::new();
        fst.store(&mut fst_bytes)?;
        write_bin_string(&mut self.writer, key)?;
        write_bin_i64(&mut self.writer, fst_bytes.len() as i64)?;
        self.writer.write_all(&fst_bytes)?;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Streamable-list archive reader. Sequential scan only; `find` is a linear
/// search from the beginning.
pub struct STListReader<W: SerializableSemiring, F: SerializableFst<W>> {
    data: Vec<u8>,
    // (key, fst_offset, fst_len) per entry, in file order.
    entries: Vec<(String, usize, usize)>,
    pos: usize,
    w: PhantomData<(W, F)>,
}

impl<W: SerializableSemiring, F: SerializableFst<W>> STListReader<W, F> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = read(path.as_ref())
            .with_context(|| format_err!("Can't open {:?}", path.as_ref()))?;
        let (mut i, magic) = parse_bin_i32(&data)
            .map_err(|e| format_err!("Error while reading magic : {:?}", e))?;
        if magic != STLIST_MAGIC_NUMBER {
            bail!("Wrong magic number for a streamable list : {:#x}", magic);
        }

        let mut entries = vec![];
        while !i.is_empty() {
            let (rest, key) = parse_bin_string(i)
                .map_err(|e| format_err!("Error while reading entry key : {:?}", e))?;
            let (rest, fst_len) = parse_bin_i64(rest)
                .map_err(|e| format_err!("Error while reading entry length : {:?}", e))?;
            let fst_len = fst_len as usize;
            let offset = data.len() - rest.len();
            if rest.len() < fst_len {
                bail!("Truncated streamable list entry {:?}", key);
            }
            entries.push((key, offset, fst_len));
            i = &rest[fst_len..];
        }

        Ok(Self {
            data,
            entries,
            pos: 0,
            w: PhantomData,
        })
    }

    pub fn done(&self) -> bool {
        self.pos >= self.entries.len()
    }

    pub fn next(&mut self) {
        self.pos += 1;
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn get_key(&self) -> &str {
        &self.entries[self.pos].0
    }

    pub fn get_fst(&self) -> Result<F> {
        let (_, offset, fst_len) = self.entries[self.pos];
        F::load(&self.data[offset..offset + fst_len])
    }

    /// Linear forward seek from the beginning of the list.
    pub fn find(&mut self, key: &str) -> bool {
        match self.entries.iter().position(|(k, _, _)| k == key) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::utils::acceptor;

    #[test]
    fn test_stlist_accepts_any_key_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("list.far");
        let fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::one());

        let mut writer = STListWriter::<TropicalWeight>::create(&path)?;
        writer.add("b", &fst)?;
        writer.add("a", &fst)?;
        writer.add("c", &fst)?;
        writer.close()?;

        let mut reader = STListReader::<TropicalWeight, VectorFst<TropicalWeight>>::open(&path)?;
        let mut keys = vec![];
        while !reader.done() {
            keys.push(reader.get_key().to_string());
            reader.next();
        }
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert!(reader.find("a"));
        assert_eq!(reader.get_fst()?, fst);
        Ok(())
    }
}
