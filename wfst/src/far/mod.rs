//! Keyed archives of FSTs. An archive maps byte-string keys, compared
//! lexicographically, to machines. Three container layouts with different
//! random-access properties are supported.

pub use self::fst_far::{FstFarReader, FstFarWriter};
pub use self::stlist::{STListReader, STListWriter, STLIST_MAGIC_NUMBER};
pub use self::string_compiler::{EntryType, StringCompiler, StringDecompiler, TokenType};
pub use self::sttable::{STTableReader, STTableWriter, STTABLE_MAGIC_NUMBER};

mod fst_far;
mod stlist;
mod string_compiler;
mod sttable;

use std::path::Path;

use anyhow::{bail, Result};

use crate::fst_impls::VectorFst;
use crate::semirings::SerializableSemiring;

/// Container layout of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarType {
    /// Sorted table with a tail index; random access, keys must be added in
    /// strictly increasing order.
    STTable,
    /// Streamable list without an index; sequential access, any key order,
    /// writable to a pipe.
    STList,
    /// Degenerate archive holding exactly one machine, stored as a plain FST
    /// file.
    Fst,
    /// Alias for [`FarType::STTable`].
    Default,
}

impl FarType {
    pub fn parse(s: &str) -> Result<FarType> {
        match s {
            "sttable" => Ok(FarType::STTable),
            "stlist" => Ok(FarType::STList),
            "fst" => Ok(FarType::Fst),
            "default" => Ok(FarType::Default),
            _ => bail!("Unknown far type : {:?}", s),
        }
    }
}

/// Writer over any container layout.
pub enum FarWriter<W: SerializableSemiring> {
    STTable(STTableWriter<W>),
    STList(STListWriter<W>),
    Fst(FstFarWriter<W>),
}

impl<W: SerializableSemiring> FarWriter<W> {
    pub fn create<P: AsRef<Path>>(path: P, far_type: FarType) -> Result<Self> {
        match far_type {
            FarType::STTable | FarType::Default => {
                Ok(FarWriter::STTable(STTableWriter::create(path)?))
            }
            FarType::STList => Ok(FarWriter::STList(STListWriter::create(path)?)),
            FarType::Fst => Ok(FarWriter::Fst(FstFarWriter::create(path)?)),
        }
    }

    /// Appends an entry. For sorted tables the key must be strictly greater
    /// than every key already added.
    pub fn add(&mut self, key: &str, fst: &VectorFst<W>) -> Result<()> {
        match self {
            FarWriter::STTable(writer) => writer.add(key, fst),
            FarWriter::STList(writer) => writer.add(key, fst),
            FarWriter::Fst(writer) => writer.add(key, fst),
        }
    }

    /// Finalizes the archive; for sorted tables this writes the index.
    pub fn close(self) -> Result<()> {
        match self {
            FarWriter::STTable(writer) => writer.close(),
            FarWriter::STList(writer) => writer.close(),
            FarWriter::Fst(writer) => writer.close(),
        }
    }
}

enum FarSource<W: SerializableSemiring> {
    STTable(STTableReader<W, VectorFst<W>>),
    STList(STListReader<W, VectorFst<W>>),
    Fst(FstFarReader<W>),
}

impl<W: SerializableSemiring> FarSource<W> {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Ok(reader) = STTableReader::open(path) {
            return Ok(FarSource::STTable(reader));
        }
        if let Ok(reader) = STListReader::open(path) {
            return Ok(FarSource::STList(reader));
        }
        Ok(FarSource::Fst(FstFarReader::open(path)?))
    }

    fn done(&self) -> bool {
        match self {
            FarSource::STTable(r) => r.done(),
            FarSource::STList(r) => r.done(),
            FarSource::Fst(r) => r.done(),
        }
    }

    fn next(&mut self) {
        match self {
            FarSource::STTable(r) => r.next(),
            FarSource::STList(r) => r.next(),
            FarSource::Fst(r) => r.next(),
        }
    }

    fn reset(&mut self) {
        match self {
            FarSource::STTable(r) => r.reset(),
            FarSource::STList(r) => r.reset(),
            FarSource::Fst(r) => r.reset(),
        }
    }

    fn get_key(&self) -> &str {
        match self {
            FarSource::STTable(r) => r.get_key(),
            FarSource::STList(r) => r.get_key(),
            FarSource::Fst(r) => r.get_key(),
        }
    }

    fn get_fst(&self) -> Result<VectorFst<W>> {
        match self {
            FarSource::STTable(r) => r.get_fst(),
            FarSource::STList(r) => r.get_fst(),
            FarSource::Fst(r) => r.get_fst(),
        }
    }

    fn find(&mut self, key: &str) -> bool {
        match self {
            FarSource::STTable(r) => r.find(key),
            FarSource::STList(r) => r.find(key),
            FarSource::Fst(r) => r.find(key),
        }
    }
}

/// Reader over one archive or a logical concatenation of several. Iteration
/// visits each archive in turn; `find` tries each archive's own lookup.
pub struct FarReader<W: SerializableSemiring> {
    sources: Vec<FarSource<W>>,
    current: usize,
}

impl<W: SerializableSemiring> FarReader<W> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_sources(std::iter::once(path))
    }

    pub fn open_sources<P: AsRef<Path>, I: IntoIterator<Item = P>>(paths: I) -> Result<Self> {
        let mut sources = vec![];
        for path in paths {
            sources.push(FarSource::open(path)?);
        }
        if sources.is_empty() {
            bail!("An archive reader needs at least one source");
        }
        let mut reader = FarReader {
            sources,
            current: 0,
        };
        reader.skip_exhausted();
        Ok(reader)
    }

    fn skip_exhausted(&mut self) {
        while self.current < self.sources.len() && self.sources[self.current].done() {
            self.current += 1;
        }
    }

    pub fn done(&self) -> bool {
        self.current >= self.sources.len()
    }

    pub fn next(&mut self) {
        if self.done() {
            return;
        }
        self.sources[self.current].next();
        self.skip_exhausted();
    }

    pub fn reset(&mut self) {
        for source in &mut self.sources {
            source.reset();
        }
        self.current = 0;
        self.skip_exhausted();
    }

    pub fn get_key(&self) -> &str {
        self.sources[self.current].get_key()
    }

    pub fn get_fst(&self) -> Result<VectorFst<W>> {
        self.sources[self.current].get_fst()
    }

    /// Positions the reader on `key`. Returns false, leaving the position
    /// unchanged, when no archive holds it.
    pub fn find(&mut self, key: &str) -> bool {
        for idx in 0..self.sources.len() {
            if self.sources[idx].find(key) {
                self.current = idx;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::utils::acceptor;

    fn key_fst(seed: i32) -> VectorFst<TropicalWeight> {
        acceptor(&[seed, seed + 1], TropicalWeight::one())
    }

    #[test]
    fn test_far_round_trip_sttable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("archive.far");

        let mut writer = FarWriter::<TropicalWeight>::create(&path, FarType::STTable)?;
        writer.add("a", &key_fst(1))?;
        writer.add("b", &key_fst(2))?;
        writer.add("c", &key_fst(3))?;
        writer.close()?;

        let mut reader = FarReader::<TropicalWeight>::open(&path)?;
        let mut keys = vec![];
        while !reader.done() {
            keys.push(reader.get_key().to_string());
            reader.next();
        }
        assert_eq!(keys, vec!["a", "b", "c"]);

        assert!(reader.find("b"));
        assert_eq!(reader.get_fst()?, key_fst(2));
        reader.next();
        assert_eq!(reader.get_key(), "c");
        assert!(!reader.find("z"));
        Ok(())
    }

    #[test]
    fn test_far_key_range_extraction() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("archive.far");

        let mut writer = FarWriter::<TropicalWeight>::create(&path, FarType::Default)?;
        for (idx, key) in ["k1", "k2", "k3", "k4"].iter().enumerate() {
            writer.add(key, &key_fst(idx as i32))?;
        }
        writer.close()?;

        let mut reader = FarReader::<TropicalWeight>::open(&path)?;
        let mut extracted = vec![];
        while !reader.done() {
            let key = reader.get_key();
            if key >= "k2" && key <= "k3" {
                extracted.push(key.to_string());
            }
            reader.next();
        }
        assert_eq!(extracted, vec!["k2", "k3"]);
        Ok(())
    }

    #[test]
    fn test_far_concatenated_sources() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path1 = dir.path().join("one.far");
        let path2 = dir.path().join("two.far");

        let mut writer = FarWriter::<TropicalWeight>::create(&path1, FarType::STTable)?;
        writer.add("a", &key_fst(1))?;
        writer.close()?;
        let mut writer = FarWriter::<TropicalWeight>::create(&path2, FarType::STList)?;
        writer.add("b", &key_fst(2))?;
        writer.close()?;

        let mut reader = FarReader::<TropicalWeight>::open_sources(vec![&path1, &path2])?;
        let mut keys = vec![];
        while !reader.done() {
            keys.push(reader.get_key().to_string());
            reader.next();
        }
        assert_eq!(keys, vec!["a", "b"]);
        assert!(reader.find("b"));
        assert_eq!(reader.get_fst()?, key_fst(2));
        Ok(())
    }
}
