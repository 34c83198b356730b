use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::fst_impls::VectorFst;
use crate::fst_traits::SerializableFst;
use crate::semirings::SerializableSemiring;

/// Degenerate archive: exactly one machine, written as a plain FST file. The
/// key is the file's basename without extension.
pub struct FstFarWriter<W: SerializableSemiring> {
    path: PathBuf,
    written: bool,
    w: PhantomData<W>,
}

impl<W: SerializableSemiring> FstFarWriter<W> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            written: false,
            w: PhantomData,
        })
    }

    pub fn add<F: SerializableFst<W>>(&mut self, _key: &str, fst: &F) -> Result<()> {
        if self.written {
            bail!("An fst archive holds exactly one machine");
        }
        fst.write(&self.path)?;
        self.written = true;
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        Ok(())
    }
}

/// Reader counterpart of [`FstFarWriter`].
pub struct FstFarReader<W: SerializableSemiring> {
    key: String,
    fst: VectorFst<W>,
    done: bool,
}

impl<W: SerializableSemiring> FstFarReader<W> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let fst = VectorFst::<W>::read(path)?;
        let key = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            key,
            fst,
            done: false,
        })
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn next(&mut self) {
        self.done = true;
    }

    pub fn reset(&mut self) {
        self.done = false;
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_fst(&self) -> Result<VectorFst<W>> {
        Ok(self.fst.clone())
    }

    pub fn find(&mut self, key: &str) -> bool {
        if key == self.key {
            self.done = false;
            true
        } else {
            false
        }
    }
}
