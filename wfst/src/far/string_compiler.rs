use std::sync::Arc;

use anyhow::{bail, format_err, Result};

use crate::fst_impls::VectorFst;
use crate::fst_traits::{CoreFst, ExpandedFst, Fst};
use crate::semirings::Semiring;
use crate::trs::Trs;
use crate::utils::acceptor;
use crate::{Label, SymbolTable, EPS_LABEL};

/// How text input is cut into archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// One input line becomes one string machine.
    Line,
    /// The whole file becomes one string machine.
    File,
}

impl EntryType {
    pub fn parse(s: &str) -> Result<EntryType> {
        match s {
            "line" => Ok(EntryType::Line),
            "file" => Ok(EntryType::File),
            _ => bail!("Unknown entry type : {:?}", s),
        }
    }
}

/// How text is tokenized into labels.
#[derive(Debug, Clone)]
pub enum TokenType {
    /// One byte per label.
    Byte,
    /// One unicode scalar per label.
    Utf8,
    /// Whitespace-separated tokens looked up in a symbol table.
    Symbol(Arc<SymbolTable>),
}

impl TokenType {
    pub fn parse(s: &str, symt: Option<Arc<SymbolTable>>) -> Result<TokenType> {
        match s {
            "byte" => Ok(TokenType::Byte),
            "utf8" => Ok(TokenType::Utf8),
            "symbol" => {
                let symt =
                    symt.ok_or_else(|| format_err!("Symbol tokens require a symbol table"))?;
                Ok(TokenType::Symbol(symt))
            }
            _ => bail!("Unknown token type : {:?}", s),
        }
    }
}

/// Compiles text into linear string acceptors, one label per token.
#[derive(Debug, Clone)]
pub struct StringCompiler<W: Semiring> {
    token_type: TokenType,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring> StringCompiler<W> {
    pub fn new(token_type: TokenType) -> Self {
        Self {
            token_type,
            w: std::marker::PhantomData,
        }
    }

    pub fn to_labels(&self, text: &str) -> Result<Vec<Label>> {
        match &self.token_type {
            TokenType::Byte => Ok(text.bytes().map(Label::from).collect()),
            TokenType::Utf8 => Ok(text.chars().map(|c| c as Label).collect()),
            TokenType::Symbol(symt) => text
                .split_whitespace()
                .map(|token| {
                    symt.get_label(token)
                        .ok_or_else(|| format_err!("Unknown symbol : {:?}", token))
                })
                .collect(),
        }
    }

    pub fn compile(&self, text: &str) -> Result<VectorFst<W>> {
        let labels = self.to_labels(text)?;
        let mut fst = acceptor(&labels, W::one());
        if let TokenType::Symbol(symt) = &self.token_type {
            fst.set_input_symbols(Arc::clone(symt));
            fst.set_output_symbols(Arc::clone(symt));
        }
        Ok(fst)
    }
}

/// Inverse of [`StringCompiler`] for linear machines: walks the single path
/// and turns the input labels back into text.
#[derive(Debug, Clone)]
pub struct StringDecompiler {
    token_type: TokenType,
}

impl StringDecompiler {
    pub fn new(token_type: TokenType) -> Self {
        Self { token_type }
    }

    pub fn decompile<W: Semiring, F: ExpandedFst<W>>(&self, fst: &F) -> Result<String> {
        let mut labels = vec![];
        let mut state = match fst.start() {
            Some(s) => s,
            None => bail!("Can't extract a string from an empty machine"),
        };
        let mut steps = 0;
        loop {
            steps += 1;
            if steps > fst.num_states() + 1 {
                bail!("Can't extract a string from a cyclic machine");
            }
            let trs = fst.get_trs(state)?;
            match trs.len() {
                0 => break,
                1 => {
                    let tr = &trs.trs()[0];
                    if tr.ilabel != EPS_LABEL {
                        labels.push(tr.ilabel);
                    }
                    state = tr.nextstate;
                }
                _ => bail!("Can't extract a string from a non-linear machine"),
            }
        }

        match &self.token_type {
            TokenType::Byte => {
                let bytes: Vec<u8> = labels.iter().map(|l| *l as u8).collect();
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            TokenType::Utf8 => labels
                .iter()
                .map(|l| {
                    std::char::from_u32(*l as u32)
                        .ok_or_else(|| format_err!("Invalid unicode scalar : {:?}", l))
                })
                .collect(),
            TokenType::Symbol(symt) => {
                let tokens: Result<Vec<&str>> = labels
                    .iter()
                    .map(|l| {
                        symt.get_symbol(*l)
                            .ok_or_else(|| format_err!("Unknown label : {:?}", l))
                    })
                    .collect();
                Ok(tokens?.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_compile_decompile_byte() -> Result<()> {
        let compiler = StringCompiler::<TropicalWeight>::new(TokenType::Byte);
        let fst = compiler.compile("hi")?;
        assert_eq!(fst.num_states(), 3);
        let decompiler = StringDecompiler::new(TokenType::Byte);
        assert_eq!(decompiler.decompile(&fst)?, "hi");
        Ok(())
    }

    #[test]
    fn test_compile_symbol_requires_known_tokens() -> Result<()> {
        let mut symt = SymbolTable::new();
        symt.add_symbol("hello");
        let compiler =
            StringCompiler::<TropicalWeight>::new(TokenType::Symbol(Arc::new(symt)));
        assert!(compiler.compile("hello").is_ok());
        assert!(compiler.compile("world").is_err());
        Ok(())
    }

    #[test]
    fn test_compile_utf8() -> Result<()> {
        let compiler = StringCompiler::<TropicalWeight>::new(TokenType::Utf8);
        let fst = compiler.compile("aé")?;
        let decompiler = StringDecompiler::new(TokenType::Utf8);
        assert_eq!(decompiler.decompile(&fst)?, "aé");
        Ok(())
    }
}
