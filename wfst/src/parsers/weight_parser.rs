//! Text serialization of weights, including the nested composite discipline
//! with configurable separator and bracket pair.

use std::fmt;

use anyhow::{bail, Result};
use nom::IResult;

use crate::config::FstConfig;
use crate::semirings::StringWeightVariant;
use crate::Label;

fn text_error(i: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(i, nom::error::ErrorKind::Verify))
}

/// Parses a float, accepting the `Infinity` / `-Infinity` / `BadNumber`
/// spellings used by the display side.
pub fn parse_float_text(i: &str) -> IResult<&str, f32> {
    if let Some(rest) = i.strip_prefix("Infinity") {
        return Ok((rest, f32::INFINITY));
    }
    if let Some(rest) = i.strip_prefix("-Infinity") {
        return Ok((rest, f32::NEG_INFINITY));
    }
    if let Some(rest) = i.strip_prefix("BadNumber") {
        return Ok((rest, f32::NAN));
    }
    let end = i
        .char_indices()
        .take_while(|(idx, c)| {
            c.is_ascii_digit()
                || *c == '.'
                || *c == '-'
                || *c == '+'
                || *c == 'e'
                || *c == 'E'
                || (*c == '-' && *idx == 0)
        })
        .map(|(idx, c)| idx + c.len_utf8())
        .last()
        .ok_or_else(|| text_error(i))?;
    let value: f32 = i[..end].parse().map_err(|_| text_error(i))?;
    Ok((&i[end..], value))
}

pub fn parse_i32_text(i: &str) -> IResult<&str, i32> {
    let end = i
        .char_indices()
        .take_while(|(idx, c)| c.is_ascii_digit() || (*c == '-' && *idx == 0))
        .map(|(idx, c)| idx + c.len_utf8())
        .last()
        .ok_or_else(|| text_error(i))?;
    let value: i32 = i[..end].parse().map_err(|_| text_error(i))?;
    Ok((&i[end..], value))
}

/// Parses a string-weight value: `Infinity`, `Epsilon` or labels joined by
/// underscores.
pub fn parse_string_variant_text(i: &str) -> IResult<&str, StringWeightVariant> {
    if let Some(rest) = i.strip_prefix("Infinity") {
        return Ok((rest, StringWeightVariant::Infinity));
    }
    if let Some(rest) = i.strip_prefix("Epsilon") {
        return Ok((rest, StringWeightVariant::Labels(vec![])));
    }
    let mut labels: Vec<Label> = vec![];
    let mut rest = i;
    loop {
        let (r, label) = parse_i32_text(rest)?;
        labels.push(label);
        rest = r;
        match rest.strip_prefix('_') {
            Some(r) => rest = r,
            None => break,
        }
    }
    Ok((rest, StringWeightVariant::Labels(labels)))
}

/// Expects `c` at the beginning of `i` and returns the rest.
pub fn expect_char(i: &str, c: char) -> Result<&str, nom::Err<nom::error::Error<&str>>> {
    i.strip_prefix(c).ok_or_else(|| text_error(i))
}

/// Parses two weights separated by `sep`.
pub fn parse_pair_text<W1, W2>(i: &str, sep: char) -> IResult<&str, (W1, W2)>
where
    W1: crate::semirings::SerializableSemiring,
    W2: crate::semirings::SerializableSemiring,
{
    let (i, w1) = W1::parse_text(i)?;
    let i = expect_char(i, sep)?;
    let (i, w2) = W2::parse_text(i)?;
    Ok((i, (w1, w2)))
}

/// Streams the components of a composite weight as text, inserting the
/// configured separator and optional brackets.
pub struct CompositeWeightWriter<'a, O: fmt::Write> {
    out: &'a mut O,
    separator: char,
    parentheses: Option<(char, char)>,
    elements: usize,
}

impl<'a, O: fmt::Write> CompositeWeightWriter<'a, O> {
    pub fn new(out: &'a mut O, config: &FstConfig) -> Self {
        Self {
            out,
            separator: config.weight_separator,
            parentheses: config.weight_parentheses,
            elements: 0,
        }
    }

    pub fn write_begin(&mut self) -> Result<()> {
        self.elements = 0;
        if let Some((open, _)) = self.parentheses {
            self.out.write_char(open)?;
        }
        Ok(())
    }

    pub fn write_element<T: fmt::Display>(&mut self, element: &T) -> Result<()> {
        if self.elements > 0 {
            self.out.write_char(self.separator)?;
        }
        write!(self.out, "{}", element)?;
        self.elements += 1;
        Ok(())
    }

    pub fn write_end(&mut self) -> Result<()> {
        if let Some((_, close)) = self.parentheses {
            self.out.write_char(close)?;
        }
        Ok(())
    }
}

/// Splits a composite weight text back into its components. Nested
/// composites raise the bracket depth by one per level and require a bracket
/// pair to be configured.
pub struct CompositeWeightReader<'a> {
    input: &'a str,
    separator: char,
    parentheses: Option<(char, char)>,
    depth: usize,
}

impl<'a> CompositeWeightReader<'a> {
    pub fn new(input: &'a str, config: &FstConfig) -> Self {
        Self::with_depth(input, config, 0)
    }

    pub fn with_depth(input: &'a str, config: &FstConfig, depth: usize) -> Self {
        Self {
            input,
            separator: config.weight_separator,
            parentheses: config.weight_parentheses,
            depth,
        }
    }

    /// Skips leading whitespace and consumes the open bracket when brackets
    /// are configured. Nested composites without brackets are refused since
    /// their text form is ambiguous.
    pub fn read_begin(&mut self) -> Result<()> {
        self.input = self.input.trim_start();
        match self.parentheses {
            Some((open, _)) => {
                self.input = self
                    .input
                    .strip_prefix(open)
                    .ok_or_else(|| anyhow::format_err!("Expected open bracket {:?}", open))?;
            }
            None => {
                if self.depth > 0 {
                    bail!("Nested composite weights require bracket characters to be configured");
                }
            }
        }
        Ok(())
    }

    /// Returns the next separator-bounded component, skipping separators
    /// enclosed in nested brackets.
    pub fn read_element(&mut self) -> Result<&'a str> {
        let mut nesting = 0usize;
        for (idx, c) in self.input.char_indices() {
            if let Some((open, close)) = self.parentheses {
                if c == open {
                    nesting += 1;
                    continue;
                }
                if c == close {
                    if nesting == 0 {
                        let (element, rest) = self.input.split_at(idx);
                        self.input = rest;
                        return Ok(element);
                    }
                    nesting -= 1;
                    continue;
                }
            }
            if c == self.separator && nesting == 0 {
                let element = &self.input[..idx];
                self.input = &self.input[idx + c.len_utf8()..];
                return Ok(element);
            }
        }
        let element = self.input;
        self.input = "";
        Ok(element)
    }

    /// Consumes the close bracket when brackets are configured, and requires
    /// the remaining input to be empty or whitespace.
    pub fn read_end(&mut self) -> Result<()> {
        if let Some((_, close)) = self.parentheses {
            self.input = self
                .input
                .strip_prefix(close)
                .ok_or_else(|| anyhow::format_err!("Expected close bracket {:?}", close))?;
        }
        if self.depth == 0 && !self.input.trim_start().is_empty() {
            bail!("Trailing characters after composite weight : {:?}", self.input);
        }
        Ok(())
    }

    /// Remaining unread input; nested readers hand it back to their parent.
    pub fn rest(&self) -> &'a str {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_writer_reader_round_trip() -> Result<()> {
        let config = FstConfig {
            weight_parentheses: Some(('(', ')')),
            ..FstConfig::default()
        };

        let mut out = String::new();
        let mut writer = CompositeWeightWriter::new(&mut out, &config);
        writer.write_begin()?;
        writer.write_element(&1.5)?;
        writer.write_element(&"(2,3)")?;
        writer.write_end()?;
        assert_eq!(out, "(1.5,(2,3))");

        let mut reader = CompositeWeightReader::new(&out, &config);
        reader.read_begin()?;
        assert_eq!(reader.read_element()?, "1.5");
        assert_eq!(reader.read_element()?, "(2,3)");
        reader.read_end()?;
        Ok(())
    }

    #[test]
    fn test_composite_reader_nested_without_brackets_fails() {
        let config = FstConfig::default();
        let mut reader = CompositeWeightReader::with_depth("1,2", &config, 1);
        assert!(reader.read_begin().is_err());
    }

    #[test]
    fn test_parse_float_text_specials() {
        assert_eq!(parse_float_text("Infinity").unwrap().1, f32::INFINITY);
        assert_eq!(parse_float_text("-3.5,rest").unwrap(), (",rest", -3.5));
    }
}
