use std::io::Write;
use std::marker::PhantomData;

use anyhow::{bail, Result};
use nom::number::complete::le_i32;
use nom::IResult;

use crate::fst_impls::compact_fst::compactor::{superfinal_tr, weight_byte_len};
use crate::fst_impls::compact_fst::{Compactor, ExpandFlags};
use crate::fst_properties::FstProperties;
use crate::parsers::bin_fst::utils_serialization::write_bin_i32;
use crate::semirings::{Semiring, SerializableSemiring};
use crate::tr::Tr;
use crate::{Label, StateId, NO_LABEL, NO_STATE_ID};

/// Unweighted acceptor string machine: one label per state, destination is
/// always the next state.
#[derive(Debug, Clone, Default)]
pub struct StringCompactor<W> {
    w: PhantomData<W>,
}

impl<W> StringCompactor<W> {
    pub fn new() -> Self {
        Self { w: PhantomData }
    }
}

impl<W: Semiring> Compactor<W> for StringCompactor<W> {
    type Element = Label;

    fn compact(&self, state: StateId, tr: &Tr<W>) -> Result<Self::Element> {
        if !tr.weight.is_one() {
            bail!("String compactor requires unweighted transitions");
        }
        if tr.nextstate == NO_STATE_ID {
            return Ok(NO_LABEL);
        }
        if tr.ilabel != tr.olabel {
            bail!("String compactor requires an acceptor");
        }
        if tr.nextstate != state + 1 {
            bail!("String compactor requires a linear machine");
        }
        Ok(tr.ilabel)
    }

    fn expand(&self, state: StateId, element: &Self::Element, _flags: ExpandFlags) -> Tr<W> {
        if *element == NO_LABEL {
            superfinal_tr(W::one())
        } else {
            Tr::new(*element, *element, W::one(), state + 1)
        }
    }

    fn size(&self) -> i32 {
        1
    }

    fn compatible(&self, props: FstProperties) -> bool {
        props.contains(FstProperties::STRING | FstProperties::ACCEPTOR | FstProperties::UNWEIGHTED)
    }

    fn properties(&self) -> FstProperties {
        FstProperties::STRING | FstProperties::ACCEPTOR | FstProperties::UNWEIGHTED
    }

    fn compactor_type() -> String {
        "string".to_string()
    }

    fn write<O: Write>(&self, _writer: &mut O) -> Result<()> {
        Ok(())
    }

    fn read(i: &[u8]) -> IResult<&[u8], Self> {
        Ok((i, Self::new()))
    }

    fn element_size(&self) -> usize {
        4
    }

    fn write_element<O: Write>(&self, element: &Self::Element, writer: &mut O) -> Result<()> {
        write_bin_i32(writer, *element)
    }

    fn parse_element<'a>(&self, i: &'a [u8]) -> IResult<&'a [u8], Self::Element> {
        le_i32(i)
    }
}

/// Weighted string machine: label and weight per state.
#[derive(Debug, Clone)]
pub struct WeightedStringCompactor<W> {
    weight_len: usize,
    w: PhantomData<W>,
}

impl<W: SerializableSemiring> WeightedStringCompactor<W> {
    pub fn new() -> Self {
        Self {
            weight_len: weight_byte_len::<W>(),
            w: PhantomData,
        }
    }
}

impl<W: SerializableSemiring> Default for WeightedStringCompactor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SerializableSemiring> Compactor<W> for WeightedStringCompactor<W> {
    type Element = (Label, W);

    fn compact(&self, state: StateId, tr: &Tr<W>) -> Result<Self::Element> {
        if tr.nextstate == NO_STATE_ID {
            return Ok((NO_LABEL, tr.weight.clone()));
        }
        if tr.ilabel != tr.olabel {
            bail!("Weighted string compactor requires an acceptor");
        }
        if tr.nextstate != state + 1 {
            bail!("Weighted string compactor requires a linear machine");
        }
        Ok((tr.ilabel, tr.weight.clone()))
    }

    fn expand(&self, state: StateId, element: &Self::Element, flags: ExpandFlags) -> Tr<W> {
        let weight = if flags.contains(ExpandFlags::WEIGHT) {
            element.1.clone()
        } else {
            W::one()
        };
        if element.0 == NO_LABEL {
            superfinal_tr(weight)
        } else {
            Tr::new(element.0, element.0, weight, state + 1)
        }
    }

    fn size(&self) -> i32 {
        1
    }

    fn compatible(&self, props: FstProperties) -> bool {
        props.contains(FstProperties::STRING | FstProperties::ACCEPTOR)
    }

    fn properties(&self) -> FstProperties {
        FstProperties::STRING | FstProperties::ACCEPTOR
    }

    fn compactor_type() -> String {
        "weighted_string".to_string()
    }

    fn write<O: Write>(&self, _writer: &mut O) -> Result<()> {
        Ok(())
    }

    fn read(i: &[u8]) -> IResult<&[u8], Self> {
        Ok((i, Self::new()))
    }

    fn element_size(&self) -> usize {
        4 + self.weight_len
    }

    fn write_element<O: Write>(&self, element: &Self::Element, writer: &mut O) -> Result<()> {
        write_bin_i32(writer, element.0)?;
        element.1.write_binary(writer)
    }

    fn parse_element<'a>(&self, i: &'a [u8]) -> IResult<&'a [u8], Self::Element> {
        let (i, label) = le_i32(i)?;
        let (i, weight) = W::parse_binary(i)?;
        Ok((i, (label, weight)))
    }
}

/// Unweighted acceptor with arbitrary out-degree: label and destination per
/// transition.
#[derive(Debug, Clone, Default)]
pub struct UnweightedAcceptorCompactor<W> {
    w: PhantomData<W>,
}

impl<W> UnweightedAcceptorCompactor<W> {
    pub fn new() -> Self {
        Self { w: PhantomData }
    }
}

impl<W: Semiring> Compactor<W> for UnweightedAcceptorCompactor<W> {
    type Element = (Label, StateId);

    fn compact(&self, _state: StateId, tr: &Tr<W>) -> Result<Self::Element> {
        if tr.nextstate == NO_STATE_ID {
            if !tr.weight.is_one() {
                bail!("Unweighted acceptor compactor requires unweighted final states");
            }
            return Ok((NO_LABEL, NO_STATE_ID));
        }
        if tr.ilabel != tr.olabel {
            bail!("Unweighted acceptor compactor requires an acceptor");
        }
        if !tr.weight.is_one() {
            bail!("Unweighted acceptor compactor requires unweighted transitions");
        }
        Ok((tr.ilabel, tr.nextstate))
    }

    fn expand(&self, _state: StateId, element: &Self::Element, _flags: ExpandFlags) -> Tr<W> {
        if element.0 == NO_LABEL {
            superfinal_tr(W::one())
        } else {
            Tr::new(element.0, element.0, W::one(), element.1)
        }
    }

    fn size(&self) -> i32 {
        -1
    }

    fn compatible(&self, props: FstProperties) -> bool {
        props.contains(FstProperties::ACCEPTOR | FstProperties::UNWEIGHTED)
    }

    fn properties(&self) -> FstProperties {
        FstProperties::ACCEPTOR | FstProperties::UNWEIGHTED
    }

    fn compactor_type() -> String {
        "unweighted_acceptor".to_string()
    }

    fn write<O: Write>(&self, _writer: &mut O) -> Result<()> {
        Ok(())
    }

    fn read(i: &[u8]) -> IResult<&[u8], Self> {
        Ok((i, Self::new()))
    }

    fn element_size(&self) -> usize {
        8
    }

    fn write_element<O: Write>(&self, element: &Self::Element, writer: &mut O) -> Result<()> {
        write_bin_i32(writer, element.0)?;
        write_bin_i32(writer, element.1)
    }

    fn parse_element<'a>(&self, i: &'a [u8]) -> IResult<&'a [u8], Self::Element> {
        let (i, label) = le_i32(i)?;
        let (i, nextstate) = le_i32(i)?;
        Ok((i, (label, nextstate)))
    }
}

/// Weighted acceptor: (label, weight) and destination per transition.
#[derive(Debug, Clone)]
pub struct AcceptorCompactor<W> {
    weight_len: usize,
    w: PhantomData<W>,
}

impl<W: SerializableSemiring> AcceptorCompactor<W> {
    pub fn new() -> Self {
        Self {
            weight_len: weight_byte_len::<W>(),
            w: PhantomData,
        }
    }
}

impl<W: SerializableSemiring> Default for AcceptorCompactor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SerializableSemiring> Compactor<W> for AcceptorCompactor<W> {
    type Element = ((Label, W), StateId);

    fn compact(&self, _state: StateId, tr: &Tr<W>) -> Result<Self::Element> {
        if tr.nextstate == NO_STATE_ID {
            return Ok(((NO_LABEL, tr.weight.clone()), NO_STATE_ID));
        }
        if tr.ilabel != tr.olabel {
            bail!("Acceptor compactor requires an acceptor");
        }
        Ok(((tr.ilabel, tr.weight.clone()), tr.nextstate))
    }

    fn expand(&self, _state: StateId, element: &Self::Element, flags: ExpandFlags) -> Tr<W> {
        let weight = if flags.contains(ExpandFlags::WEIGHT) {
            (element.0).1.clone()
        } else {
            W::one()
        };
        if (element.0).0 == NO_LABEL {
            superfinal_tr(weight)
        } else {
            Tr::new((element.0).0, (element.0).0, weight, element.1)
        }
    }

    fn size(&self) -> i32 {
        -1
    }

    fn compatible(&self, props: FstProperties) -> bool {
        props.contains(FstProperties::ACCEPTOR)
    }

    fn properties(&self) -> FstProperties {
        FstProperties::ACCEPTOR
    }

    fn compactor_type() -> String {
        "acceptor".to_string()
    }

    fn write<O: Write>(&self, _writer: &mut O) -> Result<()> {
        Ok(())
    }

    fn read(i: &[u8]) -> IResult<&[u8], Self> {
        Ok((i, Self::new()))
    }

    fn element_size(&self) -> usize {
        8 + self.weight_len
    }

    fn write_element<O: Write>(&self, element: &Self::Element, writer: &mut O) -> Result<()> {
        write_bin_i32(writer, (element.0).0)?;
        (element.0).1.write_binary(writer)?;
        write_bin_i32(writer, element.1)
    }

    fn parse_element<'a>(&self, i: &'a [u8]) -> IResult<&'a [u8], Self::Element> {
        let (i, label) = le_i32(i)?;
        let (i, weight) = W::parse_binary(i)?;
        let (i, nextstate) = le_i32(i)?;
        Ok((i, ((label, weight), nextstate)))
    }
}

/// Unweighted transducer: (input label, output label) and destination per
/// transition.
#[derive(Debug, Clone, Default)]
pub struct UnweightedCompactor<W> {
    w: PhantomData<W>,
}

impl<W> UnweightedCompactor<W> {
    pub fn new() -> Self {
        Self { w: PhantomData }
    }
}

impl<W: Semiring> Compactor<W> for UnweightedCompactor<W> {
    type Element = ((Label, Label), StateId);

    fn compact(&self, _state: StateId, tr: &Tr<W>) -> Result<Self::Element> {
        if !tr.weight.is_one() {
            bail!("Unweighted compactor requires unweighted transitions");
        }
        if tr.nextstate == NO_STATE_ID {
            return Ok(((NO_LABEL, NO_LABEL), NO_STATE_ID));
        }
        Ok(((tr.ilabel, tr.olabel), tr.nextstate))
    }

    fn expand(&self, _state: StateId, element: &Self::Element, _flags: ExpandFlags) -> Tr<W> {
        if (element.0).0 == NO_LABEL {
            superfinal_tr(W::one())
        } else {
            Tr::new((element.0).0, (element.0).1, W::one(), element.1)
        }
    }

    fn size(&self) -> i32 {
        -1
    }

    fn compatible(&self, props: FstProperties) -> bool {
        props.contains(FstProperties::UNWEIGHTED)
    }

    fn properties(&self) -> FstProperties {
        FstProperties::UNWEIGHTED
    }

    fn compactor_type() -> String {
        "unweighted".to_string()
    }

    fn write<O: Write>(&self, _writer: &mut O) -> Result<()> {
        Ok(())
    }

    fn read(i: &[u8]) -> IResult<&[u8], Self> {
        Ok((i, Self::new()))
    }

    fn element_size(&self) -> usize {
        12
    }

    fn write_element<O: Write>(&self, element: &Self::Element, writer: &mut O) -> Result<()> {
        write_bin_i32(writer, (element.0).0)?;
        write_bin_i32(writer, (element.0).1)?;
        write_bin_i32(writer, element.1)
    }

    fn parse_element<'a>(&self, i: &'a [u8]) -> IResult<&'a [u8], Self::Element> {
        let (i, ilabel) = le_i32(i)?;
        let (i, olabel) = le_i32(i)?;
        let (i, nextstate) = le_i32(i)?;
        Ok((i, ((ilabel, olabel), nextstate)))
    }
}
