use std::fmt::Debug;
use std::io::Write;

use anyhow::Result;
use bitflags::bitflags;
use nom::IResult;

use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::tr::Tr;
use crate::{StateId, NO_LABEL, NO_STATE_ID};

bitflags! {
    /// Transition fields a consumer needs from [`Compactor::expand`]. Fields
    /// outside the mask may be stubs, letting compactors skip part of the
    /// decoding work.
    pub struct ExpandFlags: u32 {
        const ILABEL = 0b1;
        const OLABEL = 0b10;
        const WEIGHT = 0b100;
        const NEXTSTATE = 0b1000;
        const ALL = Self::ILABEL.bits | Self::OLABEL.bits | Self::WEIGHT.bits | Self::NEXTSTATE.bits;
    }
}

/// Strategy packing one transition into a compact record and back, trading
/// CPU on access for memory. A final weight travels as the superfinal
/// transition: both labels [`NO_LABEL`], destination [`NO_STATE_ID`].
///
/// `compact` must be pure; the state argument gives variable-size compactors
/// room for encodings like destination deltas. Weight-carrying compactors
/// require a weight type with a fixed-size binary form.
pub trait Compactor<W: Semiring>: 'static + Debug + Send + Sync {
    /// Compact record for one transition.
    type Element: Clone + Debug + PartialEq;

    fn compact(&self, state: StateId, tr: &Tr<W>) -> Result<Self::Element>;

    /// Rebuilds a transition; only the fields selected by `flags` must be
    /// valid.
    fn expand(&self, state: StateId, element: &Self::Element, flags: ExpandFlags) -> Tr<W>;

    /// Fixed out-degree `k > 0`, or `-1` for variable out-degree.
    fn size(&self) -> i32;

    /// Whether a machine with the given (fully known) properties can be
    /// represented by this compactor.
    fn compatible(&self, props: FstProperties) -> bool;

    /// Properties guaranteed by construction for any machine this compactor
    /// represents.
    fn properties(&self) -> FstProperties;

    /// Registry key, stored in the file header as `compact_<key>`.
    fn compactor_type() -> String
    where
        Self: Sized;

    /// Compactor-specific parameters; the standard compactors have none.
    fn write<O: Write>(&self, writer: &mut O) -> Result<()>;
    fn read(i: &[u8]) -> IResult<&[u8], Self>
    where
        Self: Sized;

    /// Bytes of one serialized element; constant so elements are addressable
    /// by index.
    fn element_size(&self) -> usize;
    fn write_element<O: Write>(&self, element: &Self::Element, writer: &mut O) -> Result<()>;
    fn parse_element<'a>(&self, i: &'a [u8]) -> IResult<&'a [u8], Self::Element>;
}

/// The pseudo-transition encoding a final weight.
pub(crate) fn superfinal_tr<W: Semiring>(weight: W) -> Tr<W> {
    Tr::new(NO_LABEL, NO_LABEL, weight, NO_STATE_ID)
}

/// Byte length of the fixed binary form of `W`.
pub(crate) fn weight_byte_len<W: crate::semirings::SerializableSemiring>() -> usize {
    let mut buffer = Vec::new();
    W::zero()
        .write_binary(&mut buffer)
        .expect("in-memory write can't fail");
    buffer.len()
}
