use crate::Label;

/// Value carried by a string weight: either a label sequence or the infinite
/// string, the ⊕-identity.
#[derive(Clone, Debug, PartialOrd, PartialEq, Eq, Hash)]
pub enum StringWeightVariant {
    /// The infinite string.
    Infinity,
    /// A finite label sequence, possibly empty (epsilon).
    Labels(Vec<Label>),
}

impl StringWeightVariant {
    pub fn is_infinity(&self) -> bool {
        matches!(self, StringWeightVariant::Infinity)
    }

    /// Panics on `Infinity`. Callers must have ruled it out.
    pub(crate) fn unwrap_labels(&self) -> &Vec<Label> {
        match self {
            StringWeightVariant::Infinity => panic!("Infinity is not a label sequence"),
            StringWeightVariant::Labels(l) => l,
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            StringWeightVariant::Infinity => StringWeightVariant::Infinity,
            StringWeightVariant::Labels(l) => {
                StringWeightVariant::Labels(l.iter().rev().cloned().collect())
            }
        }
    }
}

impl Default for StringWeightVariant {
    fn default() -> Self {
        StringWeightVariant::Labels(vec![])
    }
}

impl From<Vec<Label>> for StringWeightVariant {
    fn from(l: Vec<Label>) -> Self {
        StringWeightVariant::Labels(l)
    }
}
