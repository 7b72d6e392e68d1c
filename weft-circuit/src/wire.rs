use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use arbitrary::Arbitrary;
use serde::Deserialize;
use serde::Serialize;

/// The variable id reserved for the constant-one wire. No [`Wire`] value ever
/// holds it; the solver binds it to the field's multiplicative identity.
pub const ONE_WIRE: usize = 0;

/// Whether a circuit input is part of the public statement or of the secret
/// witness.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Arbitrary)]
pub enum Visibility {
    Public,
    Private,
}

/// A typed reference to a circuit variable.
///
/// A wire's kind is fixed at creation: the same id is never reused across
/// kinds within one circuit generation. Input wires carry a human-readable
/// label used to bind named signals at solve time; intermediate wires are
/// compiler-introduced temporaries; output wires are designated result slots.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Arbitrary)]
pub enum Wire {
    Input {
        id: usize,
        label: String,
        visibility: Visibility,
    },
    Intermediate(usize),
    Output(usize),
}

impl Wire {
    pub fn id(&self) -> usize {
        match self {
            Self::Input { id, .. } => *id,
            Self::Intermediate(id) | Self::Output(id) => *id,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// The same wire under a different id. Kind, label, and visibility are
    /// unaffected.
    pub(crate) fn with_id(&self, new_id: usize) -> Self {
        match self {
            Self::Input {
                label, visibility, ..
            } => Self::Input {
                id: new_id,
                label: label.clone(),
                visibility: *visibility,
            },
            Self::Intermediate(_) => Self::Intermediate(new_id),
            Self::Output(_) => Self::Output(new_id),
        }
    }
}

impl Display for Wire {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Input { id, label, .. } => write!(f, "in_{id}[{label}]"),
            Self::Intermediate(id) => write!(f, "tmp_{id}"),
            Self::Output(id) => write!(f, "out_{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassigning_an_id_preserves_kind_and_label() {
        let input = Wire::Input {
            id: 3,
            label: "a".to_string(),
            visibility: Visibility::Private,
        };
        let moved = input.with_id(7);
        assert_eq!(7, moved.id());
        let Wire::Input {
            label, visibility, ..
        } = moved
        else {
            panic!("kind must survive reindexing");
        };
        assert_eq!("a", label);
        assert_eq!(Visibility::Private, visibility);

        assert_eq!(Wire::Output(2), Wire::Output(9).with_id(2));
    }
}
