use std::fmt::Display;

use thiserror::Error;

/// Failure of circuit or affine-combination evaluation.
///
/// [`UnboundWire`](Self::UnboundWire) is a user-facing condition: the
/// evaluation environment lacks a value for a referenced wire.
/// [`ContradictoryAssignment`](Self::ContradictoryAssignment) indicates a
/// malformed circuit in which two gates derive different values for the same
/// wire; a circuit produced by the compiler writes every wire exactly once,
/// so encountering it means the circuit itself is buggy, not the input.
#[non_exhaustive]
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EvalError {
    #[error("no value bound for wire {0}")]
    UnboundWire(usize),

    #[error("wire {id} already bound to {existing}, refusing to rebind to {new}")]
    ContradictoryAssignment {
        id: usize,
        existing: String,
        new: String,
    },
}

impl EvalError {
    pub(crate) fn contradiction<F: Display>(id: usize, existing: F, new: F) -> Self {
        Self::ContradictoryAssignment {
            id,
            existing: existing.to_string(),
            new: new.to_string(),
        }
    }
}
