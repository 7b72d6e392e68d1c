//! The arithmetic circuit data model underlying the `weft` toolchain.
//!
//! A circuit is an ordered sequence of [gates](gate::Gate) over
//! [wires](wire::Wire), where each gate computes one (or, for bit
//! decomposition, several) wire values from [affine
//! combinations](affine::AffineCircuit) of earlier wires. The restricted gate
//! set — a single multiplication gate with affine operands, an
//! equality-to-zero gate, and a bit-decomposition gate — keeps the circuit
//! directly translatable into a rank-1 constraint system.
//!
//! This crate contains only the data model and its pure operations:
//! evaluation, structural validation, and [canonical
//! reindexing](reindex::reindex). Compilation from a typed expression
//! language lives in `weft-compiler`, witness production in `weft-solver`.

pub use twenty_first;

pub mod affine;
pub mod circuit;
pub mod error;
pub mod field;
pub mod gate;
pub mod reindex;
pub mod wire;

pub mod prelude {
    pub use crate::affine::AffineCircuit;
    pub use crate::circuit::ArithCircuit;
    pub use crate::circuit::Assignment;
    pub use crate::circuit::CircuitVars;
    pub use crate::error::EvalError;
    pub use crate::field::CircuitField;
    pub use crate::gate::Gate;
    pub use crate::reindex::reindex;
    pub use crate::wire::Visibility;
    pub use crate::wire::Wire;
}
