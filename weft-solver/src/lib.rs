//! Witness production for `weft-circuit` arithmetic circuits.
//!
//! A [witness](solve::Witness) is a total, consistent assignment of field
//! elements to every wire of a circuit, derived deterministically from the
//! labeled inputs by evaluating every gate in program order. Two deployment
//! shapes cover the two integration styles:
//!
//! - the [batch solver](solve::solve), when all inputs are available
//!   upfront, and
//! - the [incremental solver](incremental::IncrementalSolver), when an
//!   external host delivers one labeled signal at a time over a fixed-width
//!   byte buffer and expects solving to trigger as soon as the last input
//!   arrives.

pub mod incremental;
pub mod inputs;
pub mod solve;

pub mod prelude {
    pub use crate::incremental::IncrementalSolver;
    pub use crate::incremental::label_hash;
    pub use crate::inputs::parse_input_map;
    pub use crate::solve::SolveError;
    pub use crate::solve::Witness;
    pub use crate::solve::solve;
}
