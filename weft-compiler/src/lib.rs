//! A statically-typed, embedded expression language and its compiler into
//! the `weft-circuit` gate set.
//!
//! Expressions are typed at construction time — field-valued and
//! boolean-valued terms cannot be mixed — via a phantom kind marker on
//! [`Expr`](expr::Expr). The [compiler](compile::compile) lowers each
//! operator into zero or more gates, keeping already-affine subterms as
//! unevaluated affine fragments so that additions, subtractions, negations,
//! and constants cost no multiplication gates at all.
//!
//! The [direct evaluator](expr::Expr::evaluate) mirrors the compiled
//! semantics without emitting gates; it exists to differentially test the
//! compiler and has no other role.

pub mod builder;
pub mod compile;
pub mod expr;

pub mod prelude {
    pub use crate::builder::CircuitBuilder;
    pub use crate::compile::CompiledExpr;
    pub use crate::compile::compile;
    pub use crate::expr::Boolean;
    pub use crate::expr::Expr;
    pub use crate::expr::FieldElem;
}
