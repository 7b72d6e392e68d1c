use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::ops::Add;
use std::ops::Sub;

use num_traits::One;
use num_traits::Zero;
use serde::Deserialize;
use serde::Serialize;

use crate::error::EvalError;
use crate::field::CircuitField;
use crate::wire::Wire;

/// A linear combination of wires: sums, scalar multiples, constants, and
/// wire references. Contributes no multiplicative constraint by itself —
/// gates take affine combinations as operands for free.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AffineCircuit<F> {
    Const(F),
    Var(Wire),
    Add(Box<AffineCircuit<F>>, Box<AffineCircuit<F>>),
    ScalarMul(F, Box<AffineCircuit<F>>),
    Nil,
}

impl<F: CircuitField> AffineCircuit<F> {
    pub fn constant(c: F) -> Self {
        Self::Const(c)
    }

    pub fn var(wire: Wire) -> Self {
        Self::Var(wire)
    }

    pub fn scale(self, scalar: F) -> Self {
        Self::ScalarMul(scalar, Box::new(self))
    }

    pub fn neg(self) -> Self {
        self.scale(-F::one())
    }

    /// Evaluate the combination under the given wire-value lookup.
    ///
    /// [`Nil`](Self::Nil) evaluates to zero. A [`Var`](Self::Var) whose
    /// lookup misses fails with [`EvalError::UnboundWire`].
    pub fn evaluate(&self, lookup: &impl Fn(usize) -> Option<F>) -> Result<F, EvalError> {
        match self {
            Self::Const(c) => Ok(*c),
            Self::Var(wire) => lookup(wire.id()).ok_or(EvalError::UnboundWire(wire.id())),
            Self::Add(lhs, rhs) => Ok(lhs.evaluate(lookup)? + rhs.evaluate(lookup)?),
            Self::ScalarMul(scalar, inner) => Ok(*scalar * inner.evaluate(lookup)?),
            Self::Nil => Ok(F::zero()),
        }
    }

    /// All wires referenced anywhere in the combination.
    pub fn wires(&self) -> Vec<&Wire> {
        match self {
            Self::Const(_) | Self::Nil => vec![],
            Self::Var(wire) => vec![wire],
            Self::Add(lhs, rhs) => {
                let mut wires = lhs.wires();
                wires.extend(rhs.wires());
                wires
            }
            Self::ScalarMul(_, inner) => inner.wires(),
        }
    }

    /// Rewrite every wire reference through `relabel`. The combination's
    /// structure is untouched.
    pub(crate) fn map_wires(&self, relabel: &impl Fn(&Wire) -> Wire) -> Self {
        match self {
            Self::Const(c) => Self::Const(*c),
            Self::Var(wire) => Self::Var(relabel(wire)),
            Self::Add(lhs, rhs) => Self::Add(
                Box::new(lhs.map_wires(relabel)),
                Box::new(rhs.map_wires(relabel)),
            ),
            Self::ScalarMul(scalar, inner) => {
                Self::ScalarMul(*scalar, Box::new(inner.map_wires(relabel)))
            }
            Self::Nil => Self::Nil,
        }
    }
}

impl<F: CircuitField> Add for AffineCircuit<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::Add(Box::new(self), Box::new(rhs))
    }
}

impl<F: CircuitField> Sub for AffineCircuit<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs.neg()
    }
}

impl<F: Display> Display for AffineCircuit<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Var(wire) => write!(f, "{wire}"),
            Self::Add(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            Self::ScalarMul(scalar, inner) => write!(f, "{scalar}·({inner})"),
            Self::Nil => write!(f, "∅"),
        }
    }
}
