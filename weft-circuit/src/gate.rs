use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use num_traits::One;
use num_traits::Zero;
use serde::Deserialize;
use serde::Serialize;

use crate::affine::AffineCircuit;
use crate::circuit::Assignment;
use crate::error::EvalError;
use crate::field::CircuitField;
use crate::wire::Wire;

/// One constraint/computation step of an arithmetic circuit.
///
/// Gate operands are [affine combinations](AffineCircuit) or direct wires;
/// every gate writes the wire(s) it declares as outputs and nothing else.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Gate<F> {
    /// `out = lhs · rhs`, the only multiplicative constraint.
    Mul {
        lhs: AffineCircuit<F>,
        rhs: AffineCircuit<F>,
        out: Wire,
    },

    /// `out = 0` if `input = 0`, else `out = 1`. The auxiliary `magic` wire
    /// receives `input⁻¹` (or 0) so that the constraints
    /// `input · magic = out` and `(1 − out) · input = 0` are satisfiable;
    /// evaluation writes both wires at once.
    Equal { input: Wire, magic: Wire, out: Wire },

    /// `outputs[k]` = k-th bit, little-endian, of `input`'s canonical
    /// integer representative. Bits beyond `outputs.len()` are silently
    /// dropped; callers rely on this truncation, e.g. for rotations over a
    /// fixed bit width.
    Split { input: Wire, outputs: Vec<Wire> },
}

impl<F: CircuitField> Gate<F> {
    /// Every wire this gate writes during evaluation. For
    /// [`Equal`](Self::Equal), that includes the `magic` wire.
    pub fn output_wires(&self) -> Vec<&Wire> {
        match self {
            Self::Mul { out, .. } => vec![out],
            Self::Equal { magic, out, .. } => vec![out, magic],
            Self::Split { outputs, .. } => outputs.iter().collect(),
        }
    }

    /// Every wire this gate consumes as a dependency.
    pub fn dependency_wires(&self) -> Vec<&Wire> {
        match self {
            Self::Mul { lhs, rhs, .. } => {
                let mut wires = lhs.wires();
                wires.extend(rhs.wires());
                wires
            }
            Self::Equal { input, .. } | Self::Split { input, .. } => vec![input],
        }
    }

    /// Evaluate this gate, reading dependencies from and writing outputs to
    /// `assignment`.
    ///
    /// # Panics
    ///
    /// Panics if the direct input of an [`Equal`](Self::Equal) or
    /// [`Split`](Self::Split) gate is unbound. Dependency-ordered circuits
    /// make that unreachable, so hitting it means the circuit was built
    /// outside the compiler's invariants.
    pub fn evaluate(&self, assignment: &mut Assignment<F>) -> Result<(), EvalError> {
        match self {
            Self::Mul { lhs, rhs, out } => {
                let lhs_value = lhs.evaluate(&|id| assignment.get(id))?;
                let rhs_value = rhs.evaluate(&|id| assignment.get(id))?;
                assignment.bind(out.id(), lhs_value * rhs_value)
            }
            Self::Equal { input, magic, out } => {
                let input_value = Self::direct_input(assignment, input);
                let (out_value, magic_value) = match input_value.try_inverse() {
                    Some(reciprocal) => (F::one(), reciprocal),
                    None => (F::zero(), F::zero()),
                };
                assignment.bind(out.id(), out_value)?;
                assignment.bind(magic.id(), magic_value)
            }
            Self::Split { input, outputs } => {
                let input_value = Self::direct_input(assignment, input);
                for (k, output) in outputs.iter().enumerate() {
                    let bit = if input_value.bit(k) {
                        F::one()
                    } else {
                        F::zero()
                    };
                    assignment.bind(output.id(), bit)?;
                }
                Ok(())
            }
        }
    }

    /// Rewrite every wire occurrence through `relabel`. Gate kind, operand
    /// structure, and output order are untouched.
    pub(crate) fn map_wires(&self, relabel: &impl Fn(&Wire) -> Wire) -> Self {
        match self {
            Self::Mul { lhs, rhs, out } => Self::Mul {
                lhs: lhs.map_wires(relabel),
                rhs: rhs.map_wires(relabel),
                out: relabel(out),
            },
            Self::Equal { input, magic, out } => Self::Equal {
                input: relabel(input),
                magic: relabel(magic),
                out: relabel(out),
            },
            Self::Split { input, outputs } => Self::Split {
                input: relabel(input),
                outputs: outputs.iter().map(relabel).collect(),
            },
        }
    }

    fn direct_input(assignment: &Assignment<F>, input: &Wire) -> F {
        let Some(value) = assignment.get(input.id()) else {
            panic!("the impossible happened: direct gate input {input} is unbound");
        };
        value
    }
}

impl<F: Display> Display for Gate<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Mul { lhs, rhs, out } => write!(f, "{out} ← ({lhs}) · ({rhs})"),
            Self::Equal { input, magic, out } => {
                write!(f, "{out} ← ({input} ≠ 0), magic {magic}")
            }
            Self::Split { input, outputs } => {
                write!(f, "bits({input}) ← [")?;
                for (k, output) in outputs.iter().enumerate() {
                    let separator = if k == 0 { "" } else { ", " };
                    write!(f, "{separator}{output}")?;
                }
                write!(f, "]")
            }
        }
    }
}
