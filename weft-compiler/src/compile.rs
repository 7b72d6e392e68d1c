use circuit::affine::AffineCircuit;
use circuit::field::CircuitField;
use circuit::gate::Gate;
use circuit::wire::Wire;
use num_traits::One;

use crate::builder::CircuitBuilder;
use crate::expr::Expr;
use crate::expr::ExprKind;
use crate::expr::ExprNode;

/// The result of lowering one expression node: either a wire that a gate
/// already writes, or a still-unevaluated affine fragment. Keeping affine
/// results symbolic avoids a multiplication gate per addition, subtraction,
/// negation, or constant.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CompiledExpr<F> {
    Wire(Wire),
    Affine(AffineCircuit<F>),
}

impl<F: CircuitField> CompiledExpr<F> {
    pub fn into_affine(self) -> AffineCircuit<F> {
        match self {
            Self::Wire(wire) => AffineCircuit::var(wire),
            Self::Affine(affine) => affine,
        }
    }
}

/// Compile `expr` into gates emitted through `builder`, writing the final
/// result to a fresh output wire, which is returned.
///
/// The output wire is always written by its own trailing
/// `Mul(1, result, out)` gate — even when the result is already a bare wire
/// — so that it is never aliased to an input or intermediate wire.
pub fn compile<F: CircuitField, K: ExprKind>(
    expr: &Expr<F, K>,
    builder: &mut CircuitBuilder<F>,
) -> Wire {
    let result = compile_node(&expr.node, builder);
    let out = builder.fresh_output();
    builder.emit(Gate::Mul {
        lhs: AffineCircuit::constant(F::one()),
        rhs: result.into_affine(),
        out: out.clone(),
    });
    out
}

fn compile_node<F: CircuitField>(
    node: &ExprNode<F>,
    builder: &mut CircuitBuilder<F>,
) -> CompiledExpr<F> {
    let affine = |node: &ExprNode<F>, builder: &mut CircuitBuilder<F>| {
        compile_node(node, builder).into_affine()
    };

    match node {
        ExprNode::Const(c) => CompiledExpr::Affine(AffineCircuit::constant(*c)),
        ExprNode::Var(wire) => CompiledExpr::Wire(wire.clone()),
        ExprNode::Neg(e) => CompiledExpr::Affine(affine(e, builder).neg()),
        // booleans are 0 or 1 in the field, so ¬e is 1 − e
        ExprNode::Not(e) => {
            CompiledExpr::Affine(AffineCircuit::constant(F::one()) - affine(e, builder))
        }
        ExprNode::Add(a, b) => CompiledExpr::Affine(affine(a, builder) + affine(b, builder)),
        ExprNode::Sub(a, b) => CompiledExpr::Affine(affine(a, builder) - affine(b, builder)),
        ExprNode::Mul(a, b) | ExprNode::And(a, b) => {
            let product = emit_product(a, b, builder);
            CompiledExpr::Wire(product)
        }
        ExprNode::Or(a, b) => {
            let (a, b) = (affine(a, builder), affine(b, builder));
            let product = emit_mul(a.clone(), b.clone(), builder);
            CompiledExpr::Affine((a + b) - AffineCircuit::var(product))
        }
        ExprNode::Xor(a, b) => {
            let (a, b) = (affine(a, builder), affine(b, builder));
            let product = emit_mul(a.clone(), b.clone(), builder);
            let twice_product = AffineCircuit::var(product).scale(F::one() + F::one());
            CompiledExpr::Affine((a + b) - twice_product)
        }
        ExprNode::IfThenElse {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition = affine(condition, builder);
            let then_branch = affine(then_branch, builder);
            let else_branch = affine(else_branch, builder);
            let then_case = emit_mul(condition.clone(), then_branch, builder);
            let else_case = emit_mul(
                AffineCircuit::constant(F::one()) - condition,
                else_branch,
                builder,
            );
            CompiledExpr::Affine(AffineCircuit::var(then_case) + AffineCircuit::var(else_case))
        }
        ExprNode::Eq(a, b) => {
            let lhs = compile_node(a, builder);
            let rhs = compile_node(b, builder);
            let difference = CompiledExpr::Affine(lhs.into_affine() - rhs.into_affine());
            let input = force_wire(difference, builder);
            let magic = builder.fresh_intermediate();
            let out = builder.fresh_intermediate();
            builder.emit(Gate::Equal {
                input,
                magic,
                out: out.clone(),
            });
            // the gate computes "is nonzero"; the language-level result is
            // "is equal", hence the inversion
            CompiledExpr::Affine(AffineCircuit::constant(F::one()) - AffineCircuit::var(out))
        }
    }
}

/// One `Mul` gate on two affine operands, into a fresh intermediate.
fn emit_mul<F: CircuitField>(
    lhs: AffineCircuit<F>,
    rhs: AffineCircuit<F>,
    builder: &mut CircuitBuilder<F>,
) -> Wire {
    let out = builder.fresh_intermediate();
    builder.emit(Gate::Mul {
        lhs,
        rhs,
        out: out.clone(),
    });
    out
}

fn emit_product<F: CircuitField>(
    a: &ExprNode<F>,
    b: &ExprNode<F>,
    builder: &mut CircuitBuilder<F>,
) -> Wire {
    let lhs = compile_node(a, builder).into_affine();
    let rhs = compile_node(b, builder).into_affine();
    emit_mul(lhs, rhs, builder)
}

/// The compiled expression as a concrete wire, emitting a helper
/// `Mul(1, e, w)` only when it is not already bare.
fn force_wire<F: CircuitField>(compiled: CompiledExpr<F>, builder: &mut CircuitBuilder<F>) -> Wire {
    match compiled {
        CompiledExpr::Wire(wire) => wire,
        CompiledExpr::Affine(AffineCircuit::Var(wire)) => wire,
        CompiledExpr::Affine(affine) => {
            emit_mul(AffineCircuit::constant(F::one()), affine, builder)
        }
    }
}
