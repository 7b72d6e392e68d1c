use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Not;
use std::ops::Sub;

use circuit::error::EvalError;
use circuit::field::CircuitField;
use circuit::wire::Wire;
use num_traits::One;
use num_traits::Zero;

mod private {
    // A public but un-nameable type for sealing traits.
    pub trait Seal {}
}

/// The value kind of an expression: field element or boolean.
///
/// A _sealed_ trait; [`FieldElem`] and [`Boolean`] are its only
/// implementors.
pub trait ExprKind: private::Seal {}

/// Marker for field-valued expressions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldElem {}

/// Marker for boolean-valued expressions. Booleans live in the field as 0
/// and 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Boolean {}

impl private::Seal for FieldElem {}
impl private::Seal for Boolean {}
impl ExprKind for FieldElem {}
impl ExprKind for Boolean {}

/// The untyped expression tree behind [`Expr`]. Well-kindedness is
/// guaranteed by [`Expr`]'s construction surface, so the compiler and the
/// direct evaluator can match on this without re-checking kinds.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum ExprNode<F> {
    Const(F),
    Var(Wire),
    Neg(Box<ExprNode<F>>),
    Not(Box<ExprNode<F>>),
    Add(Box<ExprNode<F>>, Box<ExprNode<F>>),
    Sub(Box<ExprNode<F>>, Box<ExprNode<F>>),
    Mul(Box<ExprNode<F>>, Box<ExprNode<F>>),
    And(Box<ExprNode<F>>, Box<ExprNode<F>>),
    Or(Box<ExprNode<F>>, Box<ExprNode<F>>),
    Xor(Box<ExprNode<F>>, Box<ExprNode<F>>),
    IfThenElse {
        condition: Box<ExprNode<F>>,
        then_branch: Box<ExprNode<F>>,
        else_branch: Box<ExprNode<F>>,
    },
    Eq(Box<ExprNode<F>>, Box<ExprNode<F>>),
}

/// A well-kinded expression over field `F`, with kind `K` tracked as a
/// phantom marker. Ill-kinded trees are unrepresentable: every constructor
/// and operator impl only accepts operands of the kind it is defined for.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Expr<F, K: ExprKind> {
    pub(crate) node: ExprNode<F>,
    kind: PhantomData<K>,
}

impl<F: CircuitField, K: ExprKind> Expr<F, K> {
    pub(crate) fn from_node(node: ExprNode<F>) -> Self {
        Self {
            node,
            kind: PhantomData,
        }
    }

    /// `if condition { then_branch } else { else_branch }`, with same-kinded
    /// branches. The compiled circuit does not assume the condition is
    /// boolean-constrained; the type system guarantees it for trees built
    /// through this interface.
    pub fn if_then_else(
        condition: Expr<F, Boolean>,
        then_branch: Self,
        else_branch: Self,
    ) -> Self {
        Self::from_node(ExprNode::IfThenElse {
            condition: Box::new(condition.node),
            then_branch: Box::new(then_branch.node),
            else_branch: Box::new(else_branch.node),
        })
    }

    /// Direct reference evaluation under `env`, mirroring the compiled
    /// circuit's semantics without emitting gates. Used for differential
    /// testing only. Boolean results are reported as 0 or 1.
    pub fn evaluate(&self, env: &HashMap<usize, F>) -> Result<F, EvalError> {
        self.node.evaluate(&|id| env.get(&id).copied())
    }
}

impl<F: CircuitField> Expr<F, FieldElem> {
    pub fn constant(c: F) -> Self {
        Self::from_node(ExprNode::Const(c))
    }

    pub fn var(wire: Wire) -> Self {
        Self::from_node(ExprNode::Var(wire))
    }

    /// Field equality test; 1 iff both sides agree.
    pub fn is_equal(self, other: Self) -> Expr<F, Boolean> {
        Expr::from_node(ExprNode::Eq(Box::new(self.node), Box::new(other.node)))
    }
}

impl<F: CircuitField> Expr<F, Boolean> {
    pub fn lit(value: bool) -> Self {
        let field_value = if value { F::one() } else { F::zero() };
        Self::from_node(ExprNode::Const(field_value))
    }

    pub fn bool_var(wire: Wire) -> Self {
        Self::from_node(ExprNode::Var(wire))
    }

    pub fn and(self, other: Self) -> Self {
        Self::from_node(ExprNode::And(Box::new(self.node), Box::new(other.node)))
    }

    pub fn or(self, other: Self) -> Self {
        Self::from_node(ExprNode::Or(Box::new(self.node), Box::new(other.node)))
    }

    pub fn xor(self, other: Self) -> Self {
        Self::from_node(ExprNode::Xor(Box::new(self.node), Box::new(other.node)))
    }
}

impl<F: CircuitField> Add for Expr<F, FieldElem> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_node(ExprNode::Add(Box::new(self.node), Box::new(rhs.node)))
    }
}

impl<F: CircuitField> Sub for Expr<F, FieldElem> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_node(ExprNode::Sub(Box::new(self.node), Box::new(rhs.node)))
    }
}

impl<F: CircuitField> Mul for Expr<F, FieldElem> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_node(ExprNode::Mul(Box::new(self.node), Box::new(rhs.node)))
    }
}

impl<F: CircuitField> Neg for Expr<F, FieldElem> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_node(ExprNode::Neg(Box::new(self.node)))
    }
}

impl<F: CircuitField> Not for Expr<F, Boolean> {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_node(ExprNode::Not(Box::new(self.node)))
    }
}

impl<F: CircuitField> ExprNode<F> {
    /// The `== 1` truthiness convention for boolean-kinded values.
    fn truthy(value: F) -> bool {
        value == F::one()
    }

    fn as_field(truth: bool) -> F {
        if truth { F::one() } else { F::zero() }
    }

    pub(crate) fn evaluate(&self, lookup: &impl Fn(usize) -> Option<F>) -> Result<F, EvalError> {
        let truth_of = |node: &Self| Ok::<_, EvalError>(Self::truthy(node.evaluate(lookup)?));
        match self {
            Self::Const(c) => Ok(*c),
            Self::Var(wire) => lookup(wire.id()).ok_or(EvalError::UnboundWire(wire.id())),
            Self::Neg(e) => Ok(-e.evaluate(lookup)?),
            Self::Not(e) => Ok(Self::as_field(!truth_of(e)?)),
            Self::Add(a, b) => Ok(a.evaluate(lookup)? + b.evaluate(lookup)?),
            Self::Sub(a, b) => Ok(a.evaluate(lookup)? - b.evaluate(lookup)?),
            Self::Mul(a, b) => Ok(a.evaluate(lookup)? * b.evaluate(lookup)?),
            Self::And(a, b) => Ok(Self::as_field(truth_of(a)? && truth_of(b)?)),
            Self::Or(a, b) => Ok(Self::as_field(truth_of(a)? || truth_of(b)?)),
            Self::Xor(a, b) => {
                let (a, b) = (truth_of(a)?, truth_of(b)?);
                Ok(Self::as_field((a || b) && !(a && b)))
            }
            Self::IfThenElse {
                condition,
                then_branch,
                else_branch,
            } => {
                if truth_of(condition)? {
                    then_branch.evaluate(lookup)
                } else {
                    else_branch.evaluate(lookup)
                }
            }
            Self::Eq(a, b) => Ok(Self::as_field(a.evaluate(lookup)? == b.evaluate(lookup)?)),
        }
    }
}
