use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Deserialize;
use serde::Serialize;

use crate::error::EvalError;
use crate::field::CircuitField;
use crate::gate::Gate;
use crate::wire::ONE_WIRE;
use crate::wire::Visibility;

/// A wire-id → field-element environment with insert-with-conflict-check
/// semantics.
///
/// Re-binding an id to the value it already holds is a no-op. Binding it to a
/// *different* value fails with
/// [`EvalError::ContradictoryAssignment`] — a well-formed circuit writes
/// every wire exactly once, so the conflict check guards against circuit
/// bugs, never against user input.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Assignment<F> {
    values: HashMap<usize, F>,
}

impl<F: CircuitField> Assignment<F> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn get(&self, id: usize) -> Option<F> {
        self.values.get(&id).copied()
    }

    pub fn bind(&mut self, id: usize, value: F) -> Result<(), EvalError> {
        match self.values.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
            Entry::Occupied(entry) if *entry.get() == value => Ok(()),
            Entry::Occupied(entry) => Err(EvalError::contradiction(id, *entry.get(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> HashMap<usize, F> {
        self.values
    }
}

impl<F: CircuitField> FromIterator<(usize, F)> for Assignment<F> {
    fn from_iter<I: IntoIterator<Item = (usize, F)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Variable metadata derived during circuit construction and kept consistent
/// with the circuit thereafter: which ids exist, which are public/private
/// inputs or outputs, and the label → id binding for named signals.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CircuitVars {
    pub all: BTreeSet<usize>,
    pub public_inputs: BTreeSet<usize>,
    pub private_inputs: BTreeSet<usize>,
    pub outputs: BTreeSet<usize>,

    /// Label → id. Registering an already-present label silently overwrites
    /// the earlier entry; last write wins.
    pub labels: HashMap<String, usize>,
}

impl CircuitVars {
    pub fn record_var(&mut self, id: usize) {
        self.all.insert(id);
    }

    pub fn record_input(&mut self, id: usize, label: &str, visibility: Visibility) {
        self.all.insert(id);
        match visibility {
            Visibility::Public => self.public_inputs.insert(id),
            Visibility::Private => self.private_inputs.insert(id),
        };
        self.labels.insert(label.to_string(), id);
    }

    pub fn record_output(&mut self, id: usize) {
        self.all.insert(id);
        self.outputs.insert(id);
    }

    /// The number of declared (public and private) input wires.
    pub fn input_count(&self) -> usize {
        self.public_inputs.len() + self.private_inputs.len()
    }

    /// Ids of intermediate wires: everything that is neither input nor
    /// output.
    pub fn intermediates(&self) -> impl Iterator<Item = usize> + '_ {
        self.all
            .iter()
            .copied()
            .filter(|id| !self.public_inputs.contains(id))
            .filter(|id| !self.private_inputs.contains(id))
            .filter(|id| !self.outputs.contains(id))
    }
}

/// An ordered sequence of gates; the order is evaluation order and respects
/// data dependencies.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArithCircuit<F> {
    gates: Vec<Gate<F>>,
}

impl<F: CircuitField> ArithCircuit<F> {
    pub fn new(gates: Vec<Gate<F>>) -> Self {
        Self { gates }
    }

    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Evaluate every gate in sequence, threading `assignment` through.
    ///
    /// This is the sole mechanism by which wire values are derived from
    /// inputs: no gate is skipped or reordered, and identical inputs always
    /// produce the identical full environment.
    pub fn evaluate(&self, assignment: &mut Assignment<F>) -> Result<(), EvalError> {
        for gate in &self.gates {
            gate.evaluate(assignment)?;
        }
        Ok(())
    }

    /// Structural validity, checked in a single left-to-right pass:
    ///
    /// 1. no gate writes to an input wire, and
    /// 2. every wire a gate consumes is an input wire, the constant-one wire,
    ///    or was produced by a strictly earlier gate — and is never an
    ///    output wire.
    ///
    /// This is a predicate for callers and tests; the evaluation pipeline
    /// never invokes it implicitly.
    pub fn is_valid(&self) -> bool {
        let mut defined = BTreeSet::new();
        for gate in &self.gates {
            let deps_ok = gate.dependency_wires().into_iter().all(|dep| {
                !dep.is_output()
                    && (dep.is_input() || dep.id() == ONE_WIRE || defined.contains(&dep.id()))
            });
            let outputs_ok = gate.output_wires().iter().all(|out| !out.is_input());
            if !deps_ok || !outputs_ok {
                return false;
            }
            for out in gate.output_wires() {
                defined.insert(out.id());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use twenty_first::prelude::*;

    use crate::affine::AffineCircuit;
    use crate::wire::Wire;

    use super::*;

    fn wire_input(id: usize, label: &str) -> Wire {
        Wire::Input {
            id,
            label: label.to_string(),
            visibility: Visibility::Public,
        }
    }

    fn mul(lhs: Wire, rhs: Wire, out: Wire) -> Gate<BFieldElement> {
        Gate::Mul {
            lhs: AffineCircuit::var(lhs),
            rhs: AffineCircuit::var(rhs),
            out,
        }
    }

    #[test]
    fn rebinding_the_same_value_is_a_no_op() {
        let mut assignment = Assignment::new();
        assignment.bind(1, bfe!(5)).unwrap();
        assignment.bind(1, bfe!(5)).unwrap();
        assert_eq!(1, assignment.len());
    }

    #[test]
    fn rebinding_a_different_value_is_a_contradiction() {
        let mut assignment = Assignment::new();
        assignment.bind(1, bfe!(5)).unwrap();
        let conflict = assignment.bind(1, bfe!(6)).unwrap_err();
        assert!(matches!(
            conflict,
            EvalError::ContradictoryAssignment { id: 1, .. }
        ));
    }

    #[test]
    fn contradictory_gates_abort_evaluation() {
        // two independent derivations of wire 3 that provably disagree
        let a = wire_input(1, "a");
        let circuit = ArithCircuit::new(vec![
            mul(a.clone(), a.clone(), Wire::Intermediate(2)),
            mul(a.clone(), Wire::Intermediate(2), Wire::Intermediate(3)),
            mul(a.clone(), a.clone(), Wire::Intermediate(3)),
        ]);

        let mut assignment = [(1, bfe!(2))].into_iter().collect();
        let conflict = circuit.evaluate(&mut assignment).unwrap_err();
        assert!(matches!(
            conflict,
            EvalError::ContradictoryAssignment { id: 3, .. }
        ));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let a = wire_input(1, "a");
        let b = wire_input(2, "b");
        let circuit = ArithCircuit::new(vec![
            mul(a.clone(), b.clone(), Wire::Intermediate(3)),
            mul(Wire::Intermediate(3), b.clone(), Wire::Output(4)),
        ]);

        let solve = || {
            let mut assignment = [(1, bfe!(3)), (2, bfe!(7))].into_iter().collect();
            circuit.evaluate(&mut assignment).unwrap();
            assignment
        };
        assert_eq!(solve(), solve());
    }

    #[test]
    fn dependency_ordered_circuit_is_valid() {
        let a = wire_input(1, "a");
        let circuit = ArithCircuit::new(vec![
            mul(a.clone(), a.clone(), Wire::Intermediate(2)),
            mul(Wire::Intermediate(2), a.clone(), Wire::Output(3)),
        ]);
        assert!(circuit.is_valid());
    }

    #[test]
    fn reading_a_wire_defined_later_is_invalid() {
        let a = wire_input(1, "a");
        let circuit = ArithCircuit::new(vec![
            mul(Wire::Intermediate(2), a.clone(), Wire::Output(3)),
            mul(a.clone(), a.clone(), Wire::Intermediate(2)),
        ]);
        assert!(!circuit.is_valid());
    }

    #[test]
    fn writing_to_an_input_wire_is_invalid() {
        let a = wire_input(1, "a");
        let b = wire_input(2, "b");
        let circuit = ArithCircuit::new(vec![mul(a.clone(), a.clone(), b.clone())]);
        assert!(!circuit.is_valid());
    }

    #[test]
    fn reading_an_output_wire_is_invalid() {
        let a = wire_input(1, "a");
        let circuit = ArithCircuit::new(vec![
            mul(a.clone(), a.clone(), Wire::Output(2)),
            mul(Wire::Output(2), a.clone(), Wire::Output(3)),
        ]);
        assert!(!circuit.is_valid());
    }

    #[test]
    fn the_constant_one_wire_is_always_in_scope() {
        let gate = Gate::<BFieldElement>::Mul {
            lhs: AffineCircuit::var(Wire::Intermediate(ONE_WIRE)),
            rhs: AffineCircuit::constant(bfe!(5)),
            out: Wire::Output(1),
        };
        assert!(ArithCircuit::new(vec![gate]).is_valid());
    }

    #[test]
    fn circuit_vars_duplicate_label_overwrites() {
        let mut vars = CircuitVars::default();
        vars.record_input(1, "a", Visibility::Public);
        vars.record_input(2, "a", Visibility::Private);
        assert_eq!(Some(&2), vars.labels.get("a"));
        assert_eq!(2, vars.input_count());
    }

    #[test]
    fn intermediates_are_everything_unclassified() {
        let mut vars = CircuitVars::default();
        vars.record_input(1, "a", Visibility::Public);
        vars.record_var(2);
        vars.record_var(3);
        vars.record_output(4);
        assert_eq!(vec![2, 3], vars.intermediates().collect::<Vec<_>>());
    }
}
