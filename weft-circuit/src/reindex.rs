//! Canonical variable renumbering for interoperability with external
//! R1CS/witness file formats.
//!
//! The external format requires contiguous ids in a fixed order: the
//! constant-one wire first, then public inputs, private inputs, outputs, and
//! finally all remaining intermediate wires. Reindexing computes the
//! bijective permutation into that order and applies it to every wire
//! occurrence; gates are never reordered and their shapes never change.

use std::collections::HashMap;

use crate::circuit::ArithCircuit;
use crate::circuit::CircuitVars;
use crate::field::CircuitField;
use crate::wire::ONE_WIRE;
use crate::wire::Wire;

/// The permutation old-id → new-id that brings `vars` into canonical order.
///
/// A bijection on the full id set (plus the fixed point at the one-wire).
/// Public inputs keep their relative order, as do the other classes.
pub fn canonical_permutation(vars: &CircuitVars) -> HashMap<usize, usize> {
    let classes = [&vars.public_inputs, &vars.private_inputs, &vars.outputs];
    let canonical_order = classes
        .into_iter()
        .flatten()
        .copied()
        .chain(vars.intermediates());

    let mut permutation = HashMap::new();
    permutation.insert(ONE_WIRE, ONE_WIRE);
    for (position, id) in canonical_order.enumerate() {
        permutation.insert(id, position + 1);
    }
    permutation
}

/// Renumber `vars` and `circuit` into the canonical external order.
///
/// Idempotent: a circuit already in canonical order maps to itself.
pub fn reindex<F: CircuitField>(
    vars: &CircuitVars,
    circuit: &ArithCircuit<F>,
) -> (CircuitVars, ArithCircuit<F>) {
    let permutation = canonical_permutation(vars);
    let renumber = |id: usize| {
        let Some(&new_id) = permutation.get(&id) else {
            panic!("the impossible happened: wire id {id} is absent from the circuit vars");
        };
        new_id
    };
    let relabel = |wire: &Wire| wire.with_id(renumber(wire.id()));

    let gates = circuit
        .gates()
        .iter()
        .map(|gate| gate.map_wires(&relabel))
        .collect();

    let new_vars = CircuitVars {
        all: vars.all.iter().map(|&id| renumber(id)).collect(),
        public_inputs: vars.public_inputs.iter().map(|&id| renumber(id)).collect(),
        private_inputs: vars.private_inputs.iter().map(|&id| renumber(id)).collect(),
        outputs: vars.outputs.iter().map(|&id| renumber(id)).collect(),
        labels: vars
            .labels
            .iter()
            .map(|(label, &id)| (label.clone(), renumber(id)))
            .collect(),
    };

    (new_vars, ArithCircuit::new(gates))
}
