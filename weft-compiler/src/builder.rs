use circuit::circuit::ArithCircuit;
use circuit::circuit::CircuitVars;
use circuit::field::CircuitField;
use circuit::gate::Gate;
use circuit::wire::Visibility;
use circuit::wire::Wire;

/// Sequential circuit construction state.
///
/// One builder is exclusively owned by one compilation: it hands out fresh,
/// monotonically increasing variable ids (id 0 stays reserved for the
/// constant-one wire), records the classification of every id, and collects
/// emitted gates in emission order. [`build`](Self::build) consumes the
/// builder and yields the immutable `(circuit, vars)` pair.
#[derive(Debug, Clone)]
pub struct CircuitBuilder<F> {
    next_var: usize,
    gates: Vec<Gate<F>>,
    vars: CircuitVars,
}

impl<F: CircuitField> Default for CircuitBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: CircuitField> CircuitBuilder<F> {
    pub fn new() -> Self {
        Self {
            next_var: 1,
            gates: vec![],
            vars: CircuitVars::default(),
        }
    }

    /// Allocate the next free variable id and register it.
    pub fn fresh(&mut self) -> usize {
        let id = self.next_var;
        self.next_var += 1;
        self.vars.record_var(id);
        id
    }

    /// A fresh compiler temporary.
    pub fn fresh_intermediate(&mut self) -> Wire {
        Wire::Intermediate(self.fresh())
    }

    /// A fresh labeled input wire of the given visibility.
    ///
    /// Re-using a label re-binds it to the new id in the label map; the
    /// earlier registration is silently shadowed (last write wins).
    pub fn fresh_input(&mut self, label: &str, visibility: Visibility) -> Wire {
        let id = self.fresh();
        self.vars.record_input(id, label, visibility);
        Wire::Input {
            id,
            label: label.to_string(),
            visibility,
        }
    }

    pub fn fresh_public_input(&mut self, label: &str) -> Wire {
        self.fresh_input(label, Visibility::Public)
    }

    pub fn fresh_private_input(&mut self, label: &str) -> Wire {
        self.fresh_input(label, Visibility::Private)
    }

    /// A fresh designated result slot.
    pub fn fresh_output(&mut self) -> Wire {
        let id = self.fresh();
        self.vars.record_output(id);
        Wire::Output(id)
    }

    /// Append a gate. Gates appear in the final circuit in the exact order
    /// of their `emit` calls.
    pub fn emit(&mut self, gate: Gate<F>) {
        self.gates.push(gate);
    }

    pub fn build(self) -> (ArithCircuit<F>, CircuitVars) {
        (ArithCircuit::new(self.gates), self.vars)
    }
}
