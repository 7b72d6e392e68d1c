use std::collections::HashMap;

use circuit::circuit::ArithCircuit;
use circuit::circuit::Assignment;
use circuit::circuit::CircuitVars;
use circuit::error::EvalError;
use circuit::field::CircuitField;
use circuit::wire::ONE_WIRE;
use itertools::Itertools;
use num_traits::One;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

type Result<T> = std::result::Result<T, SolveError>;

/// A total assignment of field elements to every wire the circuit can
/// produce, plus the constant-one wire. Only full evaluation produces one;
/// there is no such thing as a partial witness.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Witness<F> {
    values: HashMap<usize, F>,
}

impl<F: CircuitField> Witness<F> {
    pub fn get(&self, id: usize) -> Option<F> {
        self.values.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, F)> + '_ {
        self.values.iter().map(|(&id, &value)| (id, value))
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SolveError {
    /// A declared input label has no value in the supplied input map. The
    /// one recoverable, user-facing way for solving to fail.
    #[error("no value supplied for input \"{0}\"")]
    MissingInput(String),

    /// Evaluation failed. A contradiction here means the circuit itself is
    /// inconsistent — an internal bug of whatever produced the circuit,
    /// not of the caller's input.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Derive the full witness for `circuit` from a label → value input map.
///
/// Fails with [`SolveError::MissingInput`] if any declared input label lacks
/// a value; the lexicographically first missing label is reported. The
/// constant-one wire is bound to 1 both before and after evaluation.
/// Deterministic: identical circuit and inputs yield the identical witness.
pub fn solve<F: CircuitField>(
    circuit: &ArithCircuit<F>,
    vars: &CircuitVars,
    inputs: &HashMap<String, F>,
) -> Result<Witness<F>> {
    let mut seed = HashMap::new();
    for (label, &id) in vars.labels.iter().sorted() {
        let Some(&value) = inputs.get(label) else {
            return Err(SolveError::MissingInput(label.clone()));
        };
        seed.insert(id, value);
    }
    solve_seeded(circuit, seed)
}

/// Like [`solve`], but with inputs already resolved to wire ids. The
/// incremental solver feeds its partial map through here once complete.
pub(crate) fn solve_seeded<F: CircuitField>(
    circuit: &ArithCircuit<F>,
    input_values: HashMap<usize, F>,
) -> Result<Witness<F>> {
    let mut assignment = Assignment::new();
    assignment.bind(ONE_WIRE, F::one())?;
    for (id, value) in input_values {
        assignment.bind(id, value)?;
    }

    circuit.evaluate(&mut assignment)?;
    assignment.bind(ONE_WIRE, F::one())?;

    Ok(Witness {
        values: assignment.into_values(),
    })
}

#[cfg(test)]
mod tests {
    use circuit::reindex::canonical_permutation;
    use circuit::reindex::reindex;
    use compiler::prelude::*;
    use itertools::Itertools;
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;
    use test_strategy::proptest;
    use twenty_first::prelude::*;

    use super::*;

    /// `if a == b { a·2 } else { a + b }` with public `a`, private `b`.
    fn branchy_circuit() -> (ArithCircuit<BFieldElement>, CircuitVars, usize) {
        let mut builder = CircuitBuilder::new();
        let a = Expr::var(builder.fresh_public_input("a"));
        let b = Expr::var(builder.fresh_private_input("b"));
        let expr = Expr::if_then_else(
            a.clone().is_equal(b.clone()),
            a.clone() * Expr::constant(bfe!(2)),
            a + b,
        );
        let out = compile(&expr, &mut builder);
        let (circuit, vars) = builder.build();
        (circuit, vars, out.id())
    }

    fn input_map(a: u64, b: u64) -> HashMap<String, BFieldElement> {
        [("a".to_string(), bfe!(a)), ("b".to_string(), bfe!(b))]
            .into_iter()
            .collect()
    }

    #[test]
    fn branchy_circuit_end_to_end() {
        let (circuit, vars, out) = branchy_circuit();
        assert!(circuit.is_valid());

        let equal = solve(&circuit, &vars, &input_map(3, 3)).unwrap();
        assert_eq!(Some(bfe!(6)), equal.get(out));

        let unequal = solve(&circuit, &vars, &input_map(3, 5)).unwrap();
        assert_eq!(Some(bfe!(8)), unequal.get(out));
    }

    #[test]
    fn the_one_wire_is_always_bound() {
        let (circuit, vars, _) = branchy_circuit();
        let witness = solve(&circuit, &vars, &input_map(3, 5)).unwrap();
        assert_eq!(Some(bfe!(1)), witness.get(ONE_WIRE));
    }

    #[test]
    fn missing_inputs_are_reported_by_label() {
        let (circuit, vars, _) = branchy_circuit();
        let inputs = [("a".to_string(), bfe!(3))].into_iter().collect();
        let missing = solve(&circuit, &vars, &inputs).unwrap_err();
        assert_eq!(SolveError::MissingInput("b".to_string()), missing);
    }

    #[test]
    fn solving_twice_yields_identical_witnesses() {
        let (circuit, vars, _) = branchy_circuit();
        let inputs = input_map(3, 5);
        let first = solve(&circuit, &vars, &inputs).unwrap();
        let second = solve(&circuit, &vars, &inputs).unwrap();
        assert_eq!(first, second);
    }

    #[proptest]
    fn reindexing_preserves_solving_semantics(
        #[strategy(arb())] a: BFieldElement,
        #[strategy(arb())] b: BFieldElement,
    ) {
        let (circuit, vars, _) = branchy_circuit();
        let inputs = [("a".to_string(), a), ("b".to_string(), b)]
            .into_iter()
            .collect();
        let witness = solve(&circuit, &vars, &inputs).unwrap();

        let permutation = canonical_permutation(&vars);
        let (new_vars, new_circuit) = reindex(&vars, &circuit);
        prop_assert!(new_circuit.is_valid());
        let new_witness = solve(&new_circuit, &new_vars, &inputs).unwrap();

        prop_assert_eq!(witness.len(), new_witness.len());
        for (id, value) in witness.iter().sorted_by_key(|&(id, _)| id) {
            prop_assert_eq!(Some(value), new_witness.get(permutation[&id]));
        }
    }
}
