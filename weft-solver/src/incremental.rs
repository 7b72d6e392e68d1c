use std::collections::HashMap;

use circuit::circuit::ArithCircuit;
use circuit::circuit::CircuitVars;
use circuit::field::CircuitField;
use itertools::Itertools;
use thiserror::Error;

use crate::solve::SolveError;
use crate::solve::Witness;
use crate::solve::solve_seeded;

type Result<T> = std::result::Result<T, IncrementalSolverError>;

/// The two-word signal address used by the external host ABI: the low and
/// high 32-bit halves of the fnv1a-64 hash of an input label.
pub type SignalHash = (u32, u32);

/// The fnv1a-64 hash of `label`, split into `(low, high)` 32-bit words.
pub fn label_hash(label: &str) -> SignalHash {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for byte in label.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    (hash as u32, (hash >> 32) as u32)
}

#[non_exhaustive]
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum IncrementalSolverError {
    #[error("no input signal registered under hash {0:#010x}:{1:#010x}")]
    UnknownSignal(u32, u32),

    #[error("witness values are not available until every input has been received")]
    NotYetSolved,

    #[error("all inputs have been received; the session is already solved")]
    AlreadySolved,

    #[error("the witness holds no value for wire {0}")]
    UnknownWire(usize),

    #[error("transfer buffer does not hold a field element")]
    MalformedBuffer,

    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum SolverState<F> {
    AwaitingInputs(HashMap<usize, F>),
    Solved(Witness<F>),
}

/// The incremental witness solver driven by an external host.
///
/// Inputs arrive one labeled signal at a time, addressed by
/// [hash pair](SignalHash) rather than by string, with the value passed
/// through a fixed-width little-endian byte buffer of
/// [`CircuitField::BUFFER_BYTES`] bytes. The moment the last declared input
/// arrives, the full circuit is evaluated and the session transitions to
/// solved; witness reads before that point fail with
/// [`IncrementalSolverError::NotYetSolved`].
///
/// One session exclusively owns its buffer and state; concurrent access is
/// the host's problem, not modeled here.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IncrementalSolver<F> {
    circuit: ArithCircuit<F>,
    vars: CircuitVars,
    signals: HashMap<SignalHash, usize>,
    buffer: Vec<u8>,
    state: SolverState<F>,
}

impl<F: CircuitField> IncrementalSolver<F> {
    pub fn new(circuit: ArithCircuit<F>, vars: CircuitVars) -> Self {
        // First registration wins on hash collision. Distinct labels
        // colliding is undetected — an accepted limitation of the external
        // protocol's 64-bit addressing, not of this core.
        let mut signals = HashMap::new();
        for (label, &id) in vars.labels.iter().sorted() {
            signals.entry(label_hash(label)).or_insert(id);
        }

        Self {
            circuit,
            vars,
            signals,
            buffer: vec![0; F::BUFFER_BYTES],
            state: SolverState::AwaitingInputs(HashMap::new()),
        }
    }

    /// Total number of wires the solved witness will hold, including the
    /// constant-one wire.
    pub fn witness_size(&self) -> usize {
        self.vars.all.len() + 1
    }

    /// Number of declared (public and private) input signals.
    pub fn input_count(&self) -> usize {
        self.vars.input_count()
    }

    /// The variable id registered under the given signal hash.
    pub fn signal_id(&self, hash: SignalHash) -> Option<usize> {
        self.signals.get(&hash).copied()
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.state, SolverState::Solved(_))
    }

    /// Receive one labeled input. Once the count of distinct received
    /// inputs reaches [`input_count`](Self::input_count), the circuit is
    /// evaluated immediately and the session becomes solved.
    pub fn push_input(&mut self, hash: SignalHash, value: F) -> Result<()> {
        let id = self
            .signal_id(hash)
            .ok_or(IncrementalSolverError::UnknownSignal(hash.0, hash.1))?;

        let SolverState::AwaitingInputs(partial) = &mut self.state else {
            return Err(IncrementalSolverError::AlreadySolved);
        };
        partial.insert(id, value);

        if partial.len() == self.vars.input_count() {
            let inputs = std::mem::take(partial);
            let witness = solve_seeded(&self.circuit, inputs)?;
            self.state = SolverState::Solved(witness);
        }
        Ok(())
    }

    /// The witness value of `id`, once solved.
    pub fn witness_value(&self, id: usize) -> Result<F> {
        let SolverState::Solved(witness) = &self.state else {
            return Err(IncrementalSolverError::NotYetSolved);
        };
        witness
            .get(id)
            .ok_or(IncrementalSolverError::UnknownWire(id))
    }

    /// The shared transfer buffer, one field element wide.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Receive the input addressed by `hash`, taking its value from the
    /// transfer buffer.
    pub fn push_input_from_buffer(&mut self, hash: SignalHash) -> Result<()> {
        let value =
            F::from_le_bytes(&self.buffer).ok_or(IncrementalSolverError::MalformedBuffer)?;
        self.push_input(hash, value)
    }

    /// Copy the witness value of `id` into the transfer buffer.
    pub fn read_witness_into_buffer(&mut self, id: usize) -> Result<()> {
        let value = self.witness_value(id)?;
        value.to_le_bytes(&mut self.buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use compiler::prelude::*;
    use twenty_first::prelude::*;

    use super::*;

    /// `out = a · b + c` with three public inputs.
    fn session() -> (IncrementalSolver<BFieldElement>, usize) {
        let mut builder = CircuitBuilder::new();
        let a = Expr::var(builder.fresh_public_input("a"));
        let b = Expr::var(builder.fresh_public_input("b"));
        let c = Expr::var(builder.fresh_private_input("c"));
        let out = compile(&(a * b + c), &mut builder);
        let (circuit, vars) = builder.build();
        (IncrementalSolver::new(circuit, vars), out.id())
    }

    #[test]
    fn session_reports_declared_sizes() {
        let (solver, _) = session();
        assert_eq!(3, solver.input_count());
        // 3 inputs + 1 intermediate + 1 output + the one-wire
        assert_eq!(6, solver.witness_size());
    }

    #[test]
    fn the_last_input_triggers_solving() {
        let (mut solver, out) = session();

        solver.push_input(label_hash("a"), bfe!(3)).unwrap();
        assert!(!solver.is_solved());
        assert_eq!(
            Err(IncrementalSolverError::NotYetSolved),
            solver.witness_value(out)
        );

        solver.push_input(label_hash("b"), bfe!(4)).unwrap();
        solver.push_input(label_hash("c"), bfe!(5)).unwrap();
        assert!(solver.is_solved());
        assert_eq!(Ok(bfe!(17)), solver.witness_value(out));
    }

    #[test]
    fn resending_an_input_does_not_count_twice() {
        let (mut solver, _) = session();
        solver.push_input(label_hash("a"), bfe!(3)).unwrap();
        solver.push_input(label_hash("a"), bfe!(7)).unwrap();
        assert!(!solver.is_solved());
    }

    #[test]
    fn pushing_after_solving_is_rejected() {
        let (mut solver, _) = session();
        for (label, value) in [("a", 3), ("b", 4), ("c", 5)] {
            solver.push_input(label_hash(label), bfe!(value)).unwrap();
        }
        let refused = solver.push_input(label_hash("a"), bfe!(9)).unwrap_err();
        assert_eq!(IncrementalSolverError::AlreadySolved, refused);
    }

    #[test]
    fn unknown_signal_hashes_are_rejected() {
        let (mut solver, _) = session();
        let bogus = label_hash("no_such_signal");
        assert_eq!(
            Err(IncrementalSolverError::UnknownSignal(bogus.0, bogus.1)),
            solver.push_input(bogus, bfe!(1))
        );
    }

    #[test]
    fn values_round_trip_through_the_transfer_buffer() {
        let (mut solver, out) = session();
        assert_eq!(BFieldElement::BUFFER_BYTES, solver.buffer().len());

        for (label, value) in [("a", 3_u64), ("b", 4), ("c", 5)] {
            bfe!(value).to_le_bytes(solver.buffer_mut());
            solver.push_input_from_buffer(label_hash(label)).unwrap();
        }

        solver.read_witness_into_buffer(out).unwrap();
        assert_eq!(
            Some(bfe!(17)),
            BFieldElement::from_le_bytes(solver.buffer())
        );
    }

    #[test]
    fn hash_words_are_stable() {
        // pinned so the external host's addressing cannot drift silently
        let (low, high) = label_hash("a");
        let reassembled = (u64::from(high) << 32) | u64::from(low);
        assert_eq!(0xaf63_dc4c_8601_ec8c, reassembled);
    }
}
