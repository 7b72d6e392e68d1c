use std::collections::HashMap;

use circuit::field::CircuitField;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InputMapError {
    #[error("malformed input map: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode a JSON label → integer object, e.g. `{"a": 3, "b": 5}`, into the
/// input map the [batch solver](crate::solve::solve) consumes. Integers are
/// reduced into the field.
pub fn parse_input_map<F: CircuitField>(json: &str) -> Result<HashMap<String, F>, InputMapError> {
    let raw: HashMap<String, u64> = serde_json::from_str(json)?;
    let inputs = raw
        .into_iter()
        .map(|(label, value)| (label, F::from_u64(value)))
        .collect();
    Ok(inputs)
}
