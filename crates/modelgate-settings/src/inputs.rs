use crate::error::InputError;
use modelgate_domain::model::{Candidate, EvaluationContext};
use serde_json::Value;

const LIST_KEYS: &[&str] = &["candidates", "models"];

/// Parse a candidate list: a bare array, or an object wrapping one under `candidates`/`models`.
pub fn parse_candidates_json(input: &str) -> Result<Vec<Candidate>, InputError> {
    let value: Value = serde_json::from_str(input)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or(InputError::NotACandidateList)?,
        _ => return Err(InputError::NotACandidateList),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Candidate::from_value(item).ok_or(InputError::CandidateNotObject { index })
        })
        .collect()
}

pub fn parse_context_json(input: &str) -> Result<EvaluationContext, InputError> {
    Ok(serde_json::from_str(input)?)
}
