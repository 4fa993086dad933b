// ABOUTME: Extracts the daily target JSON object from free-form advisory text
// ABOUTME: Accepts a bare object or a fenced block, applies fiber and water defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use macro_core::constants::targets::{DEFAULT_FIBER_G, DEFAULT_WATER_ML};
use macro_core::models::TargetValues;
use regex::Regex;
use serde_json::{Map, Value};

use super::TargetError;

/// Fenced block, unlabeled or labeled `json`, interior captured
static FENCED_BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:[jJ][sS][oO][nN])?[ \t]*\r?\n(.*?)\r?\n?[ \t]*```").ok()
});

/// Parse advisory text into a target candidate
///
/// Two attempts are made: the whole text as a JSON object, then the interior
/// of each fenced block in order. `daily_fiber_g` and `daily_water_ml` fall
/// back to defaults when absent or null; the four energy fields are required.
///
/// # Errors
///
/// Returns [`TargetError::MalformedResponse`] when no JSON object can be found
/// or a required field is missing, non-numeric, or negative.
pub fn parse_advisory_response(text: &str) -> Result<TargetValues, TargetError> {
    let object = extract_object(text).ok_or_else(|| {
        TargetError::MalformedResponse("no JSON object found in advisory text".to_owned())
    })?;

    let calories = required_number(&object, "daily_calories")?;
    if calories > f64::from(u32::MAX) {
        return Err(TargetError::MalformedResponse(
            "daily_calories out of range".to_owned(),
        ));
    }

    Ok(TargetValues {
        daily_calories: calories.round() as u32,
        daily_protein_g: required_number(&object, "daily_protein_g")?,
        daily_carbs_g: required_number(&object, "daily_carbs_g")?,
        daily_fats_g: required_number(&object, "daily_fats_g")?,
        daily_fiber_g: optional_number(&object, "daily_fiber_g")?.unwrap_or(DEFAULT_FIBER_G),
        daily_water_ml: optional_number(&object, "daily_water_ml")?.unwrap_or(DEFAULT_WATER_ML),
        notes: object
            .get("notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_owned(),
    })
}

fn extract_object(text: &str) -> Option<Map<String, Value>> {
    if let Some(object) = parse_object(text) {
        return Some(object);
    }

    let fenced = FENCED_BLOCK.as_ref()?;
    fenced
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| parse_object(m.as_str()))
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn required_number(object: &Map<String, Value>, field: &str) -> Result<f64, TargetError> {
    optional_number(object, field)?
        .ok_or_else(|| TargetError::MalformedResponse(format!("missing {field}")))
}

/// Numbers and numeric strings are accepted; anything else is malformed
fn optional_number(object: &Map<String, Value>, field: &str) -> Result<Option<f64>, TargetError> {
    let value = match object.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        Some(_) => Err(TargetError::MalformedResponse(format!(
            "{field} must be a non-negative number"
        ))),
        None => Err(TargetError::MalformedResponse(format!(
            "{field} is not numeric"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_without_trailing_newline() {
        let text = "```json\n{\"daily_calories\":1800,\"daily_protein_g\":120,\"daily_carbs_g\":200,\"daily_fats_g\":60}```";
        let values = parse_advisory_response(text);
        assert!(matches!(values, Ok(ref v) if v.daily_calories == 1800));
    }

    #[test]
    fn test_first_parseable_fence_wins() {
        let text = "Example shape:\n```\nnot json\n```\nAnswer:\n```json\n{\"daily_calories\":2000,\"daily_protein_g\":150,\"daily_carbs_g\":220,\"daily_fats_g\":70}\n```";
        let values = parse_advisory_response(text);
        assert!(matches!(values, Ok(ref v) if v.daily_calories == 2000));
    }

    #[test]
    fn test_top_level_array_is_malformed() {
        assert!(matches!(
            parse_advisory_response("[1, 2, 3]"),
            Err(TargetError::MalformedResponse(_))
        ));
    }
}
