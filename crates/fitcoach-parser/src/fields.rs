//! Field coercion and defaulting policy.
//!
//! One rule per function, every function total: inspect a raw JSON
//! value, return the coerced result or the configured default. The
//! whole defaulting table lives in this module so it stays auditable
//! and each rule is testable on its own.

use serde_json::Value;

use fitcoach_types::{Difficulty, MealType, ParserDefaults};

/// Trimmed text from a JSON string or number.
///
/// `None` for anything else, including a string that is empty after
/// trimming.
pub(crate) fn trimmed_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer from a JSON number or numeric string.
///
/// Float values truncate toward zero; fractional strings do not
/// parse and yield `None`.
pub(crate) fn int_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Float from a JSON number or numeric string.
pub(crate) fn float_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// String list from a single string or an array of strings.
///
/// Items are trimmed; empty and non-string items are dropped.
pub(crate) fn string_or_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(Value::Array(items)) => collect_strings(items),
        _ => Vec::new(),
    }
}

/// String list strictly from an array; any other shape yields empty.
pub(crate) fn string_items(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => collect_strings(items),
        _ => Vec::new(),
    }
}

fn collect_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            _ => None,
        })
        .collect()
}

/// Text field with a fallback for missing, empty, or non-text values.
pub(crate) fn text_or(value: Option<&Value>, fallback: &str) -> String {
    trimmed_string(value).unwrap_or_else(|| fallback.to_string())
}

/// Sets count: coerced then kept within 1..=10, else the default.
pub(crate) fn sets(value: Option<&Value>, defaults: &ParserDefaults) -> u32 {
    match int_value(value) {
        Some(n) => n.clamp(1, 10) as u32,
        None => defaults.exercise_sets,
    }
}

/// Rest seconds: coerced then floored at zero, else the default.
pub(crate) fn rest_seconds(value: Option<&Value>, defaults: &ParserDefaults) -> u32 {
    match int_value(value) {
        Some(n) => n.clamp(0, u32::MAX as i64) as u32,
        None => defaults.exercise_rest_seconds,
    }
}

/// Workout duration: must be positive, else the default.
pub(crate) fn duration_minutes(value: Option<&Value>, defaults: &ParserDefaults) -> u32 {
    match int_value(value) {
        Some(n) if n > 0 => n.min(u32::MAX as i64) as u32,
        _ => defaults.workout_duration_minutes,
    }
}

/// Meal prep time: coerced then floored at zero, else the default.
pub(crate) fn prep_time_minutes(value: Option<&Value>, defaults: &ParserDefaults) -> u32 {
    match int_value(value) {
        Some(n) => n.clamp(0, u32::MAX as i64) as u32,
        None => defaults.meal_prep_time_minutes,
    }
}

/// Difficulty from the closed set, matched case-insensitively, else
/// the configured default.
pub(crate) fn difficulty(value: Option<&Value>, defaults: &ParserDefaults) -> Difficulty {
    difficulty_opt(value).unwrap_or_else(|| defaults.difficulty.clone())
}

/// Difficulty without a fallback: `None` when missing or outside the
/// set, so the caller can infer one instead.
pub(crate) fn difficulty_opt(value: Option<&Value>) -> Option<Difficulty> {
    trimmed_string(value).and_then(|s| Difficulty::parse_loose(&s))
}

/// Meal type from the closed set, matched case-insensitively, else
/// the configured default.
pub(crate) fn meal_type(value: Option<&Value>, defaults: &ParserDefaults) -> MealType {
    trimmed_string(value)
        .and_then(|s| MealType::parse_loose(&s))
        .unwrap_or_else(|| defaults.meal_type.clone())
}

/// Calories: non-negative integer, 0 when missing or garbage.
pub(crate) fn calories(value: Option<&Value>) -> u32 {
    int_value(value)
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Macro grams: non-negative float, 0.0 when missing or garbage.
pub(crate) fn grams(value: Option<&Value>) -> f64 {
    float_value(value).map(|f| f.max(0.0)).unwrap_or(0.0)
}
