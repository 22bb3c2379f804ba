use crate::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key wrapping every FreshBooks response body
pub const ENVELOPE_KEY: &str = "response";

/// Takes the value under `response` out of a body
///
/// # Errors
/// `AppError::MissingField` when the body has no `response` key
pub fn unwrap_envelope(mut body: Value) -> AppResult<Value> {
    match body.get_mut(ENVELOPE_KEY) {
        Some(inner) => Ok(inner.take()),
        None => Err(AppError::MissingField(ENVELOPE_KEY.to_string())),
    }
}

/// Follows `path` key by key and returns the value found there
///
/// # Errors
/// `AppError::MissingField` naming the dotted prefix that could not be resolved
pub fn drill<'a>(body: &'a Value, path: &[&str]) -> AppResult<&'a Value> {
    let mut current = body;
    for (depth, key) in path.iter().enumerate() {
        current = current
            .get(key)
            .ok_or_else(|| AppError::MissingField(path[..=depth].join(".")))?;
    }
    Ok(current)
}

/// Follows `path` and deserializes the value found there
///
/// # Errors
/// * `AppError::MissingField` if the path does not resolve
/// * `AppError::Json` if the value has the wrong shape
pub fn drill_as<T: DeserializeOwned>(body: &Value, path: &[&str]) -> AppResult<T> {
    let value = drill(body, path)?;
    Ok(T::deserialize(value)?)
}
