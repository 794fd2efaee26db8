// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serde helpers shared by the document types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use super::ids::Id;

/// Marks a key as present even when its value is `null`.
///
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// An id that may be missing, `null`, blank or not a string; all of these read as `None`.
pub(crate) fn optional_id<'de, D, T>(deserializer: D) -> Result<Option<Id<T>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_value(Option::<Value>::deserialize(deserializer)?)
        .and_then(|value| Id::new(value).ok()))
}

/// A string that may be missing or of another type; anything but a string reads as `None`.
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_value(Option::<Value>::deserialize(
        deserializer,
    )?))
}

fn optional_string_value(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!(found = json_kind(&other), "expected a string, ignoring value");
            None
        }
    }
}

/// A list whose unreadable entries are skipped instead of failing the whole document.
pub(crate) fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            warn!(found = json_kind(&other), "expected a list, ignoring value");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(&item) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable list entry");
                None
            }
        })
        .collect())
}

/// Missing, `null` and unreadable values all become `T::default()`.
pub(crate) fn lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => Ok(T::deserialize(&value).unwrap_or_else(|err| {
            warn!(error = %err, "unreadable value, using the default");
            T::default()
        })),
    }
}

/// Reads `value` as `T`. A value of another shape is kept verbatim in `extra` under `key`, so
/// it is written back untouched.
pub(crate) fn take_typed<T: DeserializeOwned>(
    value: Option<Value>,
    key: &str,
    extra: &mut Map<String, Value>,
) -> Option<T> {
    let value = value?;
    match T::deserialize(&value) {
        Ok(typed) => Some(typed),
        Err(_) => {
            extra.insert(key.to_owned(), value);
            None
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Writes integral coordinates as JSON integers, the way the host's own serializer does.
pub(crate) fn js_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
