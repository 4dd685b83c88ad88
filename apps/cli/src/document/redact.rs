//! Redaction — produces the public projection of a document.

use serde_json::Value;

use crate::document::PRIVATE_PREFIX;

/// Strips private-marked content from `doc` at every depth.
///
/// Object keys starting with `_` are dropped and the kept values recurse,
/// preserving key order. Array items that are objects go through a
/// three-phase filter: items carrying a truthy `_name` but no truthy `name`
/// are dropped outright (draft entries), then redaction recurses, then items
/// left without any keys are dropped. Non-object items pass through the
/// first and last phase untouched. An array emptied this way is kept as `[]`.
pub fn redact(doc: Value) -> Value {
    match doc {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !is_draft_entry(item))
                .map(redact)
                .filter(|item| match item {
                    Value::Object(map) => !map.is_empty(),
                    _ => true,
                })
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !key.starts_with(PRIVATE_PREFIX))
                .map(|(key, value)| (key, redact(value)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// An array item with a truthy `_name` but no truthy `name` is a draft entry:
/// it exists for the author's bookkeeping only and never goes public.
fn is_draft_entry(item: &Value) -> bool {
    match item {
        Value::Object(map) => {
            map.get("_name").is_some_and(is_truthy) && !map.get("name").is_some_and(is_truthy)
        }
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
