//! Overlay merge — deep-merges a variant overlay onto the base document.

use serde_json::Value;

/// Deep merge with strict overlay-over-base precedence.
///
/// Recursion happens only where both sides are objects. Scalars and arrays
/// from the overlay replace the base value wholesale — arrays are never
/// element-merged. Base keys keep their positions; overlay-only keys are
/// appended in overlay order. Total by construction: there is no
/// unresolvable conflict.
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay)) => {
            for (key, incoming) in overlay {
                let value = match merged.get(&key) {
                    Some(existing) if existing.is_object() && incoming.is_object() => {
                        merge(existing.clone(), incoming)
                    }
                    _ => incoming,
                };
                // Re-inserting an existing key keeps its original position.
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_overlay_changes_nothing() {
        let base = json!({"basics": {"name": "Ada", "label": "Engineer"}, "work": [1, 2]});
        assert_eq!(merge(base.clone(), json!({})), base);
    }

    #[test]
    fn test_overlay_wins_on_scalar_conflict() {
        let base = json!({"basics": {"label": "Engineer", "email": "a@b.c"}});
        let overlay = json!({"basics": {"label": "iOS Engineer"}});
        let merged = merge(base, overlay);
        assert_eq!(merged["basics"]["label"], "iOS Engineer");
        // Sibling keys absent from the overlay are preserved.
        assert_eq!(merged["basics"]["email"], "a@b.c");
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let base = json!({"skills": [{"name": "Rust"}, {"name": "Go"}]});
        let overlay = json!({"skills": [{"name": "Swift"}]});
        let merged = merge(base, overlay);
        assert_eq!(merged["skills"], json!([{"name": "Swift"}]));
    }

    #[test]
    fn test_overlay_scalar_replaces_base_subtree() {
        let base = json!({"meta": {"version": 1, "channel": "stable"}});
        let overlay = json!({"meta": "none"});
        assert_eq!(merge(base, overlay)["meta"], "none");
    }

    #[test]
    fn test_base_key_order_preserved_and_new_keys_appended() {
        let base = json!({"one": 1, "two": 2, "three": 3});
        let overlay = json!({"two": 20, "four": 4});
        let merged = merge(base, overlay);
        let keys: Vec<&String> = merged.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["one", "two", "three", "four"]);
        assert_eq!(merged["two"], 20);
    }

    #[test]
    fn test_nested_recursion_only_through_object_pairs() {
        let base = json!({"a": {"b": {"c": 1, "d": 2}}});
        let overlay = json!({"a": {"b": {"c": 10}}});
        let merged = merge(base, overlay);
        assert_eq!(merged["a"]["b"]["c"], 10);
        assert_eq!(merged["a"]["b"]["d"], 2);
    }
}
