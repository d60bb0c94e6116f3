//! Field-by-field merging of configuration tiers.
//!
//! Objects merge recursively; every other value in the overlay replaces the
//! base outright. A null overlay value means "not specified" and keeps the base.

use serde_json::Value;

/// Merge `overlay` onto `base`, overlay winning.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let value = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers in order, later tiers winning.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keys_merge_individually() {
        let base = json!({"server": {"host": "127.0.0.1", "port": 5000}});
        let overlay = json!({"server": {"port": 8080}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"server": {"host": "127.0.0.1", "port": 8080}})
        );
    }

    #[test]
    fn null_keeps_base() {
        let base = json!({"session": {"ttl_days": 10}});
        let overlay = json!({"session": {"ttl_days": null}});
        assert_eq!(deep_merge(base.clone(), overlay), base);
    }

    #[test]
    fn scalar_replaces_object() {
        assert_eq!(
            deep_merge(json!({"server": {"port": 1}}), json!({"server": 7})),
            json!({"server": 7})
        );
    }

    #[test]
    fn later_tiers_win() {
        let tiers = vec![
            json!({"server": {"port": 1, "host": "a"}}),
            json!({"server": {"port": 2}}),
            json!({"server": {"host": "c"}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"server": {"port": 2, "host": "c"}})
        );
    }
}
