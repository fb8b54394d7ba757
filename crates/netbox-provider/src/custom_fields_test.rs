//! Property tests for custom field reconciliation

#[cfg(test)]
mod tests {
    use crate::custom_fields::{flatten_for_read, reconcile};
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    const KEYS: [&str; 6] = ["a", "b", "c", "d", "site_code", "owner"];

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z0-9 ]{0,8}".prop_map(Value::String),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            4 => arb_scalar(),
            1 => prop::collection::btree_map("[a-z]{1,3}", arb_scalar(), 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            1 => prop::collection::vec(arb_scalar(), 0..3).prop_map(Value::Array),
        ]
    }

    fn arb_fields() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map(prop::sample::select(KEYS.to_vec()), arb_value(), 0..KEYS.len())
            .prop_map(|m| m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn text(fields: &Map<String, Value>) -> String {
        serde_json::to_string(fields).expect("serialize fields")
    }

    /// Server-side effect of writing a custom-field payload
    fn apply(state: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
        let mut next = state.clone();
        next.extend(patch.clone());
        next
    }

    proptest! {
        #[test]
        fn clearing_everything_nulls_every_old_key(old in arb_fields()) {
            let result = reconcile(&text(&old), "").expect("reconcile");
            let expected: Map<String, Value> = old.keys().map(|k| (k.clone(), Value::Null)).collect();
            prop_assert_eq!(result, expected);
        }

        #[test]
        fn from_nothing_is_pure_upsert(new in arb_fields()) {
            let result = reconcile("", &text(&new)).expect("reconcile");
            prop_assert_eq!(result, new);
        }

        #[test]
        fn result_keys_follow_old_and_new(old in arb_fields(), new in arb_fields()) {
            let result = reconcile(&text(&old), &text(&new)).expect("reconcile");

            for (key, value) in &result {
                prop_assert!(old.contains_key(key) || new.contains_key(key));
                match new.get(key) {
                    Some(expected) => prop_assert_eq!(value, expected),
                    None => prop_assert_eq!(value, &Value::Null),
                }
            }
            for key in old.keys().chain(new.keys()) {
                prop_assert!(result.contains_key(key));
            }
        }

        #[test]
        fn all_null_flattens_to_empty(keys in prop::collection::btree_set(prop::sample::select(KEYS.to_vec()), 0..KEYS.len())) {
            let applied: Map<String, Value> = keys.into_iter().map(|k| (k.to_string(), Value::Null)).collect();
            prop_assert_eq!(flatten_for_read(&Value::Object(applied)).expect("flatten"), "");
        }

        #[test]
        fn flattened_text_parses_back_to_applied(applied in arb_fields()) {
            let flattened = flatten_for_read(&Value::Object(applied.clone())).expect("flatten");
            if applied.values().all(Value::is_null) {
                prop_assert_eq!(flattened, "");
            } else {
                let parsed: Map<String, Value> = serde_json::from_str(&flattened).expect("parse");
                prop_assert_eq!(parsed, applied);
            }
        }

        #[test]
        fn write_read_cycle_is_idempotent(old in arb_fields(), new in arb_fields()) {
            let first = reconcile(&text(&old), &text(&new)).expect("reconcile");
            let applied = apply(&old, &first);

            let flattened = flatten_for_read(&Value::Object(applied.clone())).expect("flatten");
            let second = reconcile(&flattened, &text(&new)).expect("reconcile again");

            // Re-sending never changes the server state again
            prop_assert_eq!(apply(&applied, &second), applied);
            if !flattened.is_empty() {
                prop_assert_eq!(second, first);
            }
        }
    }
}
