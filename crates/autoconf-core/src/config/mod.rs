//! Configuration values produced by defaults, answers and transformers

use serde_json::{Map, Value};

/// Caller-defined configuration, keyed by name in insertion order
pub type Config = Map<String, Value>;

/// Collected prompt answers, keyed by question name in prompt order
pub type Answers = Map<String, Value>;

/// Overlay `answers` on top of `defaults`; answers win on conflicting keys
pub fn merge_answers(defaults: &Config, answers: &Answers) -> Config {
    let mut merged = defaults.clone();
    for (key, value) in answers {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Convert any JSON object value into a [`Config`]; other values yield an empty map
pub fn into_config(value: Value) -> Config {
    match value {
        Value::Object(map) => map,
        _ => Config::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answers_override_defaults() {
        let defaults = into_config(json!({"host": "localhost", "port": 3000}));
        let answers = into_config(json!({"port": 8080, "debug": true}));

        let merged = merge_answers(&defaults, &answers);

        assert_eq!(
            Value::Object(merged),
            json!({"host": "localhost", "port": 8080, "debug": true})
        );
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let defaults = into_config(json!({"port": 3000}));
        let answers = into_config(json!({"port": 8080}));

        let _ = merge_answers(&defaults, &answers);

        assert_eq!(defaults["port"], json!(3000));
        assert_eq!(answers["port"], json!(8080));
    }

    #[test]
    fn test_empty_answers_equal_defaults() {
        let defaults = into_config(json!({"a": 1, "nested": {"b": [1, 2]}}));
        assert_eq!(merge_answers(&defaults, &Answers::new()), defaults);
    }

    #[test]
    fn test_non_object_value_is_empty_config() {
        assert!(into_config(json!([1, 2, 3])).is_empty());
    }
}
