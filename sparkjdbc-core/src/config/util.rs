use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Deserializer, Value};

/// Parses the supplied string as a config value
pub fn parse_config<'a>(conf_str: impl Into<&'a str>) -> Result<Value> {
    Value::deserialize(Deserializer::from_str(conf_str.into()))
        .context("Failed to parse configuration yaml")
}

/// Renders a scalar config value as a string
pub(crate) fn scalar_to_string(val: &Value) -> Option<String> {
    match val {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_yaml::Mapping;

    use super::*;

    #[test]
    fn test_parse_config() {
        let parsed = parse_config("a: test").unwrap();

        assert_eq!(
            parsed,
            Value::Mapping({
                let mut map = Mapping::new();
                map.insert(
                    Value::String("a".to_string()),
                    Value::String("test".to_string()),
                );
                map
            })
        );
    }

    #[test]
    fn test_parse_config_invalid() {
        assert!(parse_config("@@@").is_err());
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&Value::Bool(true)), Some("true".into()));
        assert_eq!(scalar_to_string(&Value::Number(5.into())), Some("5".into()));
        assert_eq!(scalar_to_string(&Value::Null), Some("".into()));
        assert_eq!(scalar_to_string(&Value::Sequence(vec![])), None);
    }
}
