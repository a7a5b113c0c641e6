use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use super::util::scalar_to_string;

/// A stored connection to an external system, such as a database
/// or a spark cluster, which jobs refer to by id
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// The ID of the connection
    pub id: String,
    /// The type of the connection, eg "postgres" or "spark"
    pub r#type: String,
    /// The host, for spark connections this is the master url
    pub host: Option<String>,
    pub port: Option<u16>,
    /// The target database/catalog
    pub schema: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    /// Free-form connection properties
    #[serde(default)]
    pub extra: ConnectionExtra,
}

impl ConnectionConfig {
    pub fn new(id: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            r#type: r#type.into(),
            host: None,
            port: None,
            schema: None,
            login: None,
            password: None,
            extra: ConnectionExtra::default(),
        }
    }
}

/// Connection extra properties
///
/// Accepts either a mapping or a json encoded object, all values
/// are normalised into strings.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConnectionExtra(BTreeMap<String, String>);

impl ConnectionExtra {
    pub fn new(props: BTreeMap<String, String>) -> Self {
        Self(props)
    }

    /// Parses the extras from a json object string
    pub fn parse_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }

        let obj: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("Failed to parse connection extra as json")?;

        Ok(Self(
            obj.into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        v => v.to_string(),
                    };
                    (k, v)
                })
                .collect(),
        ))
    }

    /// Parses the extras from a yaml value
    pub fn from_value(val: Value) -> Result<Self> {
        match val {
            Value::Null => Ok(Self::default()),
            Value::String(json) => Self::parse_json(&json),
            Value::Mapping(map) => {
                let mut props = BTreeMap::new();
                for (k, v) in map.into_iter() {
                    let key = match scalar_to_string(&k) {
                        Some(k) => k,
                        None => bail!("Connection extra keys must be scalars, found {:?}", k),
                    };
                    let val = match scalar_to_string(&v) {
                        Some(v) => v,
                        None => bail!("Connection extra \"{}\" must be a scalar value", key),
                    };
                    props.insert(key, val);
                }

                Ok(Self(props))
            }
            v => bail!(
                "Connection extra must be a mapping or a json string, found {:?}",
                v
            ),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.0.insert(key.into(), val.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for ConnectionExtra {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let val = Value::deserialize(deserializer)?;
        Self::from_value(val).map_err(|e| D::Error::custom(format!("{:#}", e)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConnectionExtra {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::config::parse_config;

    use super::*;

    #[test]
    fn test_parse_connection_with_mapping_extra() {
        let conf = parse_config(
            r#"
id: jdbc-default
type: postgres
host: localhost
port: 5432
schema: default
login: user
password: supersecret
extra:
  conn_prefix: "jdbc:postgresql://"
  ssl: true
"#,
        )
        .unwrap();

        let parsed: ConnectionConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(
            parsed,
            ConnectionConfig {
                id: "jdbc-default".into(),
                r#type: "postgres".into(),
                host: Some("localhost".into()),
                port: Some(5432),
                schema: Some("default".into()),
                login: Some("user".into()),
                password: Some("supersecret".into()),
                extra: [("conn_prefix", "jdbc:postgresql://"), ("ssl", "true")]
                    .into_iter()
                    .collect(),
            }
        );
    }

    #[test]
    fn test_parse_connection_with_json_extra() {
        let conf = parse_config(
            r#"
id: spark-default
type: spark
host: yarn://yarn-master
extra: '{"queue": "root.etl", "deploy-mode": "cluster", "retries": 3}'
"#,
        )
        .unwrap();

        let parsed: ConnectionConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(parsed.extra.get("queue"), Some("root.etl"));
        assert_eq!(parsed.extra.get("deploy-mode"), Some("cluster"));
        assert_eq!(parsed.extra.get("retries"), Some("3"));
        assert_eq!(parsed.port, None);
    }

    #[test]
    fn test_parse_connection_without_extra() {
        let conf = parse_config("id: a\ntype: spark").unwrap();

        let parsed: ConnectionConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(parsed, ConnectionConfig::new("a", "spark"));
    }

    #[test]
    fn test_parse_extra_invalid_json() {
        assert!(ConnectionExtra::parse_json("{not json").is_err());
        assert_eq!(
            ConnectionExtra::parse_json("  ").unwrap(),
            ConnectionExtra::default()
        );
    }

    #[test]
    fn test_parse_extra_nested_mapping_is_rejected() {
        let conf = parse_config("a:\n  b: c").unwrap();

        assert!(ConnectionExtra::from_value(conf).is_err());
    }
}
