use serde::{Deserialize, Serialize};

pub use serde_yaml::{from_value, Mapping, Number, Sequence, Value};

mod connections;
pub use connections::*;
mod submission;
pub use submission::*;
mod spark;
pub use spark::*;
mod jobs;
pub use jobs::*;
mod util;
pub use util::*;

/// An entire configuration for the spark jdbc runner
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Stored connections which jobs can refer to by id
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    /// List of jdbc jobs which can be submitted
    #[serde(default)]
    pub jobs: Vec<JdbcJobConfig>,
}

impl AppConfig {
    /// Gets the job with the supplied id
    pub fn job(&self, id: &str) -> Option<&JdbcJobConfig> {
        self.jobs.iter().find(|j| j.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_parse() {
        let conf = parse_config(
            r#"
connections:
  - id: jdbc-default
    type: postgres
    host: localhost
    port: 5432
    schema: default
    login: user
    password: supersecret
    extra:
      conn_prefix: "jdbc:postgresql://"
jobs:
  - id: export
    application: /opt/spark_jdbc_script.py
    submission:
      jdbc_table: tableMcTableFace
"#,
        )
        .unwrap();

        let parsed: AppConfig = from_value(conf).unwrap();

        assert_eq!(parsed.connections.len(), 1);
        assert_eq!(parsed.connections[0].port, Some(5432));
        assert_eq!(parsed.job("export").unwrap().jdbc_conn_id, "jdbc-default");
        assert!(parsed.job("unknown").is_none());
    }
}
