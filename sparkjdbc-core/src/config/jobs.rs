use serde::{Deserialize, Serialize};

use super::{SparkSubmitOptions, SubmissionConfig};

/// A job which moves data between a jdbc table and the spark metastore
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct JdbcJobConfig {
    /// The ID of the job
    pub id: String,
    /// The connection of the spark cluster the job is submitted to
    #[serde(default = "JdbcJobConfig::default_spark_conn_id")]
    pub spark_conn_id: String,
    /// The connection of the jdbc database
    #[serde(default = "JdbcJobConfig::default_jdbc_conn_id")]
    pub jdbc_conn_id: String,
    /// Path to the spark application which performs the transfer
    pub application: String,
    /// The jdbc submission parameters
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Options for spark-submit
    #[serde(default)]
    pub spark: SparkSubmitOptions,
}

impl JdbcJobConfig {
    fn default_spark_conn_id() -> String {
        "spark-default".into()
    }

    fn default_jdbc_conn_id() -> String {
        "jdbc-default".into()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{parse_config, CmdType};

    use super::*;

    #[test]
    fn test_parse_job_config() {
        let conf = parse_config(
            r#"
id: import
spark_conn_id: spark-yarn
jdbc_conn_id: jdbc-warehouse
application: /opt/spark_jdbc_script.py
submission:
  cmd_type: jdbc_to_spark
  jdbc_table: orders
spark:
  num_executors: 2
"#,
        )
        .unwrap();

        let parsed: JdbcJobConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(parsed.spark_conn_id, "spark-yarn");
        assert_eq!(parsed.jdbc_conn_id, "jdbc-warehouse");
        assert_eq!(parsed.submission.cmd_type, CmdType::JdbcToSpark);
        assert_eq!(parsed.spark.num_executors, Some(2));
        assert_eq!(parsed.spark.name, "default-name");
    }

    #[test]
    fn test_parse_job_config_requires_application() {
        let conf = parse_config("id: a").unwrap();

        assert!(serde_yaml::from_value::<JdbcJobConfig>(conf).is_err());
    }
}
