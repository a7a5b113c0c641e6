use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::err::InvalidConfiguration;

/// The direction of a spark jdbc job
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Default)]
pub enum CmdType {
    /// Writes a metastore table out to the jdbc table
    #[default]
    #[serde(rename = "spark_to_jdbc")]
    SparkToJdbc,
    /// Reads the jdbc table into a metastore table
    #[serde(rename = "jdbc_to_spark")]
    JdbcToSpark,
}

impl CmdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmdType::SparkToJdbc => "spark_to_jdbc",
            CmdType::JdbcToSpark => "jdbc_to_spark",
        }
    }
}

/// The parameters of a single spark jdbc job submission
#[serde_as]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct SubmissionConfig {
    #[serde(default)]
    pub cmd_type: CmdType,
    /// The name of the table on the jdbc side
    pub jdbc_table: Option<String>,
    /// Fully qualified class name of the jdbc driver
    pub jdbc_driver: Option<String>,
    /// The name of the table on the metastore side
    pub metastore_table: Option<String>,
    /// Whether to truncate rather than drop the jdbc table when overwriting
    #[serde(default)]
    pub jdbc_truncate: bool,
    /// eg "append", "overwrite", "ignore", "error"
    pub save_mode: Option<String>,
    /// eg "parquet", "orc", "json"
    pub save_format: Option<String>,
    pub batch_size: Option<u32>,
    pub fetch_size: Option<u32>,
    pub num_partitions: Option<u32>,
    pub partition_column: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub lower_bound: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub upper_bound: Option<i64>,
    /// Column type overrides used when spark creates the jdbc table
    pub create_table_column_types: Option<String>,
}

/// A validated set of partitioning options
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Partitioning<'a> {
    pub column: &'a str,
    pub lower_bound: i64,
    pub upper_bound: i64,
}

impl SubmissionConfig {
    /// Returns the partitioning options if they are set
    ///
    /// Spark requires that the partition column and both bounds are
    /// set together along with num_partitions, any other combination is
    /// rejected. num_partitions on its own is valid.
    pub fn partitioning(&self) -> Result<Option<Partitioning<'_>>, InvalidConfiguration> {
        let column = self.partition_column.as_deref().filter(|c| !c.is_empty());

        match (column, self.lower_bound, self.upper_bound) {
            (Some(_), Some(_), Some(_)) if self.num_partitions.is_none() => {
                Err(InvalidConfiguration::MissingNumPartitions)
            }
            (Some(column), Some(lower_bound), Some(upper_bound)) => Ok(Some(Partitioning {
                column,
                lower_bound,
                upper_bound,
            })),
            (None, None, None) => Ok(None),
            (column, lower, upper) => Err(InvalidConfiguration::IncompletePartitioning {
                partition_column: column.is_some(),
                lower_bound: lower.is_some(),
                upper_bound: upper.is_some(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::parse_config;

    use super::*;

    #[test]
    fn test_parse_submission_config_full() {
        let conf = parse_config(
            r#"
cmd_type: spark_to_jdbc
jdbc_table: tableMcTableFace
jdbc_driver: org.postgresql.Driver
metastore_table: hiveMcHiveFace
jdbc_truncate: false
save_mode: append
save_format: parquet
batch_size: 100
fetch_size: 200
num_partitions: 10
partition_column: columnMcColumnFace
lower_bound: "10"
upper_bound: 20
create_table_column_types: "columnMcColumnFace INTEGER(100), name CHAR(64),comments VARCHAR(1024)"
"#,
        )
        .unwrap();

        let parsed: SubmissionConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(parsed.cmd_type, CmdType::SparkToJdbc);
        assert_eq!(parsed.batch_size, Some(100));
        assert_eq!(parsed.lower_bound, Some(10));
        assert_eq!(parsed.upper_bound, Some(20));
        assert_eq!(
            parsed.create_table_column_types.as_deref(),
            Some("columnMcColumnFace INTEGER(100), name CHAR(64),comments VARCHAR(1024)")
        );
    }

    #[test]
    fn test_parse_submission_config_defaults() {
        let conf = parse_config("jdbc_table: tbl").unwrap();

        let parsed: SubmissionConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(
            parsed,
            SubmissionConfig {
                jdbc_table: Some("tbl".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_submission_config_jdbc_to_spark() {
        let conf = parse_config("cmd_type: jdbc_to_spark").unwrap();

        let parsed: SubmissionConfig = serde_yaml::from_value(conf).unwrap();

        assert_eq!(parsed.cmd_type, CmdType::JdbcToSpark);
        assert_eq!(parsed.cmd_type.as_str(), "jdbc_to_spark");
    }

    #[test]
    fn test_parse_submission_config_invalid_bound() {
        let conf = parse_config("lower_bound: ten").unwrap();

        assert!(serde_yaml::from_value::<SubmissionConfig>(conf).is_err());
    }

    #[test]
    fn test_partitioning_all_set() {
        let conf = SubmissionConfig {
            num_partitions: Some(4),
            partition_column: Some("col".into()),
            lower_bound: Some(10),
            upper_bound: Some(20),
            ..Default::default()
        };

        assert_eq!(
            conf.partitioning(),
            Ok(Some(Partitioning {
                column: "col",
                lower_bound: 10,
                upper_bound: 20
            }))
        );
    }

    #[test]
    fn test_partitioning_requires_num_partitions() {
        let conf = SubmissionConfig {
            partition_column: Some("col".into()),
            lower_bound: Some(10),
            upper_bound: Some(20),
            ..Default::default()
        };

        assert_eq!(
            conf.partitioning(),
            Err(InvalidConfiguration::MissingNumPartitions)
        );
    }

    #[test]
    fn test_partitioning_num_partitions_alone() {
        let conf = SubmissionConfig {
            num_partitions: Some(4),
            ..Default::default()
        };

        assert_eq!(conf.partitioning(), Ok(None));
    }

    #[test]
    fn test_partitioning_none_set() {
        assert_eq!(SubmissionConfig::default().partitioning(), Ok(None));
    }

    #[test]
    fn test_partitioning_partial() {
        let conf = SubmissionConfig {
            partition_column: Some("col".into()),
            upper_bound: Some(20),
            ..Default::default()
        };

        assert_eq!(
            conf.partitioning(),
            Err(InvalidConfiguration::IncompletePartitioning {
                partition_column: true,
                lower_bound: false,
                upper_bound: true,
            })
        );
    }

    #[test]
    fn test_partitioning_empty_column_counts_as_unset() {
        let conf = SubmissionConfig {
            partition_column: Some("".into()),
            lower_bound: Some(1),
            upper_bound: Some(2),
            ..Default::default()
        };

        assert!(conf.partitioning().is_err());
    }
}
