use sparkjdbc_core::{config::SubmissionConfig, err::InvalidConfiguration};

use crate::ResolvedJdbcConnection;

/// Builds the argument list passed to the spark jdbc application
///
/// The order of the flags is fixed and relied upon by the application.
/// Optional flags are left out entirely when unset. The partition
/// column and bounds must be all set or all unset.
pub fn build_jdbc_arguments(
    conn: &ResolvedJdbcConnection,
    conf: &SubmissionConfig,
) -> Result<Vec<String>, InvalidConfiguration> {
    let partitioning = conf.partitioning()?;
    let mut args = JdbcArguments::default();

    args.push("-cmdType", conf.cmd_type.as_str());
    args.push("-url", conn.jdbc_url());
    args.push_opt("-user", Some(&conn.user));
    args.push_opt("-password", Some(&conn.password));
    args.push_opt("-metastoreTable", conf.metastore_table.as_ref());
    args.push_opt("-jdbcTable", conf.jdbc_table.as_ref());
    if conf.jdbc_truncate {
        args.push("-jdbcTruncate", "True");
    }
    args.push_opt("-jdbcDriver", conf.jdbc_driver.as_ref());
    args.push_opt("-batchsize", conf.batch_size);
    args.push_opt("-fetchsize", conf.fetch_size);
    args.push_opt("-numPartitions", conf.num_partitions);
    if let Some(partitioning) = partitioning {
        args.push("-partitionColumn", partitioning.column);
        args.push("-lowerBound", partitioning.lower_bound);
        args.push("-upperBound", partitioning.upper_bound);
    }
    args.push_opt("-saveMode", conf.save_mode.as_ref());
    args.push_opt("-saveFormat", conf.save_format.as_ref());
    args.push_opt(
        "-createTableColumnTypes",
        conf.create_table_column_types.as_ref(),
    );

    Ok(args.0)
}

#[derive(Default)]
struct JdbcArguments(Vec<String>);

impl JdbcArguments {
    fn push(&mut self, flag: &str, val: impl ToString) {
        self.0.push(flag.to_string());
        self.0.push(val.to_string());
    }

    /// Pushes the flag only if the value is present and non-empty
    fn push_opt(&mut self, flag: &str, val: Option<impl ToString>) {
        if let Some(val) = val.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            self.push(flag, val);
        }
    }
}
