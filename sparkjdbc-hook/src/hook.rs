use std::time::Duration;

use sparkjdbc_core::{
    config::JdbcJobConfig,
    err::{bail, Context, Result},
};
use sparkjdbc_logging::{info, MaskedArgs};

use crate::{
    build_jdbc_arguments, build_spark_submit_command, ConnectionResolver, ConnectionStore, Lookup,
    ResolvedJdbcConnection, SparkConnection, SparkSubmitProcess,
};

/// Submits a jdbc job to a spark cluster
///
/// Both connections are resolved and validated when the hook is created,
/// so a misconfigured connection fails before anything is submitted.
#[derive(Debug, Clone)]
pub struct SparkJdbcHook {
    job: JdbcJobConfig,
    jdbc_conn: ResolvedJdbcConnection,
    spark_conn: SparkConnection,
    term_timeout: Duration,
}

impl SparkJdbcHook {
    pub fn new<S: ConnectionStore>(job: JdbcJobConfig, store: S) -> Result<Self> {
        let jdbc_conn = ConnectionResolver::new(&store)
            .resolve(&job.jdbc_conn_id)
            .with_context(|| format!("Failed to resolve jdbc connection for job \"{}\"", job.id))?;

        let spark_conn = match store.get_connection(&job.spark_conn_id)? {
            Lookup::Found(conn) => SparkConnection::from_config(&conn)?,
            Lookup::NotFound => bail!(
                "Spark connection \"{}\" of job \"{}\" does not exist",
                job.spark_conn_id,
                job.id
            ),
        };

        Ok(Self {
            job,
            jdbc_conn,
            spark_conn,
            term_timeout: Duration::from_secs(10),
        })
    }

    /// Sets how long spark-submit is given to exit after an interrupt
    pub fn with_term_timeout(mut self, term_timeout: Duration) -> Self {
        self.term_timeout = term_timeout;
        self
    }

    pub fn job(&self) -> &JdbcJobConfig {
        &self.job
    }

    pub fn jdbc_connection(&self) -> &ResolvedJdbcConnection {
        &self.jdbc_conn
    }

    pub fn spark_connection(&self) -> &SparkConnection {
        &self.spark_conn
    }

    /// The arguments passed to the spark jdbc application
    pub fn jdbc_arguments(&self) -> Result<Vec<String>> {
        Ok(build_jdbc_arguments(&self.jdbc_conn, &self.job.submission)?)
    }

    /// The full spark-submit command line
    pub fn submit_command(&self) -> Result<Vec<String>> {
        Ok(build_spark_submit_command(
            &self.spark_conn,
            &self.job.spark,
            &self.job.application,
            &self.jdbc_arguments()?,
        ))
    }

    /// Runs spark-submit and waits for the job to complete
    pub fn submit_jdbc_job(&self) -> Result<()> {
        let cmd = self.submit_command()?;
        info!(
            "Submitting jdbc job \"{}\" ({})",
            self.job.id,
            self.job.submission.cmd_type.as_str()
        );

        SparkSubmitProcess::spawn(&cmd, self.term_timeout)?
            .wait_success()
            .with_context(|| format!("Spark jdbc job \"{}\" failed", self.job.id))?;

        info!("Spark jdbc job \"{}\" completed", self.job.id);
        Ok(())
    }

    /// The spark-submit command line with any secrets masked
    pub fn masked_submit_command(&self) -> Result<Vec<String>> {
        Ok(MaskedArgs::new(&self.submit_command()?).to_vec())
    }
}
