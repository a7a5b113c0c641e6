use sparkjdbc_core::{
    config::{ConnectionConfig, SparkSubmitOptions},
    err::{bail, Result},
};

/// Binaries which may be used to submit spark applications
pub const ALLOWED_SPARK_BINARIES: [&str; 3] = ["spark-submit", "spark2-submit", "spark3-submit"];

/// A spark cluster connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkConnection {
    /// The master url, eg "yarn" or "spark://host:7077"
    pub master: String,
    pub queue: Option<String>,
    /// eg "client" or "cluster"
    pub deploy_mode: Option<String>,
    pub spark_binary: String,
}

impl SparkConnection {
    /// Reads the spark connection from a stored connection
    ///
    /// The master is taken from the host, with the port appended if set.
    /// The queue, deploy-mode and spark-binary are read from the extras.
    pub fn from_config(conn: &ConnectionConfig) -> Result<Self> {
        let host = conn
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or("yarn");
        let master = match conn.port {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let spark_binary = conn.extra.get("spark-binary").unwrap_or("spark-submit");
        if !ALLOWED_SPARK_BINARIES.contains(&spark_binary) {
            bail!(
                "The spark-binary extra of connection \"{}\" must be one of {:?}, found \"{}\"",
                conn.id,
                ALLOWED_SPARK_BINARIES,
                spark_binary
            );
        }

        let extra = |key: &str| conn.extra.get(key).filter(|v| !v.is_empty()).map(String::from);

        Ok(Self {
            master,
            queue: extra("queue"),
            deploy_mode: extra("deploy-mode"),
            spark_binary: spark_binary.to_string(),
        })
    }
}

/// Builds the spark-submit command line which launches the application
/// with the supplied arguments
pub fn build_spark_submit_command(
    conn: &SparkConnection,
    opts: &SparkSubmitOptions,
    application: &str,
    app_args: &[String],
) -> Vec<String> {
    let mut cmd = vec![conn.spark_binary.clone(), "--master".into(), conn.master.clone()];

    for (key, val) in opts.conf.iter() {
        cmd.push("--conf".into());
        cmd.push(format!("{}={}", key, val));
    }

    if !opts.jars.is_empty() {
        cmd.push("--jars".into());
        cmd.push(opts.jars.join(","));
    }

    let mut push_opt = |flag: &str, val: Option<String>| {
        if let Some(val) = val {
            cmd.push(flag.into());
            cmd.push(val);
        }
    };

    push_opt("--num-executors", opts.num_executors.map(|n| n.to_string()));
    push_opt("--executor-cores", opts.executor_cores.map(|n| n.to_string()));
    push_opt("--executor-memory", opts.executor_memory.clone());
    push_opt("--driver-memory", opts.driver_memory.clone());
    push_opt("--name", Some(opts.name.clone()));

    if opts.verbose {
        cmd.push("--verbose".into());
    }

    if let Some(queue) = &conn.queue {
        cmd.push("--queue".into());
        cmd.push(queue.clone());
    }

    if let Some(deploy_mode) = &conn.deploy_mode {
        cmd.push("--deploy-mode".into());
        cmd.push(deploy_mode.clone());
    }

    cmd.push(application.into());
    cmd.extend(app_args.iter().cloned());

    cmd
}
