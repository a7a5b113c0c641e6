use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Options passed through to spark-submit for a job
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SparkSubmitOptions {
    /// The name of the spark application
    #[serde(default = "SparkSubmitOptions::default_name")]
    pub name: String,
    /// Arbitrary spark configuration properties
    #[serde(default)]
    pub conf: BTreeMap<String, String>,
    /// Additional jars to put on the classpath, such as the jdbc driver
    #[serde(default)]
    pub jars: Vec<String>,
    pub num_executors: Option<u32>,
    pub executor_cores: Option<u32>,
    /// eg "2G"
    pub executor_memory: Option<String>,
    pub driver_memory: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl SparkSubmitOptions {
    fn default_name() -> String {
        "default-name".into()
    }
}

impl Default for SparkSubmitOptions {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            conf: BTreeMap::new(),
            jars: vec![],
            num_executors: None,
            executor_cores: None,
            executor_memory: None,
            driver_memory: None,
            verbose: false,
        }
    }
}
