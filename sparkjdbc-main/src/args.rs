use std::path::{Path, PathBuf};

use clap::Parser;

/// Resolves jdbc connections and submits spark jdbc jobs
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) enum Command {
    /// Prints the resolved jdbc connection
    Resolve(ResolveArgs),
    /// Prints the arguments passed to the spark jdbc application
    Args(JobArgs),
    /// Prints the spark-submit command line
    Command(JobArgs),
    /// Submits the job with spark-submit and waits for it to finish
    Submit(JobArgs),
}

#[derive(Parser, Debug)]
pub(crate) struct ResolveArgs {
    /// The path of the configuration file
    #[clap(short, long, value_parser)]
    pub config: Option<PathBuf>,
    /// The id of the jdbc connection
    #[clap(long, value_parser, default_value = "jdbc-default")]
    pub conn: String,
}

#[derive(Parser, Debug)]
pub(crate) struct JobArgs {
    /// The path of the configuration file
    #[clap(short, long, value_parser)]
    pub config: Option<PathBuf>,
    /// The id of the job
    #[clap(short, long, value_parser)]
    pub job: String,
    /// Print secrets such as passwords as-is
    #[clap(long)]
    pub unmasked: bool,
}

const DEFAULT_CONFIG_PATH: &str = "/etc/sparkjdbc/config.yml";

impl Command {
    pub(crate) fn config_path(&self) -> &Path {
        let path = match self {
            Command::Resolve(args) => args.config.as_deref(),
            Command::Args(args) | Command::Command(args) | Command::Submit(args) => {
                args.config.as_deref()
            }
        };

        path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_defaults() {
        let cmd = Command::parse_from(["sparkjdbc", "resolve"]);

        match &cmd {
            Command::Resolve(args) => assert_eq!(args.conn, "jdbc-default"),
            _ => panic!("Unexpected command {:?}", cmd),
        }
        assert_eq!(cmd.config_path(), Path::new("/etc/sparkjdbc/config.yml"));
    }

    #[test]
    fn test_parse_job_args() {
        let cmd = Command::parse_from(["sparkjdbc", "args", "-c", "/tmp/conf.yml", "-j", "export"]);

        match &cmd {
            Command::Args(args) => {
                assert_eq!(args.job, "export");
                assert!(!args.unmasked);
            }
            _ => panic!("Unexpected command {:?}", cmd),
        }
        assert_eq!(cmd.config_path(), Path::new("/tmp/conf.yml"));
    }

    #[test]
    fn test_parse_job_args_requires_job() {
        assert!(Command::try_parse_from(["sparkjdbc", "submit"]).is_err());
    }
}
