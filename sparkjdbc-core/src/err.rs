use std::fmt::{self, Display};

pub use anyhow::{anyhow, bail, ensure, Context, Error, Result};

/// A connection or submission was configured in a way that cannot
/// be turned into a valid set of spark jdbc arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidConfiguration {
    /// The connection host contained a path separator
    HostContainsSlash,
    /// The connection schema contained a query delimiter
    SchemaContainsQuestionMark,
    /// The conn_prefix extra contained a url fragment delimiter
    ConnPrefixContainsHash,
    /// The connection extras did not define a conn_prefix
    MissingConnPrefix,
    /// Only some of partition column, lower bound and upper bound were set
    IncompletePartitioning {
        partition_column: bool,
        lower_bound: bool,
        upper_bound: bool,
    },
    /// The partition column and bounds were set without num_partitions
    MissingNumPartitions,
}

impl Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostContainsSlash => write!(f, "host should not contain a '/'"),
            Self::SchemaContainsQuestionMark => write!(f, "schema should not contain a '?'"),
            Self::ConnPrefixContainsHash => write!(f, "extra conn_prefix should not contain a '#'"),
            Self::MissingConnPrefix => write!(f, "extra should contain a conn_prefix"),
            Self::IncompletePartitioning {
                partition_column,
                lower_bound,
                upper_bound,
            } => {
                let missing = [
                    ("partition_column", partition_column),
                    ("lower_bound", lower_bound),
                    ("upper_bound", upper_bound),
                ]
                .into_iter()
                .filter(|(_, set)| !**set)
                .map(|(name, _)| name)
                .collect::<Vec<_>>();

                write!(
                    f,
                    "partition_column, lower_bound and upper_bound must be set together, missing: {}",
                    missing.join(", ")
                )
            }
            Self::MissingNumPartitions => write!(
                f,
                "num_partitions must be set when partition_column, lower_bound and upper_bound are set"
            ),
        }
    }
}

impl std::error::Error for InvalidConfiguration {}
