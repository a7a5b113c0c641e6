use sparkjdbc_core::err::Result;

use crate::ctx::Ctx;

/// A config processor replaces ${...} expressions found in config strings
/// This is used for interpolating config items from various sources
pub(crate) trait ConfigExprProcessor {
    /// Gets the human readable display name for the processor
    fn display_name(&self) -> &str;
    /// Replaces the expression if it is handled by this processor,
    /// otherwise returns it unchanged
    fn process(&self, ctx: &Ctx, expr: ConfigStringExpr) -> Result<ConfigStringExpr>;
}

/// AST used to represent configuration expressions
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum ConfigStringExpr {
    Constant(String),
    Concat(Vec<ConfigStringExpr>),
    /// Represents an interpolated value used in the configuration
    /// Format ${[part 1]:[part 2]..:[part n]}
    /// For instance, ${env:SOME_VAR}
    Interpolation(Vec<ConfigStringExpr>),
}

pub(crate) mod dir;
pub(crate) mod env;
pub(crate) mod util;
