use std::env;

use sparkjdbc_core::err::{ensure, Context, Result};
use sparkjdbc_logging::trace;

use crate::ctx::Ctx;

use super::{util::match_interpolation, ConfigExprProcessor, ConfigStringExpr as X};

/// Interpolates ${env:NAME} expressions using environment variables
#[derive(Default)]
pub struct EnvConfigProcessor {}

impl ConfigExprProcessor for EnvConfigProcessor {
    fn display_name(&self) -> &str {
        "environment"
    }

    fn process(&self, _ctx: &Ctx, expr: X) -> Result<X> {
        let parts = match match_interpolation(&expr, &["env"]) {
            Some(parts) => parts,
            None => return Ok(expr),
        };

        ensure!(
            parts.len() == 2 && !parts[1].is_empty(),
            "${{env:...}} expression must name exactly one environment variable"
        );

        let val = env::var(&parts[1])
            .with_context(|| format!("Environment variable '{}' is not set", parts[1]))?;
        trace!("Replaced env expression '{}'", parts[1]);

        Ok(X::Constant(val))
    }
}
