use sparkjdbc_core::err::Result;
use sparkjdbc_logging::trace;

use crate::ctx::Ctx;

use super::{util::match_interpolation, ConfigExprProcessor, ConfigStringExpr as X};

/// Interpolates ${dir} with the directory of the config file, so jobs can
/// refer to applications and jars relative to their config
#[derive(Default)]
pub struct DirConfigProcessor {}

impl ConfigExprProcessor for DirConfigProcessor {
    fn display_name(&self) -> &str {
        "config_dir"
    }

    fn process(&self, ctx: &Ctx, expr: X) -> Result<X> {
        let dir = match (match_interpolation(&expr, &["dir"]), ctx.dir()) {
            (Some(parts), Some(dir)) if parts.len() == 1 => dir,
            _ => return Ok(expr),
        };

        let replacement = dir.to_string_lossy().to_string();
        trace!("Replaced dir expression with '{}'", replacement);
        Ok(X::Constant(replacement))
    }
}
