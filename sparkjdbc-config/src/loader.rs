use std::{
    any::type_name,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_yaml::{Deserializer, Value};
use sparkjdbc_core::{
    config::AppConfig,
    err::{Context, Result},
};
use sparkjdbc_logging::{debug, info};

use crate::{
    ctx::Ctx,
    diagnostic::ConfigParseError,
    processor::{
        dir::DirConfigProcessor,
        env::EnvConfigProcessor,
        util::{expression_to_string, parse_expression, process_expression, process_strings},
        ConfigExprProcessor,
    },
};

/// Parses and loads the configuration
pub struct ConfigLoader {
    processors: Vec<Box<dyn ConfigExprProcessor>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Initialises the configuration loader
    pub fn new() -> Self {
        Self {
            processors: vec![
                Box::new(EnvConfigProcessor::default()),
                Box::new(DirConfigProcessor::default()),
            ],
        }
    }

    /// Loads the app configuration from the supplied file
    pub fn load(&self, path: &Path) -> Result<AppConfig> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to find config file {}", path.display()))?;
        info!("Loading config from path {}", path.display());

        let processed = self.load_yaml(path.as_path())?;
        debug!("Parsing into {}", type_name::<AppConfig>());
        let config: AppConfig =
            serde_yaml::from_value(processed).context("Failed to parse yaml into AppConfig")?;

        Ok(config)
    }

    /// Loads processed yaml from the supplied file
    pub(crate) fn load_yaml(&self, path: &Path) -> Result<Value> {
        debug!("Loading yaml from file {}", path.display());

        let file_data = fs::read(path)
            .with_context(|| format!("Failed to read config from file {}", path.display()))?;

        self.load_data(file_data.as_slice(), Some(path.to_path_buf()))
    }

    /// Parses and processes the supplied yaml
    pub(crate) fn load_data(&self, data: &[u8], path: Option<PathBuf>) -> Result<Value> {
        let config = Value::deserialize(Deserializer::from_slice(data)).map_err(|e| {
            ConfigParseError::new(
                String::from_utf8_lossy(data).to_string(),
                e.location(),
                e.to_string(),
            )
        })?;

        let ctx = Ctx::new(path);
        let config = process_strings(config, &|string| {
            let exp = parse_expression(string.as_str())?;

            let res = process_expression(exp, &|mut exp| {
                for processor in self.processors.iter() {
                    exp = processor.process(&ctx, exp).with_context(|| {
                        format!("Failed to apply the {} processor", processor.display_name())
                    })?;
                }

                Ok(exp)
            })?;

            Ok(Value::String(expression_to_string(&res)))
        })?;

        debug!("Finished processing yaml");
        Ok(config)
    }
}
