use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use predikt_classifiers::{ModelConfig, ModelFormat};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServeConfig {
    pub version: String,
    pub model: ModelConfig,
    pub host: String,
    pub port: u16,
    /// HTTP worker threads; 0 means one per CPU.
    pub workers: usize,
    /// Maximum accepted JSON body size in bytes.
    pub json_limit: usize,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            version: clap::crate_version!().to_string(),
            model: ModelConfig::default(),
            host: String::from("127.0.0.1"),
            port: 5000,
            workers: 0,
            json_limit: 256 * 1024,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServeConfig {
    /// Read a JSON config file. Missing or invalid scalar fields fall back to
    /// defaults; an invalid `model` section is an error.
    pub fn from_file(config_path: &PathBuf) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        Self::from_json_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_json_str(config_json: &str) -> Result<Self> {
        let partial: serde_json::Value = serde_json::from_str(config_json)?;
        let mut config = ServeConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            stringify!($field), config.$field
                        );
                    }
                } else {
                    log::warn!(
                        "Config Missing field '{}', using default: {:?}",
                        stringify!($field), config.$field
                    );
                }
            };
        }

        if let Some(model) = partial.get("model") {
            config.model = serde_json::from_value(model.clone())
                .context("Invalid 'model' section")?;
        } else {
            log::warn!(
                "Config Missing field 'model', using default: {:?}",
                config.model
            );
        }
        load_or_default!(host);
        load_or_default!(port);
        load_or_default!(workers);
        load_or_default!(json_limit);
        load_or_default!(shutdown_timeout_secs);

        Ok(config)
    }

    /// Resolve configuration from an optional file plus command line overrides.
    ///
    /// Works for every subcommand: overrides a subcommand does not define are
    /// simply absent.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                log::info!("[Predikt::Config] No config file provided; using defaults.");
                ServeConfig::default()
            }
        };

        if let Some(model_path) = arg::<PathBuf>(matches, "model_path") {
            config.model.path = model_path.clone();
        }
        if let Some(format) = arg::<String>(matches, "format") {
            config.model.format = ModelFormat::from_str(format)?;
        }
        if let Some(n_features) = arg::<usize>(matches, "n_features") {
            config.model.n_features = Some(*n_features);
        }
        if let Some(host) = arg::<String>(matches, "host") {
            config.host = host.clone();
        }
        if let Some(port) = arg::<u16>(matches, "port") {
            config.port = *port;
        }
        if let Some(workers) = arg::<usize>(matches, "workers") {
            config.workers = *workers;
        }

        Ok(config)
    }

    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn arg<'a, T>(matches: &'a ArgMatches, id: &str) -> Option<&'a T>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    matches.try_get_one::<T>(id).ok().flatten()
}
