//! Configuration loading from .env files, the environment, and the CLI

use crate::primitives::ConfigError;
use tracing::trace;

use super::{cli::CliConfig, config::AppConfig, env::EnvironmentConfig};

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Load .env files into the process environment, skipping missing ones
pub fn load_env_files() -> Result<(), ConfigError> {
    for env_file in ENV_FILES {
        match dotenvy::from_filename(env_file) {
            Ok(path) => trace!("Loaded environment file {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::EnvFileError {
                    file: env_file.to_string(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

impl AppConfig {
    /// Combine defaults, standard environment variables, and parsed CLI options
    pub fn resolve(cli: AppConfig, env: &EnvironmentConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.color = env.apply_color_config(config.color);
        let config = config.merge_with(cli);
        config.validate()?;
        Ok(config)
    }
}

impl CliConfig {
    /// Load .env files, then parse the command line and resolve configuration
    pub fn load() -> Result<Self, ConfigError> {
        load_env_files()?;
        let mut loaded = Self::parse();
        loaded.app_config = AppConfig::resolve(loaded.app_config, &EnvironmentConfig::load()?)?;
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
