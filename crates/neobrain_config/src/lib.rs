use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use config::ConfigError;
pub use models::*;


/// Loads the application configuration.
///
/// Sources, lowest precedence first: `{CONFIG_DIR}/default`, `{CONFIG_DIR}/{RUN_ENV}`,
/// then `{PREFIX}__SECTION__KEY` environment variables. `CONFIG_DIR` defaults to
/// `config`, `RUN_ENV` to `debug` and `PREFIX` to `NEOBRAIN`. Values marked
/// `secret_from_env` are resolved afterwards; an unresolved marker is an error.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!(
        "loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    resolve(builder.build()?)
}

/// Deserializes a built `Config` into `AppConfig` after resolving `secret_from_env` markers.
pub fn resolve(config: Config) -> Result<AppConfig, ConfigError> {
    let mut value: Value = config.try_deserialize()?;
    let missing = env_vars::inject_env_secrets(&mut value);
    if !missing.is_empty() {
        return Err(ConfigError::Message(format!(
            "missing environment variables for secrets: {}",
            missing.join(", ")
        )));
    }
    serde_json::from_value(value).map_err(|e| ConfigError::Message(e.to_string()))
}

/// Serializes the config with every secret-looking value replaced by `***`.
pub fn redacted(config: &AppConfig) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    env_vars::redact_secrets(&mut value);
    value
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The path comes from `DOTENV_OVERRIDE`, else from the first command line
/// argument when it starts with `.env`, else `.env`. Loading happens once per process.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
