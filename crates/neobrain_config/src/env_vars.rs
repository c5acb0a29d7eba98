//! Environment variable handling for the NeoBrain services.
//!
//! Configuration values can be overridden by `NEOBRAIN__SECTION__KEY` variables
//! (picked up by the `config` builder), while secrets marked `secret_from_env`
//! in the config files are resolved from `NEOBRAIN_SECRET_SECTION_KEY`, with the
//! shorter `SECTION_KEY` form accepted as a fallback.

use serde_json::Value;
use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "NEOBRAIN";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "NEOBRAIN_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value that asks the loader to read the real value from the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a secret path to an environment variable name
///
/// `auth.client_secret` becomes `NEOBRAIN_SECRET_AUTH_CLIENT_SECRET`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to the short, unprefixed variable name
///
/// `auth.client_secret` becomes `AUTH_CLIENT_SECRET`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let section = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", section, key).to_uppercase()
}

/// Get an environment variable for a secret path, trying the prefixed name first.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let env_var = secret_path_to_env_var(path);
    if let Ok(value) = env::var(&env_var) {
        return Some(value);
    }

    let legacy_env_var = legacy_secret_path_to_env_var(path);
    env::var(&legacy_env_var).ok()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "password" or "token" are considered secret.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret") || path_lower.contains("password") || path_lower.contains("token")
}

/// Replace every `secret_from_env` string in `value` with the matching environment variable.
///
/// Returns the paths that could not be resolved.
pub fn inject_env_secrets(value: &mut Value) -> Vec<String> {
    fn walk(path: &mut Vec<String>, obj: &mut Value, missing: &mut Vec<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, missing);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                match get_secret_env_var(&path_str) {
                    Some(env_val) => *s = env_val,
                    None => {
                        warn!(
                            "env var {} (or {}) not found for secret_from_env",
                            secret_path_to_env_var(&path_str),
                            legacy_secret_path_to_env_var(&path_str)
                        );
                        missing.push(path_str);
                    }
                }
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    walk(&mut Vec::new(), value, &mut missing);
    missing
}

/// Replace the values of secret paths with `***` so the config can be logged.
pub fn redact_secrets(value: &mut Value) {
    fn walk(path: &mut Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v);
                    path.pop();
                }
            }
            Value::String(s) if is_secret_path(&path.join(".")) => {
                *s = "***".to_string();
            }
            _ => {}
        }
    }

    walk(&mut Vec::new(), value);
}
