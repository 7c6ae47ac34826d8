use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;
use tracing::debug;

pub const CLICKHOUSE_HOST: &str = "CLICKHOUSE_HOST";
pub const CLICKHOUSE_PORT: &str = "CLICKHOUSE_PORT";
pub const CLICKHOUSE_PROTOCOL: &str = "CLICKHOUSE_PROTOCOL";
pub const CLICKHOUSE_DATABASE: &str = "CLICKHOUSE_DATABASE";
pub const CLICKHOUSE_USER: &str = "CLICKHOUSE_USER";
pub const CLICKHOUSE_PASSWORD: &str = "CLICKHOUSE_PASSWORD";
pub const CLICKHOUSE_JWT: &str = "CLICKHOUSE_JWT";
pub const UPLOAD_DIR: &str = "FLATBRIDGE_UPLOAD_DIR";
pub const EXPORT_DIR: &str = "FLATBRIDGE_EXPORT_DIR";

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self::with_vars(std::env::vars().collect())
    }

    pub fn with_vars(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file. File entries override the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        Ok(())
    }

    /// Value of `key`, treating an empty value as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p))
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            let value = Self::unquote_value(value);
            if self.is_sensitive(key) {
                debug!(key, value = "<redacted>", "Loaded env entry");
            } else {
                debug!(key, value = %value, "Loaded env entry");
            }
            self.vars.insert(key.to_string(), value);
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "secret", "token", "jwt", "key", "auth", "credential"]
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
