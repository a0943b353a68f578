//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `REGISTRA_API_BASE_URL`: API base URL (required)
//! - `REGISTRA_ACTOR`: actor identity sent on every request (required)
//! - `REGISTRA_API_TIMEOUT_SECONDS`: request timeout in seconds
//! - `REGISTRA_CACHE_STALE_AFTER_SECONDS`: default read staleness window
//! - `REGISTRA_SEARCH_DEBOUNCE_MS`: filter-edit debounce window
//! - `REGISTRA_SEARCH_PAGE_SIZE`: default page size
//!
//! Per-resource staleness overrides are file-only.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./registra.json` or `./registra.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use registra_domain::{ClientError, Config, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ClientError::Config` if configuration cannot be loaded from
/// either source, the file format is invalid, or required fields are missing.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// `REGISTRA_API_BASE_URL` and `REGISTRA_ACTOR` must be present; the
/// remaining variables fall back to the compiled defaults.
///
/// # Errors
/// Returns `ClientError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var("REGISTRA_API_BASE_URL")?;
    config.api.actor = env_var("REGISTRA_ACTOR")?;
    if let Some(timeout) = env_u64("REGISTRA_API_TIMEOUT_SECONDS")? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(stale) = env_u64("REGISTRA_CACHE_STALE_AFTER_SECONDS")? {
        config.cache.stale_after_seconds = stale;
    }
    if let Some(debounce) = env_u64("REGISTRA_SEARCH_DEBOUNCE_MS")? {
        config.search.debounce_ms = debounce;
    }
    if let Some(size) = env_u64("REGISTRA_SEARCH_PAGE_SIZE")? {
        config.search.default_page_size =
            u32::try_from(size).map_err(|_| ClientError::Config("page size out of range".to_string()))?;
    }

    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ClientError::Config` if the file is missing, no candidate is
/// found, or parsing fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClientError::Config(format!("config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ClientError::Config("no config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClientError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, detecting the format by file
/// extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ClientError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClientError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(ClientError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe standard locations for configuration files.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("registra.json"),
            cwd.join("registra.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("registra.json"),
                exe_dir.join("registra.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ClientError::Config(format!("missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable.
fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ClientError::Config(format!("invalid value for {key}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [
            "REGISTRA_API_BASE_URL",
            "REGISTRA_ACTOR",
            "REGISTRA_API_TIMEOUT_SECONDS",
            "REGISTRA_CACHE_STALE_AFTER_SECONDS",
            "REGISTRA_SEARCH_DEBOUNCE_MS",
            "REGISTRA_SEARCH_PAGE_SIZE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGISTRA_API_BASE_URL", "https://api.registra.example");
        std::env::set_var("REGISTRA_ACTOR", "test-operator");
        std::env::set_var("REGISTRA_API_TIMEOUT_SECONDS", "20");
        std::env::set_var("REGISTRA_CACHE_STALE_AFTER_SECONDS", "120");
        std::env::set_var("REGISTRA_SEARCH_DEBOUNCE_MS", "300");
        std::env::set_var("REGISTRA_SEARCH_PAGE_SIZE", "50");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.api.base_url, "https://api.registra.example");
        assert_eq!(config.api.actor, "test-operator");
        assert_eq!(config.api.timeout_seconds, 20);
        assert_eq!(config.cache.stale_after_seconds, 120);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.default_page_size, 50);

        clear_env();
    }

    #[test]
    fn test_load_from_env_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGISTRA_API_BASE_URL", "https://api.registra.example");
        std::env::set_var("REGISTRA_ACTOR", "test-operator");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.api.timeout_seconds, registra_domain::DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.search.debounce_ms, registra_domain::DEFAULT_DEBOUNCE_MS);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_required_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGISTRA_API_BASE_URL", "https://api.registra.example");
        std::env::set_var("REGISTRA_ACTOR", "test-operator");
        std::env::set_var("REGISTRA_API_TIMEOUT_SECONDS", "not-a-number");

        let result = load_from_env();
        assert!(matches!(result, Err(ClientError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "api": {
                "base_url": "https://api.registra.example",
                "timeout_seconds": 25,
                "actor": "file-operator"
            },
            "cache": {
                "stale_after_seconds": 60,
                "stale_after_overrides": { "setting": 300, "student": 15 }
            },
            "search": {
                "debounce_ms": 450,
                "default_page_size": 25
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("config from JSON file");
        assert_eq!(config.api.timeout_seconds, 25);
        assert_eq!(config.cache.stale_after_overrides.get("setting"), Some(&300));
        assert_eq!(config.search.debounce_ms, 450);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[api]
base_url = "https://api.registra.example"
actor = "file-operator"

[cache]
stale_after_seconds = 90

[cache.stale_after_overrides]
setting = 600

[search]
debounce_ms = 350
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("config from TOML file");
        assert_eq!(config.cache.stale_after_seconds, 90);
        assert_eq!(config.cache.stale_after_overrides.get("setting"), Some(&600));
        assert_eq!(config.api.timeout_seconds, registra_domain::DEFAULT_TIMEOUT_SECONDS);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "this is": "not valid json" "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(ClientError::Config(_))));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("whatever", &PathBuf::from("config.yaml"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
