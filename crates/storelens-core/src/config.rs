use crate::app_config::{AppConfig, Environment, LlmConfig};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "storelens/0.1 (storefront-insights)";
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the variables already in the process,
/// without reading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Like [`load_app_config`], but `DATABASE_URL` may be unset.
///
/// For commands that never open a pool. A missing URL leaves
/// `database_url` empty, which `connect_pool` rejects if it is used anyway.
///
/// # Errors
///
/// Returns `ConfigError` if any value that is set is invalid.
pub fn load_app_config_without_database() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key), false)
}

/// Parses and validates configuration from an arbitrary lookup so tests can
/// feed a `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    build_config(lookup, true)
}

fn build_config<F>(lookup: F, require_database: bool) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::str::FromStr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    }

    let database_url = if require_database {
        require("DATABASE_URL")?
    } else {
        lookup("DATABASE_URL").unwrap_or_default().trim().to_string()
    };
    let env = parse_environment(&or_default("STORELENS_ENV", "development"));

    let bind_addr: SocketAddr = parse_as(
        "STORELENS_BIND_ADDR",
        &or_default("STORELENS_BIND_ADDR", "0.0.0.0:8000"),
    )?;
    let log_level = or_default("STORELENS_LOG_LEVEL", "info");

    let db_max_connections = parse_as(
        "STORELENS_DB_MAX_CONNECTIONS",
        &or_default("STORELENS_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections = parse_as(
        "STORELENS_DB_MIN_CONNECTIONS",
        &or_default("STORELENS_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs = parse_as(
        "STORELENS_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("STORELENS_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let scraper_request_timeout_secs = parse_as(
        "STORELENS_SCRAPER_REQUEST_TIMEOUT_SECS",
        &or_default("STORELENS_SCRAPER_REQUEST_TIMEOUT_SECS", "20"),
    )?;
    let scraper_user_agent = or_default("STORELENS_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);

    let cache_ttl_hours: i64 = parse_as(
        "STORELENS_CACHE_TTL_HOURS",
        &or_default("STORELENS_CACHE_TTL_HOURS", "24"),
    )?;
    if cache_ttl_hours < 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STORELENS_CACHE_TTL_HOURS".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    let analyze_rate_limit_per_min = parse_as(
        "STORELENS_ANALYZE_RATE_LIMIT_PER_MIN",
        &or_default("STORELENS_ANALYZE_RATE_LIMIT_PER_MIN", "30"),
    )?;

    let llm = LlmConfig {
        api_key: lookup("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
        model: or_default("STORELENS_LLM_MODEL", DEFAULT_LLM_MODEL),
        base_url: or_default("STORELENS_LLM_BASE_URL", DEFAULT_LLM_BASE_URL)
            .trim_end_matches('/')
            .to_string(),
        timeout_secs: parse_as(
            "STORELENS_LLM_TIMEOUT_SECS",
            &or_default("STORELENS_LLM_TIMEOUT_SECS", "60"),
        )?,
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        cache_ttl_hours,
        analyze_rate_limit_per_min,
        llm,
    })
}

/// Unrecognized values fall back to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
