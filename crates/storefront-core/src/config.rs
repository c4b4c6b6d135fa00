use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Reads the storefront configuration, loading a `.env` file first if one
/// exists.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for a set but unparsable variable.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads the storefront configuration from the process environment only.
///
/// # Errors
///
/// Same as [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Builds an [`AppConfig`] from `lookup`. Every variable has a default, so
/// only a value that does not parse can fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_url = parse_api_url(&or_default("STOREFRONT_API_URL", DEFAULT_API_URL))
        .map_err(|reason| invalid("STOREFRONT_API_URL", reason))?;

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"));
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("STOREFRONT_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "STOREFRONT_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1 (cart-sync)");
    let max_retries = parse_u32("STOREFRONT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("STOREFRONT_RETRY_BACKOFF_BASE_MS", "250")?;

    let cart_timeout_ms = parse_u64("STOREFRONT_CART_TIMEOUT_MS", "5000")?;
    if cart_timeout_ms == 0 {
        return Err(invalid(
            "STOREFRONT_CART_TIMEOUT_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let payment_method = or_default("STOREFRONT_PAYMENT_METHOD", "card");

    Ok(AppConfig {
        api_url,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        cart_timeout_ms,
        payment_method,
    })
}

/// Accepts `http://` and `https://` URLs and strips trailing slashes.
fn parse_api_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| format!("'{raw}' is not an http(s) URL"))?;
    if rest.is_empty() {
        return Err(format!("'{raw}' has no host"));
    }
    Ok(trimmed.to_string())
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
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
