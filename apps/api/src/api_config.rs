use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vitrine_application::{DEFAULT_STORE_TIMEOUT, DEFAULT_TOKEN_TTL_HOURS};
use vitrine_core::AppError;

/// Optional administrator account ensured at startup.
#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub permission_timeout: Duration,
    pub permission_cache_ttl_seconds: u32,
    pub store_health_interval: Duration,
    pub store_health_failure_threshold: u32,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let jwt_secret = required_env("JWT_SECRET")?;
        if jwt_secret.len() < vitrine_application::MIN_SIGNING_KEY_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {} characters",
                vitrine_application::MIN_SIGNING_KEY_LENGTH
            )));
        }

        let token_ttl_hours = parse_env("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        if token_ttl_hours <= 0 {
            return Err(AppError::Validation(
                "TOKEN_TTL_HOURS must be positive".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_env("API_PORT", 3001_u16)?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let cookie_secure = env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let default_timeout_ms = u64::try_from(DEFAULT_STORE_TIMEOUT.as_millis()).unwrap_or(2_000);
        let permission_timeout =
            Duration::from_millis(parse_env("PERMISSION_TIMEOUT_MS", default_timeout_ms)?);
        let permission_cache_ttl_seconds = parse_env("PERMISSION_CACHE_TTL_SECONDS", 30_u32)?;
        let store_health_interval =
            Duration::from_secs(parse_env("STORE_HEALTH_INTERVAL_SECONDS", 10_u64)?.max(1));
        let store_health_failure_threshold =
            parse_env("STORE_HEALTH_FAILURE_THRESHOLD", 3_u32)?.max(1);

        let bootstrap_admin = match (
            optional_non_empty_env("BOOTSTRAP_ADMIN_USERNAME"),
            optional_non_empty_env("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdminConfig { username, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together"
                        .to_owned(),
                ));
            }
        };

        Ok(Self {
            migrate_only,
            database_url,
            jwt_secret,
            token_ttl_hours,
            api_host,
            api_port,
            frontend_url,
            cookie_secure,
            permission_timeout,
            permission_cache_ttl_seconds,
            store_health_interval,
            store_health_failure_threshold,
            bootstrap_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_non_empty_env(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}
