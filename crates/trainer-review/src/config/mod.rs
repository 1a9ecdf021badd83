use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                include_targets: environment == AppEnvironment::Development,
            },
            review: ReviewConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub include_targets: bool,
}

/// Applicant fetch and CV link settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Maximum applicants pulled per refresh.
    pub fetch_limit: usize,
    pub cv_bucket: String,
    /// Lifetime requested for signed CV links.
    pub signed_url_ttl_secs: u32,
    /// How long a signed link is reused locally; never longer than the TTL.
    pub signed_url_cache_secs: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            fetch_limit: 200,
            cv_bucket: "cvs".to_string(),
            signed_url_ttl_secs: 60,
            signed_url_cache_secs: 55,
        }
    }
}

impl ReviewConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let fetch_limit = read_number("REVIEW_FETCH_LIMIT", defaults.fetch_limit)?;
        if fetch_limit == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "REVIEW_FETCH_LIMIT",
            });
        }

        let cv_bucket = env::var("REVIEW_CV_BUCKET")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.cv_bucket);

        let signed_url_ttl_secs =
            read_number("REVIEW_SIGNED_URL_TTL_SECS", defaults.signed_url_ttl_secs)?;
        let signed_url_cache_secs =
            read_number("REVIEW_SIGNED_URL_CACHE_SECS", defaults.signed_url_cache_secs)?;
        if signed_url_cache_secs > signed_url_ttl_secs {
            return Err(ConfigError::CacheOutlivesSignedUrl {
                cache_secs: signed_url_cache_secs,
                ttl_secs: signed_url_ttl_secs,
            });
        }

        Ok(Self {
            fetch_limit,
            cv_bucket,
            signed_url_ttl_secs,
            signed_url_cache_secs,
        })
    }
}

fn read_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    CacheOutlivesSignedUrl { cache_secs: u32, ttl_secs: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive whole number")
            }
            ConfigError::CacheOutlivesSignedUrl {
                cache_secs,
                ttl_secs,
            } => write!(
                f,
                "REVIEW_SIGNED_URL_CACHE_SECS ({cache_secs}) must not exceed REVIEW_SIGNED_URL_TTL_SECS ({ttl_secs})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::CacheOutlivesSignedUrl { .. } => None,
        }
    }
}
