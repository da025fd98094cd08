use obralink_core::identity::DEFAULT_COUNTRY_CODE;
use obralink_core::message::ComposerConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Dispatch settings (country code, deep-link URLs).
    pub dispatch: DispatchConfig,
}

/// Settings for outbound dispatch: phone normalization and link targets.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Country code assumed for phones without a `+` prefix.
    pub default_country_code: String,
    /// Base URL of the product used in ticket deep links.
    pub app_base_url: String,
    /// Public landing page offered to targets without an account.
    pub landing_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `DEFAULT_COUNTRY_CODE` | `54`                        |
    /// | `APP_BASE_URL`         | `https://app.obralink.com`  |
    /// | `LANDING_URL`          | `https://obralink.com`      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            dispatch: DispatchConfig::from_env(),
        }
    }
}

impl DispatchConfig {
    /// Load dispatch settings from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            default_country_code: std::env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| DEFAULT_COUNTRY_CODE.into()),
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "https://app.obralink.com".into()),
            landing_url: std::env::var("LANDING_URL")
                .unwrap_or_else(|_| "https://obralink.com".into()),
        }
    }

    /// The composer-facing view of these settings.
    pub fn composer(&self) -> ComposerConfig {
        ComposerConfig {
            app_base_url: self.app_base_url.clone(),
            landing_url: self.landing_url.clone(),
        }
    }
}
