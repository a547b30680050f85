use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use itsm_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3002;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub itsm_api_base_url: Url,
    pub frontend_url: String,
    pub console_host: String,
    pub console_port: u16,
    /// Per-request timeout for ITSM calls. Unset or `0` sends requests without one.
    pub http_timeout: Option<Duration>,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw_base_url = lookup("ITSM_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("ITSM_API_BASE_URL is required".to_owned()))?;
        let itsm_api_base_url = Url::parse(raw_base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid ITSM_API_BASE_URL: {error}"))
        })?;
        if itsm_api_base_url.cannot_be_a_base() {
            return Err(AppError::Validation(
                "ITSM_API_BASE_URL must be an http(s) URL".to_owned(),
            ));
        }

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned());
        let console_host = lookup("CONSOLE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let console_port = match lookup("CONSOLE_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|error| {
                AppError::Validation(format!("invalid CONSOLE_PORT: {error}"))
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("ITSM_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid ITSM_HTTP_TIMEOUT_SECS: {error}"))
            })?,
            None => 0,
        };
        let http_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            itsm_api_base_url,
            frontend_url,
            console_host,
            console_port,
            http_timeout,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.console_host).map_err(|error| {
            AppError::Internal(format!(
                "invalid CONSOLE_HOST '{}': {error}",
                self.console_host
            ))
        })?;
        Ok(SocketAddr::from((host, self.console_port)))
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
