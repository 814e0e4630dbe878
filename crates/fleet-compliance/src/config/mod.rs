use crate::compliance::{
    MissingParentPolicy, ThresholdError, TierThresholds, DEFAULT_UPCOMING_HORIZON_DAYS,
};
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
    pub compliance: ComplianceConfig,
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
            telemetry: TelemetryConfig { log_level },
            compliance: ComplianceConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Policy knobs for status classification and hierarchy assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceConfig {
    pub thresholds: TierThresholds,
    pub missing_parent: MissingParentPolicy,
    pub upcoming_horizon_days: u32,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            missing_parent: MissingParentPolicy::default(),
            upcoming_horizon_days: DEFAULT_UPCOMING_HORIZON_DAYS,
        }
    }
}

impl ComplianceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let urgent = read_days(
            "COMPLIANCE_URGENT_DAYS",
            defaults.thresholds.urgent_within_days(),
        )?;
        let warning = read_days(
            "COMPLIANCE_WARNING_DAYS",
            defaults.thresholds.warning_within_days(),
        )?;
        let thresholds = TierThresholds::new(urgent, warning).map_err(ConfigError::Thresholds)?;

        let upcoming_horizon_days =
            read_days("COMPLIANCE_HORIZON_DAYS", defaults.upcoming_horizon_days)?;

        let missing_parent = match env::var("COMPLIANCE_MISSING_PARENT") {
            Ok(raw) => parse_missing_parent(&raw)?,
            Err(_) => defaults.missing_parent,
        };

        Ok(Self {
            thresholds,
            missing_parent,
            upcoming_horizon_days,
        })
    }
}

fn read_days(var: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidDays { var, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_missing_parent(raw: &str) -> Result<MissingParentPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "root" => Ok(MissingParentPolicy::Root),
        "orphan" => Ok(MissingParentPolicy::Orphan),
        "reject" => Ok(MissingParentPolicy::Reject),
        _ => Err(ConfigError::InvalidMissingParentPolicy(raw.to_string())),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDays { var: &'static str, value: String },
    Thresholds(ThresholdError),
    InvalidMissingParentPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDays { var, value } => {
                write!(f, "{var} must be a whole number of days, got '{value}'")
            }
            ConfigError::Thresholds(err) => write!(f, "invalid compliance thresholds: {err}"),
            ConfigError::InvalidMissingParentPolicy(value) => write!(
                f,
                "COMPLIANCE_MISSING_PARENT must be one of root, orphan, reject (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Thresholds(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidDays { .. }
            | ConfigError::InvalidMissingParentPolicy(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "COMPLIANCE_URGENT_DAYS",
            "COMPLIANCE_WARNING_DAYS",
            "COMPLIANCE_HORIZON_DAYS",
            "COMPLIANCE_MISSING_PARENT",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.compliance, ComplianceConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn compliance_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPLIANCE_URGENT_DAYS", "14");
        env::set_var("COMPLIANCE_WARNING_DAYS", "60");
        env::set_var("COMPLIANCE_MISSING_PARENT", "Orphan");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.compliance.thresholds.urgent_within_days(), 14);
        assert_eq!(config.compliance.thresholds.warning_within_days(), 60);
        assert_eq!(config.compliance.missing_parent, MissingParentPolicy::Orphan);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPLIANCE_URGENT_DAYS", "45");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::Thresholds(ThresholdError::Inverted { urgent, warning })) => {
                assert_eq!((urgent, warning), (45, 30));
            }
            other => panic!("expected threshold error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_days_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPLIANCE_HORIZON_DAYS", "soon");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDays {
                var: "COMPLIANCE_HORIZON_DAYS",
                ..
            })
        ));
    }
}
