use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::scoring::ProfilePreset;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process-level settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_label(&var_or("APP_ENV", "development"));
        let server = ServerConfig {
            host: var_or("APP_HOST", "127.0.0.1"),
            port: var_or("APP_PORT", "3000")
                .parse::<u16>()
                .map_err(|_| SettingsError::InvalidPort)?,
        };
        let telemetry = TelemetryConfig {
            log_level: var_or("APP_LOG_LEVEL", "info"),
        };

        let profile_name = var_or("ROSTER_PROFILE", "A");
        let default_profile = profile_name
            .parse::<ProfilePreset>()
            .map_err(|_| SettingsError::UnknownProfile(profile_name.trim().to_string()))?;

        Ok(Self {
            environment,
            server,
            telemetry,
            evaluation: EvaluationSettings {
                default_profile,
                rules_path: optional_path("ROSTER_RULES_PATH"),
                schema_path: optional_path("ROSTER_SCHEMA_PATH"),
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| SettingsError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to evaluations that do not bring their own.
#[derive(Debug, Clone)]
pub struct EvaluationSettings {
    pub default_profile: ProfilePreset,
    pub rules_path: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum SettingsError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownProfile(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            SettingsError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            SettingsError::UnknownProfile(name) => {
                write!(f, "ROSTER_PROFILE must be one of A, B, C (found '{name}')")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::InvalidHost { source } => Some(source),
            SettingsError::InvalidPort | SettingsError::UnknownProfile(_) => None,
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "ROSTER_PROFILE",
            "ROSTER_RULES_PATH",
            "ROSTER_SCHEMA_PATH",
        ] {
            env::remove_var(key);
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
        assert_eq!(config.evaluation.default_profile, ProfilePreset::A);
        assert!(config.evaluation.rules_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_roster_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("ROSTER_PROFILE", "c");
        env::set_var("ROSTER_RULES_PATH", "/etc/roster/rules.json");
        env::set_var("ROSTER_SCHEMA_PATH", "  ");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.evaluation.default_profile, ProfilePreset::C);
        assert_eq!(
            config.evaluation.rules_path,
            Some(PathBuf::from("/etc/roster/rules.json"))
        );
        assert!(config.evaluation.schema_path.is_none());
        reset_env();
    }

    #[test]
    fn rejects_invalid_port_and_profile() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "99999");
        assert!(matches!(AppConfig::load(), Err(SettingsError::InvalidPort)));

        reset_env();
        env::set_var("ROSTER_PROFILE", "D");
        match AppConfig::load() {
            Err(SettingsError::UnknownProfile(name)) => assert_eq!(name, "D"),
            other => panic!("expected unknown profile, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unparseable_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "not-an-ip");
        let config = AppConfig::load().expect("host checked lazily");
        assert!(matches!(
            config.server.socket_addr(),
            Err(SettingsError::InvalidHost { .. })
        ));
        reset_env();
    }
}
