use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

const DEFAULT_MAX_PROPOSITIONS: u8 = 5;
const DEFAULT_MAX_SUBMITTED_PROPOSITIONS: u8 = 2;

/// Distinguishes runtime behavior for different stages of the engine.
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
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let max_propositions =
            limit_from_env("ADMISSION_MAX_PROPOSITIONS", DEFAULT_MAX_PROPOSITIONS)?;
        let max_submitted_propositions = limit_from_env(
            "ADMISSION_MAX_SUBMITTED_PROPOSITIONS",
            DEFAULT_MAX_SUBMITTED_PROPOSITIONS,
        )?;

        let forbid_non_resident_quota = match env::var("ADMISSION_FORBID_NON_RESIDENT_QUOTA") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "ADMISSION_FORBID_NON_RESIDENT_QUOTA",
                value: raw,
            })?,
            Err(_) => true,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            engine: EngineConfig {
                max_propositions,
                max_submitted_propositions,
                forbid_non_resident_quota,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn limit_from_env(name: &'static str, default: u8) -> Result<u8, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidLimit { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Dials consumed by the verification and calendar services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of propositions a candidate may hold at once.
    pub max_propositions: u8,
    /// Maximum number of general education propositions a candidate may submit.
    pub max_submitted_propositions: u8,
    /// Refuse non-resident candidates for quota trainings outright.
    pub forbid_non_resident_quota: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_propositions: DEFAULT_MAX_PROPOSITIONS,
            max_submitted_propositions: DEFAULT_MAX_SUBMITTED_PROPOSITIONS,
            forbid_non_resident_quota: true,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidLimit { name: &'static str, value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLimit { name, value } => {
                write!(f, "{} must be a positive u8 (found '{}')", name, value)
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be a boolean flag (found '{}')", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

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
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ADMISSION_MAX_PROPOSITIONS");
        env::remove_var("ADMISSION_MAX_SUBMITTED_PROPOSITIONS");
        env::remove_var("ADMISSION_FORBID_NON_RESIDENT_QUOTA");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_engine_dials_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("ADMISSION_MAX_PROPOSITIONS", "3");
        env::set_var("ADMISSION_MAX_SUBMITTED_PROPOSITIONS", "1");
        env::set_var("ADMISSION_FORBID_NON_RESIDENT_QUOTA", "off");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.engine.max_propositions, 3);
        assert_eq!(config.engine.max_submitted_propositions, 1);
        assert!(!config.engine.forbid_non_resident_quota);
        reset_env();
    }

    #[test]
    fn rejects_zero_max_propositions() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADMISSION_MAX_PROPOSITIONS", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidLimit { name, value }) => {
                assert_eq!(name, "ADMISSION_MAX_PROPOSITIONS");
                assert_eq!(value, "0");
            }
            other => panic!("expected invalid max propositions, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unparseable_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADMISSION_FORBID_NON_RESIDENT_QUOTA", "maybe");
        match AppConfig::load() {
            Err(ConfigError::InvalidFlag { name, .. }) => {
                assert_eq!(name, "ADMISSION_FORBID_NON_RESIDENT_QUOTA")
            }
            other => panic!("expected invalid flag, got {other:?}"),
        }
        reset_env();
    }
}
