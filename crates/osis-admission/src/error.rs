use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::admission::ports::RepositoryError;
use crate::workflows::admission::service::AdmissionServiceError;
use crate::workflows::admission::validation::MultipleBusinessExceptions;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Business(MultipleBusinessExceptions),
    Repository(RepositoryError),
}

impl AppError {
    /// Process exit status: 1 for refused business checks, 2 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Business(_) => 1,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Repository(_) => 2,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "snapshot error: {}", err),
            AppError::Business(err) => write!(f, "business validation failed: {}", err),
            AppError::Repository(err) => write!(f, "repository error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Business(err) => Some(err),
            AppError::Repository(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<MultipleBusinessExceptions> for AppError {
    fn from(value: MultipleBusinessExceptions) -> Self {
        Self::Business(value)
    }
}

impl From<AdmissionServiceError> for AppError {
    fn from(value: AdmissionServiceError) -> Self {
        match value {
            AdmissionServiceError::Business(err) => Self::Business(err),
            AdmissionServiceError::Repository(err) => Self::Repository(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admission::validation::BusinessException;

    #[test]
    fn business_failures_exit_with_one() {
        let error = AppError::from(MultipleBusinessExceptions::from(
            BusinessException::NoMatchingPool,
        ));
        assert_eq!(error.exit_code(), 1);
        assert!(error.to_string().starts_with("business validation failed"));
    }

    #[test]
    fn service_errors_keep_their_kind() {
        let error = AppError::from(AdmissionServiceError::Repository(RepositoryError::NotFound));
        assert!(matches!(error, AppError::Repository(RepositoryError::NotFound)));
        assert_eq!(error.exit_code(), 2);
    }
}
