use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VsacError {
    #[error("Failed to obtain ticket granting ticket: {message}")]
    AuthenticationError { message: String },

    #[error("Failed to obtain service ticket for value set {oid}: {message}")]
    TicketExchangeError { oid: String, message: String },

    #[error("Error downloading valueset: {oid}: {message}")]
    FetchError { oid: String, message: String },

    #[error("Failed to parse value set {oid}: {message}")]
    ParseError { oid: String, message: String },

    #[error("Value set id '{oid}' cannot be used as a file name")]
    InvalidOidError { oid: String },

    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} error(s) occurred while downloading value sets", errors.len())]
    BatchFailed { errors: Vec<VsacError> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl VsacError {
    /// The value set this error belongs to, for per-item failures.
    pub fn oid(&self) -> Option<&str> {
        match self {
            Self::TicketExchangeError { oid, .. }
            | Self::FetchError { oid, .. }
            | Self::ParseError { oid, .. }
            | Self::InvalidOidError { oid } => Some(oid),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationError { .. } => ErrorCategory::Authentication,
            Self::TicketExchangeError { .. } | Self::FetchError { .. } => ErrorCategory::Network,
            Self::ParseError { .. } | Self::InvalidOidError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Data
            }
            Self::WriteError { .. } | Self::IoError(_) => ErrorCategory::Storage,
            Self::BatchFailed { errors } => errors
                .first()
                .map(|e| e.category())
                .unwrap_or(ErrorCategory::Network),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TicketExchangeError { .. } | Self::FetchError { .. } => ErrorSeverity::Medium,
            Self::ParseError { .. } | Self::InvalidOidError { .. } | Self::SerializationError(_) => {
                ErrorSeverity::High
            }
            Self::BatchFailed { errors } => errors
                .iter()
                .map(|e| e.severity())
                .max()
                .unwrap_or(ErrorSeverity::Medium),
            Self::AuthenticationError { .. }
            | Self::WriteError { .. }
            | Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::AuthenticationError { .. } => {
                "Check the VSAC username and password, and that the ticket endpoint is reachable"
                    .to_string()
            }
            Self::TicketExchangeError { .. } | Self::FetchError { .. } => {
                "Re-run the download; value sets already in the index are skipped".to_string()
            }
            Self::ParseError { .. } => {
                "Verify the OID refers to an existing value set and the retrieve endpoint returns SVS XML"
                    .to_string()
            }
            Self::InvalidOidError { .. } => {
                "OIDs are dotted digits such as 2.16.840.1.113883.3.464.1003.103.12.1001; fix the mapping entry"
                    .to_string()
            }
            Self::WriteError { path, .. } => format!(
                "Check that {} is writable and the disk is not full",
                path.display()
            ),
            Self::BatchFailed { errors } => {
                let oids: Vec<&str> = errors.iter().filter_map(|e| e.oid()).collect();
                if oids.is_empty() {
                    "Re-run the download once the underlying problem is fixed".to_string()
                } else {
                    format!("Retry the failed value sets: {}", oids.join(", "))
                }
            }
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::SerializationError(_) => "The index file may be corrupt; delete it and retry".to_string(),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::BatchFailed { errors } => {
                let details: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
                format!("{}\n{}", self, details.join("\n"))
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VsacError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_failure_reports_failed_oids() {
        let err = VsacError::BatchFailed {
            errors: vec![
                VsacError::FetchError {
                    oid: "1.2.3".to_string(),
                    message: "HTTP status 404".to_string(),
                },
                VsacError::TicketExchangeError {
                    oid: "4.5.6".to_string(),
                    message: "HTTP status 401".to_string(),
                },
            ],
        };

        assert_eq!(err.to_string(), "2 error(s) occurred while downloading value sets");
        assert_eq!(err.recovery_suggestion(), "Retry the failed value sets: 1.2.3, 4.5.6");
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("Error downloading valueset: 1.2.3"));
    }

    #[test]
    fn test_write_error_in_batch_raises_severity() {
        let err = VsacError::BatchFailed {
            errors: vec![VsacError::WriteError {
                path: PathBuf::from("out/valueset-db.json"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            }],
        };

        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_invalid_oid_is_tagged_and_ranks_above_fetch_errors() {
        let err = VsacError::BatchFailed {
            errors: vec![
                VsacError::FetchError {
                    oid: "1.2.3".to_string(),
                    message: "HTTP status 404".to_string(),
                },
                VsacError::InvalidOidError {
                    oid: "../x".to_string(),
                },
            ],
        };

        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.recovery_suggestion(), "Retry the failed value sets: 1.2.3, ../x");
    }

    #[test]
    fn test_authentication_error_has_no_oid() {
        let err = VsacError::AuthenticationError {
            message: "HTTP status 401".to_string(),
        };
        assert!(err.oid().is_none());
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }
}
