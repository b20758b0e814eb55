//! Error types for lfsgate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Failed to read {path:?}: {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("Failed to parse {path:?}: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Request Errors
    #[error("Unknown LFS operation: {0:?}, expected \"download\" or \"upload\"")]
    UnknownOperation(String),

    #[error("Cannot figure out namespace and repository from path: {0:?}")]
    InvalidRepoPath(String),

    #[error("Cannot determine the current user: {0}")]
    UnknownUser(String),

    // Access Errors
    #[error("You're not authorised for this operation")]
    NotAuthorized,

    #[error("{0}")]
    DirectoryUnavailable(String),

    // Internal Errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl Error {
    /// Short category name used in log records
    pub fn code(&self) -> &'static str {
        match self {
            Error::ConfigRead { .. } | Error::ConfigParse { .. } | Error::InvalidConfig(_) => {
                "ConfigError"
            }
            Error::UnknownOperation(_) | Error::InvalidRepoPath(_) => "InvalidRequest",
            Error::UnknownUser(_) => "UnknownUser",
            Error::NotAuthorized => "AccessDenied",
            Error::DirectoryUnavailable(_) => "DirectoryUnavailable",
            Error::InternalError(_) => "InternalError",
        }
    }

    /// Whether the error is an authoritative refusal rather than a failure
    pub fn is_denial(&self) -> bool {
        matches!(self, Error::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_authorized_message() {
        assert_eq!(
            Error::NotAuthorized.to_string(),
            "You're not authorised for this operation"
        );
        assert!(Error::NotAuthorized.is_denial());
    }

    #[test]
    fn test_directory_unavailable_is_verbatim() {
        let err = Error::DirectoryUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert!(!err.is_denial());
        assert_eq!(err.code(), "DirectoryUnavailable");
    }

    #[test]
    fn test_codes() {
        let config = Error::ConfigParse {
            path: "/etc/git-lfs-authenticate.conf".to_string(),
            reason: "expected `=`".to_string(),
        };
        assert_eq!(config.code(), "ConfigError");
        assert_eq!(Error::InvalidRepoPath("x".into()).code(), "InvalidRequest");
        assert_eq!(Error::UnknownOperation("push".into()).code(), "InvalidRequest");
        assert_eq!(Error::NotAuthorized.code(), "AccessDenied");
        assert!(!config.is_denial());
    }

    #[test]
    fn test_request_error_messages() {
        let err = Error::UnknownOperation("push".to_string());
        assert_eq!(
            err.to_string(),
            r#"Unknown LFS operation: "push", expected "download" or "upload""#
        );

        let err = Error::InvalidRepoPath("a/b/c".to_string());
        assert_eq!(
            err.to_string(),
            r#"Cannot figure out namespace and repository from path: "a/b/c""#
        );
    }
}
