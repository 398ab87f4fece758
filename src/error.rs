//! Error taxonomy at the CLI boundary.
//!
//! Module-level errors (credentials, policy, usage, service) roll up
//! into one [`Error`], and each category maps to a deterministic exit
//! code so callers can branch on the failure class without parsing
//! messages.

use crate::action::UsageError;
use crate::client::ServiceError;
use crate::credentials::CredentialsError;
use crate::policy::PolicyError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error("incomplete policy key: {0} missing")]
    IncompleteKey(&'static str),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error("unable to resolve policy file path {path}: {source}")]
    PolicyPath {
        path: String,
        source: std::io::Error,
    },

    #[error("unable to read policy file {path}: {source}")]
    PolicyRead {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("unable to connect to the directory service: {0}")]
    Connection(ServiceError),

    #[error("directory service rejected the operation: {0}")]
    Operation(ServiceError),
}

/// Exit codes by failure class.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USAGE: i32 = 2;
    pub const IO: i32 = 3;
    pub const PARSE: i32 = 4;
    pub const CONNECTION: i32 = 5;
    pub const OPERATION: i32 = 6;
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::IncompleteKey(_) => exit_codes::USAGE,
            Error::Credentials(CredentialsError::PathResolution { .. })
            | Error::Credentials(CredentialsError::Unreadable { .. })
            | Error::PolicyPath { .. }
            | Error::PolicyRead { .. } => exit_codes::IO,
            Error::Credentials(_) | Error::Policy(_) => exit_codes::PARSE,
            Error::Connection(_) => exit_codes::CONNECTION,
            Error::Operation(_) => exit_codes::OPERATION,
        }
    }
}
