//! Error types shared by both tools.
//!
//! Each failure class maps to one process exit code so scripts can tell a
//! missing credential from an unreachable hub.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a configuration problem (`EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;
/// Exit code for an unreachable hub or an unexpected HTTP status (`EX_UNAVAILABLE`).
pub const EXIT_UNAVAILABLE: u8 = 69;
/// Exit code for a response body that could not be decoded (`EX_PROTOCOL`).
pub const EXIT_PROTOCOL: u8 = 76;
/// Exit code for rejected credentials (`EX_NOPERM`).
pub const EXIT_NOPERM: u8 = 77;
/// Exit code for a failure reading from or writing to the terminal (`EX_IOERR`).
pub const EXIT_IOERR: u8 = 74;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hub(#[from] HubError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(e) => e.exit_code(),
            Error::Hub(e) => e.exit_code(),
            Error::Io(_) => EXIT_IOERR,
        }
    }
}

/// Problems locating or reading the credential file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory of the current user")]
    HomeDirNotFound,

    #[error("config file {path:?} not found; create it with a line `API_KEY_HA=<token>`")]
    Missing { path: PathBuf },

    #[error("reading config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no `API_KEY_HA=` line in {path:?}")]
    MissingKey { path: PathBuf },

    #[error("`API_KEY_HA` in {path:?} is empty")]
    EmptyKey { path: PathBuf },

    #[error("invalid hub URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        EXIT_CONFIG
    }
}

/// Failures talking to the hub's REST API.
#[derive(Debug, Error)]
pub enum HubError {
    #[error(
        "Cannot connect to Home Assistant at '{url}'. Please check the URL and ensure Home Assistant is running."
    )]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Timeout connecting to Home Assistant at '{url}'")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Network error accessing {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Authentication failed. Please check that API_KEY_HA is valid and has not expired.")]
    Unauthorized,

    #[error("Access forbidden. The API_KEY_HA token may not have sufficient permissions.")]
    Forbidden,

    #[error("Home Assistant API endpoint not found: {endpoint}")]
    NotFound { endpoint: String },

    #[error("HTTP error {status} accessing {endpoint}: {body}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: String,
        body: String,
    },

    #[error("Failed to parse JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API endpoint '{endpoint}': {source}")]
    InvalidUrl {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl HubError {
    pub fn exit_code(&self) -> u8 {
        match self {
            HubError::Unauthorized | HubError::Forbidden => EXIT_NOPERM,
            HubError::Decode { .. } => EXIT_PROTOCOL,
            _ => EXIT_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_use_config_exit_code() {
        let err = Error::from(ConfigError::MissingKey {
            path: PathBuf::from("/home/user/.env"),
        });
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn auth_failures_are_distinct_from_transport_failures() {
        assert_eq!(Error::from(HubError::Unauthorized).exit_code(), EXIT_NOPERM);
        assert_eq!(Error::from(HubError::Forbidden).exit_code(), EXIT_NOPERM);
        let not_found = HubError::NotFound {
            endpoint: "api/states/light.x".into(),
        };
        assert_eq!(not_found.exit_code(), EXIT_UNAVAILABLE);
    }

    #[test]
    fn io_errors_use_ioerr_exit_code() {
        let err = Error::from(std::io::Error::other("stdin closed"));
        assert_eq!(err.exit_code(), EXIT_IOERR);
    }
}
