//! Directory error types

use std::path::PathBuf;
use thiserror::Error;

/// Failure to reach one endpoint
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("unsupported LDAP URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid LDAP address: {0}")]
    InvalidAddress(String),

    #[error("ldaps:// cannot be used with an IPv6 address, use a host name: {0}")]
    TlsIpv6Literal(String),

    #[error("failed to read CA certificate {path:?}: {source}")]
    CaCertificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable CA certificate in {path:?}: {reason}")]
    InvalidCaCertificate { path: PathBuf, reason: String },

    #[error("failed to connect to {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: ldap3::LdapError,
    },
}

/// Failure of the membership search on an open connection
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("membership search on {address} failed: {source}")]
    Search {
        address: String,
        #[source]
        source: ldap3::LdapError,
    },
}

/// Errors surfaced by the membership resolver
#[derive(Error, Debug)]
pub enum LdapError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("no LDAP server answered ({attempts} tried), last error: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Box<LdapError>,
    },

    #[error("no LDAP servers configured")]
    NoEndpoints,
}

impl LdapError {
    /// The last per-endpoint error behind an exhausted pool
    pub fn last_endpoint_error(&self) -> &LdapError {
        match self {
            LdapError::Exhausted { last, .. } => last.last_endpoint_error(),
            other => other,
        }
    }
}
