//! Directory endpoint addresses

use lfsgate_core::{LDAPS_DEFAULT_PORT, LDAP_DEFAULT_PORT};
use std::fmt;

use super::error::ConnectError;

/// Transport used to reach an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// ldap://
    Plain,
    /// ldaps://
    Tls,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Plain => "ldap",
            Scheme::Tls => "ldaps",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Plain => LDAP_DEFAULT_PORT,
            Scheme::Tls => LDAPS_DEFAULT_PORT,
        }
    }
}

/// One directory server, parsed from a configured URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Parse `ldap://host[:port]` or `ldaps://host[:port]`
    pub fn parse(url: &str) -> Result<Self, ConnectError> {
        let (scheme, rest) = if let Some(rest) = url.strip_prefix("ldaps://") {
            (Scheme::Tls, rest)
        } else if let Some(rest) = url.strip_prefix("ldap://") {
            (Scheme::Plain, rest)
        } else {
            return Err(ConnectError::UnsupportedScheme(url.to_string()));
        };

        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let (host, port) = split_host_port(rest)
            .ok_or_else(|| ConnectError::InvalidAddress(url.to_string()))?;

        // The TLS layer takes the server name from the bracketed URL host,
        // which is neither a DNS name nor an IP address.
        if scheme == Scheme::Tls && host.starts_with('[') {
            return Err(ConnectError::TlsIpv6Literal(url.to_string()));
        }

        let port = match port {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| ConnectError::InvalidAddress(url.to_string()))?,
            None => scheme.default_port(),
        };

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn is_tls(&self) -> bool {
        self.scheme == Scheme::Tls
    }

    /// Host portion, also used as the TLS server name. IPv6 literals keep
    /// their brackets and only occur on plaintext endpoints.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Normalized URL with an explicit port
    pub fn url(&self) -> String {
        format!("{}://{}", self.scheme.as_str(), self.address())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn split_host_port(s: &str) -> Option<(&str, Option<&str>)> {
    // [v6addr] or [v6addr]:port
    if s.starts_with('[') {
        let end = s.find(']')?;
        let (host, tail) = s.split_at(end + 1);
        return match tail {
            "" => Some((host, None)),
            _ => tail.strip_prefix(':').map(|port| (host, Some(port))),
        };
    }

    let (host, port) = match s.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (s, None),
    };

    if host.is_empty() || host.contains(['/', ':']) {
        return None;
    }
    Some((host, port))
}
