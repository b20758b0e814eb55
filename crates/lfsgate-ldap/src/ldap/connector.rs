//! Directory connections
//!
//! Opens one connection per endpoint attempt. Plain `ldap://` endpoints get a
//! bare TCP stream; `ldaps://` endpoints are wrapped in TLS according to the
//! configured [`TlsPolicy`].

use async_trait::async_trait;
use ldap3::{DerefAliases, Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry, SearchOptions};
use lfsgate_core::config::LdapConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoint::Endpoint;
use super::error::{ConnectError, QueryError};
use super::resolver::{membership_filter, MEMBER_ATTRIBUTE};

/// Opens sessions to directory endpoints
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    type Session: DirectorySession;

    async fn connect(&self, endpoint: &Endpoint) -> Result<Self::Session, ConnectError>;
}

/// An open connection to one directory server
#[async_trait]
pub trait DirectorySession: Send {
    /// Raw `member` values of every entry under `base_dn` whose cn is `principal`
    async fn member_values(
        &mut self,
        base_dn: &str,
        principal: &str,
    ) -> Result<Vec<String>, QueryError>;

    /// Release the connection
    async fn close(self);
}

/// How `ldaps://` server certificates are checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Validate against the CA certificate(s) in this PEM file only
    CaFile(PathBuf),
    /// Accept any certificate. Anyone on the network path can impersonate
    /// the directory and answer membership queries.
    Insecure,
    /// Validate against the system trust store
    SystemRoots,
}

impl TlsPolicy {
    pub fn from_config(config: &LdapConfig) -> Self {
        match (&config.cacert, config.skip_tls_verify) {
            (Some(path), _) => TlsPolicy::CaFile(path.clone()),
            (None, true) => TlsPolicy::Insecure,
            (None, false) => TlsPolicy::SystemRoots,
        }
    }
}

/// [`DirectoryConnector`] backed by `ldap3`
#[derive(Debug, Clone)]
pub struct Ldap3Connector {
    tls: TlsPolicy,
    timeout: Option<Duration>,
}

impl Ldap3Connector {
    pub fn new(tls: TlsPolicy, timeout: Option<Duration>) -> Self {
        Self { tls, timeout }
    }

    pub fn from_config(config: &LdapConfig) -> Self {
        Self::new(TlsPolicy::from_config(config), config.timeout())
    }

    async fn tls_settings(
        &self,
        settings: LdapConnSettings,
        endpoint: &Endpoint,
    ) -> Result<LdapConnSettings, ConnectError> {
        match &self.tls {
            TlsPolicy::CaFile(path) => {
                let config = ca_client_config(path).await?;
                Ok(settings.set_config(config))
            }
            TlsPolicy::Insecure => {
                warn!(
                    "Connecting to {} without verifying its TLS certificate",
                    endpoint
                );
                Ok(settings.set_no_tls_verify(true))
            }
            TlsPolicy::SystemRoots => Ok(settings),
        }
    }
}

#[async_trait]
impl DirectoryConnector for Ldap3Connector {
    type Session = Ldap3Session;

    async fn connect(&self, endpoint: &Endpoint) -> Result<Ldap3Session, ConnectError> {
        let mut settings = LdapConnSettings::new();
        if let Some(timeout) = self.timeout {
            settings = settings.set_conn_timeout(timeout);
        }
        if endpoint.is_tls() {
            settings = self.tls_settings(settings, endpoint).await?;
        }

        debug!("Connecting to LDAP server: {}", endpoint);

        let (conn, ldap) = LdapConnAsync::with_settings(settings, &endpoint.url())
            .await
            .map_err(|source| ConnectError::Transport {
                address: endpoint.address(),
                source,
            })?;

        ldap3::drive!(conn);

        Ok(Ldap3Session {
            ldap,
            address: endpoint.address(),
            timeout: self.timeout,
        })
    }
}

/// Open `ldap3` connection; searches are anonymous
pub struct Ldap3Session {
    ldap: Ldap,
    address: String,
    timeout: Option<Duration>,
}

#[async_trait]
impl DirectorySession for Ldap3Session {
    async fn member_values(
        &mut self,
        base_dn: &str,
        principal: &str,
    ) -> Result<Vec<String>, QueryError> {
        let filter = membership_filter(principal);
        debug!("Searching {} under {:?} with filter: {}", self.address, base_dn, filter);

        let options = SearchOptions::new()
            .deref(DerefAliases::Never)
            .sizelimit(0)
            .timelimit(0);
        self.ldap.with_search_options(options);
        if let Some(timeout) = self.timeout {
            self.ldap.with_timeout(timeout);
        }

        let address = &self.address;
        let (entries, _res) = self
            .ldap
            .search(base_dn, Scope::Subtree, &filter, vec![MEMBER_ATTRIBUTE])
            .await
            .and_then(|result| result.success())
            .map_err(|source| QueryError::Search {
                address: address.clone(),
                source,
            })?;

        let mut values = Vec::new();
        for entry in entries {
            let entry = SearchEntry::construct(entry);
            for (attr, attr_values) in entry.attrs {
                if attr.eq_ignore_ascii_case(MEMBER_ATTRIBUTE) {
                    values.extend(attr_values);
                }
            }
        }

        debug!("{} returned {} member value(s)", self.address, values.len());
        Ok(values)
    }

    async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            debug!("Unbind from {} failed: {}", self.address, e);
        }
    }
}

/// Build a rustls client configuration trusting only the CA(s) in `path`
async fn ca_client_config(path: &Path) -> Result<Arc<rustls::ClientConfig>, ConnectError> {
    let certs = load_ca_certs(path).await?;

    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(&certs);
    if ignored > 0 {
        warn!("Ignored {} unparsable certificate(s) in {:?}", ignored, path);
    }
    if added == 0 {
        return Err(ConnectError::InvalidCaCertificate {
            path: path.to_path_buf(),
            reason: "no valid certificates".to_string(),
        });
    }
    debug!("Loaded {} CA certificate(s) from {:?}", added, path);

    let config = rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Read DER certificates from a PEM file
async fn load_ca_certs(path: &Path) -> Result<Vec<Vec<u8>>, ConnectError> {
    let pem = tokio::fs::read(path)
        .await
        .map_err(|source| ConnectError::CaCertificate {
            path: path.to_path_buf(),
            source,
        })?;

    let certs = rustls_pemfile::certs(&mut pem.as_slice())
        .map(|cert| cert.map(|der| der.as_ref().to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConnectError::InvalidCaCertificate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(ConnectError::InvalidCaCertificate {
            path: path.to_path_buf(),
            reason: "no PEM certificates found".to_string(),
        });
    }

    Ok(certs)
}
