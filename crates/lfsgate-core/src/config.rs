//! Configuration for lfsgate
//!
//! Example `/etc/git-lfs-authenticate.conf`:
//! ```toml
//! [ldap]
//! urls = ["ldaps://dir1.example.com", "ldap://dir2.example.com:3389"]
//! groups = ["lfs-users", "developers"]
//! base_dn = "ou=people,dc=example,dc=com"
//! cacert = "/etc/ssl/certs/directory-ca.pem"
//!
//! [lfs]
//! url = "https://lfs.example.com"
//! user = "lfs-proxy"
//! password = "secret"
//! ```
//!
//! Older releases read an INI file at the same path (`[Ldap]` with
//! comma-separated `Urls`, `Groups`, `Base`, `Cacert`; `[Lfs]` with `Url`,
//! `User`, `Password`). Such files have to be rewritten in the TOML layout
//! above; loading one fails with a parse error that says so.
//!
//! Without `cacert`, `ldaps://` servers are not authenticated unless
//! `skip_tls_verify = false` is set, in which case the system trust store is
//! used. Leaving both unset lets anyone on the network path answer the
//! membership query.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LfsGateConfig {
    #[serde(default)]
    pub ldap: LdapConfig,

    #[serde(default)]
    pub lfs: LfsConfig,
}

impl LfsGateConfig {
    /// Pick the configuration file: explicit path, then the environment
    /// override, then the system default.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        match std::env::var(crate::CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(crate::DEFAULT_CONFIG_PATH),
        }
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            crate::Error::ConfigParse { reason, .. } => crate::Error::ConfigParse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| {
            let reason = if is_legacy_ini(content) {
                format!(
                    "{} (this looks like the old INI format; use TOML with [ldap] and [lfs] sections)",
                    e.message()
                )
            } else {
                e.message().to_string()
            };
            crate::Error::ConfigParse {
                path: String::new(),
                reason,
            }
        })
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.ldap.validate()?;
        self.lfs.validate()
    }
}

/// `[Ldap]`/`[Lfs]` section headers of the INI files used by older releases
fn is_legacy_ini(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .any(|line| line == "[Ldap]" || line == "[Lfs]")
}

/// Directory service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// Redundant directory endpoints (ldap:// or ldaps://)
    #[serde(default)]
    pub urls: Vec<String>,

    /// Groups whose members are allowed through
    #[serde(default)]
    pub groups: Vec<String>,

    /// Subtree searched for the principal
    #[serde(default, alias = "base")]
    pub base_dn: String,

    /// PEM file holding the CA certificate(s) used to validate ldaps:// endpoints
    #[serde(default)]
    pub cacert: Option<PathBuf>,

    /// Accept any server certificate on ldaps:// endpoints when no `cacert`
    /// is configured. With `false` the system trust store is used instead.
    #[serde(default = "default_skip_tls_verify")]
    pub skip_tls_verify: bool,

    /// Connect and per-operation timeout in seconds (0 = none)
    #[serde(default = "default_ldap_timeout")]
    pub timeout_seconds: u64,
}

fn default_skip_tls_verify() -> bool {
    true
}

fn default_ldap_timeout() -> u64 {
    10
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            groups: Vec::new(),
            base_dn: String::new(),
            cacert: None,
            skip_tls_verify: default_skip_tls_verify(),
            timeout_seconds: default_ldap_timeout(),
        }
    }
}

impl LdapConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.urls.is_empty() {
            return Err(crate::Error::InvalidConfig(
                "at least one LDAP URL is required".into(),
            ));
        }

        for url in &self.urls {
            if !url.starts_with("ldap://") && !url.starts_with("ldaps://") {
                return Err(crate::Error::InvalidConfig(format!(
                    "LDAP URL must start with ldap:// or ldaps://: {}",
                    url
                )));
            }
        }

        if self.base_dn.is_empty() {
            return Err(crate::Error::InvalidConfig("LDAP base DN is required".into()));
        }

        if self.groups.is_empty() {
            return Err(crate::Error::InvalidConfig(
                "at least one allowed group is required".into(),
            ));
        }

        if self.cacert.is_none()
            && self.skip_tls_verify
            && self.urls.iter().any(|u| u.starts_with("ldaps://"))
        {
            warn!("ldaps:// endpoints configured without cacert; server certificates will not be verified");
        }

        Ok(())
    }

    /// Connect/operation timeout, `None` when disabled
    pub fn timeout(&self) -> Option<std::time::Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(std::time::Duration::from_secs(secs)),
        }
    }
}

/// Downstream LFS server settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LfsConfig {
    /// Base URL of the LFS HTTP endpoint
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Lifetime hint (seconds) passed back to the client
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl LfsConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.url.is_empty() {
            return Err(crate::Error::InvalidConfig("LFS URL is required".into()));
        }

        url::Url::parse(&self.url).map_err(|e| {
            crate::Error::InvalidConfig(format!("invalid LFS URL {:?}: {}", self.url, e))
        })?;

        Ok(())
    }
}
