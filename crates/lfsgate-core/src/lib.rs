//! lfsgate Core Library
//!
//! Configuration, errors and request/response types shared by the
//! directory resolver and the `git-lfs-authenticate` command.

pub mod config;
pub mod error;
pub mod types;

pub use config::LfsGateConfig;
pub use error::{Error, Result};

/// lfsgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/git-lfs-authenticate.conf";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "GIT_LFS_AUTHENTICATE_CONFIG";

/// Default plaintext LDAP port
pub const LDAP_DEFAULT_PORT: u16 = 389;

/// Default LDAPS port
pub const LDAPS_DEFAULT_PORT: u16 = 636;
