//! Command-line arguments

use clap::{Parser, ValueEnum};
use lfsgate_core::types::LfsRequest;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "git-lfs-authenticate")]
#[command(version = lfsgate_core::VERSION)]
#[command(about = "Grant Git LFS access based on LDAP group membership", long_about = None)]
pub struct Cli {
    /// Repository path as <namespace>/<repo>
    pub path: String,

    /// LFS operation (upload or download)
    pub operation: String,

    /// Object id sent by legacy clients, ignored
    pub oid: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = lfsgate_core::CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GIT_LFS_AUTHENTICATE_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    pub fn request(&self) -> lfsgate_core::Result<LfsRequest> {
        LfsRequest::parse(&self.path, &self.operation, self.oid.clone())
    }
}
