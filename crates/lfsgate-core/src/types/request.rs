//! Request types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transfer direction requested by the LFS client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LfsOperation {
    Upload,
    Download,
}

impl LfsOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LfsOperation::Upload => "upload",
            LfsOperation::Download => "download",
        }
    }
}

impl FromStr for LfsOperation {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(LfsOperation::Upload),
            "download" => Ok(LfsOperation::Download),
            other => Err(crate::Error::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for LfsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `namespace/repo` as passed on the SSH command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPath {
    pub namespace: String,
    pub repo: String,
}

impl RepoPath {
    /// Path component appended to the LFS base URL
    pub fn url_path(&self) -> String {
        format!("/{}/{}", self.namespace, self.repo)
    }
}

impl FromStr for RepoPath {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ssh clients sometimes send the path with a leading slash
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        let parts: Vec<&str> = trimmed.split('/').collect();

        match parts.as_slice() {
            [namespace, repo] if !namespace.is_empty() && !repo.is_empty() => Ok(RepoPath {
                namespace: namespace.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(crate::Error::InvalidRepoPath(s.to_string())),
        }
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.repo)
    }
}

/// A parsed `git-lfs-authenticate` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfsRequest {
    pub path: RepoPath,
    pub operation: LfsOperation,
    /// Legacy clients pass the object id as a third argument; it is ignored
    pub oid: Option<String>,
}

impl LfsRequest {
    pub fn parse(path: &str, operation: &str, oid: Option<String>) -> crate::Result<Self> {
        let operation = operation.parse()?;
        let path = path.parse()?;
        Ok(Self {
            path,
            operation,
            oid,
        })
    }
}
