//! LDAP group membership checks
//!
//! Provides:
//! - Endpoint parsing (ldap:// and ldaps:// with default ports)
//! - Plaintext, unverified TLS and CA-validated TLS connections
//! - Randomized fallback across redundant directory servers
//! - Allow-list evaluation of a principal's groups

mod connector;
mod decision;
mod endpoint;
mod error;
mod groups;
mod resolver;

pub use connector::{DirectoryConnector, DirectorySession, Ldap3Connector, TlsPolicy};
pub use decision::{AuthorizationDecision, DenialReason};
pub use endpoint::{Endpoint, Scheme};
pub use error::{ConnectError, LdapError, QueryError};
pub use groups::{extract_group_cn, GroupSet};
pub use resolver::{check_membership, membership_filter, MembershipResolver, MEMBER_ATTRIBUTE};
