//! Directory-backed authorization for lfsgate

pub mod ldap;

pub use ldap::{
    check_membership, AuthorizationDecision, ConnectError, DenialReason, DirectoryConnector,
    DirectorySession, Endpoint, GroupSet, Ldap3Connector, LdapError, MembershipResolver,
    QueryError, Scheme, TlsPolicy,
};
