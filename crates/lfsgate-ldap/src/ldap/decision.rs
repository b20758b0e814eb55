//! Outcome of a membership check

use std::fmt;

use super::error::LdapError;

/// Why a reachable directory said no
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The principal has no memberships (or does not exist)
    NoMemberships,
    /// None of the principal's groups is on the allow-list
    NoMatchingGroup,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoMemberships => f.write_str("no group memberships"),
            DenialReason::NoMatchingGroup => f.write_str("no allowed group"),
        }
    }
}

/// Authorization outcome
///
/// `Denied` always comes from a directory server that answered the query.
/// `Indeterminate` means no server answered at all.
#[derive(Debug)]
pub enum AuthorizationDecision {
    Authorized,
    Denied(DenialReason),
    Indeterminate(LdapError),
}

impl AuthorizationDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthorizationDecision::Authorized)
    }

    /// Collapse into the caller-facing result
    pub fn into_result(self) -> lfsgate_core::Result<()> {
        match self {
            AuthorizationDecision::Authorized => Ok(()),
            AuthorizationDecision::Denied(_) => Err(lfsgate_core::Error::NotAuthorized),
            AuthorizationDecision::Indeterminate(err) => {
                Err(lfsgate_core::Error::DirectoryUnavailable(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert!(AuthorizationDecision::Authorized.into_result().is_ok());

        let err = AuthorizationDecision::Denied(DenialReason::NoMemberships)
            .into_result()
            .unwrap_err();
        assert!(err.is_denial());

        let err = AuthorizationDecision::Indeterminate(LdapError::NoEndpoints)
            .into_result()
            .unwrap_err();
        assert!(matches!(err, lfsgate_core::Error::DirectoryUnavailable(_)));
        assert_eq!(err.to_string(), "no LDAP servers configured");
    }
}
