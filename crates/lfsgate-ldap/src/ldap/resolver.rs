//! Membership resolution across redundant directory servers
//!
//! Endpoints are tried in random order. Connection and search failures move
//! on to the next endpoint; the first server that answers the search decides.

use lfsgate_core::config::LdapConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::connector::{DirectoryConnector, DirectorySession, Ldap3Connector};
use super::decision::{AuthorizationDecision, DenialReason};
use super::endpoint::Endpoint;
use super::error::LdapError;
use super::groups::GroupSet;

/// Attribute listing a principal's groups
pub const MEMBER_ATTRIBUTE: &str = "member";

/// Search filter for `principal`.
///
/// The principal is inserted as-is: filter metacharacters are not escaped.
pub fn membership_filter(principal: &str) -> String {
    format!("(cn={})", principal)
}

/// Checks a principal's group memberships against an allow-list
pub struct MembershipResolver<C> {
    connector: C,
    urls: Vec<String>,
    base_dn: String,
    allowed_groups: Vec<String>,
}

impl MembershipResolver<Ldap3Connector> {
    pub fn from_config(config: &LdapConfig) -> Self {
        Self::new(Ldap3Connector::from_config(config), config)
    }
}

impl<C: DirectoryConnector> MembershipResolver<C> {
    pub fn new(connector: C, config: &LdapConfig) -> Self {
        Self {
            connector,
            urls: config.urls.clone(),
            base_dn: config.base_dn.clone(),
            allowed_groups: config.groups.clone(),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Decide whether `principal` belongs to an allowed group
    pub async fn check(&self, principal: &str) -> AuthorizationDecision {
        let mut rng = StdRng::from_os_rng();
        self.check_with_rng(principal, &mut rng).await
    }

    /// Same as [`check`](Self::check) with a caller-supplied selection order
    pub async fn check_with_rng<R: Rng>(
        &self,
        principal: &str,
        rng: &mut R,
    ) -> AuthorizationDecision {
        let mut pool: Vec<&str> = self.urls.iter().map(String::as_str).collect();
        let attempts = pool.len();
        let mut last_err: Option<LdapError> = None;

        while !pool.is_empty() {
            // Every path below either returns or moves on, so the endpoint
            // leaves the pool as soon as it is picked.
            let url = pool.swap_remove(rng.random_range(0..pool.len()));

            let endpoint = match Endpoint::parse(url) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    warn!("Skipping LDAP server {}: {}", url, e);
                    last_err = Some(e.into());
                    continue;
                }
            };

            let mut session = match self.connector.connect(&endpoint).await {
                Ok(session) => session,
                Err(e) => {
                    warn!("LDAP server {} unreachable: {}", endpoint, e);
                    last_err = Some(e.into());
                    continue;
                }
            };

            let result = session.member_values(&self.base_dn, principal).await;
            session.close().await;

            let values = match result {
                Ok(values) => values,
                Err(e) => {
                    warn!("LDAP server {} failed the membership search: {}", endpoint, e);
                    last_err = Some(e.into());
                    continue;
                }
            };

            let groups = GroupSet::from_member_values(&values);
            return self.evaluate(principal, &endpoint, &groups);
        }

        let err = match last_err {
            Some(last) => LdapError::Exhausted {
                attempts,
                last: Box::new(last),
            },
            None => LdapError::NoEndpoints,
        };
        warn!("Membership of {} undetermined: {}", principal, err);
        AuthorizationDecision::Indeterminate(err)
    }

    fn evaluate(
        &self,
        principal: &str,
        endpoint: &Endpoint,
        groups: &GroupSet,
    ) -> AuthorizationDecision {
        if groups.is_empty() {
            info!(
                "{} has no group memberships according to {}",
                principal, endpoint
            );
            return AuthorizationDecision::Denied(DenialReason::NoMemberships);
        }

        debug!("{} is a member of {} group(s)", principal, groups.len());

        match groups.first_allowed(&self.allowed_groups) {
            Some(group) => {
                info!("{} authorized through group {}", principal, group);
                AuthorizationDecision::Authorized
            }
            None => {
                info!("{} is not in any allowed group", principal);
                AuthorizationDecision::Denied(DenialReason::NoMatchingGroup)
            }
        }
    }
}

/// Check `principal` against the directory described by `config`
pub async fn check_membership(config: &LdapConfig, principal: &str) -> AuthorizationDecision {
    MembershipResolver::from_config(config).check(principal).await
}
