//! Group extraction from `member` values

use std::collections::BTreeSet;
use tracing::debug;

/// Pull the group name out of a member DN (`cn=<group>,ou=...`)
///
/// Returns `None` when the value does not start with a `cn=` component.
pub fn extract_group_cn(member: &str) -> Option<&str> {
    let prefix = member.get(..3)?;
    if !prefix.eq_ignore_ascii_case("cn=") {
        return None;
    }

    let rest = &member[3..];
    let name = match rest.find(',') {
        Some(end) => &rest[..end],
        None => rest,
    };

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Groups a principal belongs to, as reported by one directory server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    groups: BTreeSet<String>,
}

impl GroupSet {
    pub fn from_member_values<S: AsRef<str>>(values: &[S]) -> Self {
        let mut groups = BTreeSet::new();
        for value in values {
            match extract_group_cn(value.as_ref()) {
                Some(name) => {
                    groups.insert(name.to_string());
                }
                None => debug!("Skipping member value without cn: {}", value.as_ref()),
            }
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// First allowed group (in allow-list order) the principal is a member of
    pub fn first_allowed<'a>(&self, allowed: &'a [String]) -> Option<&'a str> {
        allowed
            .iter()
            .map(String::as_str)
            .find(|group| self.contains(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_group_cn() {
        assert_eq!(
            extract_group_cn("cn=devteam,ou=groups,dc=example,dc=com"),
            Some("devteam")
        );
        assert_eq!(extract_group_cn("CN=Ops Team,OU=Groups"), Some("Ops Team"));
        assert_eq!(extract_group_cn("cn=solo"), Some("solo"));
        assert_eq!(extract_group_cn("uid=jdoe,ou=people"), None);
        assert_eq!(extract_group_cn("cn=,ou=groups"), None);
        assert_eq!(extract_group_cn("cn"), None);
        assert_eq!(extract_group_cn(""), None);
    }

    #[test]
    fn test_group_set_from_members() {
        let set = GroupSet::from_member_values(&[
            "cn=dev,ou=groups,dc=example,dc=com",
            "cn=ops,ou=groups,dc=example,dc=com",
            "cn=dev,ou=other,dc=example,dc=com",
            "uid=someone,ou=people,dc=example,dc=com",
        ]);

        assert_eq!(set.len(), 2);
        assert!(set.contains("dev"));
        assert!(set.contains("ops"));
        assert!(!set.contains("someone"));
    }

    #[test]
    fn test_first_allowed() {
        let set = GroupSet::from_member_values(&["cn=dev,ou=groups", "cn=ops,ou=groups"]);

        let allowed = vec!["admins".to_string(), "ops".to_string()];
        assert_eq!(set.first_allowed(&allowed), Some("ops"));

        let allowed = vec!["admins".to_string()];
        assert_eq!(set.first_allowed(&allowed), None);

        assert_eq!(GroupSet::default().first_allowed(&allowed), None);
    }
}
