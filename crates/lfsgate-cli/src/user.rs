//! Principal lookup

use lfsgate_core::{Error, Result};
use nix::unistd::{getuid, User};

/// Login name of the user running this process
pub fn current_username() -> Result<String> {
    let uid = getuid();
    match User::from_uid(uid) {
        Ok(Some(user)) => Ok(user.name),
        Ok(None) => Err(Error::UnknownUser(format!("no passwd entry for uid {}", uid))),
        Err(e) => Err(Error::UnknownUser(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_username() {
        // test environments without a passwd entry report UnknownUser
        match current_username() {
            Ok(name) => assert!(!name.is_empty()),
            Err(e) => assert!(matches!(e, Error::UnknownUser(_))),
        }
    }
}
