//! Collaborators the lock core calls out to.
//!
//! Identity and permissions live outside the core. The manager asks an
//! [`AccessPolicy`] whether a requester may read or write a repository and
//! whether they hold elevated privilege for force releases; the presentation
//! layer asks an [`OwnerDirectory`] for display names at render time.
//!
//! [`Config`] implements both from its `users` and `repositories` tables.

use crate::config::{AccessLevel, Config};

/// Repository permission checks.
pub trait AccessPolicy: Send + Sync {
    /// Whether `user_id` may list and inspect locks in the repository.
    fn can_read(&self, repository_id: &str, user_id: &str) -> bool;

    /// Whether `user_id` may create locks in the repository.
    fn can_write(&self, repository_id: &str, user_id: &str) -> bool;

    /// Whether `user_id` may force-release locks held by others.
    fn is_elevated(&self, repository_id: &str, user_id: &str) -> bool;
}

/// Display name lookup for lock owners.
pub trait OwnerDirectory: Send + Sync {
    /// Display name of `user_id`, or `None` if the principal is unknown.
    fn display_name(&self, user_id: &str) -> Option<String>;
}

impl AccessPolicy for Config {
    fn can_read(&self, repository_id: &str, user_id: &str) -> bool {
        self.access_level(repository_id, user_id) >= AccessLevel::Read
    }

    fn can_write(&self, repository_id: &str, user_id: &str) -> bool {
        self.access_level(repository_id, user_id) >= AccessLevel::Write
    }

    fn is_elevated(&self, repository_id: &str, user_id: &str) -> bool {
        self.access_level(repository_id, user_id) >= AccessLevel::Maintain
    }
}

impl OwnerDirectory for Config {
    fn display_name(&self, user_id: &str) -> Option<String> {
        self.users.get(user_id).map(|user| {
            if user.name.trim().is_empty() {
                user_id.to_string()
            } else {
                user.name.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_yaml(
            r#"
users:
  alice:
    name: Alice Liddell
  bob: {}
  mallory:
    name: Mallory
repositories:
  games/tower:
    readers: [bob]
    writers: [alice]
    maintainers: [mallory]
"#,
        )
        .unwrap()
    }

    #[test]
    fn reader_can_only_read() {
        let config = config();
        assert!(config.can_read("games/tower", "bob"));
        assert!(!config.can_write("games/tower", "bob"));
        assert!(!config.is_elevated("games/tower", "bob"));
    }

    #[test]
    fn writer_can_read_and_write() {
        let config = config();
        assert!(config.can_read("games/tower", "alice"));
        assert!(config.can_write("games/tower", "alice"));
        assert!(!config.is_elevated("games/tower", "alice"));
    }

    #[test]
    fn maintainer_has_everything() {
        let config = config();
        assert!(config.can_read("games/tower", "mallory"));
        assert!(config.can_write("games/tower", "mallory"));
        assert!(config.is_elevated("games/tower", "mallory"));
    }

    #[test]
    fn strangers_have_nothing() {
        let config = config();
        assert!(!config.can_read("games/tower", "eve"));
        assert!(!config.can_read("games/other", "alice"));
    }

    #[test]
    fn display_names() {
        let config = config();
        assert_eq!(config.display_name("alice").as_deref(), Some("Alice Liddell"));
        // Declared without a name: fall back to the id
        assert_eq!(config.display_name("bob").as_deref(), Some("bob"));
        assert_eq!(config.display_name("eve"), None);
    }
}
