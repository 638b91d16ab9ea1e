//! Configuration types and defaults for assetlock.

use serde::{Deserialize, Serialize};

/// Access a principal holds on one repository, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No access at all.
    #[default]
    None,
    /// May list and inspect locks.
    Read,
    /// May create locks and release their own.
    Write,
    /// May additionally force-release locks held by others.
    Maintain,
}

/// A known principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEntry {
    /// Display name shown as the lock owner.
    pub name: String,
}

/// Who may do what on one repository.
///
/// Each list implies the levels below it: maintainers can write, writers can read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryAccess {
    /// Grant read access to every principal.
    pub public: bool,

    /// Principals with read access.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub readers: Vec<String>,

    /// Principals with write access.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub writers: Vec<String>,

    /// Principals with elevated (maintainer) access.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<String>,
}

impl RepositoryAccess {
    /// Resolve the access level of `user_id` on this repository.
    pub fn level_of(&self, user_id: &str) -> AccessLevel {
        let listed = |list: &[String]| list.iter().any(|u| u == user_id);

        if listed(&self.maintainers) {
            AccessLevel::Maintain
        } else if listed(&self.writers) {
            AccessLevel::Write
        } else if self.public || listed(&self.readers) {
            AccessLevel::Read
        } else {
            AccessLevel::None
        }
    }

    /// Every principal referenced by this entry.
    pub fn principals(&self) -> impl Iterator<Item = &String> {
        self.readers
            .iter()
            .chain(self.writers.iter())
            .chain(self.maintainers.iter())
    }
}

/// Placeholder written to `config.yaml` by `assetlock init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# assetlock configuration

# Page size used by `locks` and `verify` when --limit is not given (0 = unlimited).
default_page_limit: 0

# Link echoed in error responses.
# documentation_url: https://example.com/docs/locking

# Principals and their display names.
users: {}
#   alice:
#     name: Alice Liddell

# Per-repository access. Maintainers may force-release other people's locks.
repositories: {}
#   games/tower:
#     public: false
#     readers: []
#     writers: [alice]
#     maintainers: []
"#;
