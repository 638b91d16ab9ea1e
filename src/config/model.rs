//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for assetlock.
///
/// This struct represents the contents of `.assetlock/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Listing settings
    // =========================================================================
    /// Page size for `locks`/`verify` when no limit is given (0 = unlimited).
    pub default_page_limit: i64,

    // =========================================================================
    // Error envelope settings
    // =========================================================================
    /// Documentation link echoed in error responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    // =========================================================================
    // Principals
    // =========================================================================
    /// Known principals keyed by user id.
    pub users: BTreeMap<String, UserEntry>,

    /// Access lists keyed by repository id.
    pub repositories: BTreeMap<String, RepositoryAccess>,
}
