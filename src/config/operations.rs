//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::AccessLevel;
use crate::error::{AppError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(AppError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| AppError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `default_page_limit` must not be negative
    /// - `documentation_url`, when set, must be non-empty
    /// - user ids and repository ids must be non-empty
    /// - every principal named in a repository must be declared under `users`
    pub fn validate(&self) -> Result<()> {
        if self.default_page_limit < 0 {
            return Err(AppError::UserError(
                "config validation failed: default_page_limit must not be negative".to_string(),
            ));
        }

        if let Some(url) = &self.documentation_url
            && url.trim().is_empty()
        {
            return Err(AppError::UserError(
                "config validation failed: documentation_url must not be empty when set"
                    .to_string(),
            ));
        }

        if self.users.keys().any(|id| id.trim().is_empty()) {
            return Err(AppError::UserError(
                "config validation failed: user ids must be non-empty".to_string(),
            ));
        }

        for (repository_id, access) in &self.repositories {
            if repository_id.trim().is_empty() {
                return Err(AppError::UserError(
                    "config validation failed: repository ids must be non-empty".to_string(),
                ));
            }

            if let Some(unknown) = access.principals().find(|u| !self.users.contains_key(*u)) {
                return Err(AppError::UserError(format!(
                    "config validation failed: repository '{}' references unknown user '{}'. Declare it under `users`.",
                    repository_id, unknown
                )));
            }
        }

        Ok(())
    }

    /// Access level of `user_id` on `repository_id`. Unknown repositories grant nothing.
    pub fn access_level(&self, repository_id: &str, user_id: &str) -> AccessLevel {
        self.repositories
            .get(repository_id)
            .map(|access| access.level_of(user_id))
            .unwrap_or_default()
    }

    /// Page size to use for a listing, preferring an explicit request.
    pub fn page_limit(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.default_page_limit)
    }
}
