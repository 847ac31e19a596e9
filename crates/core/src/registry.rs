//! Stable item names.
//!
//! Stable names are the only item identity that survives a restart. They take
//! the form `namespace:path`, where the namespace names the content pack that
//! registered the item (e.g. `arcana:spell_book/fireball`). Numeric ids are
//! reassigned on every run; stable names are not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a name omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "tomevault";

/// Error returned when parsing an invalid [`StableName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StableNameError {
    message: String,
}

impl StableNameError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A namespaced name of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StableName {
    namespace: String,
    path: String,
}

impl StableName {
    /// Parse a stable name.
    ///
    /// Accepts either:
    /// - `namespace:path`
    /// - `path` (uses [`DEFAULT_NAMESPACE`])
    pub fn parse(input: &str) -> Result<Self, StableNameError> {
        Self::parse_with_default_namespace(input, DEFAULT_NAMESPACE)
    }

    /// Parse a stable name using a caller-provided default namespace.
    pub fn parse_with_default_namespace(
        input: &str,
        default_namespace: &str,
    ) -> Result<Self, StableNameError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(StableNameError::new("StableName cannot be empty"));
        }

        let (namespace, path) = match input.split_once(':') {
            Some((ns, p)) => (ns, p),
            None => (default_namespace, input),
        };

        let namespace = namespace.trim();
        let path = path.trim();

        validate_namespace(namespace)?;
        validate_path(path)?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Namespace, i.e. the origin group that registered the item.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path within the namespace.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of one variant of this item: `namespace:path/variant`.
    pub fn variant(&self, variant: &str) -> Result<Self, StableNameError> {
        let path = format!("{}/{}", self.path, variant.trim());
        validate_path(&path)?;
        Ok(Self {
            namespace: self.namespace.clone(),
            path,
        })
    }
}

impl fmt::Display for StableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for StableName {
    type Err = StableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StableName {
    type Error = StableNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StableName> for String {
    fn from(name: StableName) -> Self {
        name.to_string()
    }
}

fn validate_namespace(ns: &str) -> Result<(), StableNameError> {
    if ns.is_empty() {
        return Err(StableNameError::new("StableName namespace cannot be empty"));
    }
    if ns.len() > 64 {
        return Err(StableNameError::new(
            "StableName namespace too long (max 64)",
        ));
    }
    if !ns
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    {
        return Err(StableNameError::new(
            "StableName namespace has invalid characters (allowed: a-z0-9_.-)",
        ));
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), StableNameError> {
    if path.is_empty() {
        return Err(StableNameError::new("StableName path cannot be empty"));
    }
    if path.len() > 128 {
        return Err(StableNameError::new("StableName path too long (max 128)"));
    }
    if path.starts_with('/') || path.ends_with('/') || path.contains("//") {
        return Err(StableNameError::new(
            "StableName path has an empty segment",
        ));
    }
    if !path
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
    {
        return Err(StableNameError::new(
            "StableName path has invalid characters (allowed: a-z0-9_./-)",
        ));
    }
    Ok(())
}
