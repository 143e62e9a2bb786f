//! Two-part resource identifiers.
//!
//! Resources that live inside a parent scope (a schedule inside its group, a
//! stack name plus its unique suffix) are persisted as a single `scope/name`
//! string. [`encode`] does not escape separators embedded in either part, so
//! such ids do not survive a round trip; [`CompositeId::new`] refuses them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SEPARATOR: char = '/';

/// Join `scope` and `name` into the persisted form.
pub fn encode(scope: &str, name: &str) -> String {
    format!("{}{}{}", scope, SEPARATOR, name)
}

/// Split a persisted id into `(scope, name)`.
pub fn decode(id: &str) -> Result<(String, String)> {
    let mut parts = id.split(SEPARATOR);
    let (scope, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scope), Some(name), None) => (scope, name),
        (_, _, Some(_)) => return Err(Error::malformed_id(id, "too many separators")),
        _ => return Err(Error::malformed_id(id, "missing separator")),
    };

    if scope.is_empty() {
        return Err(Error::malformed_id(id, "empty scope"));
    }
    if name.is_empty() {
        return Err(Error::malformed_id(id, "empty name"));
    }

    Ok((scope.to_string(), name.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeId {
    scope: String,
    name: String,
}

impl CompositeId {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let scope = scope.into();
        let name = name.into();
        if scope.is_empty() || name.is_empty() {
            return Err(Error::malformed_id(
                &encode(&scope, &name),
                "scope and name must be non-empty",
            ));
        }
        if scope.contains(SEPARATOR) || name.contains(SEPARATOR) {
            return Err(Error::malformed_id(
                &encode(&scope, &name),
                "scope and name must not contain a separator",
            ));
        }
        Ok(Self { scope, name })
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_parts(self) -> (String, String) {
        (self.scope, self.name)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scope, SEPARATOR, self.name)
    }
}

impl FromStr for CompositeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scope, name) = decode(s)?;
        Ok(Self { scope, name })
    }
}

impl TryFrom<String> for CompositeId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CompositeId> for String {
    fn from(id: CompositeId) -> Self {
        id.to_string()
    }
}
