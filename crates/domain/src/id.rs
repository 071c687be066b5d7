//! Device identifiers.
//!
//! Identifiers are human-readable strings. Generated ones follow the
//! `<prefix>-<N>` format, where the prefix is derived from the device type
//! (see [`DeviceType::prefix`]). Identifiers supplied by callers are kept as-is,
//! minus surrounding whitespace. A blank identifier counts as no identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::device::DeviceType;

/// Unique identifier for a [`Device`](crate::device::Device), shared by all variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build the `<prefix>-<n>` identifier of the `n`-th device of a type.
    #[must_use]
    pub fn sequential(device_type: DeviceType, n: u64) -> Self {
        Self(format!("{}-{n}", device_type.prefix()))
    }

    /// `true` for an empty or whitespace-only identifier.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing a blank identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device id must not be blank")]
pub struct BlankIdError;

impl FromStr for DeviceId {
    type Err = BlankIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(BlankIdError);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = BlankIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

/// Deserialize an optional identifier, reading a blank string as absent.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DeviceId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.parse().ok()))
}
