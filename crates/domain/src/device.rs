//! Device — a catalogued piece of hardware.
//!
//! Every device carries the same base attributes (identifier, name, enablement
//! and row version) plus the payload of exactly one variant, see [`DeviceKind`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::DeviceId;
use crate::version::RowVersion;

/// A catalogued device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// `None` until the catalog assigns one on creation.
    #[serde(
        default,
        deserialize_with = "crate::id::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<DeviceId>,
    pub name: String,
    pub is_enabled: bool,
    /// Empty until the device has been stored.
    #[serde(default)]
    pub row_version: RowVersion,
    #[serde(flatten)]
    pub kind: DeviceKind,
}

/// Variant-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "device_type", rename_all = "snake_case")]
pub enum DeviceKind {
    PersonalComputer { operating_system: Option<String> },
    Smartwatch { battery_level: i32 },
    Embedded { ip_address: String, network_name: String },
}

impl DeviceKind {
    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        match self {
            Self::PersonalComputer { .. } => DeviceType::PersonalComputer,
            Self::Smartwatch { .. } => DeviceType::Smartwatch,
            Self::Embedded { .. } => DeviceType::Embedded,
        }
    }
}

impl Device {
    /// Create a builder for a device of the given variant.
    #[must_use]
    pub fn builder(kind: DeviceKind) -> DeviceBuilder {
        DeviceBuilder {
            id: None,
            name: String::new(),
            is_enabled: false,
            row_version: RowVersion::default(),
            kind,
        }
    }

    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        self.kind.device_type()
    }

    /// Check the rules of this device's variant.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, see [`crate::validation`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validation::validate(self)
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: String,
    is_enabled: bool,
    row_version: RowVersion,
    kind: DeviceKind,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }

    #[must_use]
    pub fn row_version(mut self, row_version: RowVersion) -> Self {
        self.row_version = row_version;
        self
    }

    /// Consume the builder. Rules are not checked here: the catalog validates
    /// on every write.
    #[must_use]
    pub fn build(self) -> Device {
        Device {
            id: self.id,
            name: self.name,
            is_enabled: self.is_enabled,
            row_version: self.row_version,
            kind: self.kind,
        }
    }
}

/// Discriminator of the device variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    PersonalComputer,
    Smartwatch,
    Embedded,
}

impl DeviceType {
    pub const ALL: [Self; 3] = [Self::PersonalComputer, Self::Smartwatch, Self::Embedded];

    /// Stable name used for storage and serialization.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersonalComputer => "personal_computer",
            Self::Smartwatch => "smartwatch",
            Self::Embedded => "embedded",
        }
    }

    /// Prefix of generated identifiers.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::PersonalComputer => "PC",
            Self::Smartwatch => "SW",
            Self::Embedded => "ED",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown device type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device type {0:?}")]
pub struct ParseDeviceTypeError(pub String);

impl FromStr for DeviceType {
    type Err = ParseDeviceTypeError;

    /// Accepts the storage name as well as the `CamelCase` variant name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "personalcomputer" => Ok(Self::PersonalComputer),
            "smartwatch" => Ok(Self::Smartwatch),
            "embedded" => Ok(Self::Embedded),
            _ => Err(ParseDeviceTypeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch() -> Device {
        Device::builder(DeviceKind::Smartwatch { battery_level: 80 })
            .id("SW-1")
            .name("Apple Watch SE")
            .enabled(true)
            .build()
    }

    #[test]
    fn should_build_device_with_base_attributes() {
        let device = watch();
        assert_eq!(device.id, Some(DeviceId::new("SW-1")));
        assert_eq!(device.name, "Apple Watch SE");
        assert!(device.is_enabled);
        assert!(device.row_version.is_empty());
        assert_eq!(device.device_type(), DeviceType::Smartwatch);
    }

    #[test]
    fn should_leave_id_unassigned_by_default() {
        let device = Device::builder(DeviceKind::PersonalComputer {
            operating_system: None,
        })
        .name("ThinkPad")
        .build();
        assert!(device.id.is_none());
        assert!(!device.is_enabled);
    }

    #[test]
    fn should_parse_device_type_in_any_common_spelling() {
        for input in ["personal_computer", "PersonalComputer", "personalcomputer"] {
            assert_eq!(
                input.parse::<DeviceType>().unwrap(),
                DeviceType::PersonalComputer
            );
        }
        assert_eq!("SmartWatch".parse(), Ok(DeviceType::Smartwatch));
        assert_eq!("EMBEDDED".parse(), Ok(DeviceType::Embedded));
        assert!("toaster".parse::<DeviceType>().is_err());
    }

    #[test]
    fn should_roundtrip_display_and_from_str() {
        for device_type in DeviceType::ALL {
            assert_eq!(device_type.to_string().parse(), Ok(device_type));
        }
    }

    #[test]
    fn should_serialize_variant_with_device_type_tag() {
        let device = Device::builder(DeviceKind::Embedded {
            ip_address: "10.0.0.2".to_string(),
            network_name: "MD Ltd. Plant".to_string(),
        })
        .id("ED-4")
        .name("Gateway")
        .build();

        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["device_type"], "embedded");
        assert_eq!(json["ip_address"], "10.0.0.2");
        assert_eq!(json["id"], "ED-4");

        let parsed: Device = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, device);
    }

    #[test]
    fn should_read_blank_id_as_unassigned() {
        for id in ["", "   "] {
            let parsed: Device = serde_json::from_value(serde_json::json!({
                "id": id,
                "name": "Office Laptop",
                "is_enabled": true,
                "device_type": "personal_computer",
                "operating_system": "Debian 12",
            }))
            .unwrap();
            assert_eq!(parsed.id, None);
        }
    }
}
