//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`CatalogError`]
//! via `#[from]`. Expected outcomes (validation, not found, conflict) get their
//! own variants so callers can react to them; only genuine storage faults end
//! up in [`CatalogError::Storage`].

use crate::device::DeviceType;

/// Top-level error returned by every catalog operation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The device breaks a domain rule. Client-correctable.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No record exists for the requested identifier.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The write lost against the currently stored state.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Stored data breaks a structural invariant.
    #[error("data integrity violation: {0}")]
    Integrity(#[from] IntegrityError),

    /// The backing store failed. The source is kept for logging but never
    /// rendered in the message.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A device-specific rule violation.
///
/// The messages are part of the public contract and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Cannot turn on PersonalComputer without operating system.")]
    MissingOperatingSystem,

    #[error("Battery level must be between 0 and 100.")]
    BatteryOutOfRange { level: i32 },

    #[error("Battery level too low to turn on (must be at least 11%).")]
    BatteryTooLow { level: i32 },

    #[error("Invalid IP address format.")]
    InvalidIpAddress { value: String },

    #[error("Network name must contain 'MD Ltd.'.")]
    InvalidNetworkName { value: String },
}

impl ValidationError {
    /// Name of the device field that failed validation.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingOperatingSystem => "operating_system",
            Self::BatteryOutOfRange { .. } | Self::BatteryTooLow { .. } => "battery_level",
            Self::InvalidIpAddress { .. } => "ip_address",
            Self::InvalidNetworkName { .. } => "network_name",
        }
    }
}

/// The requested record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Optimistic-concurrency and uniqueness conflicts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    /// The supplied row version is not the stored one: another writer got there first.
    #[error("device {id} was modified by another writer, reload it and retry")]
    StaleRowVersion { id: String },

    /// The submitted variant differs from the stored one. Variants are immutable.
    #[error("device {id} is a {stored}, not a {submitted}")]
    TypeMismatch {
        id: String,
        stored: DeviceType,
        submitted: DeviceType,
    },

    /// A device with this id already exists.
    #[error("device {id} already exists")]
    DuplicateId { id: String },
}

/// Structural anomalies in persisted data, or misuse of the storage contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// A parent row exists without the child row its discriminator points to.
    #[error("device {id} has no {device_type} record")]
    MissingVariantRow { id: String, device_type: DeviceType },

    /// A device reached storage without an identifier.
    #[error("device has no identifier assigned")]
    UnassignedId,

    /// The stored discriminator is not a known device type.
    #[error("unknown device type {0:?}")]
    UnknownDeviceType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_contract_messages_for_validation_errors() {
        assert_eq!(
            ValidationError::BatteryOutOfRange { level: 101 }.to_string(),
            "Battery level must be between 0 and 100."
        );
        assert_eq!(
            ValidationError::InvalidNetworkName {
                value: "Other Lab".to_string()
            }
            .to_string(),
            "Network name must contain 'MD Ltd.'."
        );
    }

    #[test]
    fn should_report_offending_field() {
        assert_eq!(
            ValidationError::MissingOperatingSystem.field(),
            "operating_system"
        );
        assert_eq!(
            ValidationError::BatteryTooLow { level: 3 }.field(),
            "battery_level"
        );
    }

    #[test]
    fn should_not_leak_source_in_storage_message() {
        let err = CatalogError::Storage("no such table: device".into());
        assert_eq!(err.to_string(), "storage error");
    }

    #[test]
    fn should_convert_typed_errors_with_from() {
        let err: CatalogError = NotFoundError {
            entity: "Device",
            id: "PC-1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Device PC-1 not found");
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
