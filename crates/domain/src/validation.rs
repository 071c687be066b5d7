//! Device validation rules.
//!
//! Rules are evaluated per variant in a fixed order and the first failing rule
//! wins. They apply to every create and update, whether or not the device is
//! enabled.

use std::net::Ipv4Addr;

use crate::device::{Device, DeviceKind};
use crate::error::ValidationError;

/// Lowest battery level, in percent, a smartwatch may be stored with.
pub const MIN_BATTERY_LEVEL: i32 = 11;

/// Marker every embedded device's network name must contain.
pub const REQUIRED_NETWORK_MARKER: &str = "MD Ltd.";

/// Check `device` against the rules of its variant.
///
/// # Errors
///
/// Returns the first [`ValidationError`] raised by the device's variant rules.
pub fn validate(device: &Device) -> Result<(), ValidationError> {
    match &device.kind {
        DeviceKind::PersonalComputer { operating_system } => {
            validate_personal_computer(operating_system.as_deref())
        }
        DeviceKind::Smartwatch { battery_level } => validate_smartwatch(*battery_level),
        DeviceKind::Embedded {
            ip_address,
            network_name,
        } => validate_embedded(ip_address, network_name),
    }
}

fn validate_personal_computer(operating_system: Option<&str>) -> Result<(), ValidationError> {
    match operating_system {
        Some(os) if !os.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingOperatingSystem),
    }
}

fn validate_smartwatch(level: i32) -> Result<(), ValidationError> {
    if !(0..=100).contains(&level) {
        return Err(ValidationError::BatteryOutOfRange { level });
    }
    if level < MIN_BATTERY_LEVEL {
        return Err(ValidationError::BatteryTooLow { level });
    }
    Ok(())
}

fn validate_embedded(ip_address: &str, network_name: &str) -> Result<(), ValidationError> {
    if !is_dotted_quad(ip_address) {
        return Err(ValidationError::InvalidIpAddress {
            value: ip_address.to_string(),
        });
    }
    if !network_name.contains(REQUIRED_NETWORK_MARKER) {
        return Err(ValidationError::InvalidNetworkName {
            value: network_name.to_string(),
        });
    }
    Ok(())
}

/// Four decimal octets in `0..=255`, no leading zeros, no surrounding text.
fn is_dotted_quad(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}
