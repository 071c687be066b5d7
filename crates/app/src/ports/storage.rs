//! Storage port — repository trait for device persistence.

use std::future::Future;

use device_catalog_domain::device::{Device, DeviceType};
use device_catalog_domain::error::CatalogError;
use device_catalog_domain::id::DeviceId;
use device_catalog_domain::version::RowVersion;

/// Repository for persisting and querying [`Device`]s of every variant.
///
/// Implementations hide how variants are laid out in storage. Every method
/// returns fully typed devices; a stored device whose variant data is missing
/// is reported as [`CatalogError::Integrity`], never returned.
///
/// Writes that span several records must be atomic. Writes guarded by a
/// [`RowVersion`] must distinguish a missing device
/// ([`CatalogError::NotFound`]) from a stale token
/// ([`CatalogError::Conflict`]). Validation is not the repository's concern.
pub trait DeviceRepository {
    /// Get every device, in storage order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, CatalogError>> + Send;

    /// Get a device by id, `None` when it does not exist.
    fn get_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, CatalogError>> + Send;

    /// Store a new device. Its id must be assigned.
    ///
    /// Returns the device carrying its server-assigned row version.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, CatalogError>> + Send;

    /// Overwrite a stored device if `device.row_version` is the current one.
    ///
    /// Returns the device carrying its new row version.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, CatalogError>> + Send;

    /// Remove a device if `row_version` is the current one.
    fn delete(
        &self,
        id: &DeviceId,
        row_version: &RowVersion,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Reserve the next `<prefix>-<N>` identifier for a device type.
    ///
    /// Concurrent calls never hand out the same identifier.
    fn generate_next_id(
        &self,
        device_type: DeviceType,
    ) -> impl Future<Output = Result<DeviceId, CatalogError>> + Send;
}
