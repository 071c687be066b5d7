//! Device service — use-cases for managing the device catalog.

use device_catalog_domain::device::Device;
use device_catalog_domain::error::{CatalogError, NotFoundError};
use device_catalog_domain::id::DeviceId;
use device_catalog_domain::version::RowVersion;

use crate::ports::DeviceRepository;

/// Application service for device CRUD operations.
///
/// Writes run the variant's validation rules first and never reach storage
/// when they fail. Nothing is retried: conflicts are returned to the caller,
/// who decides whether to reload and resubmit.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage or integrity error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_devices(&self) -> Result<Vec<Device>, CatalogError> {
        self.repo.get_all().await.inspect_err(log_failure)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no device with `id` exists,
    /// or a storage or integrity error from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<Device, CatalogError> {
        self.repo
            .get_by_id(id)
            .await
            .inspect_err(log_failure)?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Device",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Validate and store a new device.
    ///
    /// A device without an id, or with a blank one, gets the next
    /// `<prefix>-<N>` identifier of its type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the device breaks a rule of its
    /// variant, [`CatalogError::Conflict`] if the id is taken, or a storage
    /// error propagated from the repository.
    #[tracing::instrument(skip_all, fields(device_type = %device.device_type()))]
    pub async fn create_device(&self, mut device: Device) -> Result<Device, CatalogError> {
        validate(&device)?;
        if device.id.as_ref().is_none_or(DeviceId::is_blank) {
            let id = self
                .repo
                .generate_next_id(device.device_type())
                .await
                .inspect_err(log_failure)?;
            tracing::debug!(device_id = %id, "assigned device id");
            device.id = Some(id);
        }
        self.repo.create(device).await.inspect_err(log_failure)
    }

    /// Validate and overwrite an existing device.
    ///
    /// `device.row_version` must be the version last read by the caller; it is
    /// forwarded to the repository unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if invariants fail,
    /// [`CatalogError::NotFound`] if the device does not exist,
    /// [`CatalogError::Conflict`] if the row version is stale, or a storage
    /// error from the repository.
    #[tracing::instrument(
        skip_all,
        fields(device_id = device.id.as_ref().map(tracing::field::display))
    )]
    pub async fn update_device(&self, device: Device) -> Result<Device, CatalogError> {
        validate(&device)?;
        self.repo.update(device).await.inspect_err(log_failure)
    }

    /// Delete a device by id, if `row_version` is current.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the device does not exist,
    /// [`CatalogError::Conflict`] if the row version is stale, or a storage
    /// error from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id))]
    pub async fn delete_device(
        &self,
        id: &DeviceId,
        row_version: &RowVersion,
    ) -> Result<(), CatalogError> {
        self.repo
            .delete(id, row_version)
            .await
            .inspect_err(log_failure)
    }
}

fn validate(device: &Device) -> Result<(), CatalogError> {
    device.validate().map_err(|err| {
        tracing::warn!(field = err.field(), reason = %err, "device rejected");
        CatalogError::from(err)
    })
}

fn log_failure(err: &CatalogError) {
    match err {
        CatalogError::NotFound(_) | CatalogError::Conflict(_) | CatalogError::Validation(_) => {
            tracing::warn!(error = %err, "operation rejected");
        }
        CatalogError::Integrity(inner) => {
            tracing::error!(error = %inner, "device data integrity violation");
        }
        CatalogError::Storage(source) => {
            tracing::error!(error = %source, "storage failure");
        }
    }
}
