//! Storage-specific error type wrapping sqlx errors.

use device_catalog_domain::error::CatalogError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_into_opaque_catalog_storage_error() {
        let err: CatalogError = StorageError::from(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, CatalogError::Storage(_)));
        assert_eq!(err.to_string(), "storage error");
    }
}
