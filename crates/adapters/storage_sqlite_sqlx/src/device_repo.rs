//! `SQLite` implementation of [`DeviceRepository`].
//!
//! Devices live in a parent `device` table holding the shared attributes and
//! the `device_type` discriminator, plus one child table per variant keyed by
//! `device_id`. Every multi-statement write runs in a single transaction whose
//! first statement is a write, so `SQLite` takes the write lock up front and
//! concurrent writers queue on the busy timeout instead of failing mid-way.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use device_catalog_app::ports::DeviceRepository;
use device_catalog_domain::device::{Device, DeviceKind, DeviceType};
use device_catalog_domain::error::{CatalogError, ConflictError, IntegrityError, NotFoundError};
use device_catalog_domain::id::DeviceId;
use device_catalog_domain::version::RowVersion;

use crate::error::StorageError;

/// Parent row left-joined with every child table.
///
/// Only the child columns of the discriminated variant are expected to be set.
struct DeviceRow {
    id: String,
    name: String,
    is_enabled: bool,
    device_type: String,
    row_version: i64,
    pc_device_id: Option<String>,
    operating_system: Option<String>,
    sw_device_id: Option<String>,
    battery_percentage: Option<i32>,
    em_device_id: Option<String>,
    ip_address: Option<String>,
    network_name: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            is_enabled: row.try_get("is_enabled")?,
            device_type: row.try_get("device_type")?,
            row_version: row.try_get("row_version")?,
            pc_device_id: row.try_get("pc_device_id")?,
            operating_system: row.try_get("operating_system")?,
            sw_device_id: row.try_get("sw_device_id")?,
            battery_percentage: row.try_get("battery_percentage")?,
            em_device_id: row.try_get("em_device_id")?,
            ip_address: row.try_get("ip_address")?,
            network_name: row.try_get("network_name")?,
        })
    }
}

impl TryFrom<DeviceRow> for Device {
    type Error = IntegrityError;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        let DeviceRow {
            id,
            name,
            is_enabled,
            device_type,
            row_version,
            pc_device_id,
            operating_system,
            sw_device_id,
            battery_percentage,
            em_device_id,
            ip_address,
            network_name,
        } = row;

        let device_type: DeviceType = device_type
            .parse()
            .map_err(|_| IntegrityError::UnknownDeviceType(device_type.clone()))?;
        let missing = || IntegrityError::MissingVariantRow {
            id: id.clone(),
            device_type,
        };

        let kind = match device_type {
            DeviceType::PersonalComputer => {
                if pc_device_id.is_none() {
                    return Err(missing());
                }
                DeviceKind::PersonalComputer { operating_system }
            }
            DeviceType::Smartwatch => DeviceKind::Smartwatch {
                battery_level: sw_device_id
                    .and(battery_percentage)
                    .ok_or_else(missing)?,
            },
            DeviceType::Embedded => match (em_device_id, ip_address, network_name) {
                (Some(_), Some(ip_address), Some(network_name)) => DeviceKind::Embedded {
                    ip_address,
                    network_name,
                },
                _ => return Err(missing()),
            },
        };

        Ok(Device {
            id: Some(DeviceId::new(id)),
            name,
            is_enabled,
            row_version: RowVersion::from_counter(row_version),
            kind,
        })
    }
}

macro_rules! select_devices {
    () => {
        r"
    SELECT d.id, d.name, d.is_enabled, d.device_type, d.row_version,
           pc.device_id AS pc_device_id, pc.operating_system,
           sw.device_id AS sw_device_id, sw.battery_percentage,
           em.device_id AS em_device_id, em.ip_address, em.network_name
    FROM device d
    LEFT JOIN personal_computer pc ON pc.device_id = d.id
    LEFT JOIN smartwatch sw ON sw.device_id = d.id
    LEFT JOIN embedded em ON em.device_id = d.id
"
    };
}

const SELECT_ALL: &str = concat!(select_devices!(), "ORDER BY d.rowid");
const SELECT_BY_ID: &str = concat!(select_devices!(), "WHERE d.id = ?");
const SELECT_DEVICE_TYPE: &str = "SELECT device_type FROM device WHERE id = ?";
const COUNT_BY_ID: &str = "SELECT COUNT(*) FROM device WHERE id = ?";

const NEXT_SEQUENCE_VALUE: &str = "UPDATE sequence SET value = value + 1 WHERE name = ? RETURNING value";
const ROW_VERSION_SEQUENCE: &str = "row_version";

const INSERT_DEVICE: &str =
    "INSERT INTO device (id, name, is_enabled, device_type, row_version) VALUES (?, ?, ?, ?, ?)";
const INSERT_PERSONAL_COMPUTER: &str =
    "INSERT INTO personal_computer (device_id, operating_system) VALUES (?, ?)";
const INSERT_SMARTWATCH: &str =
    "INSERT INTO smartwatch (device_id, battery_percentage) VALUES (?, ?)";
const INSERT_EMBEDDED: &str =
    "INSERT INTO embedded (device_id, ip_address, network_name) VALUES (?, ?, ?)";

const UPDATE_DEVICE: &str = r"
    UPDATE device
    SET name = ?, is_enabled = ?, row_version = ?
    WHERE id = ? AND row_version = ? AND device_type = ?
";
const UPDATE_PERSONAL_COMPUTER: &str =
    "UPDATE personal_computer SET operating_system = ? WHERE device_id = ?";
const UPDATE_SMARTWATCH: &str = "UPDATE smartwatch SET battery_percentage = ? WHERE device_id = ?";
const UPDATE_EMBEDDED: &str =
    "UPDATE embedded SET ip_address = ?, network_name = ? WHERE device_id = ?";

const DELETE_DEVICE: &str =
    "DELETE FROM device WHERE id = ? AND row_version = ? RETURNING device_type";

fn delete_variant_query(device_type: DeviceType) -> &'static str {
    match device_type {
        DeviceType::PersonalComputer => "DELETE FROM personal_computer WHERE device_id = ?",
        DeviceType::Smartwatch => "DELETE FROM smartwatch WHERE device_id = ?",
        DeviceType::Embedded => "DELETE FROM embedded WHERE device_id = ?",
    }
}

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Bump a named counter and return its new value.
async fn next_sequence_value(
    conn: &mut SqliteConnection,
    sequence: &str,
) -> Result<i64, StorageError> {
    let value = sqlx::query_scalar::<_, i64>(NEXT_SEQUENCE_VALUE)
        .bind(sequence)
        .fetch_one(conn)
        .await?;
    Ok(value)
}

async fn device_exists(conn: &mut SqliteConnection, id: &str) -> Result<bool, StorageError> {
    let count = sqlx::query_scalar::<_, i64>(COUNT_BY_ID)
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

async fn insert_variant(
    conn: &mut SqliteConnection,
    id: &str,
    kind: &DeviceKind,
) -> Result<(), StorageError> {
    let query = match kind {
        DeviceKind::PersonalComputer { operating_system } => {
            sqlx::query(INSERT_PERSONAL_COMPUTER)
                .bind(id)
                .bind(operating_system.as_deref())
        }
        DeviceKind::Smartwatch { battery_level } => {
            sqlx::query(INSERT_SMARTWATCH).bind(id).bind(*battery_level)
        }
        DeviceKind::Embedded {
            ip_address,
            network_name,
        } => sqlx::query(INSERT_EMBEDDED)
            .bind(id)
            .bind(ip_address.as_str())
            .bind(network_name.as_str()),
    };
    query.execute(conn).await?;
    Ok(())
}

/// Returns the number of child rows updated.
async fn update_variant(
    conn: &mut SqliteConnection,
    id: &str,
    kind: &DeviceKind,
) -> Result<u64, StorageError> {
    let query = match kind {
        DeviceKind::PersonalComputer { operating_system } => {
            sqlx::query(UPDATE_PERSONAL_COMPUTER)
                .bind(operating_system.as_deref())
                .bind(id)
        }
        DeviceKind::Smartwatch { battery_level } => {
            sqlx::query(UPDATE_SMARTWATCH).bind(*battery_level).bind(id)
        }
        DeviceKind::Embedded {
            ip_address,
            network_name,
        } => sqlx::query(UPDATE_EMBEDDED)
            .bind(ip_address.as_str())
            .bind(network_name.as_str())
            .bind(id),
    };
    Ok(query.execute(conn).await?.rows_affected())
}

/// Explain why a guarded write matched no row.
///
/// Must run inside the rejected write's transaction so the answer reflects the
/// state the write saw.
async fn classify_rejection(
    conn: &mut SqliteConnection,
    id: &DeviceId,
    submitted: Option<DeviceType>,
) -> Result<CatalogError, StorageError> {
    let stored: Option<String> = sqlx::query_scalar(SELECT_DEVICE_TYPE)
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;

    let Some(stored) = stored else {
        return Ok(NotFoundError {
            entity: "Device",
            id: id.to_string(),
        }
        .into());
    };
    let Ok(stored) = stored.parse::<DeviceType>() else {
        return Ok(IntegrityError::UnknownDeviceType(stored).into());
    };

    Ok(match submitted {
        Some(submitted) if submitted != stored => ConflictError::TypeMismatch {
            id: id.to_string(),
            stored,
            submitted,
        }
        .into(),
        _ => ConflictError::StaleRowVersion { id: id.to_string() }.into(),
    })
}

fn into_devices(rows: Vec<DeviceRow>) -> Result<Vec<Device>, CatalogError> {
    rows.into_iter()
        .map(|row| Device::try_from(row).map_err(CatalogError::from))
        .collect()
}

impl DeviceRepository for SqliteDeviceRepository {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, CatalogError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<DeviceRow> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            into_devices(rows)
        }
    }

    fn get_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, CatalogError>> + Send {
        let pool = self.pool.clone();
        let id = id.clone();
        async move {
            let row: Option<DeviceRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(into_devices(row.into_iter().collect())?.pop())
        }
    }

    fn create(&self, mut device: Device) -> impl Future<Output = Result<Device, CatalogError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Some(id) = device.id.clone() else {
                return Err(IntegrityError::UnassignedId.into());
            };

            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let version = next_sequence_value(&mut tx, ROW_VERSION_SEQUENCE).await?;

            if device_exists(&mut tx, id.as_str()).await? {
                tx.rollback().await.map_err(StorageError::from)?;
                return Err(ConflictError::DuplicateId { id: id.to_string() }.into());
            }

            sqlx::query(INSERT_DEVICE)
                .bind(id.as_str())
                .bind(&device.name)
                .bind(device.is_enabled)
                .bind(device.device_type().as_str())
                .bind(version)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            insert_variant(&mut tx, id.as_str(), &device.kind).await?;

            tx.commit().await.map_err(StorageError::from)?;

            tracing::debug!(device_id = %id, device_type = %device.device_type(), "device created");
            device.row_version = RowVersion::from_counter(version);
            Ok(device)
        }
    }

    fn update(&self, mut device: Device) -> impl Future<Output = Result<Device, CatalogError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Some(id) = device.id.clone() else {
                return Err(IntegrityError::UnassignedId.into());
            };
            let device_type = device.device_type();

            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let version = next_sequence_value(&mut tx, ROW_VERSION_SEQUENCE).await?;

            // A token that is not a stored counter cannot match any row.
            let updated = match device.row_version.as_counter() {
                Some(expected) => sqlx::query(UPDATE_DEVICE)
                    .bind(&device.name)
                    .bind(device.is_enabled)
                    .bind(version)
                    .bind(id.as_str())
                    .bind(expected)
                    .bind(device_type.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?
                    .rows_affected(),
                None => 0,
            };

            if updated == 0 {
                let rejection = classify_rejection(&mut tx, &id, Some(device_type)).await?;
                tx.rollback().await.map_err(StorageError::from)?;
                return Err(rejection);
            }

            if update_variant(&mut tx, id.as_str(), &device.kind).await? == 0 {
                tx.rollback().await.map_err(StorageError::from)?;
                return Err(IntegrityError::MissingVariantRow {
                    id: id.to_string(),
                    device_type,
                }
                .into());
            }

            tx.commit().await.map_err(StorageError::from)?;

            tracing::debug!(device_id = %id, "device updated");
            device.row_version = RowVersion::from_counter(version);
            Ok(device)
        }
    }

    fn delete(
        &self,
        id: &DeviceId,
        row_version: &RowVersion,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send {
        let pool = self.pool.clone();
        let id = id.clone();
        let expected = row_version.as_counter();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let deleted: Option<String> = match expected {
                Some(expected) => sqlx::query_scalar(DELETE_DEVICE)
                    .bind(id.as_str())
                    .bind(expected)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(StorageError::from)?,
                None => None,
            };

            let Some(device_type) = deleted else {
                let rejection = classify_rejection(&mut tx, &id, None).await?;
                tx.rollback().await.map_err(StorageError::from)?;
                return Err(rejection);
            };

            // Foreign keys cascade the child row away; deleting it explicitly keeps
            // the transaction correct on connections with enforcement disabled.
            let device_type = device_type
                .parse::<DeviceType>()
                .map_err(|_| IntegrityError::UnknownDeviceType(device_type.clone()))?;
            sqlx::query(delete_variant_query(device_type))
                .bind(id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            tx.commit().await.map_err(StorageError::from)?;

            tracing::debug!(device_id = %id, %device_type, "device deleted");
            Ok(())
        }
    }

    fn generate_next_id(
        &self,
        device_type: DeviceType,
    ) -> impl Future<Output = Result<DeviceId, CatalogError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            // Caller-supplied ids may already occupy a slot of the sequence.
            let id = loop {
                let value = next_sequence_value(&mut tx, device_type.as_str()).await?;
                let candidate = DeviceId::sequential(device_type, value.unsigned_abs());
                if !device_exists(&mut tx, candidate.as_str()).await? {
                    break candidate;
                }
            };

            tx.commit().await.map_err(StorageError::from)?;
            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteDeviceRepository {
        let db = Config::in_memory().build().await.unwrap();
        SqliteDeviceRepository::new(db.pool().clone())
    }

    async fn count(repo: &SqliteDeviceRepository, table: &str, id: &str) -> i64 {
        let column = if table == "device" { "id" } else { "device_id" };
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?"))
            .bind(id)
            .fetch_one(&repo.pool)
            .await
            .unwrap()
    }

    fn pc(id: &str) -> Device {
        Device::builder(DeviceKind::PersonalComputer {
            operating_system: Some("Ubuntu 24.04".to_string()),
        })
        .id(id)
        .name("Build Server")
        .enabled(true)
        .build()
    }

    fn watch(id: &str) -> Device {
        Device::builder(DeviceKind::Smartwatch { battery_level: 64 })
            .id(id)
            .name("Garmin Venu")
            .build()
    }

    fn embedded(id: &str) -> Device {
        Device::builder(DeviceKind::Embedded {
            ip_address: "192.168.0.10".to_string(),
            network_name: "MD Ltd. IoT Lab".to_string(),
        })
        .id(id)
        .name("Raspberry Pi")
        .enabled(true)
        .build()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_every_variant() {
        let repo = setup().await;

        for device in [pc("PC-1"), watch("SW-1"), embedded("ED-1")] {
            let id = device.id.clone().unwrap();
            let created = repo.create(device.clone()).await.unwrap();
            assert!(!created.row_version.is_empty());

            let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
            assert_eq!(fetched, created);
            assert_eq!(fetched.kind, device.kind);
        }
    }

    #[tokio::test]
    async fn should_store_missing_operating_system_as_null() {
        let repo = setup().await;
        let mut device = pc("PC-3");
        device.kind = DeviceKind::PersonalComputer {
            operating_system: None,
        };
        repo.create(device).await.unwrap();

        let fetched = repo.get_by_id(&DeviceId::new("PC-3")).await.unwrap().unwrap();
        assert_eq!(
            fetched.kind,
            DeviceKind::PersonalComputer {
                operating_system: None
            }
        );
    }

    #[tokio::test]
    async fn should_return_none_when_device_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(&DeviceId::new("SW-404")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_all_devices_in_insertion_order() {
        let repo = setup().await;
        repo.create(watch("SW-1")).await.unwrap();
        repo.create(pc("PC-1")).await.unwrap();
        repo.create(embedded("ED-1")).await.unwrap();

        let all = repo.get_all().await.unwrap();
        let types: Vec<DeviceType> = all.iter().map(Device::device_type).collect();
        assert_eq!(
            types,
            [
                DeviceType::Smartwatch,
                DeviceType::PersonalComputer,
                DeviceType::Embedded
            ]
        );
    }

    #[tokio::test]
    async fn should_reject_device_without_id() {
        let repo = setup().await;
        let mut device = pc("PC-1");
        device.id = None;

        let result = repo.create(device).await;
        assert!(matches!(
            result,
            Err(CatalogError::Integrity(IntegrityError::UnassignedId))
        ));
    }

    #[tokio::test]
    async fn should_reject_duplicate_id_across_types() {
        let repo = setup().await;
        repo.create(pc("X-1")).await.unwrap();

        let result = repo.create(watch("X-1")).await;
        assert!(matches!(
            result,
            Err(CatalogError::Conflict(ConflictError::DuplicateId { .. }))
        ));
        assert_eq!(count(&repo, "smartwatch", "X-1").await, 0);
    }

    #[tokio::test]
    async fn should_roll_back_parent_when_child_insert_fails() {
        let repo = setup().await;
        sqlx::query("DROP TABLE embedded")
            .execute(&repo.pool)
            .await
            .unwrap();

        let result = repo.create(embedded("ED-1")).await;
        assert!(matches!(result, Err(CatalogError::Storage(_))));
        assert_eq!(count(&repo, "device", "ED-1").await, 0);
    }

    #[tokio::test]
    async fn should_update_parent_and_child_with_current_row_version() {
        let repo = setup().await;
        let created = repo.create(watch("SW-1")).await.unwrap();

        let mut changed = created.clone();
        changed.name = "Garmin Venu 3".to_string();
        changed.is_enabled = true;
        changed.kind = DeviceKind::Smartwatch { battery_level: 99 };
        let saved = repo.update(changed.clone()).await.unwrap();
        assert_ne!(saved.row_version, created.row_version);

        let fetched = repo.get_by_id(&DeviceId::new("SW-1")).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Garmin Venu 3");
        assert!(fetched.is_enabled);
        assert_eq!(fetched.kind, DeviceKind::Smartwatch { battery_level: 99 });
        assert_eq!(fetched.row_version, saved.row_version);
    }

    #[tokio::test]
    async fn should_reject_stale_update_without_mutation() {
        let repo = setup().await;
        let created = repo.create(embedded("ED-1")).await.unwrap();

        let mut first = created.clone();
        first.name = "Winner".to_string();
        repo.update(first).await.unwrap();

        let mut stale = created.clone();
        stale.name = "Loser".to_string();
        stale.kind = DeviceKind::Embedded {
            ip_address: "10.0.0.1".to_string(),
            network_name: "MD Ltd. Other".to_string(),
        };
        let result = repo.update(stale).await;
        assert!(matches!(
            result,
            Err(CatalogError::Conflict(ConflictError::StaleRowVersion { .. }))
        ));

        let fetched = repo.get_by_id(&DeviceId::new("ED-1")).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Winner");
        assert_eq!(fetched.kind, created.kind);
    }

    #[tokio::test]
    async fn should_report_not_found_on_update_of_missing_device() {
        let repo = setup().await;
        let mut ghost = pc("PC-9");
        ghost.row_version = RowVersion::from_counter(1);

        let result = repo.update(ghost).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_treat_malformed_row_version_as_conflict() {
        let repo = setup().await;
        let mut created = repo.create(pc("PC-1")).await.unwrap();
        created.row_version = RowVersion::from_bytes(vec![0xFF]);

        let result = repo.update(created).await;
        assert!(matches!(
            result,
            Err(CatalogError::Conflict(ConflictError::StaleRowVersion { .. }))
        ));
    }

    #[tokio::test]
    async fn should_reject_variant_change_on_update() {
        let repo = setup().await;
        let created = repo.create(pc("PC-1")).await.unwrap();

        let mut changed = created.clone();
        changed.kind = DeviceKind::Smartwatch { battery_level: 50 };
        let result = repo.update(changed).await;
        assert!(matches!(
            result,
            Err(CatalogError::Conflict(ConflictError::TypeMismatch {
                stored: DeviceType::PersonalComputer,
                submitted: DeviceType::Smartwatch,
                ..
            }))
        ));
        assert_eq!(count(&repo, "smartwatch", "PC-1").await, 0);
    }

    #[tokio::test]
    async fn should_delete_parent_and_child() {
        let repo = setup().await;
        let created = repo.create(embedded("ED-1")).await.unwrap();

        repo.delete(&DeviceId::new("ED-1"), &created.row_version)
            .await
            .unwrap();

        assert_eq!(count(&repo, "device", "ED-1").await, 0);
        assert_eq!(count(&repo, "embedded", "ED-1").await, 0);
    }

    #[tokio::test]
    async fn should_keep_both_rows_when_delete_is_stale() {
        let repo = setup().await;
        let created = repo.create(watch("SW-1")).await.unwrap();
        repo.update(created.clone()).await.unwrap();

        let result = repo
            .delete(&DeviceId::new("SW-1"), &created.row_version)
            .await;
        assert!(matches!(
            result,
            Err(CatalogError::Conflict(ConflictError::StaleRowVersion { .. }))
        ));
        assert_eq!(count(&repo, "device", "SW-1").await, 1);
        assert_eq!(count(&repo, "smartwatch", "SW-1").await, 1);
    }

    #[tokio::test]
    async fn should_report_not_found_on_delete_of_missing_device() {
        let repo = setup().await;
        let result = repo
            .delete(&DeviceId::new("PC-1"), &RowVersion::from_counter(1))
            .await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_surface_orphaned_parent_row_as_integrity_error() {
        let repo = setup().await;
        sqlx::query(
            "INSERT INTO device (id, name, is_enabled, device_type, row_version) VALUES ('SW-7', 'Orphan', 1, 'smartwatch', 1)",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let result = repo.get_by_id(&DeviceId::new("SW-7")).await;
        assert!(matches!(
            result,
            Err(CatalogError::Integrity(IntegrityError::MissingVariantRow {
                device_type: DeviceType::Smartwatch,
                ..
            }))
        ));
        assert!(matches!(
            repo.get_all().await,
            Err(CatalogError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn should_generate_sequential_ids_per_type() {
        let repo = setup().await;

        let first = repo
            .generate_next_id(DeviceType::PersonalComputer)
            .await
            .unwrap();
        let second = repo
            .generate_next_id(DeviceType::PersonalComputer)
            .await
            .unwrap();
        let other = repo.generate_next_id(DeviceType::Embedded).await.unwrap();

        assert_eq!(first.as_str(), "PC-1");
        assert_eq!(second.as_str(), "PC-2");
        assert_eq!(other.as_str(), "ED-1");
    }

    #[tokio::test]
    async fn should_skip_ids_taken_by_caller_supplied_devices() {
        let repo = setup().await;
        repo.create(watch("SW-1")).await.unwrap();
        repo.create(watch("SW-2")).await.unwrap();

        let id = repo.generate_next_id(DeviceType::Smartwatch).await.unwrap();
        assert_eq!(id.as_str(), "SW-3");
    }
}
