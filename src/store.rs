//! Persistence seam for parsed records.
//!
//! The remote datastore lives outside this crate. [`DeliveryStore`] is the
//! boundary it plugs into; [`JsonFileStore`] and [`MemoryStore`] are local
//! backends for the command-line tool and tests.

use crate::batch::ParsedRecord;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("missing store credentials: {0} is not set")]
    MissingCredentials(&'static str),
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("store data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRow {
    pub city_name: String,
    pub delivery_date: String,
    pub restrictions: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub trait DeliveryStore {
    fn find(&self, city: &str) -> Result<Option<DeliveryRow>, StoreError>;
    fn insert(&mut self, row: DeliveryRow) -> Result<(), StoreError>;
    fn update(&mut self, row: DeliveryRow) -> Result<(), StoreError>;
}

/// Connection settings for a remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub url: String,
    /// Service key for the remote datastore. Required up front so a
    /// misconfigured deployment fails at startup; the `file:` backend
    /// does not read it.
    pub key: String,
}

pub const STORE_URL_VAR: &str = "DELIVERY_STORE_URL";
pub const STORE_KEY_VAR: &str = "DELIVERY_STORE_KEY";

impl StoreSettings {
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Fails on the first missing or blank variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(StoreError::MissingCredentials(name))
        };
        Ok(StoreSettings {
            url: get(STORE_URL_VAR)?,
            key: get(STORE_KEY_VAR)?,
        })
    }

    /// Only `file:` URLs have a backend in this crate.
    pub fn open(&self) -> Result<JsonFileStore, StoreError> {
        let url = self.url.trim();
        match url.strip_prefix("file://").or_else(|| url.strip_prefix("file:")) {
            Some(path) if !path.is_empty() => {
                debug!("opening file store {}, service key unused", path);
                JsonFileStore::open(path)
            }
            _ => Err(StoreError::Backend(format!("unsupported store url: {}", url))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSuccess {
    pub city: String,
    pub date: String,
    pub action: UpdateAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateFailure {
    pub city: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub total: usize,
    pub success: Vec<UpdateSuccess>,
    pub failed: Vec<UpdateFailure>,
}

/// Upsert every record keyed by city, in order.
///
/// `restrictions` is always written, so a record without an exception
/// clause clears the previous one. A failing record is reported and the
/// rest of the batch still runs.
pub fn update_delivery_dates<S: DeliveryStore + ?Sized>(
    store: &mut S,
    records: &[ParsedRecord],
) -> UpdateReport {
    let mut report = UpdateReport {
        total: records.len(),
        ..UpdateReport::default()
    };

    for record in records {
        match upsert(store, record) {
            Ok(action) => {
                debug!("{:?} {} -> {}", action, record.city, record.date);
                report.success.push(UpdateSuccess {
                    city: record.city.clone(),
                    date: record.date.clone(),
                    action,
                });
            }
            Err(e) => {
                warn!("update failed for {}: {}", record.city, e);
                report.failed.push(UpdateFailure {
                    city: record.city.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    report
}

fn upsert<S: DeliveryStore + ?Sized>(
    store: &mut S,
    record: &ParsedRecord,
) -> Result<UpdateAction, StoreError> {
    let row = DeliveryRow {
        city_name: record.city.clone(),
        delivery_date: record.date.clone(),
        restrictions: record.restrictions.clone(),
        updated_at: Utc::now(),
    };
    if store.find(&record.city)?.is_some() {
        store.update(row)?;
        Ok(UpdateAction::Updated)
    } else {
        store.insert(row)?;
        Ok(UpdateAction::Created)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<DeliveryRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DeliveryRow] {
        &self.rows
    }
}

impl DeliveryStore for MemoryStore {
    fn find(&self, city: &str) -> Result<Option<DeliveryRow>, StoreError> {
        Ok(self.rows.iter().find(|r| r.city_name == city).cloned())
    }

    fn insert(&mut self, row: DeliveryRow) -> Result<(), StoreError> {
        if self.rows.iter().any(|r| r.city_name == row.city_name) {
            return Err(StoreError::Backend(format!(
                "duplicate city_name: {}",
                row.city_name
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    fn update(&mut self, row: DeliveryRow) -> Result<(), StoreError> {
        match self.rows.iter_mut().find(|r| r.city_name == row.city_name) {
            Some(existing) => {
                *existing = row;
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "no row for city_name: {}",
                row.city_name
            ))),
        }
    }
}

/// Rows kept as a JSON array on disk, rewritten after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: MemoryStore,
}

impl JsonFileStore {
    /// Open the table at `path`; a missing file is an empty table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let rows = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            Vec::new()
        };
        Ok(JsonFileStore {
            path,
            table: MemoryStore { rows },
        })
    }

    pub fn rows(&self) -> &[DeliveryRow] {
        self.table.rows()
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(self.table.rows())?;
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl DeliveryStore for JsonFileStore {
    fn find(&self, city: &str) -> Result<Option<DeliveryRow>, StoreError> {
        self.table.find(city)
    }

    fn insert(&mut self, row: DeliveryRow) -> Result<(), StoreError> {
        self.table.insert(row)?;
        self.flush()
    }

    fn update(&mut self, row: DeliveryRow) -> Result<(), StoreError> {
        self.table.update(row)?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn record(city: &str, date: &str, restrictions: Option<&str>) -> ParsedRecord {
        ParsedRecord {
            city: city.to_string(),
            original_city: city.to_string(),
            date: date.to_string(),
            restrictions: restrictions.map(str::to_string),
        }
    }

    /// Fails every write for one city.
    struct FlakyStore {
        inner: MemoryStore,
        broken_city: String,
    }

    impl DeliveryStore for FlakyStore {
        fn find(&self, city: &str) -> Result<Option<DeliveryRow>, StoreError> {
            self.inner.find(city)
        }

        fn insert(&mut self, row: DeliveryRow) -> Result<(), StoreError> {
            if row.city_name == self.broken_city {
                return Err(StoreError::Backend("connection reset".to_string()));
            }
            self.inner.insert(row)
        }

        fn update(&mut self, row: DeliveryRow) -> Result<(), StoreError> {
            self.inner.update(row)
        }
    }

    #[test]
    fn test_create_then_update() {
        let mut store = MemoryStore::new();
        let report = update_delivery_dates(
            &mut store,
            &[record("Москва", "09.02", Some("16.02")), record("Москва", "10.02", None)],
        );
        assert_eq!(report.total, 2);
        assert_eq!(report.success[0].action, UpdateAction::Created);
        assert_eq!(report.success[1].action, UpdateAction::Updated);
        assert!(report.failed.is_empty());

        assert_eq!(store.rows().len(), 1);
        let row = &store.rows()[0];
        assert_eq!(row.delivery_date, "10.02");
        assert_eq!(row.restrictions, None);
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let mut store = FlakyStore {
            inner: MemoryStore::new(),
            broken_city: "Тула".to_string(),
        };
        let report = update_delivery_dates(
            &mut store,
            &[
                record("Москва", "09.02", None),
                record("Тула", "09.02", None),
                record("Орёл", "11.02", None),
            ],
        );
        assert_eq!(report.total, 3);
        assert_eq!(report.success.len(), 2);
        assert_eq!(
            report.failed,
            vec![UpdateFailure {
                city: "Тула".to_string(),
                error: "connection reset".to_string(),
            }]
        );
        assert_eq!(store.inner.rows().len(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let mut store = MemoryStore::new();
        let report = update_delivery_dates(&mut store, &[]);
        assert_eq!(report, UpdateReport::default());
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("delivery.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.rows().is_empty());
        let report = update_delivery_dates(
            &mut store,
            &[record("Тула", "09.02", Some("16, 20")), record("Москва", "10.02", None)],
        );
        assert_eq!(report.success.len(), 2);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.rows(), store.rows());
        assert_eq!(reopened.rows()[0].city_name, "Тула");
        assert_eq!(reopened.rows()[0].restrictions.as_deref(), Some("16, 20"));
    }

    #[test]
    fn test_json_file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("delivery.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_settings_missing_credentials() {
        let env: HashMap<&str, &str> = HashMap::from([(STORE_URL_VAR, "https://db.example")]);
        let err = StoreSettings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(matches!(err, StoreError::MissingCredentials(STORE_KEY_VAR)));
        assert_eq!(
            err.to_string(),
            "missing store credentials: DELIVERY_STORE_KEY is not set"
        );
    }

    #[test]
    fn test_settings_blank_is_missing() {
        let err = StoreSettings::from_lookup(|_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::MissingCredentials(STORE_URL_VAR)));
    }

    #[test]
    fn test_settings_open_file_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let settings = StoreSettings {
            url: format!("file://{}", path.display()),
            key: "secret".to_string(),
        };
        let mut store = settings.open().unwrap();
        update_delivery_dates(&mut store, &[record("Тула", "09.02", None)]);
        assert!(path.exists());

        // the key never reaches the file backend
        let other_key = StoreSettings {
            key: "another".to_string(),
            ..settings.clone()
        };
        assert_eq!(other_key.open().unwrap().rows(), store.rows());
        assert!(!fs::read_to_string(&path).unwrap().contains("secret"));

        let remote = StoreSettings {
            url: "https://db.example".to_string(),
            key: "secret".to_string(),
        };
        let err = remote.open().unwrap_err();
        assert_eq!(err.to_string(), "unsupported store url: https://db.example");
    }

    #[test]
    fn test_settings_complete() {
        let settings = StoreSettings::from_lookup(|k| Some(format!("{}-value", k))).unwrap();
        assert_eq!(settings.url, "DELIVERY_STORE_URL-value");
        assert_eq!(settings.key, "DELIVERY_STORE_KEY-value");
    }
}
