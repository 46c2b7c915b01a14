//! Measurement records and the sites they belong to.
//!
//! A `Record` is the unit the sync engine moves between the local cache and
//! the remote store. Field names serialize as camelCase; the legacy names
//! written by the old web client (`kouji`, `temperatureVal`, `syncFlag`, ...)
//! are still accepted when reading.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::slot::{TimeSlot, creation_timestamp};

/// A construction site measurements are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub label: String,
}

impl Site {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Site {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// One measurement event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(alias = "kouji")]
    pub site_ref: Site,
    pub record_date: NaiveDate,
    pub record_time: TimeSlot,
    #[serde(alias = "temperatureVal")]
    pub temperature: f64,
    #[serde(alias = "humidityVal")]
    pub humidity: f64,
    #[serde(alias = "wbgtVal")]
    pub wbgt: f64,
    /// Set once at creation, never rewritten.
    pub creation_time: String,
    /// True once the record is known to exist in the remote store.
    #[serde(default, alias = "syncFlag")]
    pub sync_status: bool,
}

impl Record {
    /// A new, not yet synced record with a fresh id and creation time.
    pub fn new(
        site_ref: Site,
        record_date: NaiveDate,
        record_time: TimeSlot,
        temperature: f64,
        humidity: f64,
        wbgt: f64,
    ) -> Self {
        Record {
            id: uuid::Uuid::new_v4().to_string(),
            site_ref,
            record_date,
            record_time,
            temperature,
            humidity,
            wbgt,
            creation_time: creation_timestamp(Utc::now()),
            sync_status: false,
        }
    }

    pub fn with_sync_status(mut self, synced: bool) -> Self {
        self.sync_status = synced;
        self
    }

    pub fn is_pending(&self) -> bool {
        !self.sync_status
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} WBGT {}",
            self.site_ref, self.record_date, self.record_time, self.wbgt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_pending_with_unique_id() {
        let site = Site::new("s1", "A工事");
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let a = Record::new(site.clone(), date, TimeSlot::Morning, 30.0, 60.0, 31.0);
        let b = Record::new(site, date, TimeSlot::Morning, 30.0, 60.0, 31.0);

        assert!(a.is_pending());
        assert_ne!(a.id, b.id);
        assert!(a.with_sync_status(true).sync_status);
    }

    #[test]
    fn test_serializes_camel_case() {
        let site = Site::new("s1", "A工事");
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let record = Record::new(site, date, TimeSlot::Afternoon, 30.0, 60.0, 31.0);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["siteRef"]["label"], "A工事");
        assert_eq!(value["recordDate"], "2024-06-12");
        assert_eq!(value["recordTime"], "13:00");
        assert_eq!(value["syncStatus"], false);
    }

    #[test]
    fn test_reads_legacy_field_names() {
        let json = r#"{
            "id": "legacy-1",
            "kouji": { "id": "k1", "label": "B工事" },
            "recordDate": "2024-07-01",
            "recordTime": "10:00",
            "temperatureVal": 33,
            "humidityVal": 70,
            "wbgtVal": 29.5,
            "creationTime": "2024年7月1日 10:02:00 UTC+9",
            "syncFlag": true
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.site_ref.id, "k1");
        assert_eq!(record.temperature, 33.0);
        assert_eq!(record.wbgt, 29.5);
        assert!(record.sync_status);
    }

    #[test]
    fn test_missing_sync_status_means_pending() {
        let json = r#"{
            "id": "r1",
            "siteRef": { "id": "k1", "label": "B工事" },
            "recordDate": "2024-07-01",
            "recordTime": "8:00",
            "temperature": 25,
            "humidity": 50,
            "wbgt": 22,
            "creationTime": "2024年7月1日 8:00:00 UTC+9"
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.is_pending());
    }
}
