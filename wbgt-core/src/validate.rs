//! Input checks that run before any sync engine call.
//!
//! The sync engine trusts its input: range checks, duplicate detection and
//! the offline edit guard all live here, at the form boundary.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::{HUMIDITY_RANGE, TEMPERATURE_RANGE, WBGT_RANGE};
use crate::error::{WbgtError, WbgtResult};
use crate::record::{Record, Site};
use crate::slot::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Humidity,
    Wbgt,
}

impl Field {
    fn range(&self) -> (f64, f64) {
        match self {
            Field::Temperature => TEMPERATURE_RANGE,
            Field::Humidity => HUMIDITY_RANGE,
            Field::Wbgt => WBGT_RANGE,
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Field::Temperature | Field::Wbgt => "°C",
            Field::Humidity => "%",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Temperature => write!(f, "Temperature"),
            Field::Humidity => write!(f, "Humidity"),
            Field::Wbgt => write!(f, "WBGT"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("A site must be selected")]
    SiteMissing,

    #[error("{0} is required")]
    Required(Field),

    #[error("{field} must be between {min}{unit} and {max}{unit}")]
    OutOfRange {
        field: Field,
        min: f64,
        max: f64,
        unit: &'static str,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Some fields are missing or invalid")]
    Incomplete(Vec<FieldError>),

    #[error("A record for this site, date and time already exists ({existing_id})")]
    Duplicate { existing_id: String },
}

/// Form input for a new or edited record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub site: Option<Site>,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wbgt: Option<f64>,
}

impl RecordDraft {
    /// Pre-filled draft for editing `record`.
    pub fn from_record(record: &Record) -> Self {
        RecordDraft {
            site: Some(record.site_ref.clone()),
            date: record.record_date,
            time: record.record_time,
            temperature: Some(record.temperature),
            humidity: Some(record.humidity),
            wbgt: Some(record.wbgt),
        }
    }

    /// Every field-level problem, in form order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.site.is_none() {
            errors.push(FieldError::SiteMissing);
        }

        let fields = [
            (Field::Temperature, self.temperature),
            (Field::Humidity, self.humidity),
            (Field::Wbgt, self.wbgt),
        ];
        for (field, value) in fields {
            if let Err(e) = check_measurement(field, value) {
                errors.push(e);
            }
        }

        errors
    }

    /// Validate as a new record against the current set.
    pub fn into_new_record(self, existing: &[Record]) -> Result<Record, ValidationError> {
        let (site, temperature, humidity, wbgt) = self.checked(existing, None)?;
        Ok(Record::new(site, self.date, self.time, temperature, humidity, wbgt))
    }

    /// Validate as an edit of `original`. The id and creation time carry over.
    pub fn into_edited_record(
        self,
        original: &Record,
        existing: &[Record],
    ) -> Result<Record, ValidationError> {
        let (site, temperature, humidity, wbgt) = self.checked(existing, Some(&original.id))?;
        Ok(Record {
            id: original.id.clone(),
            site_ref: site,
            record_date: self.date,
            record_time: self.time,
            temperature,
            humidity,
            wbgt,
            creation_time: original.creation_time.clone(),
            sync_status: original.sync_status,
        })
    }

    fn checked(
        &self,
        existing: &[Record],
        editing: Option<&str>,
    ) -> Result<(Site, f64, f64, f64), ValidationError> {
        let errors = self.field_errors();
        let (Some(site), Some(temperature), Some(humidity), Some(wbgt), true) = (
            self.site.clone(),
            self.temperature,
            self.humidity,
            self.wbgt,
            errors.is_empty(),
        ) else {
            return Err(ValidationError::Incomplete(errors));
        };

        if let Some(duplicate) = find_duplicate(existing, &site.id, self.date, self.time, editing) {
            return Err(ValidationError::Duplicate {
                existing_id: duplicate.id.clone(),
            });
        }

        Ok((site, temperature, humidity, wbgt))
    }
}

/// A value of exactly zero counts as "not entered".
fn check_measurement(field: Field, value: Option<f64>) -> Result<(), FieldError> {
    let value = match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => return Err(FieldError::Required(field)),
    };

    let (min, max) = field.range();
    if value < min || value > max {
        return Err(FieldError::OutOfRange {
            field,
            min,
            max,
            unit: field.unit(),
        });
    }
    Ok(())
}

/// An existing record with the same site, date and slot, other than `editing`.
pub fn find_duplicate<'a>(
    existing: &'a [Record],
    site_id: &str,
    date: NaiveDate,
    time: TimeSlot,
    editing: Option<&str>,
) -> Option<&'a Record> {
    existing.iter().find(|r| {
        Some(r.id.as_str()) != editing
            && r.site_ref.id == site_id
            && r.record_date == date
            && r.record_time == time
    })
}

/// Synced records cannot be edited while offline.
pub fn ensure_editable(record: &Record, online: bool) -> WbgtResult<()> {
    if !online && record.sync_status {
        return Err(WbgtError::SyncedRecordOffline(record.id.clone()));
    }
    Ok(())
}
