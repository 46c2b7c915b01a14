//! Calendar events derived from records.
//!
//! One event per site and day. The event turns into a warning as soon as
//! any reading behind it reaches [`WBGT_WARNING_THRESHOLD`].

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::constants::WBGT_WARNING_THRESHOLD;
use crate::record::Record;

/// Composite key of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteDay {
    pub site_id: String,
    pub date: NaiveDate,
}

impl SiteDay {
    pub fn of(record: &Record) -> Self {
        SiteDay {
            site_id: record.site_ref.id.clone(),
            date: record.record_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Normal,
    Warning,
}

impl ColorTag {
    fn for_wbgt(wbgt: f64) -> Self {
        if wbgt >= WBGT_WARNING_THRESHOLD {
            ColorTag::Warning
        } else {
            ColorTag::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub color: ColorTag,
}

/// Build the calendar events for `records`, in first-seen order.
pub fn calendar_events(records: &[Record]) -> Vec<CalendarEvent> {
    let mut index: HashMap<SiteDay, usize> = HashMap::new();
    let mut events: Vec<CalendarEvent> = Vec::new();

    for record in records {
        let color = ColorTag::for_wbgt(record.wbgt);

        match index.get(&SiteDay::of(record)) {
            Some(&i) => {
                if color == ColorTag::Warning {
                    events[i].color = ColorTag::Warning;
                }
            }
            None => {
                index.insert(SiteDay::of(record), events.len());
                events.push(CalendarEvent {
                    title: record.site_ref.label.clone(),
                    date: record.record_date,
                    color,
                });
            }
        }
    }

    events
}

/// Events falling inside the month of `date`.
pub fn events_in_month(events: &[CalendarEvent], year: i32, month: u32) -> Vec<&CalendarEvent> {
    use chrono::Datelike;

    events
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Site;
    use crate::slot::TimeSlot;

    fn reading(site: &Site, date: NaiveDate, slot: TimeSlot, wbgt: f64) -> Record {
        Record::new(site.clone(), date, slot, 30.0, 60.0, wbgt)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_one_event_per_site_and_day() {
        let s1 = Site::new("S1", "A工事");
        let records = vec![
            reading(&s1, day(12), TimeSlot::Morning, 25.0),
            reading(&s1, day(12), TimeSlot::Afternoon, 27.0),
        ];

        let events = calendar_events(&records);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "A工事");
        assert_eq!(events[0].color, ColorTag::Normal);
    }

    #[test]
    fn test_any_hot_reading_escalates() {
        let s1 = Site::new("S1", "A工事");
        let records = vec![
            reading(&s1, day(12), TimeSlot::Morning, 24.0),
            reading(&s1, day(12), TimeSlot::Afternoon, 30.0),
        ];
        assert_eq!(calendar_events(&records)[0].color, ColorTag::Warning);

        let records = vec![
            reading(&s1, day(12), TimeSlot::Afternoon, 31.0),
            reading(&s1, day(12), TimeSlot::Morning, 24.0),
        ];
        assert_eq!(calendar_events(&records)[0].color, ColorTag::Warning);
    }

    #[test]
    fn test_distinct_sites_and_days() {
        let s1 = Site::new("S1", "A工事");
        let s2 = Site::new("S2", "B工事");
        let records = vec![
            reading(&s1, day(12), TimeSlot::Morning, 24.0),
            reading(&s2, day(12), TimeSlot::Morning, 24.0),
            reading(&s1, day(13), TimeSlot::Morning, 24.0),
        ];

        let events = calendar_events(&records);
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].title, "B工事");
        assert_eq!(events[2].date, day(13));
    }

    #[test]
    fn test_same_label_different_sites() {
        let a = Site::new("S1", "A工事");
        let b = Site::new("S9", "A工事");
        let records = vec![
            reading(&a, day(12), TimeSlot::Morning, 20.0),
            reading(&b, day(12), TimeSlot::Morning, 20.0),
        ];

        assert_eq!(calendar_events(&records).len(), 2);
    }

    #[test]
    fn test_events_in_month() {
        let s1 = Site::new("S1", "A工事");
        let records = vec![
            reading(&s1, day(12), TimeSlot::Morning, 24.0),
            reading(&s1, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), TimeSlot::Morning, 24.0),
        ];

        let events = calendar_events(&records);
        assert_eq!(events_in_month(&events, 2024, 6).len(), 1);
        assert_eq!(events_in_month(&events, 2024, 8).len(), 0);
    }
}
