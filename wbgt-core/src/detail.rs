//! Per-day detail view: a day's readings grouped by site.

use chrono::NaiveDate;

use crate::record::{Record, Site};

#[derive(Debug, Clone, PartialEq)]
pub struct DetailGroup {
    pub site: Site,
    pub date: NaiveDate,
    /// Sorted by time slot.
    pub records: Vec<Record>,
}

/// Group the records of `date` by site, keeping first-seen site order.
pub fn day_detail(records: &[Record], date: NaiveDate) -> Vec<DetailGroup> {
    let mut groups: Vec<DetailGroup> = Vec::new();

    for record in records.iter().filter(|r| r.record_date == date) {
        match groups.iter_mut().find(|g| g.site.id == record.site_ref.id) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(DetailGroup {
                site: record.site_ref.clone(),
                date,
                records: vec![record.clone()],
            }),
        }
    }

    for group in &mut groups {
        group.records.sort_by_key(|r| r.record_time);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::TimeSlot;

    #[test]
    fn test_groups_by_site_sorted_by_slot() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 6, 13).unwrap();
        let a = Site::new("S1", "A工事");
        let b = Site::new("S2", "B工事");

        let records = vec![
            Record::new(a.clone(), date, TimeSlot::Afternoon, 30.0, 60.0, 29.0),
            Record::new(b.clone(), date, TimeSlot::Morning, 28.0, 55.0, 25.0),
            Record::new(a.clone(), date, TimeSlot::Morning, 27.0, 50.0, 24.0),
            Record::new(a.clone(), other, TimeSlot::Morning, 27.0, 50.0, 24.0),
        ];

        let groups = day_detail(&records, date);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].site, a);
        assert_eq!(
            groups[0].records.iter().map(|r| r.record_time).collect::<Vec<_>>(),
            vec![TimeSlot::Morning, TimeSlot::Afternoon]
        );
        assert_eq!(groups[1].site, b);
    }

    #[test]
    fn test_empty_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        assert!(day_detail(&[], date).is_empty());
    }
}
