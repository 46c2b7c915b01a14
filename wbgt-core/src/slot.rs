//! Measurement time slots and the clock helpers around them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Asia::Tokyo;
use serde::{Deserialize, Serialize};

/// One of the fixed times of day a measurement is taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "8:00", alias = "08:00")]
    Morning,
    #[serde(rename = "10:00")]
    Midmorning,
    #[serde(rename = "13:00")]
    Afternoon,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Midmorning, TimeSlot::Afternoon];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "8:00",
            TimeSlot::Midmorning => "10:00",
            TimeSlot::Afternoon => "13:00",
        }
    }

    pub fn time(&self) -> NaiveTime {
        let hour = match self {
            TimeSlot::Morning => 8,
            TimeSlot::Midmorning => 10,
            TimeSlot::Afternoon => 13,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The slot nearest to `time`. Ties go to the earlier slot.
    pub fn closest_to(time: NaiveTime) -> TimeSlot {
        let distance = |slot: &TimeSlot| (time - slot.time()).num_seconds().abs();

        let mut closest = TimeSlot::ALL[0];
        for slot in &TimeSlot::ALL[1..] {
            if distance(slot) < distance(&closest) {
                closest = *slot;
            }
        }
        closest
    }

    /// Slot nearest to the current wall-clock time on site.
    pub fn current() -> TimeSlot {
        Self::closest_to(Utc::now().with_timezone(&Tokyo).time())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "8:00" | "08:00" => Ok(TimeSlot::Morning),
            "10:00" => Ok(TimeSlot::Midmorning),
            "13:00" => Ok(TimeSlot::Afternoon),
            other => Err(format!(
                "Invalid time slot '{}'. Expected one of: 8:00, 10:00, 13:00",
                other
            )),
        }
    }
}

/// Today's date on site (Asia/Tokyo).
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&Tokyo).date_naive()
}

/// Creation timestamp as stored on records, e.g. `2024年6月12日 8:03:15 UTC+9`.
pub fn creation_timestamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&Tokyo)
        .format("%Y年%-m月%-d日 %-H:%M:%S UTC+9")
        .to_string()
}

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_closest_slot() {
        assert_eq!(TimeSlot::closest_to(at(6, 30)), TimeSlot::Morning);
        assert_eq!(TimeSlot::closest_to(at(9, 10)), TimeSlot::Midmorning);
        assert_eq!(TimeSlot::closest_to(at(11, 40)), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::closest_to(at(18, 0)), TimeSlot::Afternoon);
    }

    #[test]
    fn test_closest_slot_tie_prefers_earlier() {
        assert_eq!(TimeSlot::closest_to(at(9, 0)), TimeSlot::Morning);
    }

    #[test]
    fn test_zero_padded_morning_slot_reads_like_from_str() {
        let slot: TimeSlot = serde_json::from_str(r#""08:00""#).unwrap();
        assert_eq!(slot, "08:00".parse::<TimeSlot>().unwrap());
        assert_eq!(serde_json::to_string(&slot).unwrap(), r#""8:00""#);
    }

    #[test]
    fn test_slot_parse_and_serde() {
        assert_eq!("8:00".parse::<TimeSlot>().unwrap(), TimeSlot::Morning);
        assert_eq!("08:00".parse::<TimeSlot>().unwrap(), TimeSlot::Morning);
        assert_eq!("13:00".parse::<TimeSlot>().unwrap(), TimeSlot::Afternoon);
        assert!("9:00".parse::<TimeSlot>().is_err());

        let json = serde_json::to_string(&TimeSlot::Midmorning).unwrap();
        assert_eq!(json, "\"10:00\"");
    }

    #[test]
    fn test_creation_timestamp_is_tokyo_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 23, 3, 15).unwrap();
        assert_eq!(creation_timestamp(now), "2024年6月12日 8:03:15 UTC+9");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-12").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
        );
        assert!(parse_date("12/06/2024").is_err());
    }
}
