//! Weekly-schedule and event overlap detection.
//!
//! Times are wall-clock minutes since midnight with no timezone attached.
//! Ranges are half-open: a block ending at 10:00 does not collide with an
//! event starting at 10:00.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Minggu,
    Senin,
    Selasa,
    Rabu,
    Kamis,
    Jumat,
    Sabtu,
}

const DAY_NAMES: [(&str, Weekday); 7] = [
    ("minggu", Weekday::Minggu),
    ("senin", Weekday::Senin),
    ("selasa", Weekday::Selasa),
    ("rabu", Weekday::Rabu),
    ("kamis", Weekday::Kamis),
    ("jumat", Weekday::Jumat),
    ("sabtu", Weekday::Sabtu),
];

impl Weekday {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Sun => Weekday::Minggu,
            chrono::Weekday::Mon => Weekday::Senin,
            chrono::Weekday::Tue => Weekday::Selasa,
            chrono::Weekday::Wed => Weekday::Rabu,
            chrono::Weekday::Thu => Weekday::Kamis,
            chrono::Weekday::Fri => Weekday::Jumat,
            chrono::Weekday::Sat => Weekday::Sabtu,
        }
    }

    pub fn as_str(&self) -> &'static str {
        DAY_NAMES.iter().find(|(_, d)| d == self).map(|(name, _)| *name).unwrap_or("minggu")
    }
}

impl FromStr for Weekday {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let name = if name == "jum'at" { "jumat".to_owned() } else { name };
        DAY_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, d)| *d)
            .ok_or_else(|| Error::BadRequest(format!("unknown day name: {}", s)))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Minutes since midnight, 0..1440.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, Error> {
        if hour > 23 || minute > 59 {
            return Err(Error::BadRequest(format!("time out of range: {:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn to_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.0 / 60), u32::from(self.0 % 60), 0).unwrap_or_default()
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        TimeOfDay((t.hour() * 60 + t.minute()) as u16)
    }
}

fn digits(part: &str, min_len: usize) -> Option<u32> {
    if part.len() < min_len || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for TimeOfDay {
    type Err = Error;

    /// Accepts `H:MM`, `HH:MM` and `HH:MM:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::BadRequest(format!("invalid time {:?}, expected HH:MM", s));
        let parts: Vec<&str> = s.trim().split(':').collect();
        let (hour, minute) = match parts.as_slice() {
            [h, m] => (h, m),
            [h, m, sec] if *sec == "00" => (h, m),
            _ => return Err(invalid()),
        };
        let hour = digits(hour, 1).ok_or_else(invalid)?;
        let minute = digits(minute, 2).ok_or_else(invalid)?;
        TimeOfDay::from_hm(hour, minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serializes a database `TIME` as `HH:MM`.
pub fn serialize_hhmm<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    TimeOfDay::from(*t).serialize(serializer)
}

/// Non-empty range with `start < end`. Ranges that wrap past midnight are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, Error> {
        if start >= end {
            return Err(Error::BadRequest(format!("end time {} must be after start time {}", end, start)));
        }
        Ok(TimeRange { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, Error> {
        TimeRange::new(start.parse()?, end.parse()?)
    }

    pub fn from_naive(start: NaiveTime, end: NaiveTime) -> Result<Self, Error> {
        TimeRange::new(start.into(), end.into())
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One recurring weekly block of a student's Jadwal Kuliah.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleBlock {
    pub id: Option<i32>,
    pub day: Weekday,
    #[serde(flatten)]
    pub range: TimeRange,
    pub course: String,
    pub room: Option<String>,
}

/// A dated event the candidate is compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSlot {
    pub event_id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub range: TimeRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub block: ScheduleBlock,
    pub overlap: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventClash {
    pub event_id: i32,
    pub title: String,
    pub range: TimeRange,
    pub overlap: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicts: Vec<Overlap>,
    pub clashes: Vec<EventClash>,
    pub message: String,
}

impl ConflictReport {
    fn build(conflicts: Vec<Overlap>, clashes: Vec<EventClash>) -> Self {
        let mut parts = Vec::new();
        if !conflicts.is_empty() {
            let items: Vec<String> = conflicts.iter().map(|o| format!("{} ({})", o.block.course, o.overlap)).collect();
            parts.push(format!("Bentrok dengan jadwal kuliah: {}", items.join(", ")));
        }
        if !clashes.is_empty() {
            let items: Vec<String> = clashes.iter().map(|c| format!("{} ({})", c.title, c.overlap)).collect();
            parts.push(format!("Bentrok dengan event lain: {}", items.join(", ")));
        }
        let has_conflict = !parts.is_empty();
        let message = if has_conflict { parts.join("; ") } else { "Tidak ada bentrok jadwal".to_owned() };
        ConflictReport {
            has_conflict,
            conflicts,
            clashes,
            message,
        }
    }
}

/// Compares a dated occurrence against recurring weekly blocks.
pub fn check_event_conflict(candidate: &Occurrence, blocks: &[ScheduleBlock]) -> ConflictReport {
    ConflictReport::build(weekly_overlaps(candidate, blocks), Vec::new())
}

/// Compares a dated occurrence against other dated events. Only events on the same date count.
pub fn check_event_clashes(candidate: &Occurrence, events: &[DatedSlot]) -> Vec<EventClash> {
    events
        .iter()
        .filter(|e| e.date == candidate.date)
        .filter_map(|e| {
            candidate.range.intersection(&e.range).map(|overlap| EventClash {
                event_id: e.event_id,
                title: e.title.clone(),
                range: e.range,
                overlap,
            })
        })
        .collect()
}

/// Weekly blocks and already-registered events in one report.
pub fn check_all(candidate: &Occurrence, blocks: &[ScheduleBlock], events: &[DatedSlot]) -> ConflictReport {
    ConflictReport::build(weekly_overlaps(candidate, blocks), check_event_clashes(candidate, events))
}

fn weekly_overlaps(candidate: &Occurrence, blocks: &[ScheduleBlock]) -> Vec<Overlap> {
    let day = Weekday::of(candidate.date);
    blocks
        .iter()
        .filter(|b| b.day == day)
        .filter_map(|b| {
            candidate.range.intersection(&b.range).map(|overlap| Overlap {
                block: b.clone(),
                overlap,
            })
        })
        .collect()
}
