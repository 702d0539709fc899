use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::models::skill::Skill;
use crate::core::schedule::{serialize_hhmm, ConflictReport, DatedSlot, Occurrence, TimeRange};
use crate::error::Error;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub organisasi_id: i32,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_hhmm")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm")]
    pub end_time: NaiveTime,
    pub location: String,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn range(&self) -> Result<TimeRange, Error> {
        TimeRange::from_naive(self.start_time, self.end_time)
    }

    pub fn occurrence(&self) -> Result<Occurrence, Error> {
        Ok(Occurrence {
            date: self.date,
            range: self.range()?,
        })
    }

    pub fn has_started(&self, now: NaiveDateTime) -> bool {
        self.date.and_time(self.start_time) <= now
    }

    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        self.date.and_time(self.end_time) <= now
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub skill_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub organisasi_id: i32,
    pub data: Update,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Query {
    pub organisasi_id: Option<i32>,
    pub skill_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub title_like: Option<String>,
    #[serde(default)]
    pub upcoming: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EventSkill {
    pub event_id: i32,
    pub skill_id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub organisasi_name: String,
    pub skills: Vec<Skill>,
    pub accepted_count: i64,
    pub pending_count: i64,
}

/// A student's registration joined with the event it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Registration {
    pub participant_id: i32,
    pub event_id: i32,
    pub title: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_hhmm")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm")]
    pub end_time: NaiveTime,
    pub location: String,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn slot(&self) -> Result<DatedSlot, Error> {
        Ok(DatedSlot {
            event_id: self.event_id,
            title: self.title.clone(),
            date: self.date,
            range: TimeRange::from_naive(self.start_time, self.end_time)?,
        })
    }
}

/// An upcoming event and how many of a student's interest skills it lists.
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct SharedSkills {
    pub event_id: i32,
    pub shared: i64,
}

#[derive(Debug, Serialize)]
pub struct EventSuggestion {
    #[serde(flatten)]
    pub event: Event,
    pub shared_skills: usize,
    pub report: ConflictReport,
}
