use chrono::NaiveTime;
use serde::Deserialize;
use sqlx::FromRow;

use crate::core::schedule::{ScheduleBlock, TimeRange, Weekday};
use crate::error::Error;

#[derive(Debug, Clone, FromRow)]
pub struct JadwalKuliah {
    pub id: i32,
    pub user_id: i32,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub course: String,
    pub room: Option<String>,
}

impl TryFrom<JadwalKuliah> for ScheduleBlock {
    type Error = Error;
    fn try_from(j: JadwalKuliah) -> Result<Self, Self::Error> {
        Ok(ScheduleBlock {
            id: Some(j.id),
            day: j.day.parse()?,
            range: TimeRange::from_naive(j.start_time, j.end_time)?,
            course: j.course,
            room: j.room,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JadwalCreate {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub course: String,
    pub room: Option<String>,
}

/// Validated block data, ready to store.
#[derive(Debug, Clone)]
pub struct Data {
    pub day: Weekday,
    pub range: TimeRange,
    pub course: String,
    pub room: Option<String>,
}

impl TryFrom<JadwalCreate> for Data {
    type Error = Error;
    fn try_from(c: JadwalCreate) -> Result<Self, Self::Error> {
        let course = c.course.trim().to_owned();
        if course.is_empty() {
            return Err(Error::BadRequest("course name is required".into()));
        }
        Ok(Data {
            day: c.day.parse()?,
            range: TimeRange::parse(&c.start_time, &c.end_time)?,
            course,
            room: c.room.map(|r| r.trim().to_owned()).filter(|r| !r.is_empty()),
        })
    }
}
