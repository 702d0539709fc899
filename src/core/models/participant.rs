use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::schedule::ConflictReport;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticipantStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Pending => "PENDING",
            ParticipantStatus::Accepted => "ACCEPTED",
            ParticipantStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ParticipantStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ParticipantStatus::Pending),
            "ACCEPTED" => Ok(ParticipantStatus::Accepted),
            "REJECTED" => Ok(ParticipantStatus::Rejected),
            _ => Err(Error::BadRequest(format!("invalid participant status({})", s))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Participant {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    pub fn status(&self) -> Result<ParticipantStatus, Error> {
        self.status.parse()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParticipantView {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub nim: Option<String>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ParticipantStatus,
}

#[derive(Debug, Serialize)]
pub struct RegisterOutcome {
    pub id: i32,
    pub status: ParticipantStatus,
    pub report: ConflictReport,
}
