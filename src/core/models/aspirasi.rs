use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AspirasiStatus {
    Pending,
    Reviewed,
    Responded,
}

impl AspirasiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspirasiStatus::Pending => "PENDING",
            AspirasiStatus::Reviewed => "REVIEWED",
            AspirasiStatus::Responded => "RESPONDED",
        }
    }

    pub fn can_become(&self, next: AspirasiStatus) -> bool {
        matches!(
            (self, next),
            (AspirasiStatus::Pending, AspirasiStatus::Reviewed) | (AspirasiStatus::Pending, AspirasiStatus::Responded) | (AspirasiStatus::Reviewed, AspirasiStatus::Responded)
        )
    }
}

impl FromStr for AspirasiStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AspirasiStatus::Pending),
            "REVIEWED" => Ok(AspirasiStatus::Reviewed),
            "RESPONDED" => Ok(AspirasiStatus::Responded),
            _ => Err(Error::BadRequest(format!("invalid aspirasi status({})", s))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Aspirasi {
    pub id: i32,
    pub user_id: i32,
    pub organisasi_id: i32,
    pub title: String,
    pub content: String,
    pub anonymous: bool,
    pub status: String,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Aspirasi {
    pub fn status(&self) -> Result<AspirasiStatus, Error> {
        self.status.parse()
    }
}

/// Listing row; `sender_name` is already blanked for anonymous entries.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AspirasiView {
    pub id: i32,
    pub organisasi_id: i32,
    pub organisasi_name: String,
    pub sender_name: Option<String>,
    pub title: String,
    pub content: String,
    pub anonymous: bool,
    pub status: String,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AspirasiCreate {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub user_id: i32,
    pub organisasi_id: i32,
    pub title: String,
    pub content: String,
    pub anonymous: bool,
}

#[derive(Debug, Deserialize)]
pub struct Respond {
    pub response: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Query {
    pub organisasi_id: Option<i32>,
    pub user_id: Option<i32>,
    pub status: Option<AspirasiStatus>,
}
