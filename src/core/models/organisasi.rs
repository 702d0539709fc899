use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Pro => "PRO",
        }
    }
}

impl FromStr for Plan {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(Plan::Free),
            "PRO" => Ok(Plan::Pro),
            _ => Err(Error::ServerError(format!("invalid plan({})", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Organisasi {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub plan: String,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Organisasi {
    pub fn is_pro(&self, now: DateTime<Utc>) -> bool {
        self.plan == Plan::Pro.as_str() && self.plan_expires_at.map_or(false, |exp| exp > now)
    }

    pub fn subscription(&self, now: DateTime<Utc>) -> Subscription {
        let active = self.is_pro(now);
        Subscription {
            plan: if active { Plan::Pro } else { Plan::Free },
            expires_at: if active { self.plan_expires_at } else { None },
            active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub plan: Plan,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Account data submitted by the super-admin; creates the login and the organisation together.
#[derive(Debug, Deserialize)]
pub struct OrganisasiCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub user_id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Query {
    pub name_like: Option<String>,
}
