use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Confirmed,
    Failed,
    Expired,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Confirmed => "CONFIRMED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Expired => "EXPIRED",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            "CONFIRMED" => Ok(PaymentStatus::Confirmed),
            "FAILED" => Ok(PaymentStatus::Failed),
            "EXPIRED" => Ok(PaymentStatus::Expired),
            _ => Err(Error::BadRequest(format!("invalid payment status({})", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: i32,
    pub organisasi_id: i32,
    pub order_id: String,
    pub amount: i64,
    pub status: String,
    pub redirect_url: Option<String>,
    pub gateway_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn status(&self) -> Result<PaymentStatus, Error> {
        self.status.parse()
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub organisasi_id: i32,
    pub order_id: String,
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: PaymentStatus,
    pub gateway_status: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl StatusUpdate {
    pub fn new(status: PaymentStatus) -> Self {
        Self {
            status,
            gateway_status: None,
            paid_at: None,
            confirmed_at: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Query {
    pub organisasi_id: Option<i32>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize)]
pub struct Checkout {
    pub payment_id: i32,
    pub order_id: String,
    pub amount: i64,
    pub token: String,
    pub redirect_url: String,
}
