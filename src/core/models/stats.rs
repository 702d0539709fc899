use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::core::models::common::Count;

/// Per-event aggregates used as AI prompt input.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventStat {
    pub event_id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub capacity: Option<i32>,
    pub accepted: i64,
    pub pending: i64,
    pub rejected: i64,
    pub feedback_count: i64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganisasiStats {
    pub organisasi_name: String,
    pub events: Vec<EventStat>,
    pub aspirasi_by_status: Vec<Count>,
    pub recent_aspirasi: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub users_by_role: Vec<Count>,
    pub organisasi_by_plan: Vec<Count>,
    pub events: i64,
    pub registrations_by_status: Vec<Count>,
    pub payments_by_status: Vec<Count>,
    pub confirmed_revenue: i64,
}
