use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Deserialize)]
pub struct FeedbackCreate {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub event_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FeedbackView {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackSummary {
    pub average_rating: Option<f64>,
    pub count: usize,
    pub list: Vec<FeedbackView>,
}
