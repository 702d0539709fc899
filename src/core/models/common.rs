use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub limit: i64,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: i64, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

/// A `GROUP BY` bucket.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Count {
    pub key: String,
    pub total: i64,
}

impl Count {
    pub fn new(key: &str, total: i64) -> Self {
        Self { key: key.to_owned(), total }
    }
}
