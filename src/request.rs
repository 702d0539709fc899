use serde::Deserialize;

use crate::core::models::common::Pagination as DBPagination;

const MAX_PAGE_SIZE: i64 = 100;

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

impl Pagination {
    pub fn to_db(&self) -> DBPagination {
        let size = self.size.clamp(1, MAX_PAGE_SIZE);
        let page = self.page.max(1);
        DBPagination::new(size, Some((page - 1) * size))
    }
}
