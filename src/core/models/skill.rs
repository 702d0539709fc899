use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Skill {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillCreate {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Interests {
    pub skill_ids: Vec<i32>,
}
