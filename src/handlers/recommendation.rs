use actix_web::web::{Data, Json, Query};
use chrono::{Local, Utc};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::ai::{Generator, Recommendation, Report};
use crate::core::models::event::EventSuggestion;
use crate::core::services::recommendation;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;

const MAX_SUGGESTIONS: usize = 50;

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct Limit {
    #[serde(default = "default_limit")]
    limit: usize,
}

pub async fn ai_recommendation<G: Generator + 'static>(
    user: UserInfo,
    manager: Data<PgSqlxManager>,
    generator: Data<G>,
    privilege: Data<Privilege>,
) -> Result<Json<Recommendation>, Error> {
    privilege.check(&user, "ai", "generate")?;
    Ok(Json(recommendation::ai_recommendation(&mut manager.acquire().await?, generator.get_ref(), user.id, Utc::now()).await?))
}

pub async fn ai_report<G: Generator + 'static>(user: UserInfo, manager: Data<PgSqlxManager>, generator: Data<G>, privilege: Data<Privilege>) -> Result<Json<Report>, Error> {
    privilege.check(&user, "ai", "generate")?;
    Ok(Json(recommendation::ai_report(&mut manager.acquire().await?, generator.get_ref(), user.id, Utc::now()).await?))
}

pub async fn events(user: UserInfo, Query(Limit { limit }): Query<Limit>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Vec<EventSuggestion>>, Error> {
    privilege.check(&user, "recommendation", "read")?;
    let limit = limit.clamp(1, MAX_SUGGESTIONS);
    Ok(Json(
        recommendation::event_recommendations(&mut manager.acquire().await?, user.id, Local::now().naive_local(), limit).await?,
    ))
}
