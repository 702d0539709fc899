use actix_web::web::{Data, Json, Path};
use chrono::Local;

use crate::context::UserInfo;
use crate::core::models::feedback::{FeedbackCreate, FeedbackSummary};
use crate::core::services::feedback;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::response::CreateResponse;

pub async fn submit(
    user: UserInfo,
    event_id: Path<(i32,)>,
    Json(data): Json<FeedbackCreate>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "feedback", "create")?;
    let id = feedback::submit(manager.begin().await?, user.id, event_id.into_inner().0, data, Local::now().naive_local()).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn list(user: UserInfo, event_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<FeedbackSummary>, Error> {
    privilege.check(&user, "feedback", "read")?;
    Ok(Json(feedback::event_feedback(&mut manager.acquire().await?, user.id, event_id.into_inner().0).await?))
}
