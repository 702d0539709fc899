use actix_web::web::{Data, Json, Path};
use chrono::Local;

use crate::context::UserInfo;
use crate::core::models::event::Registration;
use crate::core::models::participant::{ParticipantView, RegisterOutcome, RegisterRequest, StatusUpdate};
use crate::core::services::participant;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::response::DeleteResponse;

pub async fn register(
    user: UserInfo,
    event_id: Path<(i32,)>,
    body: Option<Json<RegisterRequest>>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<RegisterOutcome>, Error> {
    privilege.check(&user, "registration", "create")?;
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let now = Local::now().naive_local();
    Ok(Json(participant::register(manager.begin().await?, user.id, event_id.into_inner().0, req, now).await?))
}

pub async fn cancel(user: UserInfo, event_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<DeleteResponse>, Error> {
    privilege.check(&user, "registration", "cancel")?;
    participant::cancel(manager.begin().await?, user.id, event_id.into_inner().0).await?;
    Ok(Json(DeleteResponse::new(1)))
}

pub async fn list(user: UserInfo, event_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Vec<ParticipantView>>, Error> {
    privilege.check(&user, "participant", "read")?;
    Ok(Json(participant::list_participants(&mut manager.acquire().await?, user.id, event_id.into_inner().0).await?))
}

pub async fn set_status(
    user: UserInfo,
    path: Path<(i32, i32)>,
    Json(StatusUpdate { status }): Json<StatusUpdate>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<Vec<ParticipantView>>, Error> {
    privilege.check(&user, "participant", "update")?;
    let (event_id, participant_id) = path.into_inner();
    participant::set_status(manager.begin().await?, user.id, event_id, participant_id, status).await?;
    Ok(Json(participant::list_participants(&mut manager.acquire().await?, user.id, event_id).await?))
}

pub async fn mine(user: UserInfo, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Vec<Registration>>, Error> {
    privilege.check(&user, "registration", "read")?;
    Ok(Json(participant::my_registrations(&mut manager.acquire().await?, user.id).await?))
}
