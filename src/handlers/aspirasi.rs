use actix_web::web::{Data, Json, Path, Query};
use chrono::Utc;
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::models::aspirasi::{AspirasiCreate, AspirasiStatus, AspirasiView, Respond};
use crate::core::services::aspirasi;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::request::Pagination;
use crate::response::{CreateResponse, List};

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    status: Option<AspirasiStatus>,
}

pub async fn submit(
    user: UserInfo,
    organisasi_id: Path<(i32,)>,
    Json(data): Json<AspirasiCreate>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "aspirasi", "create")?;
    let id = aspirasi::submit(manager.begin().await?, user.id, organisasi_id.into_inner().0, data).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn mine(user: UserInfo, Query(page): Query<Pagination>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<List<AspirasiView>>, Error> {
    privilege.check(&user, "aspirasi", "read")?;
    let (list, total) = aspirasi::my_aspirasi(&mut manager.acquire().await?, user.id, page.to_db()).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn inbox(
    user: UserInfo,
    Query(StatusFilter { status }): Query<StatusFilter>,
    Query(page): Query<Pagination>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<List<AspirasiView>>, Error> {
    privilege.check(&user, "aspirasi", "manage")?;
    let (list, total) = aspirasi::list_for_organisasi(&mut manager.acquire().await?, user.id, status, page.to_db()).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn review(user: UserInfo, aspirasi_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "aspirasi", "manage")?;
    let id = aspirasi_id.into_inner().0;
    aspirasi::mark_reviewed(manager.begin().await?, user.id, id).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn respond(
    user: UserInfo,
    aspirasi_id: Path<(i32,)>,
    Json(data): Json<Respond>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "aspirasi", "manage")?;
    let id = aspirasi_id.into_inner().0;
    aspirasi::respond(manager.begin().await?, user.id, id, data, Utc::now()).await?;
    Ok(Json(CreateResponse { id }))
}
