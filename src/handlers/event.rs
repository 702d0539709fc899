use actix_web::web::{Data, Json, Path, Query};
use chrono::Local;

use crate::context::UserInfo;
use crate::core::models::event::{Event, EventCreate, EventDetail, Query as EventQuery};
use crate::core::schedule::ConflictReport;
use crate::core::services::{event, jadwal};
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::request::Pagination;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn list(Query(param): Query<EventQuery>, Query(page): Query<Pagination>, manager: Data<PgSqlxManager>) -> Result<Json<List<Event>>, Error> {
    let today = Local::now().date_naive();
    let (list, total) = event::query_events(&mut manager.acquire().await?, param, page.to_db(), today).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn detail(event_id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<EventDetail>, Error> {
    Ok(Json(event::event_detail(&mut manager.acquire().await?, event_id.into_inner().0).await?))
}

pub async fn create(user: UserInfo, Json(data): Json<EventCreate>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "event", "create")?;
    let id = event::create_event(manager.begin().await?, user.id, data, Local::now().date_naive()).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(
    user: UserInfo,
    event_id: Path<(i32,)>,
    Json(data): Json<EventCreate>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<EventDetail>, Error> {
    privilege.check(&user, "event", "update")?;
    let event_id = event_id.into_inner().0;
    event::update_event(manager.begin().await?, user.id, event_id, data).await?;
    Ok(Json(event::event_detail(&mut manager.acquire().await?, event_id).await?))
}

pub async fn delete(user: UserInfo, event_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<DeleteResponse>, Error> {
    privilege.check(&user, "event", "delete")?;
    event::delete_event(manager.begin().await?, user.id, event_id.into_inner().0).await?;
    Ok(Json(DeleteResponse::new(1)))
}

pub async fn conflicts(user: UserInfo, event_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<ConflictReport>, Error> {
    privilege.check(&user, "jadwal", "read")?;
    Ok(Json(jadwal::event_conflicts(&mut manager.acquire().await?, user.id, event_id.into_inner().0).await?))
}
