use actix_web::web::{Data, Json, Path};

use crate::context::UserInfo;
use crate::core::models::jadwal::JadwalCreate;
use crate::core::schedule::ScheduleBlock;
use crate::core::services::jadwal;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::response::{CreateResponse, DeleteResponse};

pub async fn list(user: UserInfo, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Vec<ScheduleBlock>>, Error> {
    privilege.check(&user, "jadwal", "read")?;
    Ok(Json(jadwal::list_blocks(&mut manager.acquire().await?, user.id).await?))
}

pub async fn create(user: UserInfo, Json(data): Json<JadwalCreate>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "jadwal", "write")?;
    let id = jadwal::add_block(manager.begin().await?, user.id, data).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(
    user: UserInfo,
    jadwal_id: Path<(i32,)>,
    Json(data): Json<JadwalCreate>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<Vec<ScheduleBlock>>, Error> {
    privilege.check(&user, "jadwal", "write")?;
    jadwal::update_block(manager.begin().await?, user.id, jadwal_id.into_inner().0, data).await?;
    Ok(Json(jadwal::list_blocks(&mut manager.acquire().await?, user.id).await?))
}

pub async fn delete(user: UserInfo, jadwal_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<DeleteResponse>, Error> {
    privilege.check(&user, "jadwal", "write")?;
    jadwal::delete_block(manager.begin().await?, user.id, jadwal_id.into_inner().0).await?;
    Ok(Json(DeleteResponse::new(1)))
}
