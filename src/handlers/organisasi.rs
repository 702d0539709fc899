use actix_web::web::{Data, Json, Path, Query};
use chrono::Utc;

use crate::context::UserInfo;
use crate::core::models::organisasi::{Organisasi, OrganisasiCreate, Query as OrganisasiQuery, Subscription, Update};
use crate::core::services::organisasi;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::request::Pagination;
use crate::response::{CreateResponse, List};

pub async fn create(user: UserInfo, Json(data): Json<OrganisasiCreate>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "organisasi", "create")?;
    let id = organisasi::create_organisasi(manager.begin().await?, data).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn list(Query(param): Query<OrganisasiQuery>, Query(page): Query<Pagination>, manager: Data<PgSqlxManager>) -> Result<Json<List<Organisasi>>, Error> {
    let (list, total) = organisasi::query_organisasi(&mut manager.acquire().await?, param, page.to_db()).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn detail(organisasi_id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Organisasi>, Error> {
    Ok(Json(organisasi::get_organisasi(&mut manager.acquire().await?, organisasi_id.into_inner().0).await?))
}

pub async fn mine(user: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<Organisasi>, Error> {
    Ok(Json(organisasi::require_organisasi(&mut manager.acquire().await?, user.id).await?))
}

pub async fn update(user: UserInfo, Json(data): Json<Update>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Organisasi>, Error> {
    privilege.check(&user, "organisasi", "update")?;
    organisasi::update_profile(manager.begin().await?, user.id, data).await?;
    Ok(Json(organisasi::require_organisasi(&mut manager.acquire().await?, user.id).await?))
}

pub async fn subscription(user: UserInfo, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Subscription>, Error> {
    privilege.check(&user, "subscription", "read")?;
    Ok(Json(organisasi::subscription(&mut manager.acquire().await?, user.id, Utc::now()).await?))
}
