use chrono::{DateTime, Utc};
use log::info;

use crate::core::models::common::Pagination;
use crate::core::models::organisasi::{Insert, Organisasi, OrganisasiCreate, Query, Subscription, Update};
use crate::core::models::user::Role;
use crate::core::ports::repository::{OrganisasiCommon, TxStore, UserCommon};
use crate::core::services::auth::insert_account;
use crate::error::Error;

/// The organisasi owned by the calling account.
pub async fn require_organisasi<D>(db: &mut D, uid: i32) -> Result<Organisasi, Error>
where
    D: OrganisasiCommon,
{
    OrganisasiCommon::get_by_user(db, uid)
        .await?
        .ok_or(Error::NotFound("no organisasi is linked to this account".into()))
}

pub async fn create_organisasi<T>(mut store: T, data: OrganisasiCreate) -> Result<i32, Error>
where
    T: TxStore,
{
    let name = data.name.trim().to_owned();
    if name.is_empty() {
        return Err(Error::BadRequest("organisasi name is required".into()));
    }
    if OrganisasiCommon::exists(&mut store, &name).await? {
        return Err(Error::Conflict("organisasi name already taken".into()));
    }
    let uid = insert_account(&mut store, &name, &data.email, None, &data.password, Role::Organisasi).await?;
    let id = OrganisasiCommon::insert(
        &mut store,
        Insert {
            user_id: uid,
            name,
            description: data.description.trim().to_owned(),
        },
    )
    .await?;
    store.commit().await?;
    info!("organisasi {} created with account {}", id, uid);
    Ok(id)
}

pub async fn update_profile<T>(mut store: T, uid: i32, data: Update) -> Result<(), Error>
where
    T: TxStore,
{
    let org = require_organisasi(&mut store, uid).await?;
    let name = data.name.trim().to_owned();
    if name.is_empty() {
        return Err(Error::BadRequest("organisasi name is required".into()));
    }
    if name != org.name && OrganisasiCommon::exists(&mut store, &name).await? {
        return Err(Error::Conflict("organisasi name already taken".into()));
    }
    OrganisasiCommon::update(
        &mut store,
        org.id,
        Update {
            name,
            description: data.description.trim().to_owned(),
        },
    )
    .await?;
    store.commit().await?;
    Ok(())
}

pub async fn get_organisasi<D>(db: &mut D, id: i32) -> Result<Organisasi, Error>
where
    D: OrganisasiCommon,
{
    OrganisasiCommon::get(db, id).await?.ok_or(Error::NotFound("organisasi not found".into()))
}

pub async fn query_organisasi<D>(db: &mut D, param: Query, pagination: Pagination) -> Result<(Vec<Organisasi>, i64), Error>
where
    D: OrganisasiCommon,
{
    let list = OrganisasiCommon::query(db, &param, pagination).await?;
    let total = OrganisasiCommon::count(db, &param).await?;
    Ok((list, total))
}

pub async fn subscription<D>(db: &mut D, uid: i32, now: DateTime<Utc>) -> Result<Subscription, Error>
where
    D: OrganisasiCommon,
{
    Ok(require_organisasi(db, uid).await?.subscription(now))
}
