use chrono::{DateTime, Utc};
use log::info;

use crate::core::models::aspirasi::{Aspirasi, AspirasiCreate, AspirasiStatus, AspirasiView, Insert, Query, Respond};
use crate::core::models::common::Pagination;
use crate::core::ports::repository::{AspirasiCommon, OrganisasiCommon, TxStore};
use crate::core::services::organisasi::require_organisasi;
use crate::error::Error;

pub async fn submit<T>(mut store: T, uid: i32, organisasi_id: i32, data: AspirasiCreate) -> Result<i32, Error>
where
    T: TxStore,
{
    let title = data.title.trim().to_owned();
    let content = data.content.trim().to_owned();
    if title.is_empty() || content.is_empty() {
        return Err(Error::BadRequest("title and content are required".into()));
    }
    if OrganisasiCommon::get(&mut store, organisasi_id).await?.is_none() {
        return Err(Error::NotFound("organisasi not found".into()));
    }
    let id = AspirasiCommon::insert(
        &mut store,
        Insert {
            user_id: uid,
            organisasi_id,
            title,
            content,
            anonymous: data.anonymous,
        },
    )
    .await?;
    store.commit().await?;
    info!("aspirasi {} submitted to organisasi {}", id, organisasi_id);
    Ok(id)
}

pub async fn list_for_organisasi<D>(db: &mut D, uid: i32, status: Option<AspirasiStatus>, pagination: Pagination) -> Result<(Vec<AspirasiView>, i64), Error>
where
    D: OrganisasiCommon + AspirasiCommon,
{
    let org = require_organisasi(db, uid).await?;
    let param = Query {
        organisasi_id: Some(org.id),
        status,
        ..Default::default()
    };
    let list = AspirasiCommon::query(db, &param, pagination).await?;
    let total = AspirasiCommon::count(db, &param).await?;
    Ok((list, total))
}

pub async fn my_aspirasi<D>(db: &mut D, uid: i32, pagination: Pagination) -> Result<(Vec<AspirasiView>, i64), Error>
where
    D: AspirasiCommon,
{
    let param = Query {
        user_id: Some(uid),
        ..Default::default()
    };
    let list = AspirasiCommon::query(db, &param, pagination).await?;
    let total = AspirasiCommon::count(db, &param).await?;
    Ok((list, total))
}

async fn addressed_to_caller<D>(db: &mut D, uid: i32, id: i32) -> Result<Aspirasi, Error>
where
    D: OrganisasiCommon + AspirasiCommon,
{
    let org = require_organisasi(db, uid).await?;
    match AspirasiCommon::get(db, id).await? {
        Some(a) if a.organisasi_id == org.id => Ok(a),
        _ => Err(Error::NotFound("aspirasi not found".into())),
    }
}

fn transition(aspirasi: &Aspirasi, next: AspirasiStatus) -> Result<(), Error> {
    let current = aspirasi.status()?;
    if !current.can_become(next) {
        return Err(Error::BadRequest(format!("aspirasi cannot move from {} to {}", current.as_str(), next.as_str())));
    }
    Ok(())
}

pub async fn mark_reviewed<T>(mut store: T, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    let aspirasi = addressed_to_caller(&mut store, uid, id).await?;
    transition(&aspirasi, AspirasiStatus::Reviewed)?;
    AspirasiCommon::update_status(&mut store, id, AspirasiStatus::Reviewed, None, None).await?;
    store.commit().await?;
    Ok(())
}

pub async fn respond<T>(mut store: T, uid: i32, id: i32, Respond { response }: Respond, now: DateTime<Utc>) -> Result<(), Error>
where
    T: TxStore,
{
    let response = response.trim().to_owned();
    if response.is_empty() {
        return Err(Error::BadRequest("response is required".into()));
    }
    let aspirasi = addressed_to_caller(&mut store, uid, id).await?;
    transition(&aspirasi, AspirasiStatus::Responded)?;
    AspirasiCommon::update_status(&mut store, id, AspirasiStatus::Responded, Some(response), Some(now)).await?;
    store.commit().await?;
    info!("aspirasi {} responded", id);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::services::memory::MemoryStore;

    fn aspirasi(anonymous: bool) -> AspirasiCreate {
        AspirasiCreate {
            title: "Jam buka perpustakaan".into(),
            content: "Mohon diperpanjang sampai malam".into(),
            anonymous,
        }
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let db = MemoryStore::default();
        let (owner, org) = db.organisasi("BEM");
        let uid = db.student("Budi");
        let open = submit(db.clone(), uid, org, aspirasi(false)).await.unwrap();
        let hidden = submit(db.clone(), uid, org, aspirasi(true)).await.unwrap();
        assert!(matches!(submit(db.clone(), uid, 999, aspirasi(false)).await, Err(Error::NotFound(_))));
        let blank = AspirasiCreate { title: " ".into(), content: "x".into(), anonymous: false };
        assert!(matches!(submit(db.clone(), uid, org, blank).await, Err(Error::BadRequest(_))));

        let (list, total) = list_for_organisasi(&mut db.clone(), owner, None, Pagination::new(10, None)).await.unwrap();
        assert_eq!(total, 2);
        let named = list.iter().find(|a| a.id == open).unwrap();
        assert_eq!(named.sender_name.as_deref(), Some("Budi"));
        let anon = list.iter().find(|a| a.id == hidden).unwrap();
        assert_eq!(anon.sender_name, None);
        assert_eq!(anon.organisasi_name, "BEM");

        let (mine, total) = my_aspirasi(&mut db.clone(), uid, Pagination::new(10, None)).await.unwrap();
        assert_eq!(total, 2);
        let own_anon = mine.iter().find(|a| a.id == hidden).unwrap();
        assert!(own_anon.anonymous);
        assert_eq!(own_anon.sender_name.as_deref(), Some("Budi"));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = MemoryStore::default();
        let (owner, org) = db.organisasi("BEM");
        let (stranger, _) = db.organisasi("HMTI");
        let uid = db.student("Budi");
        let a = submit(db.clone(), uid, org, aspirasi(false)).await.unwrap();
        let b = submit(db.clone(), uid, org, aspirasi(false)).await.unwrap();

        assert!(matches!(mark_reviewed(db.clone(), stranger, a).await, Err(Error::NotFound(_))));
        mark_reviewed(db.clone(), owner, a).await.unwrap();
        assert!(matches!(mark_reviewed(db.clone(), owner, a).await, Err(Error::BadRequest(_))));
        let reply = || Respond { response: "Akan kami sampaikan".into() };
        respond(db.clone(), owner, a, reply(), Utc::now()).await.unwrap();
        respond(db.clone(), owner, b, reply(), Utc::now()).await.unwrap();
        assert!(matches!(respond(db.clone(), owner, b, reply(), Utc::now()).await, Err(Error::BadRequest(_))));
        assert!(matches!(mark_reviewed(db.clone(), owner, b).await, Err(Error::BadRequest(_))));
        let empty = Respond { response: "  ".into() };
        assert!(matches!(respond(db.clone(), owner, a, empty, Utc::now()).await, Err(Error::BadRequest(_))));

        let (responded, total) = list_for_organisasi(&mut db.clone(), owner, Some(AspirasiStatus::Responded), Pagination::new(10, None)).await.unwrap();
        assert_eq!(total, 2);
        assert!(responded.iter().all(|a| a.response.as_deref() == Some("Akan kami sampaikan") && a.responded_at.is_some()));
    }
}
