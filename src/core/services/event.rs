use chrono::NaiveDate;
use log::info;

use crate::core::models::common::Pagination;
use crate::core::models::event::{Event, EventCreate, EventDetail, Insert, Query, Update};
use crate::core::models::organisasi::Organisasi;
use crate::core::models::participant::ParticipantStatus;
use crate::core::models::skill::Skill;
use crate::core::ports::repository::{EventCommon, OrganisasiCommon, ParticipantCommon, SkillCommon, TxStore};
use crate::core::schedule::TimeRange;
use crate::core::services::organisasi::require_organisasi;
use crate::core::services::skill::check_skill_ids;
use crate::error::Error;

fn validate(data: EventCreate) -> Result<(Update, Vec<i32>), Error> {
    let title = data.title.trim().to_owned();
    let location = data.location.trim().to_owned();
    if title.is_empty() {
        return Err(Error::BadRequest("event title is required".into()));
    }
    if location.is_empty() {
        return Err(Error::BadRequest("event location is required".into()));
    }
    if let Some(c) = data.capacity {
        if c <= 0 {
            return Err(Error::BadRequest("capacity must be greater than 0".into()));
        }
    }
    let range = TimeRange::parse(&data.start_time, &data.end_time)?;
    Ok((
        Update {
            title,
            description: data.description.trim().to_owned(),
            date: data.date,
            start_time: range.start.to_naive(),
            end_time: range.end.to_naive(),
            location,
            capacity: data.capacity,
        },
        data.skill_ids,
    ))
}

fn check_owner(org: &Organisasi, event: Option<Event>) -> Result<Event, Error> {
    let event = event.ok_or(Error::NotFound("event not found".into()))?;
    if event.organisasi_id != org.id {
        return Err(Error::Unauthorized("event belongs to another organisasi".into()));
    }
    Ok(event)
}

/// Loads and row-locks an event for modification by the organisasi behind `uid`.
pub(crate) async fn owned_event<D>(db: &mut D, uid: i32, id: i32) -> Result<(Organisasi, Event), Error>
where
    D: OrganisasiCommon + EventCommon,
{
    let org = require_organisasi(db, uid).await?;
    let event = check_owner(&org, EventCommon::get_for_update(db, id).await?)?;
    Ok((org, event))
}

/// Read-only ownership check, no row lock.
pub(crate) async fn viewable_event<D>(db: &mut D, uid: i32, id: i32) -> Result<Event, Error>
where
    D: OrganisasiCommon + EventCommon,
{
    let org = require_organisasi(db, uid).await?;
    check_owner(&org, EventCommon::get(db, id).await?)
}

pub async fn create_event<T>(mut store: T, uid: i32, data: EventCreate, today: NaiveDate) -> Result<i32, Error>
where
    T: TxStore,
{
    let org = require_organisasi(&mut store, uid).await?;
    let (data, skill_ids) = validate(data)?;
    if data.date < today {
        return Err(Error::BadRequest("event date is in the past".into()));
    }
    let skill_ids = check_skill_ids(&mut store, &skill_ids).await?;
    let id = EventCommon::insert(&mut store, Insert { organisasi_id: org.id, data }).await?;
    EventCommon::set_skills(&mut store, id, &skill_ids).await?;
    store.commit().await?;
    info!("organisasi {} created event {}", org.id, id);
    Ok(id)
}

pub async fn update_event<T>(mut store: T, uid: i32, id: i32, data: EventCreate) -> Result<(), Error>
where
    T: TxStore,
{
    let _ = owned_event(&mut store, uid, id).await?;
    let (data, skill_ids) = validate(data)?;
    if let Some(c) = data.capacity {
        if ParticipantCommon::count(&mut store, id, ParticipantStatus::Accepted).await? > c as i64 {
            return Err(Error::BadRequest("capacity is below the number of accepted participants".into()));
        }
    }
    let skill_ids = check_skill_ids(&mut store, &skill_ids).await?;
    EventCommon::update(&mut store, id, data).await?;
    EventCommon::set_skills(&mut store, id, &skill_ids).await?;
    store.commit().await?;
    info!("event {} updated", id);
    Ok(())
}

pub async fn delete_event<T>(mut store: T, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    let _ = owned_event(&mut store, uid, id).await?;
    EventCommon::delete(&mut store, id).await?;
    store.commit().await?;
    info!("event {} deleted", id);
    Ok(())
}

pub async fn query_events<D>(db: &mut D, mut param: Query, pagination: Pagination, today: NaiveDate) -> Result<(Vec<Event>, i64), Error>
where
    D: EventCommon,
{
    if param.upcoming {
        param.date_from = Some(param.date_from.map_or(today, |d| d.max(today)));
    }
    let list = EventCommon::query(db, &param, pagination).await?;
    let total = EventCommon::count(db, &param).await?;
    Ok((list, total))
}

pub async fn event_detail<D>(db: &mut D, id: i32) -> Result<EventDetail, Error>
where
    D: EventCommon + OrganisasiCommon + ParticipantCommon,
{
    let event = EventCommon::get(db, id).await?.ok_or(Error::NotFound("event not found".into()))?;
    let org = OrganisasiCommon::get(db, event.organisasi_id).await?.ok_or(Error::NotFound("organisasi not found".into()))?;
    let skills = EventCommon::skills(db, &[id])
        .await?
        .into_iter()
        .map(|s| Skill { id: s.skill_id, name: s.name })
        .collect();
    Ok(EventDetail {
        accepted_count: ParticipantCommon::count(db, id, ParticipantStatus::Accepted).await?,
        pending_count: ParticipantCommon::count(db, id, ParticipantStatus::Pending).await?,
        organisasi_name: org.name,
        skills,
        event,
    })
}
