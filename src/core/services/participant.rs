use chrono::NaiveDateTime;
use log::info;

use crate::core::models::event::Registration;
use crate::core::models::participant::{ParticipantStatus, ParticipantView, RegisterOutcome, RegisterRequest};
use crate::core::ports::repository::{EventCommon, OrganisasiCommon, ParticipantCommon, TxStore};
use crate::core::services::event::{owned_event, viewable_event};
use crate::core::services::jadwal::conflict_report;
use crate::error::Error;

async fn ensure_capacity<D>(db: &mut D, event_id: i32, capacity: Option<i32>) -> Result<(), Error>
where
    D: ParticipantCommon,
{
    if let Some(c) = capacity {
        if ParticipantCommon::count(db, event_id, ParticipantStatus::Accepted).await? >= c as i64 {
            return Err(Error::BadRequest("event capacity reached".into()));
        }
    }
    Ok(())
}

/// Registers `uid` for an event as PENDING.
///
/// The registration is refused when the event overlaps the student's lectures or other
/// registrations, unless `force` is set. The conflict report is returned either way.
pub async fn register<T>(mut store: T, uid: i32, event_id: i32, req: RegisterRequest, now: NaiveDateTime) -> Result<RegisterOutcome, Error>
where
    T: TxStore,
{
    let event = EventCommon::get_for_update(&mut store, event_id).await?.ok_or(Error::NotFound("event not found".into()))?;
    if event.has_started(now) {
        return Err(Error::BadRequest("event has already started".into()));
    }
    if ParticipantCommon::get(&mut store, event_id, uid).await?.is_some() {
        return Err(Error::BadRequest("already registered for this event".into()));
    }
    ensure_capacity(&mut store, event_id, event.capacity).await?;
    let report = conflict_report(&mut store, uid, &event).await?;
    if report.has_conflict && !req.force {
        return Err(Error::BadRequest(report.message));
    }
    let id = ParticipantCommon::insert(&mut store, event_id, uid).await?;
    store.commit().await?;
    info!("user {} registered for event {} (conflict: {})", uid, event_id, report.has_conflict);
    Ok(RegisterOutcome {
        id,
        status: ParticipantStatus::Pending,
        report,
    })
}

pub async fn cancel<T>(mut store: T, uid: i32, event_id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    let participant = ParticipantCommon::get(&mut store, event_id, uid).await?.ok_or(Error::NotFound("registration not found".into()))?;
    if participant.status()? != ParticipantStatus::Pending {
        return Err(Error::BadRequest("only pending registrations can be cancelled".into()));
    }
    ParticipantCommon::delete(&mut store, participant.id).await?;
    store.commit().await?;
    info!("user {} cancelled registration for event {}", uid, event_id);
    Ok(())
}

pub async fn list_participants<D>(db: &mut D, uid: i32, event_id: i32) -> Result<Vec<ParticipantView>, Error>
where
    D: OrganisasiCommon + EventCommon + ParticipantCommon,
{
    viewable_event(db, uid, event_id).await?;
    ParticipantCommon::list_by_event(db, event_id).await
}

pub async fn set_status<T>(mut store: T, uid: i32, event_id: i32, participant_id: i32, status: ParticipantStatus) -> Result<(), Error>
where
    T: TxStore,
{
    let (_, event) = owned_event(&mut store, uid, event_id).await?;
    let participant = match ParticipantCommon::get_by_id(&mut store, participant_id).await? {
        Some(p) if p.event_id == event_id => p,
        _ => return Err(Error::NotFound("participant not found".into())),
    };
    if status == ParticipantStatus::Pending {
        return Err(Error::BadRequest("status must be ACCEPTED or REJECTED".into()));
    }
    let current = participant.status()?;
    if current == status {
        return Ok(());
    }
    if status == ParticipantStatus::Accepted {
        ensure_capacity(&mut store, event_id, event.capacity).await?;
    }
    ParticipantCommon::update_status(&mut store, participant_id, status).await?;
    store.commit().await?;
    info!("participant {} of event {} is now {}", participant_id, event_id, status.as_str());
    Ok(())
}

pub async fn my_registrations<D>(db: &mut D, uid: i32) -> Result<Vec<Registration>, Error>
where
    D: ParticipantCommon,
{
    ParticipantCommon::registrations(db, uid).await
}
