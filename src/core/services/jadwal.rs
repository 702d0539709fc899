use log::info;

use crate::core::models::event::Event;
use crate::core::models::jadwal::{Data, JadwalCreate};
use crate::core::models::participant::ParticipantStatus;
use crate::core::ports::repository::{EventCommon, JadwalCommon, ParticipantCommon, TxStore};
use crate::core::schedule::{check_all, ConflictReport, DatedSlot, ScheduleBlock};
use crate::error::Error;

pub async fn add_block<T>(mut store: T, uid: i32, data: JadwalCreate) -> Result<i32, Error>
where
    T: TxStore,
{
    let data = Data::try_from(data)?;
    let id = JadwalCommon::insert(&mut store, uid, data).await?;
    store.commit().await?;
    info!("user {} added jadwal {}", uid, id);
    Ok(id)
}

async fn own_block<D>(db: &mut D, uid: i32, id: i32) -> Result<(), Error>
where
    D: JadwalCommon,
{
    match JadwalCommon::get(db, id).await? {
        Some(j) if j.user_id == uid => Ok(()),
        _ => Err(Error::NotFound("jadwal not found".into())),
    }
}

pub async fn update_block<T>(mut store: T, uid: i32, id: i32, data: JadwalCreate) -> Result<(), Error>
where
    T: TxStore,
{
    own_block(&mut store, uid, id).await?;
    JadwalCommon::update(&mut store, id, Data::try_from(data)?).await?;
    store.commit().await?;
    Ok(())
}

pub async fn delete_block<T>(mut store: T, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    own_block(&mut store, uid, id).await?;
    JadwalCommon::delete(&mut store, id).await?;
    store.commit().await?;
    Ok(())
}

pub async fn list_blocks<D>(db: &mut D, uid: i32) -> Result<Vec<ScheduleBlock>, Error>
where
    D: JadwalCommon,
{
    JadwalCommon::list(db, uid).await?.into_iter().map(ScheduleBlock::try_from).collect()
}

/// Dated slots of the events `uid` holds a live (PENDING or ACCEPTED) registration for.
pub(crate) async fn registered_slots<D>(db: &mut D, uid: i32) -> Result<Vec<DatedSlot>, Error>
where
    D: ParticipantCommon,
{
    let mut slots = Vec::new();
    for r in ParticipantCommon::registrations(db, uid).await? {
        if r.status.parse::<ParticipantStatus>()? != ParticipantStatus::Rejected {
            slots.push(r.slot()?);
        }
    }
    Ok(slots)
}

pub(crate) fn report_for(event: &Event, blocks: &[ScheduleBlock], slots: &[DatedSlot]) -> Result<ConflictReport, Error> {
    let others: Vec<DatedSlot> = slots.iter().filter(|s| s.event_id != event.id).cloned().collect();
    Ok(check_all(&event.occurrence()?, blocks, &others))
}

/// Checks `event` against the caller's weekly lectures and the other events they registered for.
pub async fn conflict_report<D>(db: &mut D, uid: i32, event: &Event) -> Result<ConflictReport, Error>
where
    D: JadwalCommon + ParticipantCommon,
{
    let blocks = list_blocks(db, uid).await?;
    let slots = registered_slots(db, uid).await?;
    report_for(event, &blocks, &slots)
}

pub async fn event_conflicts<D>(db: &mut D, uid: i32, event_id: i32) -> Result<ConflictReport, Error>
where
    D: EventCommon + JadwalCommon + ParticipantCommon,
{
    let event = EventCommon::get(db, event_id).await?.ok_or(Error::NotFound("event not found".into()))?;
    conflict_report(db, uid, &event).await
}
