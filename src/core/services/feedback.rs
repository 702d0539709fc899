use chrono::NaiveDateTime;
use log::info;

use crate::core::models::feedback::{FeedbackCreate, FeedbackSummary, FeedbackView, Insert};
use crate::core::models::participant::ParticipantStatus;
use crate::core::ports::repository::{EventCommon, FeedbackCommon, OrganisasiCommon, ParticipantCommon, TxStore};
use crate::core::services::event::viewable_event;
use crate::error::Error;

pub async fn submit<T>(mut store: T, uid: i32, event_id: i32, data: FeedbackCreate, now: NaiveDateTime) -> Result<i32, Error>
where
    T: TxStore,
{
    if !(1..=5).contains(&data.rating) {
        return Err(Error::BadRequest("rating must be between 1 and 5".into()));
    }
    let event = EventCommon::get(&mut store, event_id).await?.ok_or(Error::NotFound("event not found".into()))?;
    if !event.has_ended(now) {
        return Err(Error::BadRequest("feedback opens after the event ends".into()));
    }
    match ParticipantCommon::get(&mut store, event_id, uid).await? {
        Some(p) if p.status()? == ParticipantStatus::Accepted => {}
        _ => return Err(Error::BadRequest("only accepted participants can give feedback".into())),
    }
    if FeedbackCommon::exists(&mut store, event_id, uid).await? {
        return Err(Error::BadRequest("feedback already submitted".into()));
    }
    let id = FeedbackCommon::insert(
        &mut store,
        Insert {
            event_id,
            user_id: uid,
            rating: data.rating,
            comment: data.comment.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty()),
        },
    )
    .await?;
    store.commit().await?;
    info!("feedback {} for event {}", id, event_id);
    Ok(id)
}

pub fn summarize(list: Vec<FeedbackView>) -> FeedbackSummary {
    let average_rating = if list.is_empty() {
        None
    } else {
        Some(list.iter().map(|f| f.rating as f64).sum::<f64>() / list.len() as f64)
    };
    FeedbackSummary {
        average_rating,
        count: list.len(),
        list,
    }
}

pub async fn event_feedback<D>(db: &mut D, uid: i32, event_id: i32) -> Result<FeedbackSummary, Error>
where
    D: OrganisasiCommon + EventCommon + FeedbackCommon,
{
    viewable_event(db, uid, event_id).await?;
    Ok(summarize(FeedbackCommon::list(db, event_id).await?))
}
