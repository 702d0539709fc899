use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;

use crate::core::ai::{parse_chart_points, parse_recommendation_html, recommendation_prompt, report_prompt, report_title, Generator, Recommendation, Report};
use crate::core::models::event::{EventSuggestion, SharedSkills};
use crate::core::models::organisasi::Organisasi;
use crate::core::models::stats::OrganisasiStats;
use crate::core::ports::repository::{AspirasiCommon, EventCommon, JadwalCommon, OrganisasiCommon, ParticipantCommon, StatsCommon};
use crate::core::services::jadwal::{list_blocks, registered_slots, report_for};
use crate::core::services::organisasi::require_organisasi;
use crate::error::Error;

const RECENT_ASPIRASI: i64 = 10;

async fn pro_organisasi<D>(db: &mut D, uid: i32, now: DateTime<Utc>) -> Result<Organisasi, Error>
where
    D: OrganisasiCommon,
{
    let org = require_organisasi(db, uid).await?;
    if !org.is_pro(now) {
        return Err(Error::Unauthorized("an active PRO subscription is required".into()));
    }
    Ok(org)
}

pub async fn organisasi_stats<D>(db: &mut D, org: &Organisasi) -> Result<OrganisasiStats, Error>
where
    D: StatsCommon + AspirasiCommon,
{
    Ok(OrganisasiStats {
        organisasi_name: org.name.clone(),
        events: StatsCommon::event_stats(db, org.id).await?,
        aspirasi_by_status: AspirasiCommon::count_by_status(db, org.id).await?,
        recent_aspirasi: AspirasiCommon::recent_titles(db, org.id, RECENT_ASPIRASI).await?,
    })
}

pub async fn ai_recommendation<D, G>(db: &mut D, generator: &G, uid: i32, now: DateTime<Utc>) -> Result<Recommendation, Error>
where
    D: OrganisasiCommon + StatsCommon + AspirasiCommon,
    G: Generator,
{
    let org = pro_organisasi(db, uid, now).await?;
    let stats = organisasi_stats(db, &org).await?;
    let text = generator.generate(&recommendation_prompt(&stats)?).await?;
    let html = parse_recommendation_html(&text).map_err(|e| {
        warn!("unusable recommendation for organisasi {}: {}", org.id, e);
        e
    })?;
    Ok(Recommendation { html })
}

pub async fn ai_report<D, G>(db: &mut D, generator: &G, uid: i32, now: DateTime<Utc>) -> Result<Report, Error>
where
    D: OrganisasiCommon + StatsCommon + AspirasiCommon,
    G: Generator,
{
    let org = pro_organisasi(db, uid, now).await?;
    let stats = organisasi_stats(db, &org).await?;
    let text = generator.generate(&report_prompt(&stats)?).await?;
    let points = parse_chart_points(&text).map_err(|e| {
        warn!("unusable report for organisasi {}: {}", org.id, e);
        e
    })?;
    Ok(Report {
        title: report_title(&stats),
        points,
    })
}

/// Upcoming events ranked by shared interest skills, then by start. Already registered events are skipped.
pub async fn event_recommendations<D>(db: &mut D, uid: i32, now: NaiveDateTime, limit: usize) -> Result<Vec<EventSuggestion>, Error>
where
    D: EventCommon + ParticipantCommon + JadwalCommon,
{
    let ranked = EventCommon::rank_by_interest(db, uid, now, limit as i64).await?;
    let blocks = list_blocks(db, uid).await?;
    let slots = registered_slots(db, uid).await?;
    let mut suggestions = Vec::with_capacity(ranked.len());
    for SharedSkills { event_id, shared } in ranked {
        let Some(event) = EventCommon::get(db, event_id).await? else {
            continue;
        };
        suggestions.push(EventSuggestion {
            report: report_for(&event, &blocks, &slots)?,
            shared_skills: shared as usize,
            event,
        });
    }
    Ok(suggestions)
}
