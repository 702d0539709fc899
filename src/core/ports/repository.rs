use chrono::{DateTime, NaiveDateTime, Utc};

use crate::core::models::{
    aspirasi::{Aspirasi, AspirasiStatus, AspirasiView, Insert as AspirasiInsert, Query as AspirasiQuery},
    common::{Count, Pagination},
    event::{Event, EventSkill, Insert as EventInsert, Query as EventQuery, Registration, SharedSkills, Update as EventUpdate},
    feedback::{FeedbackView, Insert as FeedbackInsert},
    jadwal::{Data as JadwalData, JadwalKuliah},
    organisasi::{Insert as OrganisasiInsert, Organisasi, Plan, Query as OrganisasiQuery, Update as OrganisasiUpdate},
    participant::{Participant, ParticipantStatus, ParticipantView},
    payment::{Insert as PaymentInsert, Payment, Query as PaymentQuery, StatusUpdate as PaymentStatusUpdate},
    skill::Skill,
    stats::EventStat,
    user::{Insert as UserInsert, User},
};
use crate::error::Error;

pub trait UserCommon {
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
    async fn set_skills(&mut self, id: i32, skill_ids: &[i32]) -> Result<(), Error>;
    async fn skills(&mut self, id: i32) -> Result<Vec<Skill>, Error>;
    async fn count_by_role(&mut self) -> Result<Vec<Count>, Error>;
}

pub trait OrganisasiCommon {
    async fn insert(&mut self, data: OrganisasiInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: OrganisasiUpdate) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Organisasi>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<Organisasi>, Error>;
    async fn get_by_user(&mut self, uid: i32) -> Result<Option<Organisasi>, Error>;
    async fn exists(&mut self, name: &str) -> Result<bool, Error>;
    async fn query(&mut self, param: &OrganisasiQuery, pagination: Pagination) -> Result<Vec<Organisasi>, Error>;
    async fn count(&mut self, param: &OrganisasiQuery) -> Result<i64, Error>;
    async fn set_plan(&mut self, id: i32, plan: Plan, expires_at: Option<DateTime<Utc>>) -> Result<(), Error>;
    async fn count_by_plan(&mut self) -> Result<Vec<Count>, Error>;
}

pub trait EventCommon {
    async fn insert(&mut self, data: EventInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: EventUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Event>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<Event>, Error>;
    async fn query(&mut self, param: &EventQuery, pagination: Pagination) -> Result<Vec<Event>, Error>;
    async fn count(&mut self, param: &EventQuery) -> Result<i64, Error>;
    async fn set_skills(&mut self, id: i32, skill_ids: &[i32]) -> Result<(), Error>;
    async fn skills(&mut self, ids: &[i32]) -> Result<Vec<EventSkill>, Error>;
    /// Events not yet started at `now` and not registered by the user, most shared interest skills first.
    async fn rank_by_interest(&mut self, user_id: i32, now: NaiveDateTime, limit: i64) -> Result<Vec<SharedSkills>, Error>;
    async fn count_all(&mut self) -> Result<i64, Error>;
}

pub trait ParticipantCommon {
    async fn insert(&mut self, event_id: i32, user_id: i32) -> Result<i32, Error>;
    async fn get(&mut self, event_id: i32, user_id: i32) -> Result<Option<Participant>, Error>;
    async fn get_by_id(&mut self, id: i32) -> Result<Option<Participant>, Error>;
    async fn update_status(&mut self, id: i32, status: ParticipantStatus) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn count(&mut self, event_id: i32, status: ParticipantStatus) -> Result<i64, Error>;
    async fn list_by_event(&mut self, event_id: i32) -> Result<Vec<ParticipantView>, Error>;
    async fn registrations(&mut self, user_id: i32) -> Result<Vec<Registration>, Error>;
    async fn count_by_status(&mut self) -> Result<Vec<Count>, Error>;
}

pub trait JadwalCommon {
    async fn insert(&mut self, user_id: i32, data: JadwalData) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: JadwalData) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Option<JadwalKuliah>, Error>;
    async fn list(&mut self, user_id: i32) -> Result<Vec<JadwalKuliah>, Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait AspirasiCommon {
    async fn insert(&mut self, data: AspirasiInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Aspirasi>, Error>;
    async fn query(&mut self, param: &AspirasiQuery, pagination: Pagination) -> Result<Vec<AspirasiView>, Error>;
    async fn count(&mut self, param: &AspirasiQuery) -> Result<i64, Error>;
    async fn update_status(&mut self, id: i32, status: AspirasiStatus, response: Option<String>, responded_at: Option<DateTime<Utc>>) -> Result<(), Error>;
    async fn count_by_status(&mut self, organisasi_id: i32) -> Result<Vec<Count>, Error>;
    async fn recent_titles(&mut self, organisasi_id: i32, limit: i64) -> Result<Vec<String>, Error>;
}

pub trait FeedbackCommon {
    async fn insert(&mut self, data: FeedbackInsert) -> Result<i32, Error>;
    async fn exists(&mut self, event_id: i32, user_id: i32) -> Result<bool, Error>;
    async fn list(&mut self, event_id: i32) -> Result<Vec<FeedbackView>, Error>;
}

pub trait SkillCommon {
    async fn insert(&mut self, name: &str) -> Result<i32, Error>;
    async fn exists(&mut self, name: &str) -> Result<bool, Error>;
    async fn list(&mut self) -> Result<Vec<Skill>, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
    async fn count_ids(&mut self, ids: &[i32]) -> Result<i64, Error>;
}

pub trait PaymentCommon {
    async fn insert(&mut self, data: PaymentInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Payment>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<Payment>, Error>;
    async fn get_by_order_for_update(&mut self, order_id: &str) -> Result<Option<Payment>, Error>;
    async fn set_redirect_url(&mut self, id: i32, url: &str) -> Result<(), Error>;
    async fn update_status(&mut self, id: i32, update: PaymentStatusUpdate) -> Result<(), Error>;
    async fn query(&mut self, param: &PaymentQuery, pagination: Pagination) -> Result<Vec<Payment>, Error>;
    async fn count(&mut self, param: &PaymentQuery) -> Result<i64, Error>;
    async fn count_by_status(&mut self) -> Result<Vec<Count>, Error>;
    async fn confirmed_revenue(&mut self) -> Result<i64, Error>;
}

pub trait StatsCommon {
    async fn event_stats(&mut self, organisasi_id: i32) -> Result<Vec<EventStat>, Error>;
}

pub trait Common: UserCommon + OrganisasiCommon + EventCommon + ParticipantCommon + JadwalCommon + AspirasiCommon + FeedbackCommon + SkillCommon + PaymentCommon + StatsCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

/// Opens transactions on demand, for services that must not hold one across an outbound call.
pub trait Begin {
    type Tx: TxStore;
    async fn begin(&self) -> Result<Self::Tx, Error>;
}
