//! In-memory repository used by the service tests, with fake AI and payment adapters.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::core::ai::Generator;
use crate::core::models::{
    aspirasi::{Aspirasi, AspirasiStatus, AspirasiView, Insert as AspirasiInsert, Query as AspirasiQuery},
    common::{Count, Pagination},
    event::{Event, EventSkill, Insert as EventInsert, Query as EventQuery, Registration, SharedSkills, Update as EventUpdate},
    feedback::{FeedbackView, Insert as FeedbackInsert},
    jadwal::{Data as JadwalData, JadwalKuliah},
    organisasi::{Insert as OrganisasiInsert, Organisasi, Plan, Query as OrganisasiQuery, Update as OrganisasiUpdate},
    participant::{Participant, ParticipantStatus, ParticipantView},
    payment::{Insert as PaymentInsert, Payment, PaymentStatus, Query as PaymentQuery, StatusUpdate as PaymentStatusUpdate},
    skill::Skill,
    stats::EventStat,
    user::{Insert as UserInsert, Role, User},
};
use crate::core::payment::{PaymentGateway, Transaction, TransactionRequest};
use crate::core::ports::repository::{
    AspirasiCommon, Begin, Common, EventCommon, FeedbackCommon, JadwalCommon, OrganisasiCommon, ParticipantCommon, PaymentCommon, SkillCommon, StatsCommon, Store, TxStore, UserCommon,
};
use crate::error::Error;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hm(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn counts(keys: impl Iterator<Item = String>) -> Vec<Count> {
    let mut m: BTreeMap<String, i64> = BTreeMap::new();
    for k in keys {
        *m.entry(k).or_default() += 1;
    }
    m.into_iter().map(|(key, total)| Count { key, total }).collect()
}

fn page<T>(items: Vec<T>, pagination: Pagination) -> Vec<T> {
    items.into_iter().skip(pagination.offset() as usize).take(pagination.limit as usize).collect()
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    needle.as_ref().map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

#[derive(Debug, Clone)]
struct FeedbackRow {
    id: i32,
    data: FeedbackInsert,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    seq: i32,
    users: Vec<User>,
    user_skills: Vec<(i32, i32)>,
    organisasi: Vec<Organisasi>,
    skills: Vec<Skill>,
    events: Vec<Event>,
    event_skills: Vec<(i32, i32)>,
    participants: Vec<Participant>,
    jadwal: Vec<JadwalKuliah>,
    aspirasi: Vec<Aspirasi>,
    feedback: Vec<FeedbackRow>,
    payments: Vec<Payment>,
    locked_events: Vec<i32>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.seq += 1;
        self.seq
    }

    fn user(&self, id: i32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn filtered_events(&self, param: &EventQuery) -> Vec<Event> {
        let mut list: Vec<Event> = self
            .events
            .iter()
            .filter(|e| param.organisasi_id.map_or(true, |o| e.organisasi_id == o))
            .filter(|e| param.skill_id.map_or(true, |s| self.event_skills.contains(&(e.id, s))))
            .filter(|e| param.date_from.map_or(true, |d| e.date >= d))
            .filter(|e| contains_ci(&e.title, &param.title_like))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.start_time.cmp(&b.start_time)).then(a.id.cmp(&b.id)));
        list
    }

    fn aspirasi_views(&self, param: &AspirasiQuery) -> Vec<AspirasiView> {
        let mut list: Vec<AspirasiView> = self
            .aspirasi
            .iter()
            .filter(|a| param.organisasi_id.map_or(true, |o| a.organisasi_id == o))
            .filter(|a| param.user_id.map_or(true, |u| a.user_id == u))
            .filter(|a| param.status.map_or(true, |s| a.status == s.as_str()))
            .map(|a| AspirasiView {
                id: a.id,
                organisasi_id: a.organisasi_id,
                organisasi_name: self.organisasi.iter().find(|o| o.id == a.organisasi_id).map(|o| o.name.clone()).unwrap_or_default(),
                sender_name: if a.anonymous && param.user_id != Some(a.user_id) { None } else { self.user(a.user_id).map(|u| u.name.clone()) },
                title: a.title.clone(),
                content: a.content.clone(),
                anonymous: a.anonymous,
                status: a.status.clone(),
                response: a.response.clone(),
                created_at: a.created_at,
                responded_at: a.responded_at,
            })
            .collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        list
    }

    fn filtered_payments(&self, param: &PaymentQuery) -> Vec<Payment> {
        let mut list: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| param.organisasi_id.map_or(true, |o| p.organisasi_id == o))
            .filter(|p| param.status.map_or(true, |s| p.status == s.as_str()))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        list
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<State>>,
}

impl MemoryStore {
    fn user_with_role(&self, name: &str, role: Role) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.users.push(User {
            id,
            name: name.into(),
            email: format!("{}-{}@kampus.ac.id", name.to_lowercase().replace(' ', "."), id),
            nim: None,
            password: String::new(),
            salt: String::new(),
            role: role.as_str().into(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn student(&self, name: &str) -> i32 {
        self.user_with_role(name, Role::Student)
    }

    /// Returns the account id and the organisasi id.
    pub fn organisasi(&self, name: &str) -> (i32, i32) {
        let uid = self.user_with_role(name, Role::Organisasi);
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.organisasi.push(Organisasi {
            id,
            user_id: uid,
            name: name.into(),
            description: String::new(),
            plan: Plan::Free.as_str().into(),
            plan_expires_at: None,
            created_at: Utc::now(),
        });
        (uid, id)
    }

    pub fn set_pro(&self, organisasi_id: i32, expires_at: DateTime<Utc>) {
        let mut s = self.state.borrow_mut();
        let org = s.organisasi.iter_mut().find(|o| o.id == organisasi_id).unwrap();
        org.plan = Plan::Pro.as_str().into();
        org.plan_expires_at = Some(expires_at);
    }

    pub fn event(&self, organisasi_id: i32, day: NaiveDate, start: &str, end: &str, capacity: Option<i32>) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.events.push(Event {
            id,
            organisasi_id,
            title: format!("Event {}", id),
            description: String::new(),
            date: day,
            start_time: hm(start),
            end_time: hm(end),
            location: "Aula".into(),
            capacity,
            created_at: Utc::now(),
        });
        id
    }

    pub fn participant(&self, event_id: i32, user_id: i32, status: ParticipantStatus) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.participants.push(Participant {
            id,
            event_id,
            user_id,
            status: status.as_str().into(),
            registered_at: Utc::now(),
        });
        id
    }

    pub fn skill(&self, name: &str) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.skills.push(Skill { id, name: name.into() });
        id
    }

    pub fn interest(&self, user_id: i32, skill_id: i32) {
        self.state.borrow_mut().user_skills.push((user_id, skill_id));
    }

    pub fn event_skill(&self, event_id: i32, skill_id: i32) {
        self.state.borrow_mut().event_skills.push((event_id, skill_id));
    }

    /// Event ids passed to `get_for_update`, in call order.
    pub fn locked_events(&self) -> Vec<i32> {
        self.state.borrow().locked_events.clone()
    }
}

impl UserCommon for MemoryStore {
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.users.push(User {
            id,
            name: data.name,
            email: data.email,
            nim: data.nim,
            password: data.password,
            salt: data.salt,
            role: data.role.as_str().into(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.state.borrow().user(id).cloned())
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.state.borrow().users.iter().find(|u| u.email == email).cloned())
    }

    async fn set_skills(&mut self, id: i32, skill_ids: &[i32]) -> Result<(), Error> {
        let mut s = self.state.borrow_mut();
        s.user_skills.retain(|(u, _)| *u != id);
        s.user_skills.extend(skill_ids.iter().map(|sk| (id, *sk)));
        Ok(())
    }

    async fn skills(&mut self, id: i32) -> Result<Vec<Skill>, Error> {
        let s = self.state.borrow();
        let mut list: Vec<Skill> = s.skills.iter().filter(|sk| s.user_skills.contains(&(id, sk.id))).cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn count_by_role(&mut self) -> Result<Vec<Count>, Error> {
        Ok(counts(self.state.borrow().users.iter().map(|u| u.role.clone())))
    }
}

impl OrganisasiCommon for MemoryStore {
    async fn insert(&mut self, data: OrganisasiInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.organisasi.push(Organisasi {
            id,
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            plan: Plan::Free.as_str().into(),
            plan_expires_at: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: OrganisasiUpdate) -> Result<(), Error> {
        if let Some(o) = self.state.borrow_mut().organisasi.iter_mut().find(|o| o.id == id) {
            o.name = data.name;
            o.description = data.description;
        }
        Ok(())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Organisasi>, Error> {
        Ok(self.state.borrow().organisasi.iter().find(|o| o.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Organisasi>, Error> {
        OrganisasiCommon::get(self, id).await
    }

    async fn get_by_user(&mut self, uid: i32) -> Result<Option<Organisasi>, Error> {
        Ok(self.state.borrow().organisasi.iter().find(|o| o.user_id == uid).cloned())
    }

    async fn exists(&mut self, name: &str) -> Result<bool, Error> {
        Ok(self.state.borrow().organisasi.iter().any(|o| o.name == name))
    }

    async fn query(&mut self, param: &OrganisasiQuery, pagination: Pagination) -> Result<Vec<Organisasi>, Error> {
        let list = self.state.borrow().organisasi.iter().filter(|o| contains_ci(&o.name, &param.name_like)).cloned().collect();
        Ok(page(list, pagination))
    }

    async fn count(&mut self, param: &OrganisasiQuery) -> Result<i64, Error> {
        Ok(self.state.borrow().organisasi.iter().filter(|o| contains_ci(&o.name, &param.name_like)).count() as i64)
    }

    async fn set_plan(&mut self, id: i32, plan: Plan, expires_at: Option<DateTime<Utc>>) -> Result<(), Error> {
        if let Some(o) = self.state.borrow_mut().organisasi.iter_mut().find(|o| o.id == id) {
            o.plan = plan.as_str().into();
            o.plan_expires_at = expires_at;
        }
        Ok(())
    }

    async fn count_by_plan(&mut self) -> Result<Vec<Count>, Error> {
        let now = Utc::now();
        Ok(counts(self.state.borrow().organisasi.iter().map(|o| o.subscription(now).plan.as_str().to_owned())))
    }
}

impl EventCommon for MemoryStore {
    async fn insert(&mut self, data: EventInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        let d = data.data;
        s.events.push(Event {
            id,
            organisasi_id: data.organisasi_id,
            title: d.title,
            description: d.description,
            date: d.date,
            start_time: d.start_time,
            end_time: d.end_time,
            location: d.location,
            capacity: d.capacity,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update(&mut self, id: i32, d: EventUpdate) -> Result<(), Error> {
        if let Some(e) = self.state.borrow_mut().events.iter_mut().find(|e| e.id == id) {
            e.title = d.title;
            e.description = d.description;
            e.date = d.date;
            e.start_time = d.start_time;
            e.end_time = d.end_time;
            e.location = d.location;
            e.capacity = d.capacity;
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let mut s = self.state.borrow_mut();
        s.events.retain(|e| e.id != id);
        s.event_skills.retain(|(e, _)| *e != id);
        s.participants.retain(|p| p.event_id != id);
        s.feedback.retain(|f| f.data.event_id != id);
        Ok(())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Event>, Error> {
        Ok(self.state.borrow().events.iter().find(|e| e.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Event>, Error> {
        self.state.borrow_mut().locked_events.push(id);
        EventCommon::get(self, id).await
    }

    async fn query(&mut self, param: &EventQuery, pagination: Pagination) -> Result<Vec<Event>, Error> {
        Ok(page(self.state.borrow().filtered_events(param), pagination))
    }

    async fn count(&mut self, param: &EventQuery) -> Result<i64, Error> {
        Ok(self.state.borrow().filtered_events(param).len() as i64)
    }

    async fn set_skills(&mut self, id: i32, skill_ids: &[i32]) -> Result<(), Error> {
        let mut s = self.state.borrow_mut();
        s.event_skills.retain(|(e, _)| *e != id);
        s.event_skills.extend(skill_ids.iter().map(|sk| (id, *sk)));
        Ok(())
    }

    async fn skills(&mut self, ids: &[i32]) -> Result<Vec<EventSkill>, Error> {
        let s = self.state.borrow();
        let mut list: Vec<EventSkill> = s
            .event_skills
            .iter()
            .filter(|(e, _)| ids.contains(e))
            .filter_map(|(e, sk)| {
                s.skills.iter().find(|x| x.id == *sk).map(|x| EventSkill {
                    event_id: *e,
                    skill_id: x.id,
                    name: x.name.clone(),
                })
            })
            .collect();
        list.sort_by(|a, b| a.event_id.cmp(&b.event_id).then(a.name.cmp(&b.name)));
        Ok(list)
    }

    async fn rank_by_interest(&mut self, user_id: i32, now: NaiveDateTime, limit: i64) -> Result<Vec<SharedSkills>, Error> {
        let s = self.state.borrow();
        let mut events: Vec<&Event> = s
            .events
            .iter()
            .filter(|e| !e.has_started(now) && !s.participants.iter().any(|p| p.event_id == e.id && p.user_id == user_id))
            .collect();
        let shared = |e: &Event| {
            s.event_skills
                .iter()
                .filter(|(ev, sk)| *ev == e.id && s.user_skills.contains(&(user_id, *sk)))
                .count() as i64
        };
        events.sort_by(|a, b| shared(b).cmp(&shared(a)).then(a.date.cmp(&b.date)).then(a.start_time.cmp(&b.start_time)).then(a.id.cmp(&b.id)));
        Ok(events
            .into_iter()
            .take(limit as usize)
            .map(|e| SharedSkills {
                event_id: e.id,
                shared: shared(e),
            })
            .collect())
    }

    async fn count_all(&mut self) -> Result<i64, Error> {
        Ok(self.state.borrow().events.len() as i64)
    }
}

impl ParticipantCommon for MemoryStore {
    async fn insert(&mut self, event_id: i32, user_id: i32) -> Result<i32, Error> {
        Ok(self.participant(event_id, user_id, ParticipantStatus::Pending))
    }

    async fn get(&mut self, event_id: i32, user_id: i32) -> Result<Option<Participant>, Error> {
        Ok(self.state.borrow().participants.iter().find(|p| p.event_id == event_id && p.user_id == user_id).cloned())
    }

    async fn get_by_id(&mut self, id: i32) -> Result<Option<Participant>, Error> {
        Ok(self.state.borrow().participants.iter().find(|p| p.id == id).cloned())
    }

    async fn update_status(&mut self, id: i32, status: ParticipantStatus) -> Result<(), Error> {
        if let Some(p) = self.state.borrow_mut().participants.iter_mut().find(|p| p.id == id) {
            p.status = status.as_str().into();
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.state.borrow_mut().participants.retain(|p| p.id != id);
        Ok(())
    }

    async fn count(&mut self, event_id: i32, status: ParticipantStatus) -> Result<i64, Error> {
        Ok(self.state.borrow().participants.iter().filter(|p| p.event_id == event_id && p.status == status.as_str()).count() as i64)
    }

    async fn list_by_event(&mut self, event_id: i32) -> Result<Vec<ParticipantView>, Error> {
        let s = self.state.borrow();
        Ok(s.participants
            .iter()
            .filter(|p| p.event_id == event_id)
            .filter_map(|p| {
                s.user(p.user_id).map(|u| ParticipantView {
                    id: p.id,
                    user_id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    nim: u.nim.clone(),
                    status: p.status.clone(),
                    registered_at: p.registered_at,
                })
            })
            .collect())
    }

    async fn registrations(&mut self, user_id: i32) -> Result<Vec<Registration>, Error> {
        let s = self.state.borrow();
        let mut list: Vec<Registration> = s
            .participants
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter_map(|p| {
                s.events.iter().find(|e| e.id == p.event_id).map(|e| Registration {
                    participant_id: p.id,
                    event_id: e.id,
                    title: e.title.clone(),
                    date: e.date,
                    start_time: e.start_time,
                    end_time: e.end_time,
                    location: e.location.clone(),
                    status: p.status.clone(),
                    registered_at: p.registered_at,
                })
            })
            .collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.start_time.cmp(&b.start_time)));
        Ok(list)
    }

    async fn count_by_status(&mut self) -> Result<Vec<Count>, Error> {
        Ok(counts(self.state.borrow().participants.iter().map(|p| p.status.clone())))
    }
}

impl JadwalCommon for MemoryStore {
    async fn insert(&mut self, user_id: i32, data: JadwalData) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.jadwal.push(JadwalKuliah {
            id,
            user_id,
            day: data.day.as_str().into(),
            start_time: data.range.start.to_naive(),
            end_time: data.range.end.to_naive(),
            course: data.course,
            room: data.room,
        });
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: JadwalData) -> Result<(), Error> {
        if let Some(j) = self.state.borrow_mut().jadwal.iter_mut().find(|j| j.id == id) {
            j.day = data.day.as_str().into();
            j.start_time = data.range.start.to_naive();
            j.end_time = data.range.end.to_naive();
            j.course = data.course;
            j.room = data.room;
        }
        Ok(())
    }

    async fn get(&mut self, id: i32) -> Result<Option<JadwalKuliah>, Error> {
        Ok(self.state.borrow().jadwal.iter().find(|j| j.id == id).cloned())
    }

    async fn list(&mut self, user_id: i32) -> Result<Vec<JadwalKuliah>, Error> {
        Ok(self.state.borrow().jadwal.iter().filter(|j| j.user_id == user_id).cloned().collect())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.state.borrow_mut().jadwal.retain(|j| j.id != id);
        Ok(())
    }
}

impl AspirasiCommon for MemoryStore {
    async fn insert(&mut self, data: AspirasiInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.aspirasi.push(Aspirasi {
            id,
            user_id: data.user_id,
            organisasi_id: data.organisasi_id,
            title: data.title,
            content: data.content,
            anonymous: data.anonymous,
            status: AspirasiStatus::Pending.as_str().into(),
            response: None,
            created_at: Utc::now(),
            responded_at: None,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Aspirasi>, Error> {
        Ok(self.state.borrow().aspirasi.iter().find(|a| a.id == id).cloned())
    }

    async fn query(&mut self, param: &AspirasiQuery, pagination: Pagination) -> Result<Vec<AspirasiView>, Error> {
        Ok(page(self.state.borrow().aspirasi_views(param), pagination))
    }

    async fn count(&mut self, param: &AspirasiQuery) -> Result<i64, Error> {
        Ok(self.state.borrow().aspirasi_views(param).len() as i64)
    }

    async fn update_status(&mut self, id: i32, status: AspirasiStatus, response: Option<String>, responded_at: Option<DateTime<Utc>>) -> Result<(), Error> {
        if let Some(a) = self.state.borrow_mut().aspirasi.iter_mut().find(|a| a.id == id) {
            a.status = status.as_str().into();
            if response.is_some() {
                a.response = response;
                a.responded_at = responded_at;
            }
        }
        Ok(())
    }

    async fn count_by_status(&mut self, organisasi_id: i32) -> Result<Vec<Count>, Error> {
        Ok(counts(self.state.borrow().aspirasi.iter().filter(|a| a.organisasi_id == organisasi_id).map(|a| a.status.clone())))
    }

    async fn recent_titles(&mut self, organisasi_id: i32, limit: i64) -> Result<Vec<String>, Error> {
        Ok(self
            .state
            .borrow()
            .aspirasi
            .iter()
            .rev()
            .filter(|a| a.organisasi_id == organisasi_id)
            .take(limit as usize)
            .map(|a| a.title.clone())
            .collect())
    }
}

impl FeedbackCommon for MemoryStore {
    async fn insert(&mut self, data: FeedbackInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.feedback.push(FeedbackRow { id, data, created_at: Utc::now() });
        Ok(id)
    }

    async fn exists(&mut self, event_id: i32, user_id: i32) -> Result<bool, Error> {
        Ok(self.state.borrow().feedback.iter().any(|f| f.data.event_id == event_id && f.data.user_id == user_id))
    }

    async fn list(&mut self, event_id: i32) -> Result<Vec<FeedbackView>, Error> {
        let s = self.state.borrow();
        Ok(s.feedback
            .iter()
            .filter(|f| f.data.event_id == event_id)
            .map(|f| FeedbackView {
                id: f.id,
                user_id: f.data.user_id,
                name: s.user(f.data.user_id).map(|u| u.name.clone()).unwrap_or_default(),
                rating: f.data.rating,
                comment: f.data.comment.clone(),
                created_at: f.created_at,
            })
            .collect())
    }
}

impl SkillCommon for MemoryStore {
    async fn insert(&mut self, name: &str) -> Result<i32, Error> {
        Ok(self.skill(name))
    }

    async fn exists(&mut self, name: &str) -> Result<bool, Error> {
        Ok(self.state.borrow().skills.iter().any(|s| s.name == name))
    }

    async fn list(&mut self) -> Result<Vec<Skill>, Error> {
        let mut list = self.state.borrow().skills.clone();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.skills.len();
        s.skills.retain(|sk| sk.id != id);
        s.user_skills.retain(|(_, sk)| *sk != id);
        s.event_skills.retain(|(_, sk)| *sk != id);
        Ok((before - s.skills.len()) as u64)
    }

    async fn count_ids(&mut self, ids: &[i32]) -> Result<i64, Error> {
        Ok(self.state.borrow().skills.iter().filter(|s| ids.contains(&s.id)).count() as i64)
    }
}

impl PaymentCommon for MemoryStore {
    async fn insert(&mut self, data: PaymentInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.next_id();
        s.payments.push(Payment {
            id,
            organisasi_id: data.organisasi_id,
            order_id: data.order_id,
            amount: data.amount,
            status: PaymentStatus::Pending.as_str().into(),
            redirect_url: None,
            gateway_status: None,
            created_at: Utc::now(),
            paid_at: None,
            confirmed_at: None,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Payment>, Error> {
        Ok(self.state.borrow().payments.iter().find(|p| p.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Payment>, Error> {
        PaymentCommon::get(self, id).await
    }

    async fn get_by_order_for_update(&mut self, order_id: &str) -> Result<Option<Payment>, Error> {
        Ok(self.state.borrow().payments.iter().find(|p| p.order_id == order_id).cloned())
    }

    async fn set_redirect_url(&mut self, id: i32, url: &str) -> Result<(), Error> {
        if let Some(p) = self.state.borrow_mut().payments.iter_mut().find(|p| p.id == id) {
            p.redirect_url = Some(url.to_owned());
        }
        Ok(())
    }

    async fn update_status(&mut self, id: i32, update: PaymentStatusUpdate) -> Result<(), Error> {
        if let Some(p) = self.state.borrow_mut().payments.iter_mut().find(|p| p.id == id) {
            p.status = update.status.as_str().into();
            p.gateway_status = update.gateway_status;
            p.paid_at = update.paid_at;
            p.confirmed_at = update.confirmed_at;
        }
        Ok(())
    }

    async fn query(&mut self, param: &PaymentQuery, pagination: Pagination) -> Result<Vec<Payment>, Error> {
        Ok(page(self.state.borrow().filtered_payments(param), pagination))
    }

    async fn count(&mut self, param: &PaymentQuery) -> Result<i64, Error> {
        Ok(self.state.borrow().filtered_payments(param).len() as i64)
    }

    async fn count_by_status(&mut self) -> Result<Vec<Count>, Error> {
        Ok(counts(self.state.borrow().payments.iter().map(|p| p.status.clone())))
    }

    async fn confirmed_revenue(&mut self) -> Result<i64, Error> {
        Ok(self.state.borrow().payments.iter().filter(|p| p.status == PaymentStatus::Confirmed.as_str()).map(|p| p.amount).sum())
    }
}

impl StatsCommon for MemoryStore {
    async fn event_stats(&mut self, organisasi_id: i32) -> Result<Vec<EventStat>, Error> {
        let s = self.state.borrow();
        let param = EventQuery {
            organisasi_id: Some(organisasi_id),
            ..Default::default()
        };
        Ok(s.filtered_events(&param)
            .into_iter()
            .map(|e| {
                let with = |st: ParticipantStatus| s.participants.iter().filter(|p| p.event_id == e.id && p.status == st.as_str()).count() as i64;
                let ratings: Vec<f64> = s.feedback.iter().filter(|f| f.data.event_id == e.id).map(|f| f.data.rating as f64).collect();
                EventStat {
                    event_id: e.id,
                    title: e.title.clone(),
                    date: e.date,
                    capacity: e.capacity,
                    accepted: with(ParticipantStatus::Accepted),
                    pending: with(ParticipantStatus::Pending),
                    rejected: with(ParticipantStatus::Rejected),
                    feedback_count: ratings.len() as i64,
                    average_rating: if ratings.is_empty() { None } else { Some(ratings.iter().sum::<f64>() / ratings.len() as f64) },
                }
            })
            .collect())
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(self) -> Result<(), Error> {
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

impl Begin for MemoryStore {
    type Tx = MemoryStore;

    async fn begin(&self) -> Result<Self::Tx, Error> {
        Ok(self.clone())
    }
}

pub struct FakeGenerator {
    reply: Option<String>,
    prompts: RefCell<Vec<String>>,
}

impl FakeGenerator {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Some(text.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.borrow().last().cloned().unwrap_or_default()
    }
}

impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        self.prompts.borrow_mut().push(prompt.to_owned());
        self.reply.clone().ok_or(Error::AiService("connection refused".into()))
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub fail: bool,
}

impl PaymentGateway for FakeGateway {
    async fn create_transaction(&self, req: &TransactionRequest) -> Result<Transaction, Error> {
        if self.fail {
            return Err(Error::PaymentGateway("HTTP 500".into()));
        }
        Ok(Transaction {
            token: format!("tok-{}", req.order_id),
            redirect_url: format!("https://pay.test/{}", req.order_id),
        })
    }
}
