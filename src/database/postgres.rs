use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

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
    user::{Insert as UserInsert, User},
};
use crate::core::ports::repository::{
    AspirasiCommon, Begin, Common, EventCommon, FeedbackCommon, JadwalCommon, OrganisasiCommon, ParticipantCommon, PaymentCommon, SkillCommon, StatsCommon, Store, TxStore, UserCommon,
};
use crate::error::Error;

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }
}

fn like(v: &Option<String>) -> Option<String> {
    v.as_ref().map(|v| format!("%{}%", v))
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO users (name, email, nim, password, salt, role) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id")
            .bind(data.name)
            .bind(data.email)
            .bind(data.nim)
            .bind(data.password)
            .bind(data.salt)
            .bind(data.role.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(user)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&mut self.executor).await?;
        Ok(user)
    }

    async fn set_skills(&mut self, id: i32, skill_ids: &[i32]) -> Result<(), Error> {
        query("DELETE FROM user_skills WHERE user_id = $1").bind(id).execute(&mut self.executor).await?;
        query("INSERT INTO user_skills (user_id, skill_id) SELECT $1, UNNEST($2::INT[])")
            .bind(id)
            .bind(skill_ids.to_vec())
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn skills(&mut self, id: i32) -> Result<Vec<Skill>, Error> {
        let skills = query_as("SELECT s.id, s.name FROM skills AS s JOIN user_skills AS us ON us.skill_id = s.id WHERE us.user_id = $1 ORDER BY s.name")
            .bind(id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(skills)
    }

    async fn count_by_role(&mut self) -> Result<Vec<Count>, Error> {
        let counts = query_as("SELECT role AS key, COUNT(*) AS total FROM users GROUP BY role ORDER BY role")
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }
}

impl<E> OrganisasiCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: OrganisasiInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO organisasi (user_id, name, description) VALUES ($1, $2, $3) RETURNING id")
            .bind(data.user_id)
            .bind(data.name)
            .bind(data.description)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: OrganisasiUpdate) -> Result<(), Error> {
        query("UPDATE organisasi SET name = $1, description = $2 WHERE id = $3")
            .bind(data.name)
            .bind(data.description)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Organisasi>, Error> {
        let org = query_as("SELECT * FROM organisasi WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(org)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Organisasi>, Error> {
        let org = query_as("SELECT * FROM organisasi WHERE id = $1 FOR UPDATE").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(org)
    }

    async fn get_by_user(&mut self, uid: i32) -> Result<Option<Organisasi>, Error> {
        let org = query_as("SELECT * FROM organisasi WHERE user_id = $1").bind(uid).fetch_optional(&mut self.executor).await?;
        Ok(org)
    }

    async fn exists(&mut self, name: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM organisasi WHERE name = $1)")
            .bind(name)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn query(&mut self, param: &OrganisasiQuery, pagination: Pagination) -> Result<Vec<Organisasi>, Error> {
        let list = query_as("SELECT * FROM organisasi WHERE ($1::TEXT IS NULL OR name ILIKE $1) ORDER BY id LIMIT $2 OFFSET $3")
            .bind(like(&param.name_like))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&mut self.executor)
            .await?;
        Ok(list)
    }

    async fn count(&mut self, param: &OrganisasiQuery) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM organisasi WHERE ($1::TEXT IS NULL OR name ILIKE $1)")
            .bind(like(&param.name_like))
            .fetch_one(&mut self.executor)
            .await?;
        Ok(total)
    }

    async fn set_plan(&mut self, id: i32, plan: Plan, expires_at: Option<DateTime<Utc>>) -> Result<(), Error> {
        query("UPDATE organisasi SET plan = $1, plan_expires_at = $2 WHERE id = $3")
            .bind(plan.as_str())
            .bind(expires_at)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn count_by_plan(&mut self) -> Result<Vec<Count>, Error> {
        let counts = query_as(
            "
        SELECT
            CASE WHEN plan = 'PRO' AND plan_expires_at > NOW() THEN 'PRO' ELSE 'FREE' END AS key,
            COUNT(*) AS total
        FROM organisasi
        GROUP BY 1
        ORDER BY 1",
        )
        .fetch_all(&mut self.executor)
        .await?;
        Ok(counts)
    }
}

fn push_event_filters(q: &mut QueryBuilder<Postgres>, param: &EventQuery) {
    if let Some(oid) = param.organisasi_id {
        q.push(" AND organisasi_id = ").push_bind(oid);
    }
    if let Some(sid) = param.skill_id {
        q.push(" AND id IN (SELECT event_id FROM event_skills WHERE skill_id = ").push_bind(sid).push(")");
    }
    if let Some(from) = param.date_from {
        q.push(" AND date >= ").push_bind(from);
    }
    if let Some(title) = like(&param.title_like) {
        q.push(" AND title ILIKE ").push_bind(title);
    }
}

impl<E> EventCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: EventInsert) -> Result<i32, Error> {
        let d = data.data;
        let id = query_scalar(
            "
        INSERT INTO events (organisasi_id, title, description, date, start_time, end_time, location, capacity)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id",
        )
        .bind(data.organisasi_id)
        .bind(d.title)
        .bind(d.description)
        .bind(d.date)
        .bind(d.start_time)
        .bind(d.end_time)
        .bind(d.location)
        .bind(d.capacity)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, d: EventUpdate) -> Result<(), Error> {
        query(
            "
        UPDATE events
        SET title = $1, description = $2, date = $3, start_time = $4, end_time = $5, location = $6, capacity = $7
        WHERE id = $8",
        )
        .bind(d.title)
        .bind(d.description)
        .bind(d.date)
        .bind(d.start_time)
        .bind(d.end_time)
        .bind(d.location)
        .bind(d.capacity)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM events WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Event>, Error> {
        let event = query_as("SELECT * FROM events WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(event)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Event>, Error> {
        let event = query_as("SELECT * FROM events WHERE id = $1 FOR UPDATE").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(event)
    }

    async fn query(&mut self, param: &EventQuery, pagination: Pagination) -> Result<Vec<Event>, Error> {
        let mut q = QueryBuilder::new("SELECT * FROM events WHERE 1 = 1");
        push_event_filters(&mut q, param);
        q.push(" ORDER BY date, start_time, id");
        q.push(" LIMIT ").push_bind(pagination.limit);
        q.push(" OFFSET ").push_bind(pagination.offset());
        let events = q.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(events)
    }

    async fn count(&mut self, param: &EventQuery) -> Result<i64, Error> {
        let mut q = QueryBuilder::new("SELECT COUNT(*) FROM events WHERE 1 = 1");
        push_event_filters(&mut q, param);
        let (n,) = q.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn set_skills(&mut self, id: i32, skill_ids: &[i32]) -> Result<(), Error> {
        query("DELETE FROM event_skills WHERE event_id = $1").bind(id).execute(&mut self.executor).await?;
        query("INSERT INTO event_skills (event_id, skill_id) SELECT $1, UNNEST($2::INT[])")
            .bind(id)
            .bind(skill_ids.to_vec())
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn skills(&mut self, ids: &[i32]) -> Result<Vec<EventSkill>, Error> {
        let skills = query_as(
            "
        SELECT es.event_id, es.skill_id, s.name
        FROM event_skills AS es
        JOIN skills AS s ON s.id = es.skill_id
        WHERE es.event_id = ANY($1)
        ORDER BY es.event_id, s.name",
        )
        .bind(ids.to_vec())
        .fetch_all(&mut self.executor)
        .await?;
        Ok(skills)
    }

    async fn rank_by_interest(&mut self, user_id: i32, now: NaiveDateTime, limit: i64) -> Result<Vec<SharedSkills>, Error> {
        let ranked = query_as(
            "
        SELECT e.id AS event_id, COUNT(us.skill_id) AS shared
        FROM events AS e
        LEFT JOIN event_skills AS es ON es.event_id = e.id
        LEFT JOIN user_skills AS us ON us.skill_id = es.skill_id AND us.user_id = $1
        WHERE (e.date > $2 OR (e.date = $2 AND e.start_time > $3))
        AND NOT EXISTS (SELECT 1 FROM event_participants AS p WHERE p.event_id = e.id AND p.user_id = $1)
        GROUP BY e.id
        ORDER BY shared DESC, e.date, e.start_time, e.id
        LIMIT $4",
        )
        .bind(user_id)
        .bind(now.date())
        .bind(now.time())
        .bind(limit)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(ranked)
    }

    async fn count_all(&mut self) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM events").fetch_one(&mut self.executor).await?;
        Ok(total)
    }
}

impl<E> ParticipantCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, event_id: i32, user_id: i32) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO event_participants (event_id, user_id, status) VALUES ($1, $2, $3) RETURNING id")
            .bind(event_id)
            .bind(user_id)
            .bind(ParticipantStatus::Pending.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, event_id: i32, user_id: i32) -> Result<Option<Participant>, Error> {
        let p = query_as("SELECT * FROM event_participants WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(p)
    }

    async fn get_by_id(&mut self, id: i32) -> Result<Option<Participant>, Error> {
        let p = query_as("SELECT * FROM event_participants WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(p)
    }

    async fn update_status(&mut self, id: i32, status: ParticipantStatus) -> Result<(), Error> {
        query("UPDATE event_participants SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM event_participants WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn count(&mut self, event_id: i32, status: ParticipantStatus) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM event_participants WHERE event_id = $1 AND status = $2")
            .bind(event_id)
            .bind(status.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(total)
    }

    async fn list_by_event(&mut self, event_id: i32) -> Result<Vec<ParticipantView>, Error> {
        let list = query_as(
            "
        SELECT p.id, p.user_id, u.name, u.email, u.nim, p.status, p.registered_at
        FROM event_participants AS p
        JOIN users AS u ON u.id = p.user_id
        WHERE p.event_id = $1
        ORDER BY p.registered_at, p.id",
        )
        .bind(event_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }

    async fn registrations(&mut self, user_id: i32) -> Result<Vec<Registration>, Error> {
        let list = query_as(
            "
        SELECT
            p.id AS participant_id,
            e.id AS event_id,
            e.title,
            e.date,
            e.start_time,
            e.end_time,
            e.location,
            p.status,
            p.registered_at
        FROM event_participants AS p
        JOIN events AS e ON e.id = p.event_id
        WHERE p.user_id = $1
        ORDER BY e.date, e.start_time",
        )
        .bind(user_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }

    async fn count_by_status(&mut self) -> Result<Vec<Count>, Error> {
        let counts = query_as("SELECT status AS key, COUNT(*) AS total FROM event_participants GROUP BY status ORDER BY status")
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }
}

impl<E> JadwalCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user_id: i32, data: JadwalData) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO jadwal_kuliah (user_id, day, start_time, end_time, course, room) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id")
            .bind(user_id)
            .bind(data.day.as_str())
            .bind(data.range.start.to_naive())
            .bind(data.range.end.to_naive())
            .bind(data.course)
            .bind(data.room)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: JadwalData) -> Result<(), Error> {
        query("UPDATE jadwal_kuliah SET day = $1, start_time = $2, end_time = $3, course = $4, room = $5 WHERE id = $6")
            .bind(data.day.as_str())
            .bind(data.range.start.to_naive())
            .bind(data.range.end.to_naive())
            .bind(data.course)
            .bind(data.room)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn get(&mut self, id: i32) -> Result<Option<JadwalKuliah>, Error> {
        let j = query_as("SELECT * FROM jadwal_kuliah WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(j)
    }

    async fn list(&mut self, user_id: i32) -> Result<Vec<JadwalKuliah>, Error> {
        let list = query_as("SELECT * FROM jadwal_kuliah WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(list)
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM jadwal_kuliah WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }
}

fn push_aspirasi_filters(q: &mut QueryBuilder<Postgres>, param: &AspirasiQuery) {
    if let Some(oid) = param.organisasi_id {
        q.push(" AND a.organisasi_id = ").push_bind(oid);
    }
    if let Some(uid) = param.user_id {
        q.push(" AND a.user_id = ").push_bind(uid);
    }
    if let Some(status) = param.status {
        q.push(" AND a.status = ").push_bind(status.as_str());
    }
}

impl<E> AspirasiCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: AspirasiInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO aspirasi (user_id, organisasi_id, title, content, anonymous) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(data.user_id)
            .bind(data.organisasi_id)
            .bind(data.title)
            .bind(data.content)
            .bind(data.anonymous)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Aspirasi>, Error> {
        let a = query_as("SELECT * FROM aspirasi WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(a)
    }

    async fn query(&mut self, param: &AspirasiQuery, pagination: Pagination) -> Result<Vec<AspirasiView>, Error> {
        // Anonymous senders stay hidden unless the listing is the sender's own.
        let mut q = QueryBuilder::new(
            "
        SELECT
            a.id,
            a.organisasi_id,
            o.name AS organisasi_name,
            CASE WHEN a.anonymous AND a.user_id IS DISTINCT FROM ",
        );
        q.push_bind(param.user_id);
        q.push(
            " THEN NULL ELSE u.name END AS sender_name,
            a.title,
            a.content,
            a.anonymous,
            a.status,
            a.response,
            a.created_at,
            a.responded_at
        FROM aspirasi AS a
        JOIN organisasi AS o ON o.id = a.organisasi_id
        JOIN users AS u ON u.id = a.user_id
        WHERE 1 = 1",
        );
        push_aspirasi_filters(&mut q, param);
        q.push(" ORDER BY a.created_at DESC, a.id DESC");
        q.push(" LIMIT ").push_bind(pagination.limit);
        q.push(" OFFSET ").push_bind(pagination.offset());
        let list = q.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(list)
    }

    async fn count(&mut self, param: &AspirasiQuery) -> Result<i64, Error> {
        let mut q = QueryBuilder::new("SELECT COUNT(*) FROM aspirasi AS a WHERE 1 = 1");
        push_aspirasi_filters(&mut q, param);
        let (n,) = q.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn update_status(&mut self, id: i32, status: AspirasiStatus, response: Option<String>, responded_at: Option<DateTime<Utc>>) -> Result<(), Error> {
        query("UPDATE aspirasi SET status = $1, response = COALESCE($2, response), responded_at = COALESCE($3, responded_at) WHERE id = $4")
            .bind(status.as_str())
            .bind(response)
            .bind(responded_at)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn count_by_status(&mut self, organisasi_id: i32) -> Result<Vec<Count>, Error> {
        let counts = query_as("SELECT status AS key, COUNT(*) AS total FROM aspirasi WHERE organisasi_id = $1 GROUP BY status ORDER BY status")
            .bind(organisasi_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }

    async fn recent_titles(&mut self, organisasi_id: i32, limit: i64) -> Result<Vec<String>, Error> {
        let titles = query_scalar("SELECT title FROM aspirasi WHERE organisasi_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2")
            .bind(organisasi_id)
            .bind(limit)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(titles)
    }
}

impl<E> FeedbackCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: FeedbackInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO feedback (event_id, user_id, rating, comment) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(data.event_id)
            .bind(data.user_id)
            .bind(data.rating)
            .bind(data.comment)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn exists(&mut self, event_id: i32, user_id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM feedback WHERE event_id = $1 AND user_id = $2)")
            .bind(event_id)
            .bind(user_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn list(&mut self, event_id: i32) -> Result<Vec<FeedbackView>, Error> {
        let list = query_as(
            "
        SELECT f.id, f.user_id, u.name, f.rating, f.comment, f.created_at
        FROM feedback AS f
        JOIN users AS u ON u.id = f.user_id
        WHERE f.event_id = $1
        ORDER BY f.created_at, f.id",
        )
        .bind(event_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }
}

impl<E> SkillCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, name: &str) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO skills (name) VALUES ($1) RETURNING id").bind(name).fetch_one(&mut self.executor).await?;
        Ok(id)
    }

    async fn exists(&mut self, name: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM skills WHERE name = $1)")
            .bind(name)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn list(&mut self) -> Result<Vec<Skill>, Error> {
        let list = query_as("SELECT * FROM skills ORDER BY name").fetch_all(&mut self.executor).await?;
        Ok(list)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM skills WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn count_ids(&mut self, ids: &[i32]) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM skills WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(total)
    }
}

fn push_payment_filters(q: &mut QueryBuilder<Postgres>, param: &PaymentQuery) {
    if let Some(oid) = param.organisasi_id {
        q.push(" AND organisasi_id = ").push_bind(oid);
    }
    if let Some(status) = param.status {
        q.push(" AND status = ").push_bind(status.as_str());
    }
}

impl<E> PaymentCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: PaymentInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO payments (organisasi_id, order_id, amount, status) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(data.organisasi_id)
            .bind(data.order_id)
            .bind(data.amount)
            .bind(PaymentStatus::Pending.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Payment>, Error> {
        let p = query_as("SELECT * FROM payments WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(p)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Payment>, Error> {
        let p = query_as("SELECT * FROM payments WHERE id = $1 FOR UPDATE").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(p)
    }

    async fn get_by_order_for_update(&mut self, order_id: &str) -> Result<Option<Payment>, Error> {
        let p = query_as("SELECT * FROM payments WHERE order_id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(p)
    }

    async fn set_redirect_url(&mut self, id: i32, url: &str) -> Result<(), Error> {
        query("UPDATE payments SET redirect_url = $1 WHERE id = $2").bind(url).bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn update_status(&mut self, id: i32, update: PaymentStatusUpdate) -> Result<(), Error> {
        query("UPDATE payments SET status = $1, gateway_status = $2, paid_at = $3, confirmed_at = $4 WHERE id = $5")
            .bind(update.status.as_str())
            .bind(update.gateway_status)
            .bind(update.paid_at)
            .bind(update.confirmed_at)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn query(&mut self, param: &PaymentQuery, pagination: Pagination) -> Result<Vec<Payment>, Error> {
        let mut q = QueryBuilder::new("SELECT * FROM payments WHERE 1 = 1");
        push_payment_filters(&mut q, param);
        q.push(" ORDER BY created_at DESC, id DESC");
        q.push(" LIMIT ").push_bind(pagination.limit);
        q.push(" OFFSET ").push_bind(pagination.offset());
        let list = q.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(list)
    }

    async fn count(&mut self, param: &PaymentQuery) -> Result<i64, Error> {
        let mut q = QueryBuilder::new("SELECT COUNT(*) FROM payments WHERE 1 = 1");
        push_payment_filters(&mut q, param);
        let (n,) = q.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn count_by_status(&mut self) -> Result<Vec<Count>, Error> {
        let counts = query_as("SELECT status AS key, COUNT(*) AS total FROM payments GROUP BY status ORDER BY status")
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }

    async fn confirmed_revenue(&mut self) -> Result<i64, Error> {
        let total = query_scalar("SELECT COALESCE(SUM(amount), 0)::BIGINT FROM payments WHERE status = $1")
            .bind(PaymentStatus::Confirmed.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(total)
    }
}

impl<E> StatsCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn event_stats(&mut self, organisasi_id: i32) -> Result<Vec<EventStat>, Error> {
        let stats = query_as(
            "
        SELECT
            e.id AS event_id,
            e.title,
            e.date,
            e.capacity,
            COUNT(p.id) FILTER (WHERE p.status = 'ACCEPTED') AS accepted,
            COUNT(p.id) FILTER (WHERE p.status = 'PENDING') AS pending,
            COUNT(p.id) FILTER (WHERE p.status = 'REJECTED') AS rejected,
            (SELECT COUNT(*) FROM feedback AS f WHERE f.event_id = e.id) AS feedback_count,
            (SELECT AVG(f.rating)::FLOAT8 FROM feedback AS f WHERE f.event_id = e.id) AS average_rating
        FROM events AS e
        LEFT JOIN event_participants AS p ON p.event_id = e.id
        WHERE e.organisasi_id = $1
        GROUP BY e.id
        ORDER BY e.date, e.id",
        )
        .bind(organisasi_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(stats)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl Common for PgSqlx<Transaction<'static, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl Store for PgSqlx<Transaction<'static, Postgres>> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

impl Begin for PgSqlxManager {
    type Tx = PgSqlx<Transaction<'static, Postgres>>;

    async fn begin(&self) -> Result<Self::Tx, Error> {
        PgSqlxManager::begin(self).await
    }
}
