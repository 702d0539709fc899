use actix_web::web::{Data, Json, Path};

use crate::context::UserInfo;
use crate::core::models::skill::{Interests, Skill, SkillCreate};
use crate::core::services::skill;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::response::{CreateResponse, DeleteResponse};

pub async fn list(manager: Data<PgSqlxManager>) -> Result<Json<Vec<Skill>>, Error> {
    Ok(Json(skill::list_skills(&mut manager.acquire().await?).await?))
}

pub async fn create(user: UserInfo, Json(data): Json<SkillCreate>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<CreateResponse>, Error> {
    privilege.check(&user, "skill", "create")?;
    let id = skill::create_skill(manager.begin().await?, data).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn delete(user: UserInfo, skill_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<DeleteResponse>, Error> {
    privilege.check(&user, "skill", "delete")?;
    let deleted = skill::delete_skill(manager.begin().await?, skill_id.into_inner().0).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}

pub async fn interests(user: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Skill>>, Error> {
    Ok(Json(skill::interests(&mut manager.acquire().await?, user.id).await?))
}

pub async fn set_interests(user: UserInfo, Json(data): Json<Interests>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Vec<Skill>>, Error> {
    privilege.check(&user, "interest", "write")?;
    Ok(Json(skill::set_interests(manager.begin().await?, user.id, data).await?))
}
