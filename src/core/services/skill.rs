use log::info;

use crate::core::models::skill::{Interests, Skill, SkillCreate};
use crate::core::ports::repository::{SkillCommon, TxStore, UserCommon};
use crate::error::Error;

/// Deduplicates `ids` and makes sure every one of them names an existing skill.
pub(crate) async fn check_skill_ids<D>(db: &mut D, ids: &[i32]) -> Result<Vec<i32>, Error>
where
    D: SkillCommon,
{
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if !ids.is_empty() && SkillCommon::count_ids(db, &ids).await? != ids.len() as i64 {
        return Err(Error::BadRequest("unknown skill id".into()));
    }
    Ok(ids)
}

pub async fn list_skills<D>(db: &mut D) -> Result<Vec<Skill>, Error>
where
    D: SkillCommon,
{
    SkillCommon::list(db).await
}

pub async fn create_skill<T>(mut store: T, SkillCreate { name }: SkillCreate) -> Result<i32, Error>
where
    T: TxStore,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::BadRequest("skill name is required".into()));
    }
    if SkillCommon::exists(&mut store, name).await? {
        return Err(Error::Conflict("skill already exists".into()));
    }
    let id = SkillCommon::insert(&mut store, name).await?;
    store.commit().await?;
    info!("skill {} created", id);
    Ok(id)
}

pub async fn delete_skill<T>(mut store: T, id: i32) -> Result<u64, Error>
where
    T: TxStore,
{
    let deleted = SkillCommon::delete(&mut store, id).await?;
    if deleted == 0 {
        return Err(Error::NotFound("skill not found".into()));
    }
    store.commit().await?;
    Ok(deleted)
}

pub async fn set_interests<T>(mut store: T, uid: i32, Interests { skill_ids }: Interests) -> Result<Vec<Skill>, Error>
where
    T: TxStore,
{
    let ids = check_skill_ids(&mut store, &skill_ids).await?;
    UserCommon::set_skills(&mut store, uid, &ids).await?;
    let skills = UserCommon::skills(&mut store, uid).await?;
    store.commit().await?;
    Ok(skills)
}

pub async fn interests<D>(db: &mut D, uid: i32) -> Result<Vec<Skill>, Error>
where
    D: UserCommon,
{
    UserCommon::skills(db, uid).await
}
