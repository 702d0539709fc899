use actix_web::web::{Data, Json};

use crate::context::UserInfo;
use crate::core::models::stats::Dashboard;
use crate::core::services::admin;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;

pub async fn dashboard(user: UserInfo, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<Dashboard>, Error> {
    privilege.check(&user, "dashboard", "read")?;
    Ok(Json(admin::dashboard(&mut manager.acquire().await?).await?))
}
