pub mod admin;
pub mod aspirasi;
pub mod event;
pub mod feedback;
pub mod jadwal;
pub mod organisasi;
pub mod participant;
pub mod recommendation;
pub mod skill;
pub mod subscription;

use actix_web::cookie::{time::Duration as CookieDuration, time::OffsetDateTime, Cookie, CookieBuilder};
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, HttpResponseBuilder};
use log::info;
use serde::Serialize;

use crate::config::Config;
use crate::context::UserInfo;
use crate::core::models::user::{Login, Profile, Signup};
use crate::core::services::auth;
use crate::core::tokener::Tokener;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::{Claim, JWT_TOKEN, TOKEN_DAYS};
use crate::response::CreateResponse;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    token: String,
    user: Profile,
}

pub async fn signup(Json(data): Json<Signup>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    let id = auth::signup(manager.begin().await?, data).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn login(Json(data): Json<Login>, manager: Data<PgSqlxManager>, config: Data<Config>) -> Result<HttpResponse, Error> {
    let user = auth::login(&mut manager.acquire().await?, data).await?;
    let profile = user.profile()?;
    let tokener = JWT::new(config.jwt_secret.as_bytes().to_owned());
    let token = tokener.gen_token(&Claim::new(profile.id, profile.role))?;
    info!("user {} logged in", profile.id);
    let cookie = CookieBuilder::new(JWT_TOKEN, token.clone())
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::days(TOKEN_DAYS))
        .finish();
    Ok(HttpResponseBuilder::new(StatusCode::OK).cookie(cookie).json(LoginResponse { token, user: profile }))
}

pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(JWT_TOKEN, "");
    cookie.set_path("/");
    cookie.set_expires(OffsetDateTime::now_utc());
    HttpResponseBuilder::new(StatusCode::OK).cookie(cookie).finish()
}

pub async fn me(user: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<Profile>, Error> {
    Ok(Json(auth::profile(&mut manager.acquire().await?, user.id).await?))
}
