use std::rc::Rc;

use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::HttpMessage;
use chrono::{Duration, Utc};
use futures_util::future::LocalBoxFuture;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::core::models::user::Role;
use crate::core::tokener::{Payload, Tokener};
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;

pub static JWT_TOKEN: &str = "JWT_TOKEN";
pub const TOKEN_DAYS: i64 = 30;

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub role: String,
    pub exp: i64,
}

impl Claim {
    pub fn new(id: i32, role: Role) -> Self {
        Self {
            user: id.to_string(),
            role: role.as_str().into(),
            exp: (Utc::now() + Duration::days(TOKEN_DAYS)).timestamp(),
        }
    }
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }

    fn role(&self) -> &str {
        &self.role
    }
}

/// Authenticates requests that carry a token in `Authorization` (optionally `Bearer `-prefixed)
/// or in the `JWT_TOKEN` cookie. A bad `Authorization` token is rejected with 401. A bad cookie
/// is ignored so the browser can still log in again or log out. Requests without a valid token
/// pass through anonymously and the `UserInfo` extractor rejects them where a login is required.
pub struct Jwt {
    tokener: Rc<JWT>,
}

impl Jwt {
    pub fn new(secret: &str) -> Self {
        Self {
            tokener: Rc::new(JWT::new(secret.as_bytes().to_owned())),
        }
    }
}

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<actix_web::Error>,
{
    type Error = actix_web::Error;
    type Response = S::Response;
    type Transform = JwtService<S>;
    type InitError = ();
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let tokener = self.tokener.clone();
        Box::pin(async move {
            Ok(JwtService {
                tokener,
                next_service: service,
            })
        })
    }
}

pub struct JwtService<S> {
    tokener: Rc<JWT>,
    next_service: S,
}

fn header_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get("Authorization").and_then(|h| h.to_str().ok())?.trim();
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then(|| token.to_owned())
}

fn cookie_token(req: &ServiceRequest) -> Option<String> {
    req.cookie(JWT_TOKEN).map(|c| c.value().to_owned()).filter(|v| !v.is_empty())
}

fn user_of(tokener: &JWT, token: &str) -> Result<UserInfo, Error> {
    let claim: Claim = tokener.verify_token(token)?;
    let id = claim.user().parse::<i32>().map_err(|_| Error::Unauthorized("invalid token".into()))?;
    let role = claim.role().parse::<Role>().map_err(|_| Error::Unauthorized("invalid token".into()))?;
    Ok(UserInfo { id, role })
}

impl<S> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<actix_web::Error>,
{
    type Response = S::Response;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = header_token(&req) {
            match user_of(&self.tokener, &token) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(e) => {
                    debug!("rejected token: {}", e);
                    return Box::pin(async move { Err(Error::Unauthorized("invalid token".into()).into()) });
                }
            }
        } else if let Some(token) = cookie_token(&req) {
            match user_of(&self.tokener, &token) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(e) => debug!("ignored stale cookie: {}", e),
            }
        }
        let res_fut = self.next_service.call(req);
        Box::pin(async move { res_fut.await.map_err(|e| e.into()) })
    }
}
