use actix_web::web::{Data, Json, Path, Query};
use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::context::UserInfo;
use crate::core::models::organisasi::Subscription;
use crate::core::models::payment::{Checkout, Payment, PaymentStatus, Query as PaymentQuery};
use crate::core::payment::{Notification, PaymentGateway};
use crate::core::services::subscription;
use crate::database::postgres::PgSqlxManager;
use crate::error::Error;
use crate::privilege::Privilege;
use crate::request::Pagination;
use crate::response::List;

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    status: PaymentStatus,
}

pub async fn checkout<P: PaymentGateway + 'static>(
    user: UserInfo,
    manager: Data<PgSqlxManager>,
    gateway: Data<P>,
    config: Data<Config>,
    privilege: Data<Privilege>,
) -> Result<Json<Checkout>, Error> {
    privilege.check(&user, "subscription", "checkout")?;
    Ok(Json(subscription::checkout(manager.get_ref(), gateway.get_ref(), user.id, config.payment.pro_price).await?))
}

/// Called by the payment gateway, not by a logged-in user; authenticity comes from the signature.
pub async fn notification(Json(n): Json<Notification>, manager: Data<PgSqlxManager>, config: Data<Config>) -> Result<Json<NotificationResponse>, Error> {
    let status = subscription::handle_notification(manager.begin().await?, n, &config.payment.server_key, Utc::now()).await?;
    Ok(Json(NotificationResponse { status }))
}

pub async fn mine(user: UserInfo, Query(page): Query<Pagination>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<List<Payment>>, Error> {
    privilege.check(&user, "subscription", "read")?;
    let (list, total) = subscription::my_payments(&mut manager.acquire().await?, user.id, page.to_db()).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn list(
    user: UserInfo,
    Query(param): Query<PaymentQuery>,
    Query(page): Query<Pagination>,
    manager: Data<PgSqlxManager>,
    privilege: Data<Privilege>,
) -> Result<Json<List<Payment>>, Error> {
    privilege.check(&user, "payment", "read")?;
    let (list, total) = subscription::list_payments(&mut manager.acquire().await?, param, page.to_db()).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn confirm(user: UserInfo, payment_id: Path<(i32,)>, manager: Data<PgSqlxManager>, config: Data<Config>, privilege: Data<Privilege>) -> Result<Json<Subscription>, Error> {
    privilege.check(&user, "payment", "confirm")?;
    let sub = subscription::confirm(manager.begin().await?, payment_id.into_inner().0, config.payment.subscription_days, Utc::now()).await?;
    Ok(Json(sub))
}

pub async fn reject(user: UserInfo, payment_id: Path<(i32,)>, manager: Data<PgSqlxManager>, privilege: Data<Privilege>) -> Result<Json<NotificationResponse>, Error> {
    privilege.check(&user, "payment", "reject")?;
    subscription::reject(manager.begin().await?, payment_id.into_inner().0).await?;
    Ok(Json(NotificationResponse { status: PaymentStatus::Failed }))
}
