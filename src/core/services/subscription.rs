use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::core::models::common::Pagination;
use crate::core::models::organisasi::{Plan, Subscription};
use crate::core::models::payment::{Checkout, Insert, Payment, PaymentStatus, Query, StatusUpdate};
use crate::core::payment::{next_status, order_id, parse_gross_amount, status_from_notification, verify_signature, Notification, PaymentGateway, TransactionRequest};
use crate::core::ports::repository::{Begin, OrganisasiCommon, PaymentCommon, TxStore, UserCommon};
use crate::core::services::organisasi::require_organisasi;
use crate::error::Error;

/// Records a PENDING payment and opens a gateway transaction for it. The payment row is committed
/// before the gateway is called; a failed call marks it FAILED.
pub async fn checkout<B, G>(db: &B, gateway: &G, uid: i32, price: i64) -> Result<Checkout, Error>
where
    B: Begin,
    G: PaymentGateway,
{
    let mut store = db.begin().await?;
    let org = require_organisasi(&mut store, uid).await?;
    let user = UserCommon::get(&mut store, uid).await?.ok_or(Error::NotFound("user not found".into()))?;
    let order_id = order_id(org.id);
    let payment_id = PaymentCommon::insert(
        &mut store,
        Insert {
            organisasi_id: org.id,
            order_id: order_id.clone(),
            amount: price,
        },
    )
    .await?;
    store.commit().await?;

    let request = TransactionRequest {
        order_id: order_id.clone(),
        amount: price,
        customer_name: org.name.clone(),
        customer_email: user.email,
        item_name: "Langganan PRO".into(),
    };
    let tx = match gateway.create_transaction(&request).await {
        Ok(tx) => tx,
        Err(e) => {
            warn!("checkout {} failed at the gateway: {}", order_id, e);
            let mut store = db.begin().await?;
            PaymentCommon::update_status(&mut store, payment_id, StatusUpdate::new(PaymentStatus::Failed)).await?;
            store.commit().await?;
            return Err(e);
        }
    };
    let mut store = db.begin().await?;
    PaymentCommon::set_redirect_url(&mut store, payment_id, &tx.redirect_url).await?;
    store.commit().await?;
    info!("organisasi {} started checkout {}", org.id, order_id);
    Ok(Checkout {
        payment_id,
        order_id,
        amount: price,
        token: tx.token,
        redirect_url: tx.redirect_url,
    })
}

/// Applies a gateway status callback. Repeated notifications leave the payment untouched.
pub async fn handle_notification<T>(mut store: T, n: Notification, server_key: &str, now: DateTime<Utc>) -> Result<PaymentStatus, Error>
where
    T: TxStore,
{
    if !verify_signature(&n, server_key) {
        warn!("rejected notification for {} with a bad signature", n.order_id);
        return Err(Error::Unauthorized("invalid notification signature".into()));
    }
    let incoming = status_from_notification(&n)?;
    let payment = PaymentCommon::get_by_order_for_update(&mut store, &n.order_id)
        .await?
        .ok_or(Error::NotFound("payment not found".into()))?;
    if parse_gross_amount(&n.gross_amount)? != payment.amount {
        warn!("notification amount {} does not match payment {}", n.gross_amount, payment.order_id);
        return Err(Error::BadRequest("gross amount does not match the order".into()));
    }
    let current = payment.status()?;
    let Some(next) = next_status(current, incoming) else {
        info!("payment {} stays {} after {}", payment.order_id, current.as_str(), n.transaction_status);
        return Ok(current);
    };
    PaymentCommon::update_status(
        &mut store,
        payment.id,
        StatusUpdate {
            status: next,
            gateway_status: Some(n.transaction_status.clone()),
            paid_at: if next == PaymentStatus::Paid { Some(now) } else { payment.paid_at },
            confirmed_at: None,
        },
    )
    .await?;
    store.commit().await?;
    info!("payment {} {} -> {}", payment.order_id, current.as_str(), next.as_str());
    Ok(next)
}

/// Confirms a PAID payment and extends the organisasi's PRO plan by `days`.
pub async fn confirm<T>(mut store: T, payment_id: i32, days: i64, now: DateTime<Utc>) -> Result<Subscription, Error>
where
    T: TxStore,
{
    let payment = PaymentCommon::get_for_update(&mut store, payment_id).await?.ok_or(Error::NotFound("payment not found".into()))?;
    if payment.status()? != PaymentStatus::Paid {
        return Err(Error::BadRequest("only PAID payments can be confirmed".into()));
    }
    let org = OrganisasiCommon::get_for_update(&mut store, payment.organisasi_id)
        .await?
        .ok_or(Error::NotFound("organisasi not found".into()))?;
    let start = if org.is_pro(now) { org.plan_expires_at.unwrap_or(now) } else { now };
    let expires_at = start + Duration::days(days);
    OrganisasiCommon::set_plan(&mut store, org.id, Plan::Pro, Some(expires_at)).await?;
    PaymentCommon::update_status(
        &mut store,
        payment.id,
        StatusUpdate {
            status: PaymentStatus::Confirmed,
            gateway_status: payment.gateway_status.clone(),
            paid_at: payment.paid_at,
            confirmed_at: Some(now),
        },
    )
    .await?;
    store.commit().await?;
    info!("payment {} confirmed, organisasi {} is PRO until {}", payment.order_id, org.id, expires_at);
    Ok(Subscription {
        plan: Plan::Pro,
        expires_at: Some(expires_at),
        active: true,
    })
}

pub async fn reject<T>(mut store: T, payment_id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    let payment = PaymentCommon::get_for_update(&mut store, payment_id).await?.ok_or(Error::NotFound("payment not found".into()))?;
    match payment.status()? {
        PaymentStatus::Paid | PaymentStatus::Pending => {}
        s => return Err(Error::BadRequest(format!("a {} payment cannot be rejected", s.as_str()))),
    }
    let mut update = StatusUpdate::new(PaymentStatus::Failed);
    update.gateway_status = payment.gateway_status.clone();
    update.paid_at = payment.paid_at;
    PaymentCommon::update_status(&mut store, payment.id, update).await?;
    store.commit().await?;
    info!("payment {} rejected", payment.order_id);
    Ok(())
}

pub async fn list_payments<D>(db: &mut D, param: Query, pagination: Pagination) -> Result<(Vec<Payment>, i64), Error>
where
    D: PaymentCommon,
{
    let list = PaymentCommon::query(db, &param, pagination).await?;
    let total = PaymentCommon::count(db, &param).await?;
    Ok((list, total))
}

pub async fn my_payments<D>(db: &mut D, uid: i32, pagination: Pagination) -> Result<(Vec<Payment>, i64), Error>
where
    D: OrganisasiCommon + PaymentCommon,
{
    let org = require_organisasi(db, uid).await?;
    list_payments(
        db,
        Query {
            organisasi_id: Some(org.id),
            status: None,
        },
        pagination,
    )
    .await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::payment::test::notification;
    use crate::core::services::memory::{FakeGateway, MemoryStore};

    const KEY: &str = "server-key";

    async fn started(db: &MemoryStore, uid: i32) -> Checkout {
        checkout(db, &FakeGateway::default(), uid, 99_000).await.unwrap()
    }

    async fn payment(db: &MemoryStore, id: i32) -> Payment {
        PaymentCommon::get(&mut db.clone(), id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_checkout() {
        let db = MemoryStore::default();
        let (uid, org) = db.organisasi("BEM");
        let c = started(&db, uid).await;
        assert!(c.order_id.starts_with(&format!("PRO-{}-", org)));
        assert_eq!(c.redirect_url, format!("https://pay.test/{}", c.order_id));
        let p = payment(&db, c.payment_id).await;
        assert_eq!(p.status().unwrap(), PaymentStatus::Pending);
        assert_eq!(p.redirect_url.as_deref(), Some(c.redirect_url.as_str()));

        let failing = FakeGateway { fail: true };
        let err = checkout(&db, &failing, uid, 99_000).await.unwrap_err();
        assert_eq!(err.public_message(), "failed to contact payment gateway");
        let by_status = |status| Query {
            organisasi_id: Some(org),
            status: Some(status),
        };
        let pending = PaymentCommon::query(&mut db.clone(), &by_status(PaymentStatus::Pending), Pagination::new(10, None)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, c.payment_id);
        let failed = PaymentCommon::query(&mut db.clone(), &by_status(PaymentStatus::Failed), Pagination::new(10, None)).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].redirect_url, None);

        let student = db.student("Budi");
        assert!(matches!(checkout(&db, &FakeGateway::default(), student, 99_000).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_notifications() {
        let db = MemoryStore::default();
        let (uid, _) = db.organisasi("BEM");
        let c = started(&db, uid).await;
        let now = Utc::now();

        let forged = notification(&c.order_id, "settlement", "wrong-key");
        assert!(matches!(handle_notification(db.clone(), forged, KEY, now).await, Err(Error::Unauthorized(_))));
        let unknown = notification("PRO-0-missing", "settlement", KEY);
        assert!(matches!(handle_notification(db.clone(), unknown, KEY, now).await, Err(Error::NotFound(_))));
        let refund = notification(&c.order_id, "refund", KEY);
        assert!(matches!(handle_notification(db.clone(), refund, KEY, now).await, Err(Error::BadRequest(_))));

        let status = handle_notification(db.clone(), notification(&c.order_id, "settlement", KEY), KEY, now).await.unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        let paid_at = payment(&db, c.payment_id).await.paid_at;
        assert_eq!(paid_at, Some(now));
        let later = now + Duration::minutes(5);
        assert_eq!(handle_notification(db.clone(), notification(&c.order_id, "settlement", KEY), KEY, later).await.unwrap(), PaymentStatus::Paid);
        assert_eq!(handle_notification(db.clone(), notification(&c.order_id, "pending", KEY), KEY, later).await.unwrap(), PaymentStatus::Paid);
        assert_eq!(payment(&db, c.payment_id).await.paid_at, paid_at);

        confirm(db.clone(), c.payment_id, 30, now).await.unwrap();
        let status = handle_notification(db.clone(), notification(&c.order_id, "expire", KEY), KEY, later).await.unwrap();
        assert_eq!(status, PaymentStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_notification_amount_mismatch() {
        let db = MemoryStore::default();
        let (uid, _) = db.organisasi("BEM");
        let c = checkout(&db, &FakeGateway::default(), uid, 150_000).await.unwrap();
        let n = notification(&c.order_id, "settlement", KEY);
        assert!(matches!(handle_notification(db.clone(), n, KEY, Utc::now()).await, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_confirm_extends_plan() {
        let db = MemoryStore::default();
        let (uid, org) = db.organisasi("BEM");
        let now = Utc::now();
        let first = started(&db, uid).await;
        assert!(matches!(confirm(db.clone(), first.payment_id, 30, now).await, Err(Error::BadRequest(_))));
        handle_notification(db.clone(), notification(&first.order_id, "settlement", KEY), KEY, now).await.unwrap();
        let sub = confirm(db.clone(), first.payment_id, 30, now).await.unwrap();
        assert_eq!(sub.expires_at, Some(now + Duration::days(30)));
        assert!(matches!(confirm(db.clone(), first.payment_id, 30, now).await, Err(Error::BadRequest(_))));

        let second = started(&db, uid).await;
        handle_notification(db.clone(), notification(&second.order_id, "capture", KEY), KEY, now).await.unwrap();
        let sub = confirm(db.clone(), second.payment_id, 30, now + Duration::days(1)).await.unwrap();
        assert_eq!(sub.expires_at, Some(now + Duration::days(60)));

        let current = crate::core::services::organisasi::subscription(&mut db.clone(), uid, now).await.unwrap();
        assert!(current.active);
        assert_eq!(current.plan, Plan::Pro);
        let after_expiry = crate::core::services::organisasi::subscription(&mut db.clone(), uid, now + Duration::days(61)).await.unwrap();
        assert!(!after_expiry.active);

        let (history, total) = my_payments(&mut db.clone(), uid, Pagination::new(10, None)).await.unwrap();
        assert_eq!(total, 2);
        assert!(history.iter().all(|p| p.organisasi_id == org && p.status == "CONFIRMED"));
    }

    #[tokio::test]
    async fn test_reject() {
        let db = MemoryStore::default();
        let (uid, _) = db.organisasi("BEM");
        let c = started(&db, uid).await;
        reject(db.clone(), c.payment_id).await.unwrap();
        assert_eq!(payment(&db, c.payment_id).await.status().unwrap(), PaymentStatus::Failed);
        assert!(matches!(reject(db.clone(), c.payment_id).await, Err(Error::BadRequest(_))));
        let (failed, _) = list_payments(&mut db.clone(), Query { organisasi_id: None, status: Some(PaymentStatus::Failed) }, Pagination::new(10, None)).await.unwrap();
        assert_eq!(failed.len(), 1);
    }
}
