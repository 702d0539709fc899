use hex::ToHex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::core::models::payment::PaymentStatus;
use crate::error::Error;

pub trait PaymentGateway {
    async fn create_transaction(&self, req: &TransactionRequest) -> Result<Transaction, Error>;
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub order_id: String,
    pub amount: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub item_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub token: String,
    pub redirect_url: String,
}

/// Body of the gateway's server-to-server status callback.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
}

pub fn order_id(organisasi_id: i32) -> String {
    format!("PRO-{}-{}", organisasi_id, uuid::Uuid::new_v4().simple())
}

pub fn signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id);
    hasher.update(status_code);
    hasher.update(gross_amount);
    hasher.update(server_key);
    hasher.finalize().encode_hex()
}

pub fn verify_signature(n: &Notification, server_key: &str) -> bool {
    signature(&n.order_id, &n.status_code, &n.gross_amount, server_key).eq_ignore_ascii_case(n.signature_key.trim())
}

pub fn status_from_notification(n: &Notification) -> Result<PaymentStatus, Error> {
    match n.transaction_status.as_str() {
        "capture" if n.fraud_status.as_deref() == Some("challenge") => Ok(PaymentStatus::Pending),
        "capture" | "settlement" => Ok(PaymentStatus::Paid),
        "pending" => Ok(PaymentStatus::Pending),
        "deny" | "cancel" | "failure" => Ok(PaymentStatus::Failed),
        "expire" => Ok(PaymentStatus::Expired),
        s => Err(Error::BadRequest(format!("unknown transaction status({})", s))),
    }
}

/// The status a payment moves to after a notification, or `None` when it stays unchanged.
pub fn next_status(current: PaymentStatus, incoming: PaymentStatus) -> Option<PaymentStatus> {
    use PaymentStatus::*;
    match (current, incoming) {
        (c, i) if c == i => None,
        (Confirmed, _) => None,
        (Paid, Pending) => None,
        (Failed | Expired, Paid) => Some(Paid),
        (Failed | Expired, _) => None,
        (_, i) => Some(i),
    }
}

/// Gross amount as sent by the gateway ("99000.00") in whole currency units.
pub fn parse_gross_amount(s: &str) -> Result<i64, Error> {
    let v: f64 = s.trim().parse().map_err(|_| Error::BadRequest(format!("invalid gross amount({})", s)))?;
    if !v.is_finite() || v < 0.0 {
        return Err(Error::BadRequest(format!("invalid gross amount({})", s)));
    }
    Ok(v.round() as i64)
}
