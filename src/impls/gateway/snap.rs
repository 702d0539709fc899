use std::time::Duration;

use log::error;
use reqwest::{Client, ClientBuilder};
use serde_json::{json, Value};

use crate::config::PaymentConfig;
use crate::core::payment::{PaymentGateway, Transaction, TransactionRequest};
use crate::error::Error;

/// Snap-style checkout API authenticated with the merchant server key.
pub struct SnapGateway {
    client: Client,
    url: String,
    server_key: String,
}

impl SnapGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, Error> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build payment client: {}", e)))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            server_key: config.server_key.clone(),
        })
    }
}

fn transaction_body(req: &TransactionRequest) -> Value {
    json!({
        "transaction_details": {
            "order_id": req.order_id,
            "gross_amount": req.amount,
        },
        "customer_details": {
            "first_name": req.customer_name,
            "email": req.customer_email,
        },
        "item_details": [{
            "id": "PRO",
            "price": req.amount,
            "quantity": 1,
            "name": req.item_name,
        }],
    })
}

impl PaymentGateway for SnapGateway {
    async fn create_transaction(&self, req: &TransactionRequest) -> Result<Transaction, Error> {
        let resp = self
            .client
            .post(&self.url)
            .basic_auth(&self.server_key, Some(""))
            .json(&transaction_body(req))
            .send()
            .await
            .map_err(|e| {
                error!("payment request for {} failed: {}", req.order_id, e);
                Error::PaymentGateway(e.to_string())
            })?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            error!("payment gateway answered HTTP {} for {}: {}", status, req.order_id, text);
            return Err(Error::PaymentGateway(format!("HTTP {}", status)));
        }
        resp.json().await.map_err(|e| Error::PaymentGateway(format!("unreadable body: {}", e)))
    }
}
