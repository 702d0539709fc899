use std::time::Duration;

use log::error;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::AiConfig;
use crate::core::ai::Generator;
use crate::error::Error;

/// Text generation over a plain JSON endpoint: `{"model", "prompt"}` in, `{"text"}` out.
pub struct HttpGenerator {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

impl HttpGenerator {
    pub fn new(config: &AiConfig) -> Result<Self, Error> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build AI client: {}", e)))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

/// Accepts `{"text": ..}` and the `candidates[0].content.parts[0].text` shape.
fn extract_text(body: &Value) -> Option<&str> {
    body.get("text")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/candidates/0/content/parts/0/text").and_then(Value::as_str))
}

impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let mut req = self.client.post(&self.url).json(&GenerateRequest { model: &self.model, prompt });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.map_err(|e| {
            error!("AI request failed: {}", e);
            Error::AiService(e.to_string())
        })?;
        let status = resp.status();
        if !status.is_success() {
            error!("AI service answered HTTP {}", status);
            return Err(Error::AiService(format!("HTTP {}", status)));
        }
        let body: Value = resp.json().await.map_err(|e| Error::AiService(format!("unreadable body: {}", e)))?;
        extract_text(&body)
            .map(str::to_owned)
            .ok_or(Error::AiResponse("response carries no generated text".into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text() {
        assert_eq!(extract_text(&json!({"text": "<p>hi</p>"})), Some("<p>hi</p>"));
        let nested = json!({"candidates": [{"content": {"parts": [{"text": "[1]"}]}}]});
        assert_eq!(extract_text(&nested), Some("[1]"));
        assert_eq!(extract_text(&json!({"text": 3})), None);
        assert_eq!(extract_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(GenerateRequest { model: "m", prompt: "p" }).unwrap();
        assert_eq!(body, json!({"model": "m", "prompt": "p"}));
    }
}
