use reqwest::Client;
use serde_json::{json, Value};
use anyhow::{anyhow, Result};

#[derive(Clone)]
pub struct ExpoPushService {
    client: Client,
    push_url: String,
}

impl ExpoPushService {
    pub fn new(push_url: String) -> Self {
        Self {
            client: Client::new(),
            push_url,
        }
    }

    fn build_message(token: &str, title: &str, body: &str, screen: &str, data: &Value) -> Value {
        json!({
            "to": token,
            "sound": "default",
            "title": title,
            "body": body,
            "data": {
                "screen": screen,
                "data": data,
            },
        })
    }

    /// One delivery attempt against the push gateway. No retry, no queueing;
    /// a non-2xx response or transport error is the caller's to swallow.
    pub async fn send_push(
        &self,
        token: &str,
        title: &str,
        body: &str,
        screen: &str,
        data: &Value,
    ) -> Result<()> {
        let message = Self::build_message(token, title, body, screen, data);

        log::debug!("Sending push notification to {}", token);

        let response = self
            .client
            .post(&self.push_url)
            .header("Accept", "application/json")
            .header("Accept-Encoding", "gzip, deflate")
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Push send failed: Status {}, Body: {}", status, error_text));
        }

        Ok(())
    }
}
