use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::monitor::Notifier;

/// Delivers messages as Discord direct messages via the REST API.
///
/// The DM channel is opened lazily on first send and the channel id is
/// cached for the life of the process.
#[derive(Debug)]
pub struct DiscordClient {
    http: Client,
    base_url: String,
    bot_token: String,
    recipient_id: String,
    dm_channel_id: Mutex<Option<String>>,
}

#[derive(Debug, Serialize)]
struct OpenDmRequest<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct DmChannel {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    content: &'a str,
}

impl DiscordClient {
    pub fn new(base_url: String, bot_token: String, recipient_id: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            bot_token,
            recipient_id,
            dm_channel_id: Mutex::new(None),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    async fn dm_channel_id(&self) -> Result<String> {
        let mut cached = self.dm_channel_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let url = format!("{}/users/@me/channels", self.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&OpenDmRequest {
                recipient_id: &self.recipient_id,
            })
            .send()
            .await
            .with_context(|| format!("Discord open-DM request failed: {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Discord open-DM non-2xx: {status} body={text}");
        }

        let channel: DmChannel = resp
            .json()
            .await
            .context("Discord open-DM response was not the expected JSON")?;
        *cached = Some(channel.id.clone());
        Ok(channel.id)
    }
}

#[async_trait]
impl Notifier for DiscordClient {
    async fn send(&self, message: &str) -> Result<()> {
        let channel_id = self.dm_channel_id().await?;
        let url = format!(
            "{}/channels/{}/messages",
            self.base_url.trim_end_matches('/'),
            channel_id
        );

        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&CreateMessageRequest { content: message })
            .send()
            .await
            .with_context(|| format!("Discord message request failed: {url}"))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Discord message non-2xx: {status} body={text}");
        }
        Ok(())
    }
}
