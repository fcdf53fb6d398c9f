use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use seatwatch_core::{extract_sections, SectionRecord};

use crate::monitor::SectionSource;

/// Fetches the schedule page and extracts the monitored course's sections.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    client: Client,
    url: String,
    course_title: String,
}

impl ScheduleClient {
    pub fn new(url: String, course_title: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
            course_title,
        }
    }

    async fn fetch_page(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("schedule page request failed: {}", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("schedule page non-2xx: {status} url={}", self.url);
        }

        resp.text()
            .await
            .context("failed to read schedule page body")
    }
}

#[async_trait]
impl SectionSource for ScheduleClient {
    async fn fetch(&self) -> Result<Vec<SectionRecord>> {
        let page = self.fetch_page().await?;
        Ok(extract_sections(&page, &self.course_title)?)
    }
}
