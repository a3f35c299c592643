use super::types::{PersonResponse, WorkGroup, WorksResponse};
use super::Registry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const ACCEPT_JSON: &str = "application/vnd.orcid+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OrcidClient {
    client: Client,
    base_url: String,
}

impl OrcidClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_person(&self, orcid_id: &str) -> Result<PersonResponse> {
        let url = format!("{}/{}/person", self.base_url, orcid_id);
        let resp = self
            .client
            .get(&url)
            .header("Accept", ACCEPT_JSON)
            .send()
            .await
            .context("GET person failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET person for {} failed ({}): {}", orcid_id, status, body);
        }
        resp.json().await.context("failed to parse person response")
    }
}

#[async_trait]
impl Registry for OrcidClient {
    async fn fetch_works(&self, orcid_id: &str) -> Result<Vec<WorkGroup>> {
        let url = format!("{}/{}/works", self.base_url, orcid_id);
        let resp = self
            .client
            .get(&url)
            .header("Accept", ACCEPT_JSON)
            .send()
            .await
            .context("GET works failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET works for {} failed ({}): {}", orcid_id, status, body);
        }
        let parsed: WorksResponse = resp.json().await.context("failed to parse works response")?;
        Ok(parsed.group)
    }

    async fn fetch_display_name(&self, orcid_id: &str) -> String {
        match self.fetch_person(orcid_id).await {
            Ok(person) => person
                .name
                .and_then(|n| n.display_name())
                .unwrap_or_else(|| orcid_id.to_string()),
            Err(e) => {
                tracing::warn!(orcid_id, error = %e, "name lookup degraded to raw iD");
                orcid_id.to_string()
            }
        }
    }
}
