use super::types::{CreateRecordRequest, CreateSessionRequest, CreateSessionResponse, PostRecord};
use super::Publisher;
use crate::post::richtext::RichText;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POST_COLLECTION: &str = "app.bsky.feed.post";
const POST_TYPE: &str = "app.bsky.feed.post";

pub struct BlueskyClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
}

struct Session {
    access_jwt: String,
    did: String,
}

impl BlueskyClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: None,
        }
    }

    /// Authenticate with a handle + app password and keep the session
    /// token for subsequent posts.
    pub async fn login(&mut self, handle: &str, app_password: &str) -> Result<()> {
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&CreateSessionRequest {
                identifier: handle,
                password: app_password,
            })
            .send()
            .await
            .context("createSession request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Bluesky login failed ({}): {}", status, body);
        }
        let session: CreateSessionResponse = resp
            .json()
            .await
            .context("failed to parse createSession response")?;
        self.session = Some(Session {
            access_jwt: session.access_jwt,
            did: session.did,
        });
        Ok(())
    }
}

#[async_trait]
impl Publisher for BlueskyClient {
    async fn publish(&self, post: &RichText) -> Result<()> {
        let session = self
            .session
            .as_ref()
            .context("not logged in to Bluesky (call login first)")?;

        let url = format!("{}/xrpc/com.atproto.repo.createRecord", self.base_url);
        let request = CreateRecordRequest {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: PostRecord {
                record_type: POST_TYPE,
                text: post.build_text(),
                facets: post.facets(),
                created_at: Utc::now().to_rfc3339(),
            },
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&session.access_jwt)
            .json(&request)
            .send()
            .await
            .context("createRecord request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Bluesky post failed ({}): {}", status, body);
        }
        Ok(())
    }
}
