use super::recency::recent_items;
use crate::bluesky::Publisher;
use crate::orcid::Registry;
use crate::post::compose::compose_post;
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;

/// Settings for one announcement run, taken from the loaded config.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub orcid_ids: Vec<String>,
    pub days_back: u32,
    pub max_posts_total: u32,
    pub hashtags: Vec<String>,
    pub post_delay: Duration,
}

/// Drives one run: per identifier, resolve the display name (cached),
/// fetch works, filter by recency, then compose and publish up to the
/// remaining global budget with a pause between posts.
pub struct AnnouncementRunner<'a> {
    registry: &'a dyn Registry,
    publisher: &'a dyn Publisher,
    settings: RunSettings,
    // Per-run cache, owned here so repeated runs in one process start clean
    name_cache: HashMap<String, String>,
}

impl<'a> AnnouncementRunner<'a> {
    pub fn new(
        registry: &'a dyn Registry,
        publisher: &'a dyn Publisher,
        settings: RunSettings,
    ) -> Self {
        Self {
            registry,
            publisher,
            settings,
            name_cache: HashMap::new(),
        }
    }

    /// Run the pipeline to completion. A works-fetch or publish error
    /// aborts the whole run; posts already published stay published.
    /// Returns the total number of posts made.
    pub async fn run(&mut self) -> Result<u32> {
        let cutoff = Utc::now() - chrono::Duration::days(self.settings.days_back as i64);
        let max_posts = self.settings.max_posts_total;
        let mut posted = 0u32;

        for orcid_id in self.settings.orcid_ids.clone() {
            if posted >= max_posts {
                tracing::info!(posted, "post budget exhausted, stopping");
                break;
            }

            tracing::info!(orcid_id = %orcid_id, "checking ORCID iD");
            let author_name = self.resolve_name(&orcid_id).await;

            let groups = self
                .registry
                .fetch_works(&orcid_id)
                .await
                .with_context(|| format!("works fetch failed for {}", orcid_id))?;
            let items = recent_items(&orcid_id, &groups, cutoff);
            tracing::info!(
                orcid_id = %orcid_id,
                groups = groups.len(),
                recent = items.len(),
                "filtered works"
            );
            if items.is_empty() {
                continue;
            }

            for item in items {
                if posted >= max_posts {
                    break;
                }
                let post = compose_post(&item, &author_name, &self.settings.hashtags);
                let preview = post.build_text().replace('\n', " | ");
                tracing::info!(orcid_id = %orcid_id, preview = %preview, "posting");

                self.publisher
                    .publish(&post)
                    .await
                    .with_context(|| format!("publish failed for {}", orcid_id))?;
                posted += 1;

                // Courtesy pause between posts (Bluesky rate limits)
                tokio::time::sleep(self.settings.post_delay).await;
            }
        }

        Ok(posted)
    }

    /// Cache-or-fetch: at most one person lookup per distinct iD per run.
    async fn resolve_name(&mut self, orcid_id: &str) -> String {
        if let Some(name) = self.name_cache.get(orcid_id) {
            return name.clone();
        }
        let name = self.registry.fetch_display_name(orcid_id).await;
        self.name_cache.insert(orcid_id.to_string(), name.clone());
        name
    }
}
