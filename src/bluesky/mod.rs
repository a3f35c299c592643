pub mod client;
pub mod types;

use crate::post::richtext::RichText;
use anyhow::Result;
use async_trait::async_trait;

/// Publish capability: creates one public post from a rich-text
/// document. A rejected or failed post is an error; the runner treats
/// it as fatal for the run.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, post: &RichText) -> Result<()>;
}
