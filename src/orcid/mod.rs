pub mod client;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::WorkGroup;

/// Public profile URL for an ORCID iD (used as the author link target).
pub fn profile_url(orcid_id: &str) -> String {
    format!("https://orcid.org/{}", orcid_id)
}

/// Read capability against the bibliographic registry.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch the work groups recorded for an ORCID iD.
    /// Fails on network/HTTP errors; an empty record set is Ok(vec![]).
    async fn fetch_works(&self, orcid_id: &str) -> Result<Vec<WorkGroup>>;

    /// Resolve the display name for an ORCID iD. Never fails: any
    /// lookup problem degrades to returning the iD itself.
    async fn fetch_display_name(&self, orcid_id: &str) -> String;
}
