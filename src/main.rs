use anyhow::Result;
use orcid_announcer::bluesky::client::BlueskyClient;
use orcid_announcer::config::Config;
use orcid_announcer::engine::runner::{AnnouncementRunner, RunSettings};
use orcid_announcer::orcid::client::OrcidClient;
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orcid_announcer=info".into()),
        )
        .init();

    let config = Config::load(Path::new("config.toml"))?;

    // Load saved credentials from .env (real env vars take precedence)
    Config::load_env_file();

    println!();
    println!("  ORCID Announcer v0.1.0");
    println!("  ======================");
    println!();
    println!(
        "  Checking {} ORCID iD(s), window {} day(s), budget {} post(s)",
        config.orcid.ids.len(),
        config.orcid.days_back,
        config.announce.max_posts_total,
    );
    println!();

    let handle = Config::bluesky_handle()?;
    let app_password = Config::bluesky_app_password()?;

    let registry = OrcidClient::new(&config.orcid.api_base);
    let mut publisher = BlueskyClient::new(&config.bluesky.api_base);
    publisher.login(&handle, &app_password).await?;
    tracing::info!(handle = %handle, "logged in to Bluesky");

    let settings = RunSettings {
        orcid_ids: config.orcid.ids.clone(),
        days_back: config.orcid.days_back,
        max_posts_total: config.announce.max_posts_total,
        hashtags: config.announce.hashtags.clone(),
        post_delay: Duration::from_millis(config.announce.post_delay_ms),
    };

    let mut runner = AnnouncementRunner::new(&registry, &publisher, settings);
    let posted = runner.run().await?;

    println!("  Done, posted {} item(s).", posted);
    Ok(())
}
