//! Delete announcements whose visibility window has closed.
//! Run periodically (e.g., via cron job: 0 3 * * * /app/purge-expired)
//!
//! Usage: purge-expired [--dry-run]
//!   --dry-run : Only count the expired announcements

use chrono::Utc;
use clap::Parser;

use bulletin_api::{
    db::{self, AnnouncementStore},
    services::announcements::AnnouncementService,
};

#[derive(Parser)]
#[command(name = "purge-expired", about = "Purge expired announcements from the database")]
struct Args {
    /// Report how many announcements would be removed without deleting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let uri = std::env::var("MONGODB_URI")
        .map_err(|_| anyhow::anyhow!("MONGODB_URI environment variable not set"))?;
    let database = std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "bulletin".into());
    let collection =
        std::env::var("ANNOUNCEMENTS_COLLECTION").unwrap_or_else(|_| "announcements".into());

    let store = db::connect(&uri, &database, &collection).await?;

    let now = Utc::now();
    if args.dry_run {
        let count = store.count_expired(now).await?;
        tracing::info!("{} announcements expired before {}", count, now);
    } else {
        tracing::info!("Starting expired announcement purge...");
        AnnouncementService::purge_expired(&store, now).await?;
    }

    Ok(())
}
