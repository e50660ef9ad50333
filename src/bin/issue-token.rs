//! Mint an access token for a username, signed with JWT_SECRET.
//!
//! Usage: issue-token --username alice [--ttl-seconds 3600]

use clap::Parser;

use bulletin_api::services::auth::AuthService;

#[derive(Parser)]
#[command(name = "issue-token", about = "Issue a bearer token for the announcements API")]
struct Args {
    /// Username recorded as `created_by` on announcements posted with this token
    #[arg(long)]
    username: String,

    /// Token lifetime (defaults to JWT_EXPIRY_SECONDS, then 900)
    #[arg(long)]
    ttl_seconds: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let ttl = match args.ttl_seconds {
        Some(ttl) => ttl,
        None => std::env::var("JWT_EXPIRY_SECONDS")
            .unwrap_or_else(|_| "900".into())
            .parse()?,
    };

    let token = AuthService::generate_access_token(&args.username, &secret, ttl)?;
    println!("{token}");
    Ok(())
}
