//! RideOps Console - Entry Point
//!
//! Headless mode: authenticates, opens the realtime channel, and streams
//! alert notifications to the terminal until Ctrl-C.

use rideops_console::{
    Category, Config, CredentialStore, NotificationCenter, RealtimeChannel, ResourceGateway,
    SessionManager,
};
use std::collections::HashSet;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("RideOps Console v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage: rideops-console");
        println!();
        println!("Environment variables:");
        println!("  RIDEOPS_API_URL            Admin API base URL");
        println!("  RIDEOPS_SOCKET_URL         Realtime websocket URL");
        println!("  RIDEOPS_EMAIL              Login identifier (email or phone)");
        println!("  RIDEOPS_PASSWORD           Login password");
        println!("  RIDEOPS_SESSION_PATH       Session blob location");
        println!("  RUST_LOG                   Log filter (default: info)");
        return Ok(());
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse::<Level>().ok())
                .unwrap_or(Level::INFO),
        )
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("RideOps Console v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let gateway = ResourceGateway::new(&config.api_base_url, config.http_timeout)?;
    let store = CredentialStore::new(config.session_path.clone());
    let session = SessionManager::new(gateway.clone(), store);

    if !session.is_authenticated() {
        let identifier = std::env::var("RIDEOPS_EMAIL")
            .map_err(|_| anyhow::anyhow!("no stored session and RIDEOPS_EMAIL not set"))?;
        let password = std::env::var("RIDEOPS_PASSWORD")
            .map_err(|_| anyhow::anyhow!("no stored session and RIDEOPS_PASSWORD not set"))?;

        if !session.login(&identifier, &password).await? {
            anyhow::bail!("login rejected: invalid credentials");
        }
    }

    let operator = session
        .identity()
        .map(|i| i.display_name)
        .unwrap_or_else(|| "unknown".to_string());
    info!("Signed in as {}", operator);

    let notifier = NotificationCenter::new();
    let channel = RealtimeChannel::spawn(
        config.socket_url.clone(),
        session.clone(),
        notifier.clone(),
    );

    let mut feed = notifier.subscribe();
    let mut printed: HashSet<Uuid> = HashSet::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                let queue = feed.borrow_and_update().clone();
                for notification in queue.iter() {
                    if printed.contains(&notification.id) {
                        continue;
                    }
                    let marker = match notification.category {
                        Category::Critical => "!!",
                        Category::Warning => " !",
                        Category::Success => "ok",
                        Category::Info => "--",
                    };
                    println!(
                        "[{}] {} {} - {}",
                        notification.created_at.format("%H:%M:%S"),
                        marker,
                        notification.title,
                        notification.body
                    );
                    printed.insert(notification.id);
                }
            }
        }
    }

    info!("Shutting down");
    session.logout();
    channel.shutdown();
    Ok(())
}
