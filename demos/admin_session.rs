//! Log in, list upcoming events by month and print the ledger
//!
//! Usage:
//!   GRUPOPAZ_EMAIL=... GRUPOPAZ_PASSWORD=... cargo run --example admin_session

use grupopaz_client::format::{format_date, format_money};
use grupopaz_client::schedule::{filter_future_events, group_events_by_month};
use grupopaz_client::{AuthenticatedHttpClient, ClientConfig, FileStore, SessionState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::from_env()?;
    println!("=== GrupoPaz client ===");
    println!("API: {}", config.base_url);

    let client = AuthenticatedHttpClient::connect(config, FileStore::open_default()?)?;

    if client.session_state() == SessionState::NoSession {
        let email = std::env::var("GRUPOPAZ_EMAIL")?;
        let password = std::env::var("GRUPOPAZ_PASSWORD")?;
        let login = client.login(&email, &password).await?;
        println!("Logged in as {} <{}>", login.admin.name, login.admin.email);
    } else {
        println!("Reusing stored session");
    }

    let events = client.get_events().await?;
    let upcoming = filter_future_events(&events, chrono::Utc::now());
    for group in group_events_by_month(&upcoming) {
        println!();
        println!("{}", group.label);
        for event in group.events {
            println!("  {}  {}", format_date(&event.date_time), event.title);
        }
    }

    match client.get_secretariat().await {
        Ok(summary) => {
            println!();
            println!("Caixa: {}", format_money(summary.cash_value));
            println!("PIX:   {}", format_money(summary.pix_value));
        }
        Err(e) => println!("Secretariat unavailable: {}", e.message()),
    }

    Ok(())
}
