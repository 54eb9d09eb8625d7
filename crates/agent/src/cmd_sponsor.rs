//! Gas-sponsor service commands: `doci sponsor health` and
//! `doci sponsor stats`.
//!
//! Exit code 1 when the sponsor reports itself unhealthy, so scripts
//! can alert on a depleted fee payer.

use anyhow::Result;
use doci_backend::SponsorClient;
use doci_common::config::ClientConfig;

use crate::context;

/// Returns `false` when the service is unhealthy.
pub async fn handle_health(config: &ClientConfig) -> Result<bool> {
    let client = SponsorClient::new(context::transport(config)?);
    let health = client.health().await?;

    println!(
        "Sponsor service: {}",
        if health.healthy { "HEALTHY" } else { "UNHEALTHY" }
    );
    if let Some(balance) = health.fee_payer_balance_sol {
        println!("Fee payer balance: {} SOL", balance);
    }
    if let Some(message) = health.message {
        println!("Note: {}", message);
    }
    Ok(health.healthy)
}

pub async fn handle_stats(config: &ClientConfig) -> Result<()> {
    let client = SponsorClient::new(context::transport(config)?);
    let stats = client.stats().await?;

    println!("Sponsored transactions: {}", stats.total_sponsored);
    println!("Gas spent: {} SOL", stats.total_gas_spent_sol);
    if !stats.by_type.is_empty() {
        println!("By type:");
        let mut entries: Vec<_> = stats.by_type.iter().collect();
        entries.sort();
        for (tx_type, count) in entries {
            println!("  {:<24} {}", tx_type, count);
        }
    }
    Ok(())
}
