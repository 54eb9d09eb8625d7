//! Profile and CV-status commands.
//!
//! - `doci cv-status --wallet <ADDRESS>` — can this wallet submit?
//! - `doci profile show --wallet <ADDRESS>` — full researcher profile.

use anyhow::Result;
use doci_backend::ProfileClient;
use doci_common::config::ClientConfig;
use doci_common::types::ResearcherProfile;

use crate::context;

pub async fn handle_cv_status(config: &ClientConfig, wallet: &str, json: bool) -> Result<()> {
    let wallet = context::require_wallet(wallet)?;
    let client = ProfileClient::new(context::transport(config)?);
    let status = client.check_cv_status(wallet).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    if status.has_cv {
        println!("CV registered: yes");
        println!(
            "Can submit manuscripts: {}",
            if status.can_submit_manuscripts { "yes" } else { "no" }
        );
        if let Some(info) = status.user_info {
            println!("Researcher: {} ({})", info.name, info.institution);
        }
    } else {
        println!("CV registered: no");
        println!("Register a CV at /register-cv before submitting.");
    }
    Ok(())
}

pub async fn handle_profile_show(config: &ClientConfig, wallet: &str, json: bool) -> Result<()> {
    let wallet = context::require_wallet(wallet)?;
    let client = ProfileClient::new(context::transport(config)?);
    let profile = client.fetch_profile(wallet).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }
    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &ResearcherProfile) {
    println!("{}", profile.full_name);
    println!("  Institution:    {}", profile.institution);
    println!("  Profession:     {}", profile.profession);
    println!("  Field:          {}", profile.field);
    println!("  Specialization: {}", profile.specialization);
    println!("  Email:          {}", profile.email);
    if !profile.publications.is_empty() {
        println!("  Publications:   {}", profile.publications.len());
    }
    if !profile.education.is_empty() {
        println!("  Education entries: {}", profile.education.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doci_common::ClientError;

    #[tokio::test]
    async fn test_blank_wallet_surfaces_missing_wallet() {
        let config = ClientConfig::default();
        let err = handle_cv_status(&config, "  ", false)
            .await
            .expect_err("blank wallet");
        assert_eq!(
            err.downcast_ref::<ClientError>(),
            Some(&ClientError::MissingWallet)
        );
    }
}
