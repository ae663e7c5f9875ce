use anyhow::{Context, Result};
use console::style;
use gdpr_check_core::client::ComplianceApi;
use gdpr_check_core::wire::HealthResponse;

pub async fn run<A: ComplianceApi + ?Sized>(api: &A) -> Result<()> {
    let health = ensure_reachable(api).await?;
    eprintln!("{} {}", style("●").green(), health.message);
    eprintln!("  Status: {}", health.status);
    eprintln!("  Server time: {}", health.timestamp);
    Ok(())
}

/// Fails with a readable message when the server is down.
pub async fn ensure_reachable<A: ComplianceApi + ?Sized>(api: &A) -> Result<HealthResponse> {
    api.health()
        .await
        .context("Cannot reach the compliance API. Is gdpr-check-web running?")
}
