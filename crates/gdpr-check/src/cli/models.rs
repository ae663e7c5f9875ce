use anyhow::Result;
use console::style;
use gdpr_check_core::client::ComplianceApi;

pub async fn run<A: ComplianceApi + ?Sized>(api: &A) -> Result<()> {
    let response = api.models().await?;

    if response.models.is_empty() {
        eprintln!("No models available");
        return Ok(());
    }

    for model in &response.models {
        if *model == response.default_model {
            println!("{} {}", style(model).bold(), style("(default)").dim());
        } else {
            println!("{model}");
        }
    }
    Ok(())
}
