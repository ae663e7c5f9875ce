pub mod check;
pub mod health;
pub mod models;
pub mod reset;
pub mod resume;
pub mod view;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use console::style;
use gdpr_check_core::client::{ComplianceApi, PollOutcome, Poller, DEFAULT_API_URL};
use gdpr_check_core::ReportId;

use crate::state::{SavedState, StateFile};

#[derive(Parser)]
#[command(
    name = "gdprc",
    about = "Check privacy documents for GDPR compliance",
    version
)]
pub struct Cli {
    /// Base URL of the compliance API
    #[arg(long, env = "GDPR_CHECK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,
    /// File used to remember progress between runs
    #[arg(long, env = "GDPR_CHECK_STATE", global = true)]
    pub state: Option<PathBuf>,
    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a document and wait for its compliance report
    Check {
        /// PDF, DOC, DOCX or TXT file
        file: PathBuf,
    },
    /// Show the last report, or keep waiting for it
    Resume,
    /// Forget the saved document and report
    Reset,
    /// Check that the API is reachable
    Health,
    /// List the models the server can analyze with
    Models,
}

/// Polls until the report settles, saving it when it does.
async fn await_report<A: ComplianceApi + ?Sized>(
    poller: &Poller<'_, A>,
    store: &StateFile,
    mut saved: SavedState,
    report_id: ReportId,
    json: bool,
) -> Result<()> {
    eprintln!("  Waiting for report {}", style(report_id).dim());

    match poller.wait_for_report(report_id).await? {
        PollOutcome::Completed(report) => {
            view::print(&report, json)?;
            saved.finish(report);
            store.save(&saved)?;
            Ok(())
        }
        PollOutcome::Failed(report) => {
            let error = report.error().unwrap_or("unknown error").to_string();
            // Kept so `resume` shows the failure instead of polling again
            saved.finish(report);
            store.save(&saved)?;
            bail!("Analysis failed: {error}")
        }
        PollOutcome::TimedOut {
            attempts,
            last_error,
        } => {
            if let Some(e) = last_error {
                eprintln!("  Last error: {e}");
            }
            eprintln!("  Run 'gdprc resume' to keep waiting");
            bail!("Report was not ready after {attempts} checks")
        }
    }
}
