use anyhow::Result;
use console::style;
use gdpr_check_core::client::{ComplianceApi, Poller};

use super::{await_report, view};
use crate::state::{StateFile, Step};

pub async fn run<A: ComplianceApi + ?Sized>(api: &A, store: &StateFile, json: bool) -> Result<()> {
    let Some(mut saved) = store.load()? else {
        eprintln!("Nothing to resume");
        eprintln!("  Run 'gdprc check <file>' to analyze a document");
        return Ok(());
    };

    if let (Step::Report, Some(report)) = (saved.current_step, &saved.report_data) {
        return view::print(report, json);
    }

    let poller = Poller::new(api);
    let report_id = match (saved.report_id, saved.document_id) {
        (Some(report_id), _) => report_id,
        (None, Some(document_id)) => {
            eprintln!("{} Restarting analysis of {document_id}", style("↻").yellow());
            let report_id = poller.start_analysis(document_id).await?;
            saved.report_id = Some(report_id);
            store.save(&saved)?;
            report_id
        }
        (None, None) => {
            eprintln!("No document uploaded yet");
            return Ok(());
        }
    };

    await_report(&poller, store, saved, report_id, json).await
}
