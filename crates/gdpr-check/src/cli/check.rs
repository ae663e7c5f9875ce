use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use gdpr_check_core::client::{check_upload, ComplianceApi, Poller};

use super::await_report;
use crate::state::{SavedState, StateFile};

pub async fn run<A: ComplianceApi + ?Sized>(
    api: &A,
    store: &StateFile,
    path: &Path,
    json: bool,
) -> Result<()> {
    super::health::ensure_reachable(api).await?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a file: {}", path.display()))?
        .to_string();
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    check_upload(&filename, data.len())?;

    store.clear()?;
    let upload = api.upload(&filename, data).await?;
    eprintln!(
        "{} Uploaded {} ({} words, {} KB)",
        style("✓").green(),
        style(&filename).bold(),
        upload.metadata.word_count,
        upload.metadata.size_kb
    );

    let mut saved = SavedState::uploaded(upload.document_id);
    store.save(&saved)?;

    let poller = Poller::new(api);
    let report_id = poller.start_analysis(upload.document_id).await?;
    saved.report_id = Some(report_id);
    store.save(&saved)?;
    eprintln!("{} Analysis started", style("✓").green());

    await_report(&poller, store, saved, report_id, json).await
}
