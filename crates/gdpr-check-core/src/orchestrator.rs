use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};

use crate::analysis::ComplianceAnalyzer;
use crate::document::{Document, DocumentId};
use crate::report::{Report, ReportId, ReportState};
use crate::storage::{DocumentStore, ReportStore};
use crate::{Error, Result};

/// Drives reports from `processing` to a terminal state.
///
/// Each report is written twice: once as `processing` before the background
/// task exists, and once more with its terminal state by that task.
#[derive(Clone)]
pub struct Orchestrator {
    documents: Arc<dyn DocumentStore>,
    reports: Arc<dyn ReportStore>,
    analyzer: Arc<dyn ComplianceAnalyzer>,
}

impl Orchestrator {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        reports: Arc<dyn ReportStore>,
        analyzer: Arc<dyn ComplianceAnalyzer>,
    ) -> Self {
        Self {
            documents,
            reports,
            analyzer,
        }
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.documents
    }

    pub fn analyzer(&self) -> &Arc<dyn ComplianceAnalyzer> {
        &self.analyzer
    }

    /// Writes the `processing` record and returns the work that completes it.
    /// Nothing is written when the document does not exist.
    pub async fn schedule_analysis(&self, document_id: DocumentId) -> Result<AnalysisTask> {
        let document = self
            .documents
            .get(document_id)
            .await?
            .ok_or(Error::DocumentNotFound(document_id))?;

        let report = Report::processing(document.id, document.name());
        self.reports.put(report.clone()).await?;

        Ok(AnalysisTask {
            report,
            document,
            reports: Arc::clone(&self.reports),
            analyzer: Arc::clone(&self.analyzer),
        })
    }

    /// Starts analysis in the background and returns the report id
    /// immediately.
    pub async fn start_analysis(&self, document_id: DocumentId) -> Result<ReportId> {
        let task = self.schedule_analysis(document_id).await?;
        let report_id = task.report_id();

        let span = info_span!("analysis", %report_id, %document_id);
        tokio::spawn(task.run().instrument(span));

        info!(%report_id, %document_id, "Analysis started");
        Ok(report_id)
    }

    pub async fn get_report(&self, report_id: ReportId) -> Result<Report> {
        self.reports
            .get(report_id)
            .await?
            .ok_or(Error::ReportNotFound(report_id))
    }

    pub async fn document_count(&self) -> Result<usize> {
        self.documents.len().await
    }

    pub async fn report_count(&self) -> Result<usize> {
        self.reports.len().await
    }
}

/// Background half of an analysis: owns the `processing` report and writes
/// its single terminal state.
pub struct AnalysisTask {
    report: Report,
    document: Document,
    reports: Arc<dyn ReportStore>,
    analyzer: Arc<dyn ComplianceAnalyzer>,
}

impl AnalysisTask {
    pub const fn report_id(&self) -> ReportId {
        self.report.id
    }

    pub async fn run(self) {
        let Self {
            report,
            document,
            reports,
            analyzer,
        } = self;
        let report_id = report.id;

        let outcome = async {
            let analysis = analyzer
                .assess_compliance(&document.content, document.name())
                .await?;
            let improvements = analyzer.suggest_improvements(&analysis).await?;
            Ok::<_, crate::analysis::AnalyzerError>((analysis, improvements))
        }
        .await;

        let pending = report.clone();
        let finished = match outcome {
            Ok((analysis, improvements)) => {
                info!(
                    score = analysis.overall_score,
                    level = %analysis.compliance_level,
                    degraded = analysis.is_degraded(),
                    "Analysis completed"
                );
                report.complete(analysis, improvements)
            }
            Err(e) => {
                error!(error = %e, "Analysis failed");
                report.fail(e.to_string())
            }
        };

        let completed = matches!(finished.state, ReportState::Completed { .. });
        let Err(e) = reports.put(finished).await else {
            return;
        };
        error!(%report_id, error = %e, "Failed to store analysis outcome");

        // Without a terminal write the report would read `processing` forever
        if completed {
            let fallback = pending.fail(format!("Failed to store analysis result: {e}"));
            if let Err(e) = reports.put(fallback).await {
                error!(%report_id, error = %e, "Failed to store analysis failure");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use uuid::Uuid;

    use super::*;
    use crate::analysis::{
        AnalysisResult, AnalyzerError, AnalyzerResult, ComplianceLevel, ImprovementSuggestions,
    };
    use crate::document::DocumentMetadata;
    use crate::ingest::MediaType;
    use crate::storage::{MemoryDocumentStore, MemoryReportStore};

    fn fixed_analysis() -> AnalysisResult {
        AnalysisResult {
            overall_score: 73,
            compliance_level: ComplianceLevel::MostlyCompliant,
            summary: "Mostly there".into(),
            strengths: vec!["Lawful basis stated".into()],
            weaknesses: vec!["No DPIA".into()],
            recommendations: vec!["Carry out a DPIA".into()],
            detailed_analysis: None,
            raw_response: None,
            error: None,
        }
    }

    #[derive(Default)]
    struct MockAnalyzer {
        fail_assess: bool,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ComplianceAnalyzer for MockAnalyzer {
        async fn assess_compliance(&self, _text: &str, _name: &str) -> AnalyzerResult<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_assess {
                return Err(AnalyzerError::Api {
                    status: 503,
                    message: "model overloaded".into(),
                });
            }
            Ok(fixed_analysis())
        }

        async fn suggest_improvements(
            &self,
            _analysis: &AnalysisResult,
        ) -> AnalyzerResult<ImprovementSuggestions> {
            Ok(ImprovementSuggestions::generic())
        }

        async fn list_models(&self) -> AnalyzerResult<Vec<String>> {
            Ok(vec!["mock".into()])
        }

        fn default_model(&self) -> &str {
            "mock"
        }
    }

    async fn setup(analyzer: MockAnalyzer) -> (Orchestrator, DocumentId, Arc<MockAnalyzer>) {
        let documents = Arc::new(MemoryDocumentStore::new());
        let content = "We process personal data on the basis of contract. ".repeat(10);
        let metadata = DocumentMetadata::new(
            "policy.txt".into(),
            MediaType::PlainText,
            content.len() as u64,
            &content,
        );
        let document = Document::new(content, metadata);
        let id = document.id;
        documents.put(document).await.unwrap();

        let analyzer = Arc::new(analyzer);
        let orchestrator = Orchestrator::new(
            documents,
            Arc::new(MemoryReportStore::new()),
            analyzer.clone(),
        );
        (orchestrator, id, analyzer)
    }

    #[tokio::test]
    async fn test_unknown_document_creates_no_report() {
        let (orchestrator, _, analyzer) = setup(MockAnalyzer::default()).await;

        let result = orchestrator.start_analysis(Uuid::new_v4()).await;

        assert!(matches!(result, Err(Error::DocumentNotFound(_))));
        assert_eq!(orchestrator.report_count().await.unwrap(), 0);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_report_is_processing_before_task_runs() {
        let (orchestrator, document_id, _) = setup(MockAnalyzer::default()).await;

        let task = orchestrator.schedule_analysis(document_id).await.unwrap();
        let report = orchestrator.get_report(task.report_id()).await.unwrap();

        assert_eq!(report.state, ReportState::Processing);
        assert_eq!(report.document_id, document_id);
        assert_eq!(report.document_name, "policy.txt");
    }

    #[tokio::test]
    async fn test_task_completes_report() {
        let (orchestrator, document_id, _) = setup(MockAnalyzer::default()).await;

        let task = orchestrator.schedule_analysis(document_id).await.unwrap();
        let report_id = task.report_id();
        task.run().await;

        let report = orchestrator.get_report(report_id).await.unwrap();
        assert_eq!(report.analysis(), Some(&fixed_analysis()));
        assert_eq!(report.improvements(), Some(&ImprovementSuggestions::generic()));
        assert!(matches!(report.state, ReportState::Completed { .. }));
    }

    #[tokio::test]
    async fn test_task_failure_marks_report_failed() {
        let analyzer = MockAnalyzer {
            fail_assess: true,
            ..Default::default()
        };
        let (orchestrator, document_id, _) = setup(analyzer).await;

        let task = orchestrator.schedule_analysis(document_id).await.unwrap();
        let report_id = task.report_id();
        task.run().await;

        let report = orchestrator.get_report(report_id).await.unwrap();
        let error = report.error().unwrap();
        assert!(error.contains("model overloaded"));
        assert!(report.analysis().is_none());
    }

    #[tokio::test]
    async fn test_start_analysis_returns_while_processing() {
        let gate = Arc::new(Notify::new());
        let analyzer = MockAnalyzer {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let (orchestrator, document_id, _) = setup(analyzer).await;

        let report_id = orchestrator.start_analysis(document_id).await.unwrap();
        let report = orchestrator.get_report(report_id).await.unwrap();
        assert_eq!(report.state, ReportState::Processing);

        gate.notify_one();
        let mut report = orchestrator.get_report(report_id).await.unwrap();
        for _ in 0..100 {
            if report.is_terminal() {
                break;
            }
            tokio::task::yield_now().await;
            report = orchestrator.get_report(report_id).await.unwrap();
        }
        assert_eq!(report.state.status(), "completed");
    }

    /// Accepts everything except completed reports.
    #[derive(Default)]
    struct RejectingCompletedStore {
        inner: MemoryReportStore,
    }

    #[async_trait]
    impl ReportStore for RejectingCompletedStore {
        async fn put(&self, report: Report) -> Result<()> {
            if matches!(report.state, ReportState::Completed { .. }) {
                return Err(Error::Storage("record too large".into()));
            }
            self.inner.put(report).await
        }

        async fn get(&self, id: ReportId) -> Result<Option<Report>> {
            self.inner.get(id).await
        }

        async fn len(&self) -> Result<usize> {
            self.inner.len().await
        }
    }

    #[tokio::test]
    async fn test_unstorable_result_marks_report_failed() {
        let (seeded, document_id, analyzer) = setup(MockAnalyzer::default()).await;
        let orchestrator = Orchestrator::new(
            Arc::clone(seeded.documents()),
            Arc::new(RejectingCompletedStore::default()),
            analyzer,
        );

        let task = orchestrator.schedule_analysis(document_id).await.unwrap();
        let report_id = task.report_id();
        task.run().await;

        let report = orchestrator.get_report(report_id).await.unwrap();
        assert!(report.is_terminal());
        assert!(report.error().unwrap().contains("record too large"));
    }

    #[tokio::test]
    async fn test_unknown_report() {
        let (orchestrator, _, _) = setup(MockAnalyzer::default()).await;

        let result = orchestrator.get_report(Uuid::new_v4()).await;

        assert!(matches!(result, Err(Error::ReportNotFound(_))));
    }
}
