use std::time::Duration;

use tracing::{debug, info, warn};

use super::api::{ClientResult, ComplianceApi};
use super::retry::RetryPolicy;
use crate::document::DocumentId;
use crate::report::{Report, ReportId, ReportState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// How waiting on a report ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed(Report),
    /// The server gave up; `Report::error` holds its message.
    Failed(Report),
    /// Every read returned `processing` or a transient error. The analysis
    /// may still finish on the server.
    TimedOut {
        attempts: u32,
        last_error: Option<String>,
    },
}

/// Drives the upload, analyze and poll steps against a `ComplianceApi`.
pub struct Poller<'a, A: ComplianceApi + ?Sized> {
    api: &'a A,
    poll: PollConfig,
    retry: RetryPolicy,
}

impl<'a, A: ComplianceApi + ?Sized> Poller<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub const fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Requests analysis, retrying transient failures.
    pub async fn start_analysis(&self, document_id: DocumentId) -> ClientResult<ReportId> {
        let response = self
            .retry
            .execute(|| self.api.start_analysis(document_id))
            .await?;

        info!(report_id = %response.report_id, "Analysis requested");
        Ok(response.report_id)
    }

    /// Reads the report until it is terminal or the attempt budget is spent.
    /// The first read happens immediately.
    pub async fn wait_for_report(&self, report_id: ReportId) -> ClientResult<PollOutcome> {
        let mut last_error = None;

        for attempt in 1..=self.poll.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.poll.interval).await;
            }

            match self.api.get_report(report_id).await {
                Ok(report) => match &report.state {
                    ReportState::Completed { .. } => return Ok(PollOutcome::Completed(report)),
                    ReportState::Failed { .. } => return Ok(PollOutcome::Failed(report)),
                    ReportState::Processing => {
                        debug!(attempt, max = self.poll.max_attempts, "Report still processing");
                    }
                },
                Err(e) if e.is_transient() => {
                    warn!(attempt, error = %e, "Report read failed");
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(PollOutcome::TimedOut {
            attempts: self.poll.max_attempts,
            last_error,
        })
    }

    /// Uploads, starts analysis and waits for the report.
    pub async fn check(&self, filename: &str, data: Vec<u8>) -> ClientResult<PollOutcome> {
        let upload = self.api.upload(filename, data).await?;
        let report_id = self.start_analysis(upload.document_id).await?;
        self.wait_for_report(report_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::analysis::{AnalysisResult, ImprovementSuggestions};
    use crate::client::ClientError;
    use crate::document::DocumentMetadata;
    use crate::ingest::MediaType;
    use crate::wire::{AnalyzeResponse, HealthResponse, ModelsResponse, UploadResponse};

    /// Serves scripted report reads; once the script runs out the report
    /// stays `processing`.
    struct ScriptedApi {
        report: Report,
        reads: Mutex<VecDeque<ClientResult<ReportState>>>,
        read_count: AtomicU32,
        analyze_failures: AtomicU32,
        analyze_calls: AtomicU32,
    }

    impl ScriptedApi {
        fn new(reads: Vec<ClientResult<ReportState>>) -> Self {
            Self {
                report: Report::processing(Uuid::new_v4(), "policy.txt"),
                reads: Mutex::new(reads.into()),
                read_count: AtomicU32::new(0),
                analyze_failures: AtomicU32::new(0),
                analyze_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ComplianceApi for ScriptedApi {
        async fn health(&self) -> ClientResult<HealthResponse> {
            Ok(HealthResponse::ok())
        }

        async fn upload(&self, filename: &str, data: Vec<u8>) -> ClientResult<UploadResponse> {
            let text = String::from_utf8_lossy(&data);
            Ok(UploadResponse {
                success: true,
                document_id: self.report.document_id,
                metadata: DocumentMetadata::new(
                    filename.into(),
                    MediaType::PlainText,
                    data.len() as u64,
                    &text,
                ),
                message: "ok".into(),
            })
        }

        async fn start_analysis(&self, _document_id: DocumentId) -> ClientResult<AnalyzeResponse> {
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.analyze_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.analyze_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(ClientError::Network("connection reset".into()));
            }
            Ok(AnalyzeResponse {
                success: true,
                report_id: self.report.id,
                status: "processing".into(),
                message: "started".into(),
            })
        }

        async fn get_report(&self, _report_id: ReportId) -> ClientResult<Report> {
            self.read_count.fetch_add(1, Ordering::SeqCst);
            let next = self.reads.lock().unwrap().pop_front();
            match next {
                Some(Ok(state)) => Ok(Report {
                    state,
                    ..self.report.clone()
                }),
                Some(Err(e)) => Err(e),
                None => Ok(self.report.clone()),
            }
        }

        async fn models(&self) -> ClientResult<ModelsResponse> {
            Ok(ModelsResponse {
                success: true,
                models: vec![],
                default_model: "mock".into(),
            })
        }
    }

    fn completed_state() -> ReportState {
        ReportState::Completed {
            analysis: AnalysisResult::unstructured("fine"),
            improvements: ImprovementSuggestions::generic(),
            completed_at: chrono::Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_exactly_max_reads() {
        let api = ScriptedApi::new(vec![]);
        let start = tokio::time::Instant::now();

        let outcome = Poller::new(&api).wait_for_report(api.report.id).await.unwrap();

        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                attempts: 30,
                last_error: None
            }
        );
        assert_eq!(api.read_count.load(Ordering::SeqCst), 30);
        assert_eq!(start.elapsed(), Duration::from_secs(58));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_read_is_immediate() {
        let api = ScriptedApi::new(vec![Ok(completed_state())]);
        let start = tokio::time::Instant::now();

        let outcome = Poller::new(&api).wait_for_report(api.report.id).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_read_errors_keep_polling() {
        let api = ScriptedApi::new(vec![
            Ok(ReportState::Processing),
            Err(ClientError::from_status(502, None)),
            Err(ClientError::Timeout),
            Ok(completed_state()),
        ]);

        let outcome = Poller::new(&api).wait_for_report(api.report.id).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(r) if r.analysis().is_some()));
        assert_eq!(api.read_count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_report_resolves_with_server_error() {
        let api = ScriptedApi::new(vec![
            Ok(ReportState::Processing),
            Ok(ReportState::Failed {
                error: "Model API returned 401: Invalid API key".into(),
            }),
        ]);

        let outcome = Poller::new(&api).wait_for_report(api.report.id).await.unwrap();

        let PollOutcome::Failed(report) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(report.id, api.report.id);
        assert_eq!(report.error(), Some("Model API returned 401: Invalid API key"));
        assert_eq!(api.read_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_surfaces_immediately() {
        let api = ScriptedApi::new(vec![Err(ClientError::from_status(404, None))]);

        let result = Poller::new(&api).wait_for_report(api.report.id).await;

        assert!(matches!(result, Err(ClientError::Http { status: 404, .. })));
        assert_eq!(api.read_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_retries_analysis_start() {
        let api = ScriptedApi::new(vec![Ok(completed_state())]);
        api.analyze_failures.store(2, Ordering::SeqCst);

        let outcome = Poller::new(&api)
            .check("policy.txt", b"We keep data for a year.".to_vec())
            .await
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_remembers_last_transient_error() {
        let api = ScriptedApi::new(vec![Err(ClientError::Timeout)]);
        let poller = Poller::new(&api).with_poll_config(PollConfig {
            interval: Duration::from_millis(100),
            max_attempts: 1,
        });

        let outcome = poller.wait_for_report(api.report.id).await.unwrap();

        assert!(matches!(
            outcome,
            PollOutcome::TimedOut { attempts: 1, last_error: Some(_) }
        ));
    }
}
