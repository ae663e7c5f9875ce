use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::api::{check_upload, ClientError, ClientResult, ComplianceApi};
use crate::analysis::base_url;
use crate::document::DocumentId;
use crate::report::{Report, ReportId};
use crate::wire::{
    AnalyzeRequest, AnalyzeResponse, ErrorBody, HealthResponse, ModelsResponse, ReportResponse,
    UploadResponse,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";

/// `ComplianceApi` over HTTP.
pub struct HttpComplianceApi {
    http: Client,
    base: Url,
}

impl HttpComplianceApi {
    pub fn new(base_url_str: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url_str, Duration::from_secs(60))
    }

    pub fn with_timeout(base_url_str: &str, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .user_agent(concat!("gdprc/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: base_url(base_url_str)?,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            // A body cut short is a transport failure, not a malformed payload
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()));
        }

        let body = response.json::<ErrorBody>().await.ok();
        Err(ClientError::from_status(status.as_u16(), body))
    }
}

#[async_trait]
impl ComplianceApi for HttpComplianceApi {
    async fn health(&self) -> ClientResult<HealthResponse> {
        Self::send(self.http.get(self.url("health")?)).await
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(&self, filename: &str, data: Vec<u8>) -> ClientResult<UploadResponse> {
        let media = check_upload(filename, data.len())?;

        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(media.mime())?;
        let form = Form::new().part("document", part);

        let response: UploadResponse =
            Self::send(self.http.post(self.url("upload")?).multipart(form)).await?;
        if !response.success {
            return Err(ClientError::Rejected(response.message));
        }

        debug!(document_id = %response.document_id, "Upload accepted");
        Ok(response)
    }

    async fn start_analysis(&self, document_id: DocumentId) -> ClientResult<AnalyzeResponse> {
        let body = AnalyzeRequest {
            document_id: Some(document_id.to_string()),
        };

        let response: AnalyzeResponse =
            Self::send(self.http.post(self.url("analyze")?).json(&body)).await?;
        if !response.success {
            return Err(ClientError::Rejected(response.message));
        }

        Ok(response)
    }

    async fn get_report(&self, report_id: ReportId) -> ClientResult<Report> {
        let response: ReportResponse =
            Self::send(self.http.get(self.url(&format!("reports/{report_id}"))?)).await?;
        if !response.success {
            return Err(ClientError::Rejected("Failed to fetch report".into()));
        }

        Ok(response.report)
    }

    async fn models(&self) -> ClientResult<ModelsResponse> {
        Self::send(self.http.get(self.url("models")?)).await
    }
}
