mod api;
mod http;
mod poller;
mod retry;

pub use api::{check_upload, ClientError, ClientResult, ComplianceApi};
pub use http::{HttpComplianceApi, DEFAULT_API_URL};
pub use poller::{PollConfig, PollOutcome, Poller};
pub use retry::RetryPolicy;
