//! Transport collaborator — ships the finalized record to the backend.
//!
//! The submission coordinator is the sole caller. One attempt per user
//! action; retry is the user pressing submit again after a surfaced
//! failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SubmitError;
use crate::questions::Major;
use crate::wizard::store::AnswerStore;

/// The outbound submission record: the flat answer mapping plus the
/// resolved major and the session it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    pub session: String,
    pub major: Major,
    #[serde(flatten)]
    pub answers: AnswerStore,
}

/// The wire collaborator that persists a submission.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit_record(&self, payload: &SubmissionPayload) -> Result<(), SubmitError>;
}

/// HTTP transport posting the JSON payload to the registration backend.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit_record(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Server-side rejection: keep the body as the reason so the user
        // sees what the backend objected to.
        let body = response.text().await.unwrap_or_default();
        let reason = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };
        Err(SubmitError::Rejected { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::store::{AnswerValue, UploadRef};

    #[test]
    fn payload_serializes_flat() {
        let mut answers = AnswerStore::new();
        answers.insert("firstname", AnswerValue::text("Somchai"));
        answers.insert(
            "majorAnswer3",
            AnswerValue::Upload(UploadRef::new("u/portfolio.pdf")),
        );

        let payload = SubmissionPayload {
            session: "session-1".to_string(),
            major: Major::Design,
            answers,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["session"], "session-1");
        assert_eq!(json["major"], "design");
        assert_eq!(json["firstname"], "Somchai");
        assert_eq!(json["majorAnswer3"]["key"], "u/portfolio.pdf");
    }
}
