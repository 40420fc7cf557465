//! Submission of compiled payloads to the target system
//!
//! Each payload is posted as a multipart form to `<base>/api/<entity>`: a
//! `data` part holding the JSON document and one `files.<field>` part per
//! attachment.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::error::SubmitError;
use super::payload::{CompiledPayloads, Payload};

/// Outcome of submitting one compiled record
#[derive(Debug)]
pub struct SubmitOutcome {
    pub entity: String,
    pub index: usize,
    /// Response body of the target system, or why the submission failed
    pub result: Result<Value, SubmitError>,
}

/// HTTP client for the target system's content API
#[derive(Debug, Clone)]
pub struct MigrationClient {
    /// Base URL of the target system
    base_url: String,
    /// Request timeout in seconds
    timeout_seconds: u64,
    /// HTTP client
    client: reqwest::Client,
}

impl MigrationClient {
    /// Create a client for a target base URL (e.g., "http://localhost:1337")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: 120,
            client: reqwest::Client::new(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint that accepts records of an entity
    pub fn entity_url(&self, entity: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(entity)
        )
    }

    /// Build the multipart form for a payload
    pub fn build_form(payload: &Payload) -> Result<Form, SubmitError> {
        let data = serde_json::to_string(&payload.data)?;
        let mut form = Form::new().text("data", data);

        for attachment in &payload.files {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.mime)
                .map_err(|e| SubmitError::InvalidAttachment {
                    file_name: attachment.file_name.clone(),
                    reason: e.to_string(),
                })?;
            form = form.part(attachment.form_key(), part);
        }

        Ok(form)
    }

    /// Submit one payload for an entity
    pub async fn submit(&self, entity: &str, payload: &Payload) -> Result<Value, SubmitError> {
        let url = self.entity_url(entity);
        let form = Self::build_form(payload)?;

        tracing::debug!(
            "Submitting payload to {} ({} attachment(s))",
            url,
            payload.files.len()
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|e| SubmitError::ConnectionError {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SubmitError::ConnectionError {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(SubmitError::Rejected {
                entity: entity.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Submit every compiled record, entity by entity, in record order
    ///
    /// Records that failed to compile are reported as `NotCompiled` without
    /// contacting the target system.
    pub async fn submit_all(&self, compiled: &CompiledPayloads) -> Vec<SubmitOutcome> {
        let mut outcomes = Vec::new();

        for entity in &compiled.entities {
            for record in &entity.records {
                let result = match &record.outcome {
                    Ok(payload) => self.submit(&entity.entity, payload).await,
                    Err(e) => Err(SubmitError::NotCompiled {
                        entity: entity.entity.clone(),
                        index: record.index,
                        source: e.clone(),
                    }),
                };
                if let Err(e) = &result {
                    tracing::warn!("{}", e);
                }
                outcomes.push(SubmitOutcome {
                    entity: entity.entity.clone(),
                    index: record.index,
                    result,
                });
            }
        }

        let submitted = outcomes.iter().filter(|o| o.result.is_ok()).count();
        tracing::info!("Submitted {}/{} record(s)", submitted, outcomes.len());
        outcomes
    }
}
