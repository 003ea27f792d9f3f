use access_core::{ProcessingResult, Submission};
use client_logging::{client_debug, client_info};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::filename::bundle_filename;
use crate::response::{error_detail, normalize_response};
use crate::{BundleDownload, ClientError, ServiceError, ServiceSettings};

/// Multipart field carrying an uploaded document.
pub const FIELD_FILE: &str = "file";
/// Multipart field carrying a web page address.
pub const FIELD_URL: &str = "url";

#[async_trait::async_trait]
pub trait ProcessingService: Send + Sync {
    /// One round trip to the processing endpoint. No retries, no streaming.
    async fn submit(&self, submission: &Submission) -> Result<ProcessingResult, ServiceError>;

    /// Checks that the service root answers with a success status.
    async fn ping(&self) -> Result<(), ServiceError>;

    /// Fetches a bundle referenced by a result, resolving relative references.
    async fn download(&self, reference: &str) -> Result<BundleDownload, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestServiceClient {
    settings: ServiceSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl ReqwestServiceClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, ClientError> {
        let endpoint =
            Url::parse(&settings.endpoint).map_err(|source| ClientError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                source,
            })?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolves an absolute or service-relative reference against the endpoint.
    pub fn resolve_reference(&self, reference: &str) -> Result<Url, ServiceError> {
        self.endpoint
            .join(reference.trim())
            .map_err(|_| ServiceError::InvalidReference(reference.to_string()))
    }

    fn build_form(submission: &Submission) -> Result<Form, ServiceError> {
        let form = match submission {
            Submission::Document(document) => {
                let part = Part::bytes(document.content().to_vec())
                    .file_name(document.filename().to_string())
                    .mime_str(document.mime_type())
                    .map_err(|err| ServiceError::Network(err.to_string()))?;
                Form::new().part(FIELD_FILE, part)
            }
            Submission::Url(url) => Form::new().text(FIELD_URL, url.trim().to_string()),
        };
        Ok(form)
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            return ServiceError::Timeout(self.settings.request_timeout);
        }
        ServiceError::Network(err.to_string())
    }

    async fn failure_from(&self, response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();
        // The body is diagnostics only; a failed read just drops it.
        let detail = match response.bytes().await {
            Ok(body) => error_detail(&body),
            Err(err) => {
                client_debug!("Could not read error body for status {}: {}", status, err);
                None
            }
        };
        ServiceError::Service {
            status: Some(status),
            detail,
        }
    }
}

#[async_trait::async_trait]
impl ProcessingService for ReqwestServiceClient {
    async fn submit(&self, submission: &Submission) -> Result<ProcessingResult, ServiceError> {
        let form = Self::build_form(submission)?;
        match submission {
            Submission::Document(document) => client_info!(
                "Submitting document {} ({} bytes) to {}",
                document.filename(),
                document.content().len(),
                self.endpoint
            ),
            Submission::Url(url) => {
                client_info!("Submitting url {} to {}", url, self.endpoint)
            }
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.failure_from(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;
        client_debug!("Service answered {} with {} bytes", status, body.len());
        normalize_response(&body)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        let root = self.resolve_reference("/")?;
        let response = self
            .client
            .get(root)
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.failure_from(response).await)
        }
    }

    async fn download(&self, reference: &str) -> Result<BundleDownload, ServiceError> {
        let url = self.resolve_reference(reference)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        if !response.status().is_success() {
            return Err(self.failure_from(response).await);
        }

        let max_bytes = self.settings.max_bundle_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ServiceError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let final_url = response.url().clone();
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| self.map_reqwest_error(err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ServiceError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(BundleDownload {
            url: url.to_string(),
            filename: bundle_filename(&final_url),
            bytes,
        })
    }
}
