//! HTTP client for the verification endpoint.

use super::{VerificationResult, VerifyError, WEBCAM_FIELD};
use crate::encoding::CapturedImage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Something that can judge whether a captured frame shows the expected
/// person.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Submits one frame and returns the verdict.
    async fn verify(&self, image: CapturedImage) -> Result<VerificationResult, VerifyError>;
}

/// Posts frames to a remote `/check_person` style endpoint.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    http: Client,
    endpoint: Url,
}

impl HttpVerifier {
    /// Creates a verifier without a request timeout.
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Creates a verifier whose requests give up after `timeout`.
    pub fn with_timeout(endpoint: Url, timeout: Option<Duration>) -> Result<Self, VerifyError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Builds the single-part multipart body carrying a captured frame.
fn image_part(image: CapturedImage) -> Result<Part, reqwest::Error> {
    let file_name = image.file_name().to_string();
    let media_type = image.media_type().to_string();
    Part::bytes(image.into_bytes())
        .file_name(file_name)
        .mime_str(&media_type)
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, image: CapturedImage) -> Result<VerificationResult, VerifyError> {
        let form = Form::new().part(WEBCAM_FIELD, image_part(image)?);

        let res = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(VerifyError::UnexpectedStatus { status, body });
        }

        let body = res.bytes().await?;
        VerificationResult::from_json(&body)
    }
}
