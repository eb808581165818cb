//! The reference-capture form and where it is submitted.

use super::SnapshotError;
use crate::encoding::CapturedImage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use url::Url;

/// A file attached to a form's file input.
#[derive(Clone, PartialEq, Eq)]
pub struct FormFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl From<CapturedImage> for FormFile {
    fn from(image: CapturedImage) -> Self {
        Self {
            file_name: image.file_name().to_string(),
            media_type: image.media_type().to_string(),
            bytes: image.into_bytes(),
        }
    }
}

impl std::fmt::Debug for FormFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A form with one file input and optional static fields.
#[derive(Debug, Clone)]
pub struct SnapshotForm {
    action: Url,
    file_field: String,
    fields: BTreeMap<String, String>,
    file: Option<FormFile>,
}

impl SnapshotForm {
    pub fn new(action: Url, file_field: impl Into<String>) -> Self {
        Self {
            action,
            file_field: file_field.into(),
            fields: BTreeMap::new(),
            file: None,
        }
    }

    /// Adds a static text field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the file input's value, replacing any earlier file.
    pub fn set_file(&mut self, file: FormFile) {
        self.file = Some(file);
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn file_field(&self) -> &str {
        &self.file_field
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn file(&self) -> Option<&FormFile> {
        self.file.as_ref()
    }

    /// Builds the multipart body: text fields first, then the file.
    pub fn to_multipart(&self) -> Result<Form, SnapshotError> {
        let file = self.file.as_ref().ok_or(SnapshotError::MissingFile)?;

        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.media_type)?;
        Ok(form.part(self.file_field.clone(), part))
    }
}

/// Where the server ended up after a submission.
#[derive(Debug, Clone)]
pub struct FormResponse {
    pub status: StatusCode,
    /// URL after following redirects.
    pub final_url: Url,
}

/// Receives submitted forms.
#[async_trait]
pub trait FormTarget: Send + Sync {
    /// Submits the form once.
    async fn submit(&self, form: &SnapshotForm) -> Result<FormResponse, SnapshotError>;
}

/// Posts forms over HTTP the way a browser does: multipart body,
/// redirects followed.
#[derive(Debug, Clone, Default)]
pub struct HttpFormTarget {
    http: Client,
}

impl HttpFormTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormTarget for HttpFormTarget {
    async fn submit(&self, form: &SnapshotForm) -> Result<FormResponse, SnapshotError> {
        let body = form.to_multipart()?;
        let res = self
            .http
            .post(form.action().clone())
            .multipart(body)
            .send()
            .await?;

        let response = FormResponse {
            status: res.status(),
            final_url: res.url().clone(),
        };
        tracing::info!(
            status = %response.status,
            url = %response.final_url,
            "Form submitted"
        );
        Ok(response)
    }
}
