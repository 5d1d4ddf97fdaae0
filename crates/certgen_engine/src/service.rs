use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::{FailureKind, FilePart, GenerateForm, ServiceError};

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

const STATUS_PATH: &str = "status";
const GENERATE_PATH: &str = "generate-certificates";
const DELETE_FILES_PATH: &str = "delete-files";
const FILE_PART_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` leaves long generations unbounded.
    pub request_timeout: Option<Duration>,
    /// Bound on a single status call, normally the poll period.
    pub status_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            status_timeout: Duration::from_secs(1),
        }
    }
}

/// The three endpoints of the certificate-generation backend.
#[async_trait::async_trait]
pub trait CertificateService: Send + Sync {
    /// Current human-readable progress message.
    async fn status(&self) -> Result<String, ServiceError>;

    /// Uploads the form and returns the generated document.
    async fn generate(&self, form: GenerateForm) -> Result<Bytes, ServiceError>;

    /// Asks the backend to purge its temporary files.
    async fn delete_files(&self) -> Result<(), ServiceError>;
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    base_url: String,
    status_timeout: Duration,
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        // Fail early on a bad base url rather than on the first poll.
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;

        Ok(Self {
            base_url,
            status_timeout: settings.status_timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl CertificateService for ReqwestService {
    async fn status(&self) -> Result<String, ServiceError> {
        let response = self
            .client
            .get(self.endpoint(STATUS_PATH)?)
            .timeout(self.status_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        let parsed: StatusResponse = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::new(FailureKind::MalformedBody, err.to_string()))?;
        Ok(parsed.message)
    }

    async fn generate(&self, form: GenerateForm) -> Result<Bytes, ServiceError> {
        let multipart = build_multipart(form)?;
        let response = self
            .client
            .post(self.endpoint(GENERATE_PATH)?)
            .multipart(multipart)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }

    async fn delete_files(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.endpoint(DELETE_FILES_PATH)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response)?;
        Ok(())
    }
}

fn build_multipart(form: GenerateForm) -> Result<Form, ServiceError> {
    Ok(Form::new()
        .part("ms6File", file_part(form.ms6_file)?)
        .part("bmsFile", file_part(form.bms_file)?)
        .text("year", form.year)
        .text("courseName", form.course_name)
        .text("semester", form.semester))
}

fn file_part(file: FilePart) -> Result<Part, ServiceError> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(FILE_PART_MIME)
        .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(FailureKind::MalformedBody, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
