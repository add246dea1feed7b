use log::{debug, info, warn};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;

use crate::config::GrobidConfig;
use crate::error::GrobidError;
use crate::grobid::tei::parse_tei;
use crate::types::PaperMetadata;

const VERSION_PATH: &str = "/api/version";
const HEADER_PATH: &str = "/api/processHeaderDocument";

/// HTTP client for a GROBID service
pub struct GrobidClient {
    client: Client,
    base_url: String,
    consolidate_header: bool,
}

impl GrobidClient {
    pub fn new(config: &GrobidConfig) -> Result<Self, GrobidError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            consolidate_header: config.consolidate_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Version string reported by the service
    pub async fn version(&self) -> Result<String, GrobidError> {
        let response = self.client.get(self.endpoint(VERSION_PATH)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GrobidError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body.trim().to_string())
    }

    /// Whether the service answers its version endpoint. Failures are
    /// logged and reported as `false`.
    pub async fn is_available(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                info!("GROBID {} available at {}", version, self.base_url);
                true
            }
            Err(e) => {
                warn!("GROBID not available at {}: {}", self.base_url, e);
                false
            }
        }
    }

    /// Upload a PDF from disk and extract its header fields
    pub async fn process_header(&self, path: &Path) -> Result<PaperMetadata, GrobidError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| GrobidError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        self.process_header_bytes(&file_name, bytes).await
    }

    /// Upload PDF bytes as a multipart form and parse the TEI response
    pub async fn process_header_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PaperMetadata, GrobidError> {
        debug!("Submitting {} ({} bytes) to GROBID", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let mut form = Form::new().part("input", part);
        if self.consolidate_header {
            form = form.text("consolidateHeader", "1");
        }

        let response = self
            .client
            .post(self.endpoint(HEADER_PATH))
            .header(ACCEPT, "application/xml")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GrobidError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let metadata = parse_tei(&body)?;
        let missing = metadata.missing_fields();
        if !missing.is_empty() {
            debug!("{}: fields not found: {}", file_name, missing.join(", "));
        }
        Ok(metadata)
    }
}
