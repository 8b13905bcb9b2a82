//! File validation, pre-flight sizing, and ingestion.

use std::path::Path;
use std::time::Duration;

use folio_client::{ApiClient, FilePart, NetworkOutcome, Reply, classify};
use folio_config::UploadConfig;
use folio_core::entities::DocumentHandle;
use folio_core::errors::ClassifiedError;

const PDF_MAGIC: &[u8] = b"%PDF";
const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Local acceptance rules applied before any request is made.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub accepted_extensions: Vec<String>,
    pub preflight: bool,
    pub large_page_threshold: u32,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

impl UploadPolicy {
    #[must_use]
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
            accepted_extensions: config.accepted_extensions.clone(),
            preflight: config.preflight,
            large_page_threshold: config.large_page_threshold,
        }
    }

    /// Check type and size. Never touches the network.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifiedError::Validation`] describing the first rule the
    /// file breaks.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self, bytes: &[u8], file_name: &str) -> Result<(), ClassifiedError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                self.accepted_extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            });
        let Some(extension) = extension else {
            return Err(reject(format!(
                "\"{file_name}\" is not a supported document (accepted: {})",
                self.accepted_extensions.join(", ")
            )));
        };

        if bytes.is_empty() {
            return Err(reject(format!("\"{file_name}\" is empty")));
        }

        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(reject(format!(
                "File too large ({:.1}MB). Maximum allowed is {:.0}MB.",
                size as f64 / BYTES_PER_MIB,
                self.max_bytes as f64 / BYTES_PER_MIB
            )));
        }

        if extension.eq_ignore_ascii_case("pdf") && !bytes.starts_with(PDF_MAGIC) {
            return Err(reject(format!("\"{file_name}\" is not a PDF document")));
        }

        Ok(())
    }
}

fn reject(message: String) -> ClassifiedError {
    classify(NetworkOutcome::Rejected(message))
}

/// Shown before ingestion when the backend expects a slow upload.
#[derive(Debug, Clone, PartialEq)]
pub struct LargeFileNotice {
    pub file_size_mb: f64,
    pub page_count: u32,
    pub estimated_processing_time: String,
}

impl LargeFileNotice {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Large file detected ({:.1}MB, {} pages). Estimated processing time: {}. Please be patient...",
            self.file_size_mb, self.page_count, self.estimated_processing_time
        )
    }
}

/// What the pre-flight call learned about the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preflight {
    pub page_count: Option<u32>,
    pub notice: Option<LargeFileNotice>,
}

/// Turns file bytes into a bound [`DocumentHandle`].
///
/// The pipeline never mutates the session; it returns a result, and reports
/// the large-file notice through the caller's callback.
pub struct UploadPipeline {
    api: ApiClient,
    policy: UploadPolicy,
    timeout: Duration,
}

impl UploadPipeline {
    #[must_use]
    pub const fn new(api: ApiClient, policy: UploadPolicy, timeout: Duration) -> Self {
        Self {
            api,
            policy,
            timeout,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate, size, and ingest `bytes` as `file_name`.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of whichever step failed.
    pub async fn upload(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<DocumentHandle, ClassifiedError> {
        self.upload_with(bytes, file_name, |_| {}).await
    }

    /// [`Self::upload`], calling `on_notice` between pre-flight and ingestion
    /// when the file is large.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of whichever step failed.
    pub async fn upload_with<F>(
        &self,
        bytes: &[u8],
        file_name: &str,
        mut on_notice: F,
    ) -> Result<DocumentHandle, ClassifiedError>
    where
        F: FnMut(&LargeFileNotice) + Send,
    {
        self.policy.validate(bytes, file_name)?;

        let preflight = if self.policy.preflight {
            self.preflight(bytes, file_name).await?
        } else {
            Preflight::default()
        };
        if let Some(notice) = &preflight.notice {
            on_notice(notice);
        }

        self.ingest(bytes, file_name, preflight.page_count).await
    }

    /// Ask `/pdf-info` about the file.
    ///
    /// Transport failures and server-reported errors in a 2xx body are fatal.
    /// A non-2xx status or an unreadable body only loses the sizing
    /// information.
    ///
    /// # Errors
    ///
    /// Returns `Unreachable`/`Timeout` for transport failures and
    /// `ServerError` when the reply carries an `error`.
    pub async fn preflight(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<Preflight, ClassifiedError> {
        let reply = match self
            .api
            .pdf_info(FilePart::pdf(file_name, bytes), self.timeout)
            .await
        {
            Ok(reply) => reply,
            Err(outcome @ NetworkOutcome::Transport(_)) => return Err(classify(outcome)),
            Err(outcome) => {
                tracing::warn!(?outcome, "pre-flight sizing unavailable; continuing with ingestion");
                return Ok(Preflight::default());
            }
        };

        let Reply { status, value, .. } = reply;
        if !value.is_success() {
            if let Some(message) = value.error {
                return Err(ClassifiedError::Server { message, status });
            }
            tracing::warn!(status = ?value.status, "pre-flight reply without status or error");
            return Ok(Preflight::default());
        }

        let Some(info) = value.pdf_info else {
            return Ok(Preflight::default());
        };
        let page_count = (info.page_count > 0).then_some(info.page_count);
        let is_large = info.is_large_file || info.page_count > self.policy.large_page_threshold;
        let notice = is_large.then(|| LargeFileNotice {
            file_size_mb: info.file_size_mb,
            page_count: info.page_count,
            estimated_processing_time: info
                .estimated_processing_time
                .unwrap_or_else(|| "unknown".to_string()),
        });

        Ok(Preflight { page_count, notice })
    }

    async fn ingest(
        &self,
        bytes: &[u8],
        file_name: &str,
        page_count: Option<u32>,
    ) -> Result<DocumentHandle, ClassifiedError> {
        let Reply { body, value, .. } = self
            .api
            .extract_text(FilePart::pdf(file_name, bytes), self.timeout)
            .await
            .map_err(classify)?;

        let Some(id) = value.document_id.filter(|id| !id.trim().is_empty()) else {
            return Err(classify(NetworkOutcome::MissingField {
                field: "document_id",
                body,
            }));
        };
        let display_name = value
            .filename
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| file_name.to_string());

        tracing::debug!(document_id = %id, %display_name, "document ingested");
        Ok(DocumentHandle {
            id,
            display_name,
            size_bytes: bytes.len() as u64,
            reported_size_mb: value.file_size_mb.filter(|mb| mb.is_finite() && *mb > 0.0),
            page_count,
            word_count: value.word_count,
        })
    }
}
