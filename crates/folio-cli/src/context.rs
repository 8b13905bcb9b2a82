use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use folio_client::{ApiClient, HttpTransport};
use folio_config::FolioConfig;
use folio_session::{SessionController, UploadPipeline, UploadPolicy};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: FolioConfig,
    pub base_url: String,
    pub controller: SessionController,
    /// Standalone pipeline for `folio info`, which never binds a session.
    pub inspector: UploadPipeline,
}

impl AppContext {
    pub fn init(config: FolioConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(
            &config.backend.base_url,
            &config.backend.user_agent,
            Duration::from_secs(config.backend.connect_timeout_secs),
        )
        .context("failed to build HTTP client")?;
        let base_url = transport.base_url().to_string();
        let transport = Arc::new(transport);

        let controller = SessionController::new(transport.clone(), &config);
        let inspector = UploadPipeline::new(
            ApiClient::new(transport),
            UploadPolicy::from_config(&config.upload),
            config.timeouts.upload(),
        );

        Ok(Self {
            config,
            base_url,
            controller,
            inspector,
        })
    }
}
