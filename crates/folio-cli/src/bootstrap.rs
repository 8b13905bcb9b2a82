use anyhow::Context;
use figment::providers::Serialized;
use folio_config::FolioConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then layered configuration, then command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<FolioConfig> {
    FolioConfig::load_dotenv()?;

    let mut figment = FolioConfig::figment();
    if let Some(base_url) = &flags.base_url {
        figment = figment.merge(Serialized::default("backend.base_url", base_url));
    }

    let config: FolioConfig = figment
        .extract()
        .context("failed to read folio configuration")?;
    config.validate()?;
    tracing::debug!(base_url = %config.backend.base_url, "configuration loaded");
    Ok(config)
}
