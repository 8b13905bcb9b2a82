use folio_core::enums::Connectivity;
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output_json;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    base_url: &'a str,
    connectivity: Connectivity,
    probe_timeout_secs: u64,
}

/// Handle `folio health`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner(&format!("Checking {}...", ctx.base_url));
    let connectivity = ctx.controller.probe().await;
    progress.finish_clear();

    match flags.format {
        OutputFormat::Json => output_json(&HealthResponse {
            base_url: &ctx.base_url,
            connectivity,
            probe_timeout_secs: ctx.config.timeouts.probe_secs,
        })?,
        OutputFormat::Text => println!("{}: {connectivity}", ctx.base_url),
    }

    if connectivity != Connectivity::Reachable {
        anyhow::bail!("document service at {} is not reachable", ctx.base_url);
    }
    Ok(())
}
