use anyhow::Context;
use serde::Serialize;

use crate::cli::root_commands::InfoArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::read_document;
use crate::context::AppContext;
use crate::output::output_json;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct InfoResponse {
    file_name: String,
    size_bytes: u64,
    page_count: Option<u32>,
    large_file: bool,
    estimated_processing_time: Option<String>,
}

/// Handle `folio info`: local validation plus the backend's pre-flight
/// sizing, without binding a document.
pub async fn handle(args: &InfoArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (bytes, file_name) = read_document(&args.file).await?;
    ctx.inspector.policy().validate(&bytes, &file_name)?;

    let progress = Progress::spinner(&format!("Inspecting {file_name}..."));
    let preflight = ctx.inspector.preflight(&bytes, &file_name).await;
    progress.finish_clear();
    let preflight = preflight.with_context(|| format!("failed to inspect {file_name}"))?;

    let response = InfoResponse {
        size_bytes: bytes.len() as u64,
        page_count: preflight.page_count,
        large_file: preflight.notice.is_some(),
        estimated_processing_time: preflight
            .notice
            .map(|notice| notice.estimated_processing_time),
        file_name,
    };

    match flags.format {
        OutputFormat::Json => output_json(&response),
        OutputFormat::Text => {
            println!("{}", render_text(&response));
            Ok(())
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_text(response: &InfoResponse) -> String {
    let pages = response
        .page_count
        .map_or_else(|| "unknown".to_string(), |count| count.to_string());
    let mut lines = vec![
        format!("file:  {}", response.file_name),
        format!(
            "size:  {:.1}MB",
            response.size_bytes as f64 / (1024.0 * 1024.0)
        ),
        format!("pages: {pages}"),
    ];
    if let Some(estimate) = &response.estimated_processing_time {
        lines.push(format!("large file, estimated processing time: {estimate}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn text_mentions_estimate_only_for_large_files() {
        let small = InfoResponse {
            file_name: "a.pdf".into(),
            size_bytes: 2 * 1024 * 1024,
            page_count: Some(12),
            large_file: false,
            estimated_processing_time: None,
        };
        assert_eq!(render_text(&small), "file:  a.pdf\nsize:  2.0MB\npages: 12");

        let large = InfoResponse {
            page_count: None,
            large_file: true,
            estimated_processing_time: Some("2-3 minutes".into()),
            ..small
        };
        assert!(render_text(&large).contains("pages: unknown"));
        assert!(render_text(&large).ends_with("estimated processing time: 2-3 minutes"));
    }
}
