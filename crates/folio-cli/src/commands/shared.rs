use std::path::Path;

use anyhow::Context;
use folio_core::entities::DocumentHandle;
use folio_session::UploadOutcome;

use crate::context::AppContext;
use crate::progress::Progress;

/// Read `path` and return its bytes with the file name sent to the backend.
pub async fn read_document(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("'{}' does not name a file", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((bytes, file_name))
}

/// Upload `path` into the session, mirroring session notices on the spinner.
pub async fn upload(ctx: &AppContext, path: &Path) -> anyhow::Result<DocumentHandle> {
    let (bytes, file_name) = read_document(path).await?;
    let progress = Progress::spinner(&format!("Uploading {file_name}..."));
    let mut updates = ctx.controller.subscribe();

    let upload = ctx.controller.start_upload(&bytes, &file_name);
    tokio::pin!(upload);
    let outcome = loop {
        tokio::select! {
            outcome = &mut upload => break outcome,
            Ok(()) = updates.changed() => {
                let notice = updates
                    .borrow_and_update()
                    .transcript
                    .last()
                    .map(|turn| turn.text.clone());
                if let Some(notice) = notice {
                    progress.set_message(&notice);
                }
            }
        }
    };

    match outcome {
        Ok(UploadOutcome::Bound(document)) => {
            progress.finish_clear();
            Ok(document)
        }
        Ok(UploadOutcome::Failed(error)) => {
            progress.finish_err("upload failed");
            Err(anyhow::Error::new(error).context(format!("failed to upload {file_name}")))
        }
        Ok(UploadOutcome::Discarded) => {
            progress.finish_clear();
            anyhow::bail!("the session was cleared before {file_name} finished uploading")
        }
        Err(error) => {
            progress.finish_clear();
            Err(anyhow::Error::new(error).context(format!("cannot upload {file_name}")))
        }
    }
}
