use folio_core::entities::{DocumentHandle, Turn};
use folio_session::AskOutcome;
use serde::Serialize;

use crate::cli::root_commands::AskArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared;
use crate::context::AppContext;
use crate::output::{output_json, render_turn};
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct AskResponse<'a> {
    document: &'a DocumentHandle,
    question: &'a str,
    answer: &'a Turn,
}

/// Handle `folio ask`: upload, ask once, print the answer.
pub async fn handle(args: &AskArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document = shared::upload(ctx, &args.file).await?;
    let question = args.question_text();

    let progress = Progress::spinner("Waiting for an answer...");
    let outcome = ctx.controller.submit_question(&question).await;
    progress.finish_clear();

    match outcome? {
        AskOutcome::Answered(answer) => match flags.format {
            OutputFormat::Json => output_json(&AskResponse {
                document: &document,
                question: question.trim(),
                answer: &answer,
            }),
            OutputFormat::Text => {
                println!("{}", render_turn(&answer));
                Ok(())
            }
        },
        AskOutcome::Failed(error) => Err(anyhow::Error::new(error).context("question failed")),
        AskOutcome::Discarded => anyhow::bail!("the session was cleared before the answer arrived"),
    }
}
