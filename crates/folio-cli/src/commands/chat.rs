use std::io::Write as _;
use std::path::Path;

use anyhow::Context;
use folio_core::entities::Turn;
use folio_core::enums::Connectivity;
use folio_session::{AskOutcome, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::root_commands::ChatArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared;
use crate::context::AppContext;
use crate::output::{output_json, render_session, render_turn};
use crate::progress::Progress;
use crate::ui;

const HELP: &str = "\
Type a question to ask about the loaded document.
  :upload <path>  load a PDF (replaces the current one)
  :clear          drop the document and transcript
  :state          show the session state
  :health         probe the document service
  :help           show this list
  :quit           leave";

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Ask(&'a str),
    Upload(&'a str),
    Clear,
    State,
    Health,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ReplCommand::Ask(line);
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, arg)| (name, arg.trim()));

    match name {
        "upload" | "u" if !arg.is_empty() => ReplCommand::Upload(arg),
        "clear" => ReplCommand::Clear,
        "state" => ReplCommand::State,
        "health" => ReplCommand::Health,
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line),
    }
}

/// Handle `folio chat`.
pub async fn handle(args: &ChatArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if ctx.controller.probe().await != Connectivity::Reachable {
        eprintln!(
            "Document service at {} is not reachable; uploads and questions will fail until it is.",
            ctx.base_url
        );
    }

    match &args.file {
        Some(path) => upload_and_report(ctx, path, flags).await?,
        None if !flags.quiet => eprintln!("No document loaded. Use :upload <path> to load a PDF."),
        None => {}
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(flags);
        let Some(line) = lines
            .next_line()
            .await
            .context("failed to read from stdin")?
        else {
            break;
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => eprintln!("{HELP}"),
            ReplCommand::Clear => {
                ctx.controller.clear();
                eprintln!("Session cleared.");
            }
            ReplCommand::State => {
                let state = ctx.controller.state();
                match flags.format {
                    OutputFormat::Json => output_json(&state)?,
                    OutputFormat::Text => println!("{}", render_session(&state)),
                }
            }
            ReplCommand::Health => {
                let connectivity = ctx.controller.probe().await;
                eprintln!("{}: {connectivity}", ctx.base_url);
            }
            ReplCommand::Upload(path) => upload_and_report(ctx, Path::new(path), flags).await?,
            ReplCommand::Ask(question) => ask_and_report(ctx, question, flags).await?,
            ReplCommand::Unknown(input) => eprintln!("Unknown command '{input}'. Type :help."),
        }
    }
    Ok(())
}

fn prompt(flags: &GlobalFlags) {
    if ui::prefs().interactive && flags.format == OutputFormat::Text {
        eprint!("> ");
        let _ = std::io::stderr().flush();
    }
}

fn emit_turn(turn: &Turn, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(turn)?),
        OutputFormat::Text => println!("{}", render_turn(turn)),
    }
    Ok(())
}

async fn upload_and_report(ctx: &AppContext, path: &Path, flags: &GlobalFlags) -> anyhow::Result<()> {
    match shared::upload(ctx, path).await {
        Ok(_) => {
            if let Some(greeting) = ctx.controller.state().transcript.first() {
                emit_turn(greeting, flags.format)?;
            }
        }
        Err(error) => eprintln!("{error:#}"),
    }
    Ok(())
}

async fn ask_and_report(ctx: &AppContext, question: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("Waiting for an answer...");
    let outcome = ctx.controller.submit_question(question).await;
    progress.finish_clear();

    match outcome {
        Ok(AskOutcome::Answered(answer)) => emit_turn(&answer, flags.format)?,
        Ok(AskOutcome::Failed(_)) => {
            if let Some(turn) = ctx.controller.state().transcript.last() {
                emit_turn(turn, flags.format)?;
            }
        }
        Ok(AskOutcome::Discarded) => {}
        Err(SessionError::NoDocument) => {
            eprintln!("No document loaded. Use :upload <path> to load a PDF.");
        }
        Err(error) => eprintln!("{error}"),
    }
    Ok(())
}
