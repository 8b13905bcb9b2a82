use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Check whether the document service is reachable.
    Health,
    /// Validate a PDF locally and ask the service for its page count.
    Info(InfoArgs),
    /// Upload a PDF and ask one question about it.
    Ask(AskArgs),
    /// Interactive chat session, optionally starting with a PDF.
    Chat(ChatArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InfoArgs {
    /// PDF file to inspect.
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// PDF file to upload.
    pub file: PathBuf,
    /// Question to ask; words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskArgs {
    #[must_use]
    pub fn question_text(&self) -> String {
        self.question.join(" ")
    }
}

#[derive(Clone, Debug, Args)]
pub struct ChatArgs {
    /// PDF file to upload before the first prompt.
    pub file: Option<PathBuf>,
}
