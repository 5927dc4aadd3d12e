use std::path::PathBuf;

use clap::Parser;

/// Scout: conversational web search with citations. Ask follow-ups.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about)]
pub struct Args {
    /// Ask a single question and exit instead of starting a chat.
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    /// Model identifier override (e.g. gemini-2.5-flash).
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
