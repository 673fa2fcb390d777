use clap::Parser;

/// Aether — a terminal client for the Aether AI chat backend.
#[derive(Parser, Debug)]
#[command(name = "aether", version, about)]
pub struct Args {
    /// Backend base URL override (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Model to select at startup.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
