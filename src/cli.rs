// src/cli.rs

use clap::Parser;

#[derive(Parser)]
#[command(name = "aegis-rs-scanner")]
#[command(about = "Scans a website's headers, TLS and DNS posture and scores the result")]
pub struct Cli {
    /// Target URL or domain to scan (scheme defaults to https)
    pub target: String,

    /// Also run DNS checks (DNSSEC, SPF, DKIM, DMARC, MX)
    #[arg(long)]
    pub deep_scan: bool,

    /// Include an AI-generated narrative summary (needs GEMINI_API_KEY)
    #[arg(long)]
    pub narrative: bool,

    /// HTTP fetch timeout in seconds
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,

    /// Pretty-print the JSON result
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
