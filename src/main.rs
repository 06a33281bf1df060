// src/main.rs

use color_eyre::eyre::Result;
use std::time::Duration;

mod cli;

use aegis_rs_scanner::core::analyzer::{Analyzer, ScanOptions};
use aegis_rs_scanner::core::models::ScanConfig;
use aegis_rs_scanner::logging;
use aegis_rs_scanner::narrative::Narrator;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let args = cli::parse();

    let config = ScanConfig {
        timeout: Duration::from_secs(args.timeout),
        ..ScanConfig::default()
    };
    let narrator = Narrator::from_api_key(std::env::var("GEMINI_API_KEY").ok());

    let analyzer = Analyzer::new(config, narrator);
    let options = ScanOptions {
        include_narrative: args.narrative,
        deep_scan: args.deep_scan,
    };

    let result = analyzer.analyze(&args.target, options).await?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");

    Ok(())
}
