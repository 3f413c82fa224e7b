//! SEO content gate CLI
//!
//! # Usage
//!
//! ```bash
//! seo-gate title "Natural Cat Litter Odor Control Tips" --keyword "cat litter"
//! seo-gate description "Keep your home fresh." --format json
//! seo-gate score --title "..." --description "..." --keyword "cat litter"
//! seo-gate schema product.json
//! seo-gate scan ./app --format yaml
//! seo-gate serve --bind 0.0.0.0:8080
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Validation failed with errors (or score below passing)
//! - 2: Passed with warnings or suggestions
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 10: Internal error

use clap::Parser;
use seo_content_gate::{run_cli, GateCli, GateCommands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = GateCli::parse();
    init_tracing(&cli);

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}

fn init_tracing(cli: &GateCli) {
    if matches!(cli.command, GateCommands::Serve { .. }) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
        return;
    }

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
