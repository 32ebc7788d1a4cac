//! issuesync CLI entry point.

use clap::Parser;

use issuesync::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = issuesync::cli::run(cli).await {
        issuesync::cli::handle_error(err, json);
    }
}
