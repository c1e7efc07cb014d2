//! RepoSheet CLI — export a code-hosting profile's public repositories
//! into a CSV/XLSX dataset with original/fork classification and README
//! text.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
