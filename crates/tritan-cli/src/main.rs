//! `tritan`: edit, validate and run workflows against the persisted editor state.

mod cli;
mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tritan_core::{Editor, FileSnapshotStore, init_observability};
use tritan_engine_http::HttpEngine;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_observability("warn");

    let cli = Cli::parse();
    let engine = HttpEngine::from_env().context("invalid engine configuration")?;
    let persistence = FileSnapshotStore::in_dir(&cli.state_dir);
    let editor = Editor::open(Arc::new(engine), Arc::new(persistence))
        .with_context(|| format!("failed to open state in {}", cli.state_dir.display()))?;

    let mut stdout = std::io::stdout().lock();
    commands::dispatch(&editor, cli.command, &mut stdout).await
}
