use actiongen::cli::commands::{DetectCommand, GenerateCommand};
use actiongen::cli::output::{format_summary, style, WorkflowSummary, CROSS, INFO};
use actiongen::cli::{Cli, Command};
use actiongen::persistence::LocalFileSink;
use actiongen::scaffold::{build_workflow, detect_project};

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let root = cli.project_root().context("Failed to resolve project root")?;

    // Execute command
    match &cli.command {
        Command::Generate(cmd) => generate(cmd, &root).await?,
        Command::Detect(cmd) => detect(cmd, &root)?,
    }

    Ok(())
}

async fn generate(cmd: &GenerateCommand, root: &Path) -> Result<()> {
    let kind = cmd.kind.resolve(root);
    let workflow = match build_workflow(kind, &cmd.options()) {
        Ok(workflow) => workflow,
        Err(e) => {
            println!("{} Invalid workflow:", CROSS);
            println!("  {}", style(&e).red());
            std::process::exit(1);
        }
    };

    if cmd.dry_run {
        if cmd.json {
            let summary = WorkflowSummary::new(&workflow, kind, None);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", workflow.to_file_contents()?);
        }
        return Ok(());
    }

    let sink = LocalFileSink::new(root);
    let path = workflow.write_to_file(&sink).await.with_context(|| {
        format!("Failed to write {}", sink.resolve(&workflow.destination()).display())
    })?;

    let summary = WorkflowSummary::new(&workflow, kind, Some(path.as_path()));
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", format_summary(&summary));
    }

    Ok(())
}

fn detect(cmd: &DetectCommand, root: &Path) -> Result<()> {
    let kind = detect_project(root);

    if cmd.json {
        let data = serde_json::json!({ "root": root.display().to_string(), "kind": kind });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!(
            "{} {} looks like a {} project",
            INFO,
            style(root.display()).bold(),
            style(kind).cyan()
        );
    }

    Ok(())
}
