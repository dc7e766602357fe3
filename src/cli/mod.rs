//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{DetectCommand, GenerateCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Build GitHub Actions workflows in code
#[derive(Debug, Parser, Clone)]
#[command(name = "actiongen")]
#[command(author = "actiongen contributors")]
#[command(version = "0.1.0")]
#[command(about = "Generate GitHub Actions workflow files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a starter CI workflow
    Generate(GenerateCommand),

    /// Report the detected project kind
    Detect(DetectCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Project root, falling back to the current directory
    pub fn project_root(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::KindArg;

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["actiongen", "generate"]).unwrap();
        match cli.command {
            Command::Generate(cmd) => {
                assert_eq!(cmd.file, "ci.yml");
                assert_eq!(cmd.kind, KindArg::Auto);
                assert_eq!(cmd.runner, "ubuntu-latest");
                assert!(cmd.branch.is_empty());
                assert!(!cmd.dry_run);
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_generate_with_options() {
        let cli = Cli::try_parse_from([
            "actiongen",
            "--root",
            "/tmp/project",
            "generate",
            "--file",
            "build.yml",
            "--kind",
            "node",
            "--branch",
            "main",
            "--branch",
            "develop",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/tmp/project")));
        match cli.command {
            Command::Generate(cmd) => {
                assert_eq!(cmd.file, "build.yml");
                assert_eq!(cmd.kind, KindArg::Node);
                assert_eq!(cmd.branch, vec!["main", "develop"]);
                assert!(cmd.dry_run);
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["actiongen", "generate", "--kind", "cobol"]).is_err());
    }
}
