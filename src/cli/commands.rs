//! CLI command definitions

use clap::Args;
use crate::scaffold::{detect_project, ProjectKind, ScaffoldOptions};
use std::path::Path;

/// Generate a starter CI workflow
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Workflow file name under .github/workflows
    #[arg(short, long, default_value = "ci.yml")]
    pub file: String,

    /// Workflow display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Project kind
    #[arg(long, value_enum, default_value_t = KindArg::Auto)]
    pub kind: KindArg,

    /// Branch to run on for push and pull_request (repeatable)
    #[arg(long)]
    pub branch: Vec<String>,

    /// Runner label
    #[arg(long, default_value = "ubuntu-latest")]
    pub runner: String,

    /// Print the workflow instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl GenerateCommand {
    /// Scaffold options derived from the flags
    pub fn options(&self) -> ScaffoldOptions {
        let defaults = ScaffoldOptions::default();
        ScaffoldOptions {
            filename: self.file.clone(),
            name: self.name.clone().or(defaults.name),
            branches: if self.branch.is_empty() {
                defaults.branches
            } else {
                self.branch.clone()
            },
            runner: self.runner.clone(),
        }
    }
}

/// Report the detected project kind
#[derive(Debug, Args, Clone)]
pub struct DetectCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Project kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    Auto,
    Rust,
    Node,
    Generic,
}

impl KindArg {
    /// Resolve `auto` by looking at the project root
    pub fn resolve(self, root: &Path) -> ProjectKind {
        match self {
            KindArg::Auto => detect_project(root),
            KindArg::Rust => ProjectKind::Rust,
            KindArg::Node => ProjectKind::Node,
            KindArg::Generic => ProjectKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> GenerateCommand {
        GenerateCommand {
            file: "ci.yml".to_string(),
            name: None,
            kind: KindArg::Auto,
            branch: vec![],
            runner: "ubuntu-latest".to_string(),
            dry_run: false,
            json: false,
        }
    }

    #[test]
    fn test_options_fall_back_to_defaults() {
        let options = command().options();
        assert_eq!(options.name.as_deref(), Some("CI"));
        assert_eq!(options.branches, vec!["main"]);
    }

    #[test]
    fn test_explicit_kind_skips_detection() {
        let dir = Path::new("/nonexistent/project");
        assert_eq!(KindArg::Node.resolve(dir), ProjectKind::Node);
        assert_eq!(KindArg::Auto.resolve(dir), ProjectKind::Generic);
    }
}
