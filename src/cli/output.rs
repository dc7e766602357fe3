//! CLI output formatting

use crate::{core::Workflow, scaffold::ProjectKind};
use console::Emoji;
use serde::Serialize;
use std::path::Path;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");

/// Machine-readable summary of a generated workflow
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub file: String,
    /// Relative path written, absent for dry runs
    pub path: Option<String>,
    pub kind: ProjectKind,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub runs_on: Vec<String>,
    pub steps: usize,
}

impl WorkflowSummary {
    pub fn new(workflow: &Workflow, kind: ProjectKind, path: Option<&Path>) -> Self {
        Self {
            file: workflow.filename().to_string(),
            path: path.map(|p| p.display().to_string()),
            kind,
            jobs: workflow
                .jobs()
                .map(|(id, job)| JobSummary {
                    id: id.to_string(),
                    runs_on: job.runs_on.iter().map(str::to_string).collect(),
                    steps: job.steps.len(),
                })
                .collect(),
        }
    }
}

/// Format one job line for display
pub fn format_job(job: &JobSummary) -> String {
    format!(
        "  {} on {} ({} steps)",
        style(&job.id).bold(),
        style(job.runs_on.join(", ")).cyan(),
        job.steps
    )
}

/// Format the summary for display
pub fn format_summary(summary: &WorkflowSummary) -> String {
    let mut lines = Vec::with_capacity(summary.jobs.len() + 1);
    let target = summary.path.as_deref().unwrap_or(&summary.file);
    lines.push(format!(
        "{} {} workflow {}",
        CHECK,
        style(summary.kind).green(),
        style(target).bold()
    ));
    lines.extend(summary.jobs.iter().map(format_job));
    lines.join("\n")
}
