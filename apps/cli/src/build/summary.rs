//! Build summary — per-artifact outcomes reported at the end of a run.

use std::fmt;
use std::path::PathBuf;

/// Formats an artifact can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Yaml,
    Markdown,
    Html,
    Docx,
    Pdf,
}

impl ArtifactFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactFormat::Json => "JSON",
            ArtifactFormat::Yaml => "YAML",
            ArtifactFormat::Markdown => "Markdown",
            ArtifactFormat::Html => "HTML",
            ArtifactFormat::Docx => "DOCX",
            ArtifactFormat::Pdf => "PDF",
        }
    }
}

/// What happened to a single artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Created,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub format: ArtifactFormat,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

/// Aggregated per-artifact results for one build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub reports: Vec<ArtifactReport>,
}

impl BuildSummary {
    pub fn record(
        &mut self,
        format: ArtifactFormat,
        path: impl Into<PathBuf>,
        status: ArtifactStatus,
    ) {
        self.reports.push(ArtifactReport {
            format,
            path: path.into(),
            status,
        });
    }

    pub fn created(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status == ArtifactStatus::Created)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, ArtifactStatus::Skipped(_)))
            .count()
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            match &report.status {
                ArtifactStatus::Created => {
                    writeln!(f, "  + {:<8} {}", report.format.label(), report.path.display())?
                }
                ArtifactStatus::Skipped(reason) => {
                    writeln!(f, "  - {:<8} skipped: {reason}", report.format.label())?
                }
                ArtifactStatus::Failed(reason) => {
                    writeln!(f, "  ! {:<8} failed: {reason}", report.format.label())?
                }
            }
        }
        writeln!(
            f,
            "  {} created, {} skipped",
            self.created(),
            self.skipped()
        )
    }
}
