//! Document Converter — the single point of entry for external conversions.
//!
//! ARCHITECTURAL RULE: no other module may invoke the converter process
//! directly. DOCX and PDF artifacts are produced by shelling out to pandoc
//! through this module. Availability is detected at call time from the spawn
//! result — never probed in advance — and every failure here is recoverable:
//! the build records a skip and moves on.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Binary formats the external converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertFormat {
    Docx,
    Pdf,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter binary could not be spawned at all.
    #[error("converter unavailable: {0}")]
    ToolMissing(String),

    /// The typesetting backend needed for PDF output is missing.
    #[error("typesetting engine unavailable: {0}")]
    EngineMissing(String),

    /// The converter ran but reported failure.
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Converts a markdown artifact into a binary document format.
///
/// Injected into the build context so tests can substitute fakes that always
/// succeed or always fail without spawning a real process.
pub trait Converter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: ConvertFormat,
    ) -> Result<(), ConvertError>;
}

const PDF_ENGINE: &str = "xelatex";

/// Pandoc-backed converter. PDF output goes through xelatex.
#[derive(Debug, Clone, Default)]
pub struct PandocConverter {
    /// Optional reference document forwarded as `--reference-doc` for DOCX
    /// styling when the file exists.
    pub reference_doc: Option<PathBuf>,
}

impl Converter for PandocConverter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: ConvertFormat,
    ) -> Result<(), ConvertError> {
        let mut command = Command::new("pandoc");
        command.arg(input).arg("-o").arg(output);

        match format {
            ConvertFormat::Docx => {
                if let Some(reference) = &self.reference_doc {
                    if reference.exists() {
                        command.arg(format!("--reference-doc={}", reference.display()));
                    }
                }
            }
            ConvertFormat::Pdf => {
                command.arg(format!("--pdf-engine={PDF_ENGINE}"));
            }
        }

        debug!("invoking converter: {command:?}");
        let run = match command.output() {
            Ok(run) => run,
            Err(err) => return Err(ConvertError::ToolMissing(err.to_string())),
        };

        if run.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&run.stderr).trim().to_string();
        // Pandoc names the missing PDF engine on stderr; surface that as a
        // distinct skip reason from an ordinary conversion failure.
        if format == ConvertFormat::Pdf && stderr.contains(PDF_ENGINE) {
            return Err(ConvertError::EngineMissing(stderr));
        }
        Err(ConvertError::Failed(stderr))
    }
}
