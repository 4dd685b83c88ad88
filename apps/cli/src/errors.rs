use std::path::PathBuf;

use thiserror::Error;

/// Pipeline-level error type.
///
/// Only fatal conditions live here — anything that must abort the build with
/// a non-zero exit status. Recoverable conditions (missing converter, missing
/// HTML anchor) are stage outcomes recorded in the build summary, never errors.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("required input not found: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        /// Known names to suggest when the input came from a catalog.
        alternatives: Vec<String>,
    },

    #[error("failed to parse document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BuildError {
    /// A missing input with no catalog to suggest alternatives from.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        BuildError::InputNotFound {
            path: path.into(),
            alternatives: Vec::new(),
        }
    }
}
