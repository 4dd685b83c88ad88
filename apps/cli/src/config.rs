use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

/// Project layout configuration.
///
/// Every input and output path is derived from a single project root, so the
/// tool can be pointed at any resume checkout via `CVFORGE_ROOT`.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let root = match std::env::var("CVFORGE_ROOT") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir().context("cannot resolve current directory")?,
        };

        Ok(Config {
            root,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    // Inputs

    pub fn base_document(&self) -> PathBuf {
        self.root.join("resume").join("data.yaml")
    }

    pub fn variants_dir(&self) -> PathBuf {
        self.root.join("resume").join("variants")
    }

    pub fn cover_letters_dir(&self) -> PathBuf {
        self.root.join("resume").join("cover-letters")
    }

    pub fn resume_template(&self) -> PathBuf {
        self.root.join("templates").join("resume.md.hbs")
    }

    pub fn cover_template(&self) -> PathBuf {
        self.root.join("templates").join("cover.md.hbs")
    }

    /// Optional pandoc reference document for DOCX styling.
    pub fn docx_reference(&self) -> PathBuf {
        self.root.join("templates").join("reference.docx")
    }

    // Outputs

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join("public")
    }

    pub fn canonical_json(&self) -> PathBuf {
        self.root.join("resume.json")
    }

    /// The theme-rendered HTML this pipeline patches in place.
    pub fn html_output(&self) -> PathBuf {
        self.dist_dir().join("resume.html")
    }
}

/// Per-format download toggles read from the document's `_downloads` key.
///
/// Resolution rule: absent means enabled, an explicit `false` disables, any
/// other value means enabled. Recognized toggle names: `pdf`, `docx`, `json`,
/// `md`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadToggles {
    pub pdf: Option<bool>,
    pub docx: Option<bool>,
    pub json: Option<bool>,
    pub markdown: Option<bool>,
}

impl DownloadToggles {
    pub fn from_document(doc: &Value) -> Self {
        let section = doc.get("_downloads");
        let read = |name: &str| section.and_then(|s| s.get(name)).and_then(Value::as_bool);
        DownloadToggles {
            pdf: read("pdf"),
            docx: read("docx"),
            json: read("json"),
            markdown: read("md"),
        }
    }

    pub fn pdf_enabled(&self) -> bool {
        resolve(self.pdf)
    }

    pub fn docx_enabled(&self) -> bool {
        resolve(self.docx)
    }

    pub fn json_enabled(&self) -> bool {
        resolve(self.json)
    }

    pub fn markdown_enabled(&self) -> bool {
        resolve(self.markdown)
    }
}

fn resolve(toggle: Option<bool>) -> bool {
    toggle != Some(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_toggles_default_to_enabled() {
        let toggles = DownloadToggles::from_document(&json!({"basics": {"name": "Ada"}}));
        assert!(toggles.pdf_enabled());
        assert!(toggles.docx_enabled());
        assert!(toggles.json_enabled());
        assert!(toggles.markdown_enabled());
    }

    #[test]
    fn test_explicit_false_disables() {
        let doc = json!({"_downloads": {"pdf": false, "docx": true}});
        let toggles = DownloadToggles::from_document(&doc);
        assert!(!toggles.pdf_enabled());
        assert!(toggles.docx_enabled());
        assert!(toggles.json_enabled());
    }

    #[test]
    fn test_non_boolean_toggle_counts_as_enabled() {
        // Anything that is not the literal `false` keeps the format enabled.
        let doc = json!({"_downloads": {"pdf": "no", "md": 0}});
        let toggles = DownloadToggles::from_document(&doc);
        assert!(toggles.pdf_enabled());
        assert!(toggles.markdown_enabled());
    }
}
