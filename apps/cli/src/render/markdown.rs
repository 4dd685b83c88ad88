//! Markdown rendering — expands the fixed handlebars templates.

use std::path::Path;

use chrono::NaiveDate;
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::Value;

use crate::errors::BuildError;

/// Registry names for the two fixed templates.
pub const RESUME_TEMPLATE: &str = "resume";
pub const COVER_TEMPLATE: &str = "cover";

/// Template renderer for the markdown artifacts.
///
/// Owns a handlebars registry with the helpers the templates rely on
/// (`formatDate`, `join`). Templates load lazily from disk per build mode.
pub struct MarkdownRenderer {
    engine: Handlebars<'static>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(false);
        // Output is markdown, not HTML — never escape.
        engine.register_escape_fn(no_escape);
        engine.register_helper("formatDate", Box::new(format_date_helper));
        engine.register_helper("join", Box::new(join_helper));
        MarkdownRenderer { engine }
    }

    /// Registers the template at `path` under `name`, failing fast when the
    /// file is missing.
    pub fn load_template(&mut self, name: &str, path: &Path) -> Result<(), BuildError> {
        if !path.exists() {
            return Err(BuildError::input_not_found(path));
        }
        let source = std::fs::read_to_string(path)?;
        self.engine.register_template_string(name, source)?;
        Ok(())
    }

    pub fn render(&self, name: &str, doc: &Value) -> Result<String, BuildError> {
        Ok(self.engine.render(name, doc)?)
    }

    #[cfg(test)]
    fn load_template_str(&mut self, name: &str, source: &str) -> Result<(), BuildError> {
        self.engine.register_template_string(name, source)?;
        Ok(())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// `{{formatDate date}}` — renders `Mon YYYY`, or `Present` for an absent
/// date (the open end of a date range).
fn format_date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h.param(0).and_then(|p| p.value().as_str()).unwrap_or("");
    out.write(&format_date(raw))?;
    Ok(())
}

/// `{{join list sep}}` — joins a list; the separator defaults to `", "`.
fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let separator = h.param(1).and_then(|p| p.value().as_str()).unwrap_or(", ");
    let joined = h
        .param(0)
        .and_then(|p| p.value().as_array())
        .map(|items| {
            items
                .iter()
                .map(display_scalar)
                .collect::<Vec<_>>()
                .join(separator)
        })
        .unwrap_or_default();
    out.write(&joined)?;
    Ok(())
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Formats `YYYY`, `YYYY-MM` or `YYYY-MM-DD` as `Mon YYYY`. Empty input is
/// an open-ended range and renders as `Present`; unparseable input passes
/// through as written.
fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return "Present".to_string();
    }
    let padded = match raw.len() {
        4 => format!("{raw}-01-01"),
        7 => format!("{raw}-01"),
        _ => raw.to_string(),
    };
    match NaiveDate::parse_from_str(&padded, "%Y-%m-%d") {
        Ok(date) => date.format("%b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
