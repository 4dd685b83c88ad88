//! Download-links injection — adds a download block to the rendered resume.

use crate::config::DownloadToggles;
use crate::html::blocks;

/// Marker class wrapping the injected block. Removal keys on this class,
/// which is what makes repeated injection replace instead of accumulate.
pub const BLOCK_CLASS: &str = "download-links";

/// Downloadable formats in call-to-action priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Pdf,
    Docx,
    Json,
    Markdown,
}

impl DownloadFormat {
    const PRIORITY: [DownloadFormat; 4] = [
        DownloadFormat::Pdf,
        DownloadFormat::Docx,
        DownloadFormat::Json,
        DownloadFormat::Markdown,
    ];

    fn href(&self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "/resume.pdf",
            DownloadFormat::Docx => "/resume.docx",
            DownloadFormat::Json => "/resume.json",
            DownloadFormat::Markdown => "/resume.md",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "PDF",
            DownloadFormat::Docx => "DOCX",
            DownloadFormat::Json => "JSON",
            DownloadFormat::Markdown => "MD",
        }
    }
}

/// Result of an injection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    Injected,
    /// Every format toggle is off — the HTML was left untouched.
    AllDisabled,
    /// No recognized insertion anchor — the HTML was left untouched.
    AnchorNotFound,
}

/// Injects (or replaces) the download-links block.
///
/// Any block from a previous run is stripped first, so injecting twice is
/// byte-identical to injecting once. Insertion anchors are tried in order:
/// after the `social-links` block closes, before the `profile-card` block
/// closes, before a generic `card` block closes.
pub fn inject_download_links(html: &str, toggles: &DownloadToggles) -> (String, InjectOutcome) {
    let enabled = enabled_formats(toggles);
    let Some((primary, secondary)) = enabled.split_first() else {
        return (html.to_string(), InjectOutcome::AllDisabled);
    };

    let stripped = remove_existing_block(html);
    let Some(at) = insertion_point(&stripped) else {
        return (html.to_string(), InjectOutcome::AnchorNotFound);
    };

    let block = compose_block(*primary, secondary);
    let mut patched = String::with_capacity(stripped.len() + block.len());
    patched.push_str(&stripped[..at]);
    patched.push_str(&block);
    patched.push_str(&stripped[at..]);
    (patched, InjectOutcome::Injected)
}

fn enabled_formats(toggles: &DownloadToggles) -> Vec<DownloadFormat> {
    DownloadFormat::PRIORITY
        .into_iter()
        .filter(|format| match format {
            DownloadFormat::Pdf => toggles.pdf_enabled(),
            DownloadFormat::Docx => toggles.docx_enabled(),
            DownloadFormat::Json => toggles.json_enabled(),
            DownloadFormat::Markdown => toggles.markdown_enabled(),
        })
        .collect()
}

/// Strips a previously injected block, including the newline the injection
/// put in front of it, restoring the pre-injection bytes exactly.
fn remove_existing_block(html: &str) -> String {
    let Some(block) = blocks::element_with_class(html, "div", BLOCK_CLASS) else {
        return html.to_string();
    };
    let start = if block.start > 0 && html.as_bytes()[block.start - 1] == b'\n' {
        block.start - 1
    } else {
        block.start
    };
    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..start]);
    out.push_str(&html[block.end..]);
    out
}

/// Insertion anchors in priority order; first match wins.
fn insertion_point(html: &str) -> Option<usize> {
    if let Some(block) = blocks::element_with_class(html, "div", "social-links") {
        return Some(block.end);
    }
    for class in ["profile-card", "card"] {
        if let Some(block) = blocks::element_with_class(html, "div", class) {
            // Inside the card, immediately before its closing tag.
            return Some(block.end - "</div>".len());
        }
    }
    None
}

/// One primary call-to-action link plus a secondary row of the remaining
/// enabled formats, wrapped in a single marker element.
fn compose_block(primary: DownloadFormat, secondary: &[DownloadFormat]) -> String {
    let mut block = format!(
        "\n<div class=\"{BLOCK_CLASS}\">\n\
         <hr>\n\
         <h4 class=\"download-title\">Download Resume</h4>\n\
         <a href=\"{}\" download class=\"download-primary\">{}</a>\n",
        primary.href(),
        primary.label()
    );
    if !secondary.is_empty() {
        block.push_str("<div class=\"download-secondary\">\n");
        for format in secondary {
            block.push_str(&format!(
                "<a href=\"{}\" download>{}</a>\n",
                format.href(),
                format.label()
            ));
        }
        block.push_str("</div>\n");
    }
    block.push_str("</div>");
    block
}
