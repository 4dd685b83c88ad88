//! Build orchestration — the three build modes.
//!
//! Flow per mode: check inputs → (merge) → redact → write JSON and Markdown
//! → attempt DOCX/PDF → (main build only) patch the rendered HTML in place.
//! Mandatory stages abort the build; converter and HTML stages degrade into
//! recorded skips.

pub mod summary;

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::DownloadToggles;
use crate::document::{self, catalog::Catalog, merge::merge, redact::redact};
use crate::errors::BuildError;
use crate::html::download_links::{inject_download_links, InjectOutcome};
use crate::html::reorder::{move_section_after, ReorderOutcome};
use crate::render::convert::ConvertFormat;
use crate::render::markdown::{COVER_TEMPLATE, RESUME_TEMPLATE};
use crate::state::BuildContext;
use summary::{ArtifactFormat, ArtifactStatus, BuildSummary};

/// Theme applied when the document does not pick one.
const DEFAULT_THEME: &str = "jsonresume-theme-elegant";

/// Section relocated below work experience in the rendered HTML.
const MOVING_SECTION: &str = "volunteer-work";
const ANCHOR_SECTION: &str = "work-experience";

/// Profile pictures mirrored into dist/ when present.
const PROFILE_PICTURES: [&str; 3] = ["me.png", "me.jpg", "me.jpeg"];

// ────────────────────────────────────────────────────────────────────────────
// Main build
// ────────────────────────────────────────────────────────────────────────────

/// Builds the main resume: canonical JSON, markdown, optional binary
/// formats, CNAME, and the in-place HTML patches.
pub fn build_main(ctx: &mut BuildContext) -> Result<BuildSummary, BuildError> {
    info!("building resume");
    // Every required input is checked before the first write.
    let raw = document::load(&ctx.config.base_document())?;
    let template_path = ctx.config.resume_template();
    ctx.renderer.load_template(RESUME_TEMPLATE, &template_path)?;

    let theme = document::private_str(&raw, "_theme").unwrap_or(DEFAULT_THEME);
    info!("theme: {theme}");
    let toggles = DownloadToggles::from_document(&raw);

    ensure_dir(&ctx.config.dist_dir())?;
    let mut summary = BuildSummary::default();

    // Canonical public JSON, written to the root and mirrored into dist.
    let public = redact(raw.clone());
    let json = serde_json::to_string_pretty(&public)?;
    let json_path = ctx.config.canonical_json();
    write_atomic(&json_path, json.as_bytes())?;
    write_atomic(&ctx.config.dist_dir().join("resume.json"), json.as_bytes())?;
    summary.record(ArtifactFormat::Json, &json_path, ArtifactStatus::Created);
    info!("wrote {}", json_path.display());

    // CNAME from the private domain key, verbatim.
    if let Some(domain) = document::private_str(&raw, "_domain") {
        ensure_dir(&ctx.config.public_dir())?;
        write_atomic(&ctx.config.public_dir().join("CNAME"), domain.as_bytes())?;
        info!("domain: {domain}");
    }

    copy_profile_pictures(&ctx.config.public_dir(), &ctx.config.dist_dir())?;

    // Markdown, the source for the binary conversions.
    let markdown = ctx.renderer.render(RESUME_TEMPLATE, &public)?;
    let md_path = ctx.config.dist_dir().join("resume.md");
    write_atomic(&md_path, markdown.as_bytes())?;
    summary.record(ArtifactFormat::Markdown, &md_path, ArtifactStatus::Created);
    info!("wrote {}", md_path.display());

    let docx_path = ctx.config.dist_dir().join("resume.docx");
    convert_artifact(ctx, &md_path, &docx_path, ConvertFormat::Docx, &mut summary);
    let pdf_path = ctx.config.dist_dir().join("resume.pdf");
    convert_artifact(ctx, &md_path, &pdf_path, ConvertFormat::Pdf, &mut summary);

    patch_html(ctx, &toggles, &mut summary)?;

    Ok(summary)
}

// ────────────────────────────────────────────────────────────────────────────
// Variant build
// ────────────────────────────────────────────────────────────────────────────

/// Builds a named variant: overlay merged onto base, then the same artifact
/// chain minus the HTML target.
pub fn build_variant(ctx: &mut BuildContext, name: &str) -> Result<BuildSummary, BuildError> {
    info!("building variant: {name}");

    let base = document::load(&ctx.config.base_document())?;
    let overlay_path = Catalog::new(ctx.config.variants_dir()).resolve(name)?;
    let overlay = document::load(&overlay_path)?;
    let template_path = ctx.config.resume_template();
    ctx.renderer.load_template(RESUME_TEMPLATE, &template_path)?;

    ensure_dir(&ctx.config.dist_dir())?;
    let mut summary = BuildSummary::default();

    let merged = merge(base, overlay);

    // Merged YAML snapshot, kept alongside the public JSON for inspection.
    let yaml = serde_yaml::to_string(&merged)?;
    let yaml_path = ctx.config.dist_dir().join(format!("resume-{name}.yaml"));
    write_atomic(&yaml_path, yaml.as_bytes())?;
    summary.record(ArtifactFormat::Yaml, &yaml_path, ArtifactStatus::Created);

    let public = redact(merged);
    let json = serde_json::to_string_pretty(&public)?;
    let json_path = ctx.config.dist_dir().join(format!("resume-{name}.json"));
    write_atomic(&json_path, json.as_bytes())?;
    summary.record(ArtifactFormat::Json, &json_path, ArtifactStatus::Created);
    info!("wrote {}", json_path.display());

    let markdown = ctx.renderer.render(RESUME_TEMPLATE, &public)?;
    let md_path = ctx.config.dist_dir().join(format!("resume-{name}.md"));
    write_atomic(&md_path, markdown.as_bytes())?;
    summary.record(ArtifactFormat::Markdown, &md_path, ArtifactStatus::Created);
    info!("wrote {}", md_path.display());

    let docx_path = ctx.config.dist_dir().join(format!("resume-{name}.docx"));
    convert_artifact(ctx, &md_path, &docx_path, ConvertFormat::Docx, &mut summary);
    let pdf_path = ctx.config.dist_dir().join(format!("resume-{name}.pdf"));
    convert_artifact(ctx, &md_path, &pdf_path, ConvertFormat::Pdf, &mut summary);

    info!("variant '{name}' built");
    Ok(summary)
}

// ────────────────────────────────────────────────────────────────────────────
// Cover-letter build
// ────────────────────────────────────────────────────────────────────────────

/// Builds a named cover letter from the letter context laid over the base
/// document's `basics`.
pub fn build_cover(ctx: &mut BuildContext, name: &str) -> Result<BuildSummary, BuildError> {
    info!("building cover letter: {name}");

    let letter_path = Catalog::new(ctx.config.cover_letters_dir()).resolve(name)?;
    let letter = document::load(&letter_path)?;
    let base = document::load(&ctx.config.base_document())?;
    let template_path = ctx.config.cover_template();
    ctx.renderer.load_template(COVER_TEMPLATE, &template_path)?;
    let context = cover_context(&base, letter);

    ensure_dir(&ctx.config.dist_dir())?;
    let mut summary = BuildSummary::default();

    let markdown = ctx.renderer.render(COVER_TEMPLATE, &context)?;
    let md_path = ctx.config.dist_dir().join(format!("cover-{name}.md"));
    write_atomic(&md_path, markdown.as_bytes())?;
    summary.record(ArtifactFormat::Markdown, &md_path, ArtifactStatus::Created);
    info!("wrote {}", md_path.display());

    let docx_path = ctx.config.dist_dir().join(format!("cover-{name}.docx"));
    convert_artifact(ctx, &md_path, &docx_path, ConvertFormat::Docx, &mut summary);
    let pdf_path = ctx.config.dist_dir().join(format!("cover-{name}.pdf"));
    convert_artifact(ctx, &md_path, &pdf_path, ConvertFormat::Pdf, &mut summary);

    info!("cover letter '{name}' built");
    Ok(summary)
}

/// Template context for a cover letter: the letter document laid shallowly
/// over the base `basics` section. The contact identity always comes from
/// the base document, even when the letter tries to override it.
fn cover_context(base: &Value, letter: Value) -> Value {
    let basics = base.get("basics").cloned().unwrap_or(Value::Null);
    let mut context = match basics.clone() {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    if let Value::Object(letter_map) = letter {
        for (key, value) in letter_map {
            context.insert(key, value);
        }
    }
    if let Value::Object(basics_map) = &basics {
        for key in ["name", "email", "phone", "location"] {
            if let Some(value) = basics_map.get(key) {
                context.insert(key.to_string(), value.clone());
            }
        }
    }
    Value::Object(context)
}

// ────────────────────────────────────────────────────────────────────────────
// Stage helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs one optional conversion, degrading any failure into a recorded skip.
fn convert_artifact(
    ctx: &BuildContext,
    input: &Path,
    output: &Path,
    format: ConvertFormat,
    summary: &mut BuildSummary,
) {
    let artifact = match format {
        ConvertFormat::Docx => ArtifactFormat::Docx,
        ConvertFormat::Pdf => ArtifactFormat::Pdf,
    };
    match ctx.converter.convert(input, output, format) {
        Ok(()) => {
            info!("wrote {}", output.display());
            summary.record(artifact, output, ArtifactStatus::Created);
        }
        Err(err) => {
            warn!("{} generation skipped: {err}", artifact.label());
            summary.record(artifact, output, ArtifactStatus::Skipped(err.to_string()));
        }
    }
}

/// Applies the idempotent HTML edits to the rendered resume when it exists.
/// A missing HTML file skips the whole stage with a warning — the theme
/// renderer simply has not run yet.
fn patch_html(
    ctx: &BuildContext,
    toggles: &DownloadToggles,
    summary: &mut BuildSummary,
) -> Result<(), BuildError> {
    let html_path = ctx.config.html_output();
    if !html_path.exists() {
        warn!(
            "{} not found — skipping HTML post-processing",
            html_path.display()
        );
        summary.record(
            ArtifactFormat::Html,
            &html_path,
            ArtifactStatus::Skipped("no rendered HTML to patch".into()),
        );
        return Ok(());
    }

    let html = fs::read_to_string(&html_path)?;

    let (html, inject) = inject_download_links(&html, toggles);
    match inject {
        InjectOutcome::Injected => info!("download links injected"),
        InjectOutcome::AllDisabled => info!("download links disabled in config"),
        InjectOutcome::AnchorNotFound => {
            warn!("no insertion anchor for download links — HTML left unmodified")
        }
    }

    let (html, reorder) = move_section_after(&html, MOVING_SECTION, ANCHOR_SECTION);
    match reorder {
        ReorderOutcome::Moved => {
            info!("moved section '{MOVING_SECTION}' after '{ANCHOR_SECTION}'")
        }
        ReorderOutcome::NothingToReorder => {
            info!("no '{MOVING_SECTION}' section — nothing to reorder")
        }
        ReorderOutcome::AnchorNotFound => {
            warn!("anchor section '{ANCHOR_SECTION}' not found — reorder skipped")
        }
    }

    write_atomic(&html_path, html.as_bytes())?;
    summary.record(ArtifactFormat::Html, &html_path, ArtifactStatus::Created);
    Ok(())
}

/// Creates `dir` if absent; succeeds when it already exists.
pub fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Writes `contents` in a single atomic step: compose into a temp file in
/// the destination directory, then rename over the target.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.persist(path).map_err(|err| BuildError::Io(err.error))?;
    Ok(())
}

fn copy_profile_pictures(public: &Path, dist: &Path) -> Result<(), BuildError> {
    for picture in PROFILE_PICTURES {
        let source = public.join(picture);
        if source.exists() {
            fs::copy(&source, dist.join(picture))?;
            info!("copied {picture} to dist/");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::render::convert::{ConvertError, Converter};
    use crate::render::markdown::MarkdownRenderer;
    use serde_json::json;

    /// Fake converter that writes an empty file and succeeds.
    struct AlwaysConverts;

    impl Converter for AlwaysConverts {
        fn convert(
            &self,
            _input: &Path,
            output: &Path,
            _format: ConvertFormat,
        ) -> Result<(), ConvertError> {
            fs::write(output, b"").unwrap();
            Ok(())
        }
    }

    /// Fake converter standing in for a machine without pandoc.
    struct NeverConverts;

    impl Converter for NeverConverts {
        fn convert(
            &self,
            _input: &Path,
            _output: &Path,
            format: ConvertFormat,
        ) -> Result<(), ConvertError> {
            match format {
                ConvertFormat::Docx => Err(ConvertError::ToolMissing("pandoc: not found".into())),
                ConvertFormat::Pdf => Err(ConvertError::EngineMissing("xelatex missing".into())),
            }
        }
    }

    const BASE_YAML: &str = "\
_theme: elegant
_domain: ada.example.com
_downloads:
  pdf: false
basics:
  name: Ada Lovelace
  label: Engineer
  email: ada@example.com
  phone: '+44 1'
  location: London
work:
  - name: Analytical Engines Ltd
    position: Principal Engineer
    startDate: '2020-03'
    highlights:
      - Shipped the thing
  - _name: Stealth Startup
    position: Advisor
";

    const RESUME_HBS: &str = "\
# {{basics.name}}

{{#each work}}
## {{position}} — {{name}}
{{/each}}
";

    const COVER_HBS: &str = "\
# {{name}}

Dear {{recipient}},

{{body}}
";

    fn fixture(converter: Box<dyn Converter>) -> (tempfile::TempDir, BuildContext) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("resume/variants")).unwrap();
        fs::create_dir_all(root.join("resume/cover-letters")).unwrap();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(root.join("resume/data.yaml"), BASE_YAML).unwrap();
        fs::write(root.join("templates/resume.md.hbs"), RESUME_HBS).unwrap();
        fs::write(root.join("templates/cover.md.hbs"), COVER_HBS).unwrap();

        let config = Config {
            root: root.to_path_buf(),
            rust_log: "info".into(),
        };
        let ctx = BuildContext::new(config, MarkdownRenderer::new(), converter);
        (dir, ctx)
    }

    #[test]
    fn test_main_build_redacts_private_content_from_json() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        let summary = build_main(&mut ctx).unwrap();

        let json: Value =
            serde_json::from_str(&fs::read_to_string(ctx.config.canonical_json()).unwrap())
                .unwrap();
        assert!(json.get("_theme").is_none());
        assert!(json.get("_downloads").is_none());
        // The draft work entry (private name only) is gone from the array.
        assert_eq!(json["work"].as_array().unwrap().len(), 1);
        assert_eq!(json["work"][0]["name"], "Analytical Engines Ltd");

        assert!(summary.created() >= 2);
    }

    #[test]
    fn test_main_build_writes_cname_verbatim() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        build_main(&mut ctx).unwrap();
        let cname = fs::read_to_string(ctx.config.public_dir().join("CNAME")).unwrap();
        assert_eq!(cname, "ada.example.com");
    }

    #[test]
    fn test_main_build_survives_missing_converter() {
        let (_dir, mut ctx) = fixture(Box::new(NeverConverts));
        let summary = build_main(&mut ctx).unwrap();

        // Mandatory artifacts created, conversions recorded as skips.
        assert!(ctx.config.canonical_json().exists());
        assert!(ctx.config.dist_dir().join("resume.md").exists());
        assert_eq!(summary.skipped(), 3); // docx + pdf + html
        assert!(!ctx.config.dist_dir().join("resume.docx").exists());
    }

    #[test]
    fn test_main_build_fails_fast_on_missing_base_document() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        fs::remove_file(ctx.config.base_document()).unwrap();
        let err = build_main(&mut ctx).unwrap_err();
        match err {
            BuildError::InputNotFound { path, .. } => {
                assert!(path.ends_with("resume/data.yaml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_main_build_patches_existing_html() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        ensure_dir(&ctx.config.dist_dir()).unwrap();
        let html = "<div class=\"card profile-card\">\
                    <div class=\"social-links\"><a href=\"g\">gh</a></div>\
                    </div>";
        fs::write(ctx.config.html_output(), html).unwrap();

        build_main(&mut ctx).unwrap();

        let patched = fs::read_to_string(ctx.config.html_output()).unwrap();
        // PDF is toggled off in the fixture; DOCX becomes the primary link.
        assert!(patched.contains("download-primary\">DOCX"));
        assert!(!patched.contains("/resume.pdf"));
    }

    #[test]
    fn test_variant_build_applies_overlay_precedence() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        fs::write(
            ctx.config.variants_dir().join("apple-ios.yaml"),
            "basics:\n  label: iOS Engineer\n",
        )
        .unwrap();

        build_variant(&mut ctx, "apple-ios").unwrap();

        let json: Value = serde_json::from_str(
            &fs::read_to_string(ctx.config.dist_dir().join("resume-apple-ios.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["basics"]["label"], "iOS Engineer");
        // Sibling basics fields are inherited from base.
        assert_eq!(json["basics"]["name"], "Ada Lovelace");
        assert!(ctx.config.dist_dir().join("resume-apple-ios.yaml").exists());
        assert!(ctx.config.dist_dir().join("resume-apple-ios.md").exists());
    }

    #[test]
    fn test_variant_build_unknown_name_lists_catalog() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        fs::write(ctx.config.variants_dir().join("acme.yaml"), "{}\n").unwrap();

        let err = build_variant(&mut ctx, "google").unwrap_err();
        match err {
            BuildError::InputNotFound { alternatives, .. } => {
                assert_eq!(alternatives, ["acme"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cover_build_keeps_contact_identity_from_base() {
        let (_dir, mut ctx) = fixture(Box::new(AlwaysConverts));
        fs::write(
            ctx.config.cover_letters_dir().join("apple.yaml"),
            "recipient: Hiring Team\nbody: I would like to build things.\nname: Impostor\n",
        )
        .unwrap();

        build_cover(&mut ctx, "apple").unwrap();

        let markdown =
            fs::read_to_string(ctx.config.dist_dir().join("cover-apple.md")).unwrap();
        assert!(markdown.contains("# Ada Lovelace"));
        assert!(markdown.contains("Dear Hiring Team,"));
        assert!(!markdown.contains("Impostor"));
    }

    #[test]
    fn test_cover_context_overlays_basics_shallowly() {
        let base = json!({"basics": {"name": "Ada", "email": "a@b.c", "label": "Engineer"}});
        let letter = json!({"company": "Apple", "label": "Candidate"});
        let context = cover_context(&base, letter);
        assert_eq!(context["name"], "Ada");
        assert_eq!(context["company"], "Apple");
        // Non-identity keys may be overridden by the letter.
        assert_eq!(context["label"], "Candidate");
    }

    #[test]
    fn test_write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
