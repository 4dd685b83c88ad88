use crate::config::Config;
use crate::render::convert::Converter;
use crate::render::markdown::MarkdownRenderer;

/// Shared build context threaded through every pipeline stage.
pub struct BuildContext {
    pub config: Config,
    /// Template renderer for the markdown artifacts. Templates load lazily,
    /// per build mode.
    pub renderer: MarkdownRenderer,
    /// Pluggable document converter. Default: pandoc. Tests inject fakes.
    pub converter: Box<dyn Converter>,
}

impl BuildContext {
    pub fn new(config: Config, renderer: MarkdownRenderer, converter: Box<dyn Converter>) -> Self {
        BuildContext {
            config,
            renderer,
            converter,
        }
    }
}
