use tracing::debug;

use crate::ast::Node;
use crate::config::HardmarkConfig;
use crate::harden::{Harden, HardenConfig};
use crate::markdown::{self, MarkdownOptions};
use crate::post::{self, PostOptions};
use crate::render;
use crate::sanitize::{self, UrlTransform};

/// The full pipeline: markdown → tree → post pass → hardening.
///
/// Configuration is validated once in [`Processor::new`]; processing
/// itself never fails on hostile input.
pub struct Processor {
    markdown: MarkdownOptions,
    post: PostOptions,
    url_transform: UrlTransform,
    harden: Harden,
}

impl Processor {
    pub fn new(
        markdown: MarkdownOptions,
        post: PostOptions,
        harden: HardenConfig,
    ) -> anyhow::Result<Self> {
        post.validate()?;
        let harden = Harden::new(harden)?;
        Ok(Self {
            markdown,
            post,
            url_transform: sanitize::default_url_transform,
            harden,
        })
    }

    pub fn from_config(config: &HardmarkConfig) -> anyhow::Result<Self> {
        Self::new(
            config.markdown.options.clone(),
            config.markdown.post.clone(),
            config.harden.clone(),
        )
    }

    /// Swap the generic URL transform that runs before hardening.
    pub fn with_url_transform(mut self, transform: UrlTransform) -> Self {
        self.url_transform = transform;
        self
    }

    pub fn harden(&self) -> &Harden {
        &self.harden
    }

    /// Parse and harden `content`, returning the tree for a renderer.
    pub fn process(&self, content: &str) -> Node {
        debug!(bytes = content.len(), "processing markdown");
        let mut tree = markdown::parse(content, &self.markdown);
        post::post(&mut tree, &self.post, self.url_transform);
        self.harden.apply(&mut tree);
        tree
    }

    /// Parse, harden and serialize `content` to HTML.
    pub fn render(&self, content: &str) -> String {
        render::to_html(&self.process(content))
    }
}
