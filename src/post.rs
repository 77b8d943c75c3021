use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::ast::Node;
use crate::sanitize::{self, UrlTransform};
use crate::visit::{Visit, visit};

/// Options for the pass that runs between parsing and hardening.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostOptions {
    /// Drop raw HTML entirely instead of showing it as text.
    pub skip_html: bool,
    /// Tag names to keep; everything else is removed. Empty keeps all.
    pub allowed_elements: BTreeSet<String>,
    /// Tag names to remove. Cannot be combined with `allowed_elements`.
    pub disallowed_elements: BTreeSet<String>,
    /// Keep the children of removed elements in their place.
    pub unwrap_disallowed: bool,
}

impl PostOptions {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.allowed_elements.is_empty() && !self.disallowed_elements.is_empty() {
            anyhow::bail!(
                "allowed_elements and disallowed_elements cannot be combined: expected one or the other"
            );
        }
        Ok(())
    }

    fn removes(&self, tag_name: &str) -> bool {
        if !self.allowed_elements.is_empty() {
            !self.allowed_elements.contains(tag_name)
        } else {
            self.disallowed_elements.contains(tag_name)
        }
    }
}

/// Neutralise raw HTML, run `transform` over URL-bearing attributes and
/// filter elements, in one walk over `tree`.
///
/// When both element lists are set, `allowed_elements` wins; callers reject
/// that combination up front with [`PostOptions::validate`].
pub fn post(tree: &mut Node, options: &PostOptions, transform: UrlTransform) {
    let mut rewritten = 0usize;
    visit(tree, &mut |node: &mut Node| match node {
        Node::Raw { value } => {
            if options.skip_html {
                Visit::Splice(Vec::new())
            } else {
                Visit::Splice(vec![Node::text(std::mem::take(value))])
            }
        }
        Node::Element(element) => {
            rewritten += sanitize::sanitize_element(element, transform);

            if options.removes(&element.tag_name) {
                if options.unwrap_disallowed {
                    Visit::Splice(std::mem::take(&mut element.children))
                } else {
                    Visit::Splice(Vec::new())
                }
            } else {
                Visit::Continue
            }
        }
        _ => Visit::Continue,
    });

    if rewritten > 0 {
        debug!(rewritten, "url transform rewrote attributes");
    }
}
