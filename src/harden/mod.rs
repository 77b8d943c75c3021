pub mod prefix;
pub mod resolve;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::{Element, Node};
use crate::visit::{Visit, visit, visit_nodes};

pub use prefix::AllowedPrefix;
pub use resolve::authorize;

/// Marker appended to the label of a blocked link.
pub const BLOCKED_LINK_MARKER: &str = " [blocked]";

/// Alt text used in a blocked image placeholder when the image has none.
pub const MISSING_ALT: &str = "No Description";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HardenError {
    #[error(
        "default_origin is required when allowed_link_prefixes or allowed_image_prefixes contain non-wildcard prefixes"
    )]
    MissingDefaultOrigin,
}

/// Which origins links and images may point at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardenConfig {
    /// Origin used to resolve relative URLs and relative prefixes.
    pub default_origin: String,
    /// Empty blocks every link.
    pub allowed_link_prefixes: Vec<AllowedPrefix>,
    /// Empty blocks every image.
    pub allowed_image_prefixes: Vec<AllowedPrefix>,
}

impl HardenConfig {
    pub fn validate(&self) -> Result<(), HardenError> {
        let needs_origin = prefix::has_specific(&self.allowed_link_prefixes)
            || prefix::has_specific(&self.allowed_image_prefixes);
        if needs_origin && self.default_origin.is_empty() {
            return Err(HardenError::MissingDefaultOrigin);
        }
        Ok(())
    }
}

/// The hardening pass over a parsed tree: every `a[href]` and `img[src]`
/// is either rewritten to its authorized form or replaced by a placeholder.
#[derive(Debug, Clone)]
pub struct Harden {
    config: HardenConfig,
}

impl Harden {
    pub fn new(config: HardenConfig) -> Result<Self, HardenError> {
        config.validate()?;
        if !config.default_origin.is_empty() && url::Url::parse(&config.default_origin).is_err() {
            warn!(
                default_origin = %config.default_origin,
                "default_origin is not an absolute URL; relative links and images will be blocked"
            );
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &HardenConfig {
        &self.config
    }

    /// Authorize a link target. `Some` holds the value to emit.
    pub fn authorize_link(&self, href: &str) -> Option<String> {
        authorize(
            Some(&href.into()),
            &self.config.allowed_link_prefixes,
            &self.config.default_origin,
        )
    }

    /// Authorize an image source. `Some` holds the value to emit.
    pub fn authorize_image(&self, src: &str) -> Option<String> {
        authorize(
            Some(&src.into()),
            &self.config.allowed_image_prefixes,
            &self.config.default_origin,
        )
    }

    /// Harden `tree` in place.
    pub fn apply(&self, tree: &mut Node) {
        visit(tree, &mut |node: &mut Node| self.visit_node(node));
    }

    fn visit_node(&self, node: &mut Node) -> Visit {
        let Node::Element(element) = node else {
            return Visit::Continue;
        };

        match element.tag_name.as_str() {
            "a" => {
                let href = authorize(
                    element.property("href"),
                    &self.config.allowed_link_prefixes,
                    &self.config.default_origin,
                );
                match href {
                    Some(href) => {
                        element.set_property("href", href);
                        element.set_property("target", "_blank");
                        element.set_property("rel", "noopener noreferrer");
                        Visit::Continue
                    }
                    None => {
                        // The label may hold images or links of its own.
                        visit_nodes(&mut element.children, &mut |child: &mut Node| {
                            self.visit_node(child)
                        });
                        Visit::Replace(blocked_link(element))
                    }
                }
            }
            "img" => {
                let src = authorize(
                    element.property("src"),
                    &self.config.allowed_image_prefixes,
                    &self.config.default_origin,
                );
                match src {
                    Some(src) => {
                        element.set_property("src", src);
                        Visit::Continue
                    }
                    None => {
                        visit_nodes(&mut element.children, &mut |child: &mut Node| {
                            self.visit_node(child)
                        });
                        Visit::Replace(blocked_image(element))
                    }
                }
            }
            _ => Visit::Continue,
        }
    }
}

/// Validate `config` and harden `tree` with it.
pub fn harden(tree: &mut Node, config: HardenConfig) -> Result<(), HardenError> {
    Harden::new(config)?.apply(tree);
    Ok(())
}

/// A span carrying the link's label followed by the blocked marker.
fn blocked_link(anchor: &mut Element) -> Node {
    let href = anchor
        .property("href")
        .map(|value| value.to_string())
        .unwrap_or_default();
    debug!(href = %href, "blocked link");

    let mut children = std::mem::take(&mut anchor.children);
    children.push(Node::text(BLOCKED_LINK_MARKER));

    Element::new("span")
        .with_property("title", format!("Blocked URL: {href}"))
        .with_children(children)
        .into()
}

/// A span whose only content is `[Blocked image: <alt>]`.
fn blocked_image(image: &Element) -> Node {
    let src = image
        .property("src")
        .map(|value| value.to_string())
        .unwrap_or_default();
    debug!(src = %src, "blocked image");

    let alt = image
        .property("alt")
        .map(|value| value.to_string())
        .filter(|alt| !alt.is_empty())
        .unwrap_or_else(|| MISSING_ALT.to_string());

    Element::new("span")
        .with_child(Node::text(format!("[Blocked image: {alt}]")))
        .into()
}
