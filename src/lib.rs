//! Render untrusted markdown to an element tree, then harden every link and
//! image against an origin allow-list.
//!
//! ```
//! use hardmark::harden::{AllowedPrefix, HardenConfig};
//! use hardmark::processor::Processor;
//!
//! let processor = Processor::new(
//!     Default::default(),
//!     Default::default(),
//!     HardenConfig {
//!         default_origin: "https://example.com".into(),
//!         allowed_link_prefixes: vec![AllowedPrefix::parse("https://github.com/")],
//!         allowed_image_prefixes: vec![],
//!     },
//! )
//! .unwrap();
//!
//! let html = processor.render("[repo](https://github.com/user/repo) [x](https://evil.com/x)");
//! assert!(html.contains(r#"href="https://github.com/user/repo""#));
//! assert!(html.contains("x [blocked]"));
//! ```

pub mod ast;
pub mod config;
pub mod harden;
pub mod markdown;
pub mod post;
pub mod processor;
pub mod render;
pub mod sanitize;
pub mod visit;
