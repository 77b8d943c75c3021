use url::Url;

use super::prefix::{AllowedPrefix, has_wildcard};
use crate::ast::PropertyValue;

/// Schemes a hardened URL may resolve to.
pub const SAFE_PROTOCOLS: [&str; 6] = ["https", "http", "irc", "ircs", "mailto", "xmpp"];

/// Schemes the wildcard entry authorizes.
pub const WILDCARD_PROTOCOLS: [&str; 2] = ["https", "http"];

/// Parse `raw` as an absolute URL, or failing that resolve it against
/// `default_origin`. `None` when neither yields a URL.
pub fn parse_url(raw: &str, default_origin: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(_) if !default_origin.is_empty() => {
            Url::parse(default_origin).ok()?.join(raw).ok()
        }
        Err(_) => None,
    }
}

/// Inputs starting with `/` (including `//host/...`) are emitted without
/// scheme and host when allowed.
pub fn is_path_relative(raw: &str) -> bool {
    raw.starts_with('/')
}

/// `scheme://host:port`, or `null` for opaque origins.
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Path, query and fragment of `url`; empty query or fragment are dropped.
pub fn relative_form(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Whether `prefix` authorizes `target`: same origin, and the normalized
/// target starts with the normalized prefix.
pub fn prefix_matches(prefix: &str, target: &Url, default_origin: &str) -> bool {
    let Some(prefix) = parse_url(prefix, default_origin) else {
        return false;
    };
    origin_of(&prefix) == origin_of(target) && target.as_str().starts_with(prefix.as_str())
}

/// Decide whether `raw` is allowed by `prefixes`, returning the value to
/// write back into the attribute, or `None` to block it.
pub fn authorize(
    raw: Option<&PropertyValue>,
    prefixes: &[AllowedPrefix],
    default_origin: &str,
) -> Option<String> {
    let raw = raw?.as_str()?;
    if raw.is_empty() {
        return None;
    }

    let url = parse_url(raw, default_origin)?;
    if !SAFE_PROTOCOLS.contains(&url.scheme()) {
        return None;
    }

    let matched = prefixes.iter().any(|prefix| match prefix {
        AllowedPrefix::Specific(prefix) => prefix_matches(prefix, &url, default_origin),
        AllowedPrefix::Wildcard => false,
    });

    let allowed = matched || (has_wildcard(prefixes) && WILDCARD_PROTOCOLS.contains(&url.scheme()));
    if !allowed {
        return None;
    }

    if is_path_relative(raw) {
        Some(relative_form(&url))
    } else {
        Some(url.into())
    }
}
