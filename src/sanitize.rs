use crate::ast::Element;

/// Schemes the generic transform lets through (compared case-insensitively).
pub const SAFE_SCHEMES: [&str; 6] = ["http", "https", "irc", "ircs", "mailto", "xmpp"];

/// Attributes that carry a URL, with the tags they carry one on.
/// `None` means the attribute is a URL on every element.
pub const URL_ATTRIBUTES: &[(&str, Option<&[&str]>)] = &[
    ("action", Some(&["form"])),
    ("cite", Some(&["blockquote", "del", "ins", "q"])),
    ("data", Some(&["object"])),
    ("formaction", Some(&["button", "input"])),
    ("href", Some(&["a", "area", "base", "link"])),
    ("icon", Some(&["menuitem"])),
    ("itemid", None),
    ("manifest", Some(&["html"])),
    ("ping", Some(&["a", "area"])),
    ("poster", Some(&["video"])),
    (
        "src",
        Some(&[
            "audio", "embed", "iframe", "img", "input", "script", "source", "track", "video",
        ]),
    ),
];

/// Rewrites one URL-bearing attribute value. Receives the stringified value,
/// the attribute name, and the element that carries it.
pub type UrlTransform = fn(url: &str, attribute: &str, element: &Element) -> String;

/// Whether `attribute` on `tag_name` carries a URL.
pub fn is_url_attribute(attribute: &str, tag_name: &str) -> bool {
    URL_ATTRIBUTES.iter().any(|(name, tags)| {
        *name == attribute && tags.is_none_or(|tags| tags.contains(&tag_name))
    })
}

/// Keep `url` if it has a safe scheme or no scheme at all, otherwise
/// return the empty string.
///
/// A colon only introduces a scheme when it comes before any `/`, `?` or `#`,
/// so `/a:b`, `?x=y:z` and `#c:d` are relative and pass unchanged.
pub fn default_url_transform(url: &str, _attribute: &str, _element: &Element) -> String {
    if is_safe_url(url) {
        url.to_string()
    } else {
        String::new()
    }
}

/// Lexical scheme check backing [`default_url_transform`].
pub fn is_safe_url(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return true;
    };

    let before = |c: char| url.find(c).is_some_and(|i| i < colon);
    if before('/') || before('?') || before('#') {
        return true;
    }

    let scheme = &url[..colon];
    SAFE_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme))
}

/// Run `transform` over every URL-bearing attribute of `element`.
/// Returns the number of attributes whose value changed.
pub fn sanitize_element(element: &mut Element, transform: UrlTransform) -> usize {
    let names: Vec<String> = element
        .properties
        .keys()
        .filter(|name| is_url_attribute(name, &element.tag_name))
        .cloned()
        .collect();

    let mut changed = 0;
    for name in names {
        let current = element
            .property(&name)
            .map(|value| value.to_string())
            .unwrap_or_default();
        let next = transform(&current, &name, element);
        if next != current {
            changed += 1;
        }
        element.set_property(&name, next);
    }
    changed
}
