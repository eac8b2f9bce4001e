//! SVG sanitizer.
//!
//! The markup is parsed into a read-only tree and written back out element by element. An internal
//! DTD is allowed, but its entities are already expanded in the tree and the DOCTYPE itself is never
//! written back, so whatever an entity injects passes through the same filter. While writing:
//!
//! - `script`, `foreignObject`, `use` and `iframe` elements are dropped with their whole subtree,
//!   wherever they are nested;
//! - every attribute whose name starts with `on` is dropped;
//! - `href` / `xlink:href` attributes whose value starts with `javascript:` are dropped;
//! - comments and processing instructions are not carried over.
//!
//! Names are compared ASCII case-insensitively, and `javascript:` is detected after removing
//! whitespace and control characters from the value.

use roxmltree::{Document, Node, ParsingOptions};

pub const BLOCKED_ELEMENTS: [&str; 4] = ["script", "foreignObject", "use", "iframe"];

#[derive(thiserror::Error, Debug)]
pub enum SanitizeError {
    #[error("svg markup is not valid UTF-8")]
    NotUtf8,

    #[error("svg markup is malformed: {0}")]
    Malformed(#[from] roxmltree::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub removed_elements: usize,
    pub removed_attributes: usize,
}

#[derive(Clone, Debug)]
pub struct SanitizedSvg {
    pub markup: String,
    pub report: SanitizeReport,
}

/// Decode UTF-8 (a leading BOM is tolerated) and sanitize.
pub fn sanitize_svg_bytes(bytes: &[u8]) -> Result<SanitizedSvg, SanitizeError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|_| SanitizeError::NotUtf8)?;
    sanitize_svg(text)
}

pub fn sanitize_svg(text: &str) -> Result<SanitizedSvg, SanitizeError> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, opts)?;
    let mut report = SanitizeReport::default();
    let mut markup = String::with_capacity(text.len());
    let root = doc.root_element();

    if is_blocked_element(root) {
        // Nothing safe remains; keep an empty element so the output still parses.
        report.removed_elements += 1;
        markup.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
    } else {
        write_element(root, &[], &mut markup, &mut report);
    }

    Ok(SanitizedSvg { markup, report })
}

type NsDecl<'a> = (Option<&'a str>, &'a str);

fn write_element<'a>(
    node: Node<'a, '_>,
    parent_scope: &[NsDecl<'a>],
    out: &mut String,
    report: &mut SanitizeReport,
) {
    let scope: Vec<NsDecl<'a>> = node
        .namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| (ns.name(), ns.uri()))
        .collect();

    let tag = qualified_name(node, node.tag_name().name(), node.tag_name().namespace());
    out.push('<');
    out.push_str(&tag);

    for (prefix, uri) in scope.iter().filter(|decl| !parent_scope.contains(*decl)) {
        match prefix {
            Some(p) => out.push_str(&format!(" xmlns:{p}=\"")),
            None => out.push_str(" xmlns=\""),
        }
        escape_into(uri, true, out);
        out.push('"');
    }

    for attr in node.attributes() {
        let name = qualified_name(node, attr.name(), attr.namespace());
        if is_blocked_attribute(&name, attr.name(), attr.value()) {
            report.removed_attributes += 1;
            continue;
        }
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        escape_into(attr.value(), true, out);
        out.push('"');
    }

    let mut body = String::new();
    for child in node.children() {
        if child.is_element() {
            if is_blocked_element(child) {
                report.removed_elements += 1;
                continue;
            }
            write_element(child, &scope, &mut body, report);
        } else if let Some(text) = child.text().filter(|_| child.is_text()) {
            escape_into(text, false, &mut body);
        }
    }

    if body.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&body);
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }
}

fn qualified_name(node: Node<'_, '_>, local: &str, namespace: Option<&str>) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn is_blocked_element(node: Node<'_, '_>) -> bool {
    let local = node.tag_name().name();
    BLOCKED_ELEMENTS
        .iter()
        .any(|blocked| blocked.eq_ignore_ascii_case(local))
}

fn is_blocked_attribute(qualified: &str, local: &str, value: &str) -> bool {
    let is_event_handler = qualified
        .get(..2)
        .is_some_and(|p| p.eq_ignore_ascii_case("on"));
    let is_script_link = local.eq_ignore_ascii_case("href") && is_javascript_url(value);
    is_event_handler || is_script_link
}

fn is_javascript_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take("javascript:".len())
        .collect();
    compact.eq_ignore_ascii_case("javascript:")
}

fn escape_into(raw: &str, attribute: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sanitize.rs"]
mod tests;
