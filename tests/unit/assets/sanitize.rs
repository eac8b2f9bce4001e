use super::*;

fn reparse(markup: &str) -> Document<'_> {
    Document::parse(markup).expect("sanitized output must parse")
}

#[test]
fn strips_script_and_event_handlers() {
    let input = r#"<svg><script>alert(1)</script><rect onclick="x()" width="1" height="1"/></svg>"#;
    let out = sanitize_svg(input).unwrap();

    let doc = reparse(&out.markup);
    assert!(doc.descendants().all(|n| n.tag_name().name() != "script"));
    assert!(
        doc.descendants()
            .all(|n| n.attributes().all(|a| a.name() != "onclick"))
    );
    assert!(!out.markup.contains("alert"));
    assert!(out.markup.contains(r#"<rect width="1" height="1"/>"#));
    assert_eq!(
        out.report,
        SanitizeReport {
            removed_elements: 1,
            removed_attributes: 1
        }
    );
}

#[test]
fn removes_blocked_elements_at_any_depth() {
    let input = r##"<svg xmlns="http://www.w3.org/2000/svg">
        <g><g><foreignObject><div>hi</div></foreignObject></g></g>
        <use href="#a"/>
        <g><iframe src="x"/><circle r="2"/></g>
    </svg>"##;
    let out = sanitize_svg(input).unwrap();
    let doc = reparse(&out.markup);
    for n in doc.descendants().filter(|n| n.is_element()) {
        assert!(!BLOCKED_ELEMENTS.contains(&n.tag_name().name()));
    }
    assert!(out.markup.contains("<circle r=\"2\"/>"));
    assert_eq!(out.report.removed_elements, 3);
}

#[test]
fn drops_javascript_links_but_keeps_safe_ones() {
    let input = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
        <a href="javascript:alert(1)"><rect width="1" height="1"/></a>
        <a xlink:href=" JavaScript:alert(2)"><rect width="1" height="1"/></a>
        <a href="https://example.com"><rect width="1" height="1"/></a>
        <linearGradient id="g"/><rect fill="url(#g)" xlink:href="#g" width="1" height="1"/>
    </svg>"##;
    let out = sanitize_svg(input).unwrap();
    assert!(!out.markup.to_ascii_lowercase().contains("javascript"));
    assert!(out.markup.contains(r#"href="https://example.com""#));
    assert!(out.markup.contains(r##"xlink:href="#g""##));
    assert!(out.markup.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
    assert_eq!(out.report.removed_attributes, 2);
    reparse(&out.markup);
}

#[test]
fn handler_prefix_match_ignores_case() {
    let out = sanitize_svg(r#"<svg ONLOAD="x()" OnMouseOver="y()" opacity="0.5"/>"#).unwrap();
    assert_eq!(out.markup, r#"<svg opacity="0.5"/>"#);
}

#[test]
fn escapes_text_and_attribute_values() {
    let input = r#"<svg><text title="a &amp; &quot;b&quot; &lt;c&gt;">1 &lt; 2 &amp; 3</text></svg>"#;
    let out = sanitize_svg(input).unwrap();
    let doc = reparse(&out.markup);
    let text = doc
        .descendants()
        .find(|n| n.has_tag_name("text"))
        .unwrap();
    assert_eq!(text.attribute("title"), Some(r#"a & "b" <c>"#));
    assert_eq!(text.text(), Some("1 < 2 & 3"));
}

#[test]
fn drops_comments_and_processing_instructions() {
    let input = r#"<?xml version="1.0"?><svg><!-- note --><?php echo 1; ?><rect/></svg>"#;
    let out = sanitize_svg(input).unwrap();
    assert_eq!(out.markup, "<svg><rect/></svg>");
}

#[test]
fn blocked_root_becomes_empty_svg() {
    let out = sanitize_svg("<script>alert(1)</script>").unwrap();
    assert!(!out.markup.contains("script"));
    reparse(&out.markup);
}

#[test]
fn malformed_markup_is_rejected() {
    assert!(matches!(
        sanitize_svg("<svg><rect></svg>"),
        Err(SanitizeError::Malformed(_))
    ));
    assert!(matches!(sanitize_svg("not xml"), Err(SanitizeError::Malformed(_))));
    assert!(matches!(
        sanitize_svg(r#"<!DOCTYPE svg [<!ENTITY x "&y;"><!ENTITY y "&x;">]><svg>&x;</svg>"#),
        Err(SanitizeError::Malformed(_))
    ));
}

#[test]
fn public_doctype_is_accepted_and_not_written_back() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect width="100" height="50"/></svg>"#;
    let out = sanitize_svg(input).unwrap();
    assert!(!out.markup.contains("DOCTYPE"));
    assert_eq!(out.report, SanitizeReport::default());
    let doc = reparse(&out.markup);
    assert_eq!(doc.root_element().attribute("width"), Some("100"));
    assert!(doc.descendants().any(|n| n.has_tag_name("rect")));
}

#[test]
fn entity_expanding_to_script_is_stripped() {
    let input = r#"<!DOCTYPE svg [<!ENTITY payload "<script>alert(1)</script>">]>
<svg xmlns="http://www.w3.org/2000/svg"><g>&payload;<circle r="1"/></g></svg>"#;
    let out = sanitize_svg(input).unwrap();
    let doc = reparse(&out.markup);
    assert!(doc.descendants().all(|n| !n.has_tag_name("script")));
    assert!(!out.markup.contains("alert"));
    assert!(out.markup.contains(r#"<circle r="1"/>"#));
    assert_eq!(out.report.removed_elements, 1);
}

#[test]
fn non_utf8_is_rejected_and_bom_is_tolerated() {
    assert!(matches!(
        sanitize_svg_bytes(&[0x3C, 0xFF, 0xFE, 0x3E]),
        Err(SanitizeError::NotUtf8)
    ));
    let out = sanitize_svg_bytes(b"\xEF\xBB\xBF<svg/>").unwrap();
    assert_eq!(out.markup, "<svg/>");
}
