// src/utils/dom.rs

//! Small helpers over `scraper` element references.

use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};
use crate::utils::normalize_whitespace;

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Text content of an element with whitespace collapsed.
pub fn text_of(element: ElementRef<'_>) -> String {
    normalize_whitespace(&raw_text(element))
}

/// Text content of an element, text nodes separated by a space.
///
/// Nodes that meet between two CJK characters are joined directly, so
/// `王<span>小明</span>` reads as `王小明`.
pub fn raw_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for piece in element.text() {
        let prev = out.trim_end().chars().next_back();
        let next = piece.trim_start().chars().next();
        if let (Some(prev), Some(next)) = (prev, next) {
            if !(is_cjk(prev) && is_cjk(next)) {
                out.push(' ');
            }
        }
        out.push_str(piece);
    }
    out
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{4e00}'..='\u{9fff}'
        | '\u{ac00}'..='\u{d7af}'
        | '\u{f900}'..='\u{faff}'
        | '\u{20000}'..='\u{2a6df}')
}

/// Address carried by a `mailto:` anchor, without scheme, query or fragment.
pub fn mailto_address(anchor: ElementRef<'_>) -> Option<String> {
    let href = anchor.value().attr("href")?.trim();
    let prefix = href.get(..7)?;
    if !prefix.eq_ignore_ascii_case("mailto:") {
        return None;
    }

    let address = href[7..]
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

/// All `mailto:` anchors inside `scope`, in document order.
pub fn mail_links<'a>(scope: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>> {
    let anchors = parse_selector("a[href]")?;
    Ok(scope
        .select(&anchors)
        .filter(|a| mailto_address(*a).is_some())
        .collect())
}

/// Nearest ancestor whose tag name is one of `tags`.
pub fn closest<'a>(element: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| tags.contains(&el.value().name()))
}

/// Whether `element` lies inside the subtree rooted at `ancestor`.
pub fn is_within(element: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| node.id() == ancestor.id())
}

/// Last element named one of `tags` that starts before `target` in
/// document order.
pub fn preceding<'a>(
    root: ElementRef<'a>,
    target: ElementRef<'a>,
    tags: &[&str],
) -> Option<ElementRef<'a>> {
    let mut last = None;
    for node in root.descendants() {
        if node.id() == target.id() {
            break;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if tags.contains(&el.value().name()) {
                last = Some(el);
            }
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("div.class").is_ok());
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_text_of_collapses_whitespace() {
        let doc = Html::parse_fragment("<p> Jane \n <b>Doe</b> </p>");
        assert_eq!(text_of(first(&doc, "p")), "Jane Doe");
    }

    #[test]
    fn test_text_of_joins_cjk_nodes() {
        let doc = Html::parse_fragment("<h3>王<span>小明</span></h3><h4>Jane<span>Doe</span></h4>");
        assert_eq!(text_of(first(&doc, "h3")), "王小明");
        assert_eq!(text_of(first(&doc, "h4")), "Jane Doe");

        let doc = Html::parse_fragment("<p>王小明<br>wang@x.edu.tw</p>");
        assert_eq!(text_of(first(&doc, "p")), "王小明 wang@x.edu.tw");
    }

    #[test]
    fn test_mailto_address() {
        let doc = Html::parse_fragment(
            r#"<a id="a" href="MAILTO:jane@u.edu?subject=hi">x</a>
               <a id="b" href="mailto:">x</a>
               <a id="c" href="/people/jane">x</a>"#,
        );
        assert_eq!(
            mailto_address(first(&doc, "#a")),
            Some("jane@u.edu".to_string())
        );
        assert_eq!(mailto_address(first(&doc, "#b")), None);
        assert_eq!(mailto_address(first(&doc, "#c")), None);
    }

    #[test]
    fn test_closest_and_is_within() {
        let doc = Html::parse_fragment(
            r#"<section><div class="card"><span><a href="mailto:a@b.edu">a</a></span></div></section>"#,
        );
        let anchor = first(&doc, "a");
        let card = closest(anchor, &["div", "section"]).unwrap();
        assert_eq!(card.value().attr("class"), Some("card"));
        assert!(is_within(anchor, card));
        assert!(!is_within(card, anchor));
    }

    #[test]
    fn test_preceding_heading() {
        let doc = Html::parse_document(
            r#"<body><h3>First</h3><p>x</p><h4>Second</h4><p><a href="mailto:s@u.edu">mail</a></p><h3>After</h3></body>"#,
        );
        let anchor = first(&doc, "a");
        let heading = preceding(doc.root_element(), anchor, &["h3", "h4"]).unwrap();
        assert_eq!(text_of(heading), "Second");
    }
}
