//! Field extractors for the TIFF markup.
//!
//! Each function looks at one node (and, for descriptions, its ancestors) and
//! reports whether that node carries a particular field. None of them touch the
//! tree; the walkers decide what to do with the result.

use ego_tree::NodeRef;
use scraper::Node;
use scraper::node::Element;

pub const TITLE_TAG: &str = "h1";
pub const LIST_ITEM_CLASS: &str = "list-item";
pub const PITCH_CLASS: &str = "pitch";
pub const FILM_NOTE_CLASS: &str = "film-note";

/// The element behind `node` if it is a `<tag>`.
pub(crate) fn element<'a>(node: NodeRef<'a, Node>, tag: &str) -> Option<&'a Element> {
    node.value().as_element().filter(|el| el.name() == tag)
}

fn class_contains(element: &Element, marker: &str) -> bool {
    element.attr("class").is_some_and(|class| class.contains(marker))
}

/// Text of the first child, when that child is a text node.
pub(crate) fn first_child_text<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    node.first_child()
        .and_then(|child| child.value().as_text())
        .map(|text| &**text)
}

/// Title heading: an `<h1>` whose leading text has no line break.
///
/// Headings that open with markup or have no children at all never match.
pub fn title<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    element(node, TITLE_TAG)?;
    first_child_text(node).filter(|text| !text.contains('\n'))
}

/// Catalogue link: an `<a>` tagged with the list-item class.
///
/// Yields the `href`, or `""` when the anchor has none, so a matched anchor
/// without a target is distinguishable from a non-matching node.
pub fn list_item_link<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    let anchor = element(node, "a")?;
    if !class_contains(anchor, LIST_ITEM_CLASS) {
        return None;
    }
    Some(anchor.attr("href").unwrap_or(""))
}

/// Pitch paragraph: `<p class="... pitch ...">`, taking its leading text.
pub fn pitch<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    let paragraph = element(node, "p")?;
    if !class_contains(paragraph, PITCH_CLASS) {
        return None;
    }
    first_child_text(node)
}

/// Description paragraph: a `<p>` two levels under a film-note container.
///
/// Text children are taken verbatim; element children (links, emphasis)
/// contribute only their own leading text.
pub fn description(node: NodeRef<'_, Node>) -> Option<String> {
    element(node, "p")?;
    let grandparent = node.parent()?.parent()?;
    let container = grandparent.value().as_element()?;
    if !class_contains(container, FILM_NOTE_CLASS) {
        return None;
    }

    let mut fragment = String::new();
    for child in node.children() {
        match child.value() {
            Node::Text(text) => fragment.push_str(text),
            Node::Element(_) => {
                if let Some(text) = first_child_text(child) {
                    fragment.push_str(text);
                }
            }
            _ => {}
        }
    }
    Some(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    /// First node in document order accepted by `pred`.
    fn find<'a>(doc: &'a Html, pred: impl Fn(NodeRef<'a, Node>) -> bool) -> NodeRef<'a, Node> {
        doc.tree
            .root()
            .descendants()
            .find(|n| pred(*n))
            .expect("node present")
    }

    fn tag<'a>(doc: &'a Html, name: &str) -> NodeRef<'a, Node> {
        find(doc, |n| element(n, name).is_some())
    }

    #[test]
    fn title_takes_single_line_heading() {
        let doc = Html::parse_fragment("<h1>Foo</h1>");
        assert_eq!(title(tag(&doc, "h1")), Some("Foo"));
    }

    #[test]
    fn title_rejects_multiline_heading() {
        let doc = Html::parse_fragment("<h1>\n  Programme\n</h1>");
        assert_eq!(title(tag(&doc, "h1")), None);
    }

    #[test]
    fn title_guards_empty_and_markup_headings() {
        let doc = Html::parse_fragment("<h1></h1>");
        assert_eq!(title(tag(&doc, "h1")), None);

        let doc = Html::parse_fragment("<h1><span>Foo</span></h1>");
        assert_eq!(title(tag(&doc, "h1")), None);
    }

    #[test]
    fn title_ignores_other_headings() {
        let doc = Html::parse_fragment("<h2>Foo</h2>");
        assert_eq!(title(tag(&doc, "h2")), None);
    }

    #[test]
    fn link_requires_list_item_class() {
        let doc = Html::parse_fragment(r#"<a class="list-item foo" href="/movies/foo">x</a>"#);
        assert_eq!(list_item_link(tag(&doc, "a")), Some("/movies/foo"));

        let doc = Html::parse_fragment(r#"<a class="nav" href="/about">x</a>"#);
        assert_eq!(list_item_link(tag(&doc, "a")), None);

        let doc = Html::parse_fragment(r#"<a href="/about">x</a>"#);
        assert_eq!(list_item_link(tag(&doc, "a")), None);
    }

    #[test]
    fn link_without_href_matches_empty() {
        let doc = Html::parse_fragment(r#"<a class="list-item">x</a>"#);
        assert_eq!(list_item_link(tag(&doc, "a")), Some(""));
    }

    #[test]
    fn pitch_reads_first_text_child() {
        let doc = Html::parse_fragment(r#"<p class="film-pitch">A heist gone wrong.<br>more</p>"#);
        assert_eq!(pitch(tag(&doc, "p")), Some("A heist gone wrong."));

        let doc = Html::parse_fragment(r#"<p class="pitch"></p>"#);
        assert_eq!(pitch(tag(&doc, "p")), None);

        let doc = Html::parse_fragment(r#"<p class="lede">Nope</p>"#);
        assert_eq!(pitch(tag(&doc, "p")), None);
    }

    #[test]
    fn description_needs_film_note_grandparent() {
        let doc = Html::parse_fragment(
            r#"<div class="film-note"><div><p>Plain</p></div></div>"#,
        );
        assert_eq!(description(tag(&doc, "p")).as_deref(), Some("Plain"));

        let doc = Html::parse_fragment(r#"<div class="film-note"><p>Too shallow</p></div>"#);
        assert_eq!(description(tag(&doc, "p")), None);
    }

    #[test]
    fn description_descends_one_level_only() {
        let doc = Html::parse_fragment(
            r#"<div class="film-note"><div><p>Directed by <a href="/x">Jane <b>Doe</b></a>, 2014.</p></div></div>"#,
        );
        assert_eq!(
            description(tag(&doc, "p")).as_deref(),
            Some("Directed by Jane , 2014.")
        );
    }

    #[test]
    fn description_of_empty_paragraph_is_empty() {
        let doc = Html::parse_fragment(r#"<div class="film-note"><div><p></p></div></div>"#);
        assert_eq!(description(tag(&doc, "p")).as_deref(), Some(""));
    }
}
