//! Minimal mutable HTML5 document model over `markup5ever_rcdom`.
//!
//! [`Dom`] is deliberately short-lived: it is parsed, queried or edited, and
//! serialized or dropped inside one synchronous call. It is never held
//! across an `.await` (the tree is `Rc`-based and not `Send`).

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    local_name, namespace_url, ns, parse_document, parse_fragment, Attribute, LocalName,
    ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

use crate::document::MetaTag;
use crate::error::DomError;
use crate::link::Anchor;

/// A parsed HTML document.
pub struct Dom {
    dom: RcDom,
}

impl Dom {
    /// Parses a full HTML document. HTML5 parsing never fails; malformed
    /// input is repaired the way a browser would repair it.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        Self { dom }
    }

    /// First element named `tag` in document order.
    pub fn find(&self, tag: &str) -> Option<Handle> {
        self.find_where(|name, _| name == tag)
    }

    /// First `<meta>` element that carries `tag`'s selector attribute.
    pub fn find_meta(&self, tag: MetaTag) -> Option<Handle> {
        let (attr, value) = tag.selector();
        self.find_where(|name, attrs| {
            name == "meta"
                && attrs
                    .iter()
                    .any(|a| &*a.name.local == attr && &*a.value == value)
        })
    }

    fn find_where(&self, mut pred: impl FnMut(&str, &[Attribute]) -> bool) -> Option<Handle> {
        let mut stack = vec![self.dom.document.clone()];
        while let Some(node) = stack.pop() {
            if let NodeData::Element { name, attrs, .. } = &node.data {
                if pred(&name.local, &attrs.borrow()) {
                    return Some(node);
                }
            }
            // Reverse so the leftmost child is visited first.
            stack.extend(node.children.borrow().iter().rev().cloned());
        }
        None
    }

    /// All anchors (`<a>` elements) in document order.
    pub fn anchors(&self) -> Vec<Anchor> {
        let mut anchors = Vec::new();
        let mut stack = vec![self.dom.document.clone()];
        while let Some(node) = stack.pop() {
            if let NodeData::Element { name, attrs, .. } = &node.data {
                if name.local == local_name!("a") {
                    anchors.push(Anchor::from_attributes(
                        attrs
                            .borrow()
                            .iter()
                            .map(|a| (a.name.local.to_string(), a.value.to_string())),
                    ));
                }
            }
            stack.extend(node.children.borrow().iter().rev().cloned());
        }
        anchors
    }

    /// The document title: text of the first `<title>`, with ASCII
    /// whitespace stripped and collapsed. Empty when there is no title.
    pub fn title(&self) -> String {
        self.find("title")
            .map(|t| collapse_whitespace(&text_content(&t)))
            .unwrap_or_default()
    }

    /// Replaces the title text, creating a `<title>` in `<head>` when the
    /// document has none.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::MissingElement`] if the document has no `<head>`.
    pub fn set_title(&self, title: &str) -> Result<(), DomError> {
        let node = match self.find("title") {
            Some(node) => node,
            None => {
                let head = self
                    .find("head")
                    .ok_or(DomError::MissingElement("head".to_string()))?;
                let created = parse_children(&head, "<title></title>");
                append_children(&head, created);
                self.find("title")
                    .ok_or(DomError::MissingElement("title".to_string()))?
            }
        };
        set_text(&node, title);
        Ok(())
    }

    /// Value of an attribute on an element.
    pub fn attribute(node: &Handle, attr: &str) -> Option<String> {
        match &node.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == attr)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    /// Sets an attribute on an element, adding it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAnElement`] if `node` is not an element.
    pub fn set_attribute(node: &Handle, attr: &str, value: &str) -> Result<(), DomError> {
        let NodeData::Element { attrs, .. } = &node.data else {
            return Err(DomError::NotAnElement);
        };
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|a| &*a.name.local == attr) {
            Some(existing) => existing.value = StrTendril::from(value),
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(attr)),
                value: StrTendril::from(value),
            }),
        }
        Ok(())
    }

    /// Serialized markup of an element's children.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Serialize`] if serialization fails.
    pub fn inner_html(node: &Handle) -> Result<String, DomError> {
        serialize_children(node)
    }

    /// Replaces an element's children with `html`, parsed as a fragment in
    /// the element's own context (the `innerHTML` setter).
    pub fn set_inner_html(node: &Handle, html: &str) {
        let children = parse_children(node, html);
        for old in node.children.take() {
            old.parent.set(None);
        }
        append_children(node, children);
    }

    /// Serializes the whole document, doctype included.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Serialize`] if serialization fails.
    pub fn to_html(&self) -> Result<String, DomError> {
        serialize_children(&self.dom.document)
    }
}

fn serialize_children(node: &Handle) -> Result<String, DomError> {
    let mut out = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut out, &SerializableHandle::from(node.clone()), opts)
        .map_err(|e| DomError::Serialize(e.to_string()))?;
    String::from_utf8(out).map_err(|e| DomError::Serialize(e.to_string()))
}

/// Parses `html` as the children of `context`.
fn parse_children(context: &Handle, html: &str) -> Vec<Handle> {
    let context_name = match &context.data {
        NodeData::Element { name, .. } => name.clone(),
        _ => QualName::new(None, ns!(html), local_name!("body")),
    };
    let fragment =
        parse_fragment(RcDom::default(), ParseOpts::default(), context_name, Vec::new()).one(html);
    // Fragment parsing roots everything under a synthetic <html> element.
    let root = fragment.document.children.borrow().first().cloned();
    root.map(|root| root.children.take()).unwrap_or_default()
}

fn append_children(parent: &Handle, children: Vec<Handle>) {
    for child in &children {
        child.parent.set(Some(Rc::downgrade(parent)));
    }
    parent.children.borrow_mut().extend(children);
}

fn set_text(node: &Handle, text: &str) {
    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    });
    for old in node.children.take() {
        old.parent.set(None);
    }
    append_children(node, vec![text_node]);
}

fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![node.clone()];
    while let Some(n) = stack.pop() {
        if let NodeData::Text { contents } = &n.data {
            out.push_str(&contents.borrow());
        }
        stack.extend(n.children.borrow().iter().rev().cloned());
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html><html><head><title>  Danis \n Photography </title>\
        <meta name=\"description\" content=\"Portraits\"></head>\
        <body><main><h1>Home</h1></main></body></html>";

    #[test]
    fn title_is_whitespace_collapsed() {
        assert_eq!(Dom::parse(PAGE).title(), "Danis Photography");
    }

    #[test]
    fn missing_title_is_empty() {
        assert_eq!(Dom::parse("<p>no head</p>").title(), "");
    }

    #[test]
    fn set_title_creates_missing_element() {
        let dom = Dom::parse("<p>x</p>");
        dom.set_title("Gallery").unwrap();
        assert_eq!(dom.title(), "Gallery");
        assert!(dom.to_html().unwrap().contains("<title>Gallery</title>"));
    }

    #[test]
    fn inner_html_round_trips_through_setter() {
        let dom = Dom::parse(PAGE);
        let main = dom.find("main").unwrap();
        Dom::set_inner_html(&main, "<section class=\"grid\"><img src=\"/a.jpg\" alt=\"a\"></section>");
        assert_eq!(
            Dom::inner_html(&main).unwrap(),
            "<section class=\"grid\"><img src=\"/a.jpg\" alt=\"a\"></section>"
        );
    }

    #[test]
    fn meta_lookup_matches_selector_attribute() {
        let dom = Dom::parse(PAGE);
        let meta = dom.find_meta(MetaTag::Description).unwrap();
        assert_eq!(Dom::attribute(&meta, "content").as_deref(), Some("Portraits"));
        assert!(dom.find_meta(MetaTag::OgImage).is_none());
    }

    #[test]
    fn anchors_are_collected_in_order() {
        let dom = Dom::parse("<a href=\"/a\">a</a><div><a href=\"/b\" target=\"_blank\">b</a></div>");
        let anchors = dom.anchors();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].href.as_deref(), Some("/a"));
        assert_eq!(anchors[1].target.as_deref(), Some("_blank"));
    }
}
