//! Owned DOM trees for comparison.
//!
//! The differ and reporter work on a small owned node type rather than on
//! borrowed parser nodes, because edits carry subtrees that outlive the
//! parsed documents. Trees are normalized while they are built: text nodes
//! are trimmed, whitespace-only text nodes are dropped, and attributes are
//! stored name-sorted so deep equality ignores attribute order.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use std::fmt;

/// Marker text of the comment node that stands in for a `{{ ... }}`
/// placeholder in the expected tree.
pub const WILDCARD_MARKER: &str = "$ignored-wildcard-element$";

/// An owned, normalized markup node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DomNode {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<DomNode>,
    },
    Text(String),
    Comment(String),
}

impl DomNode {
    /// Whether this node is the wildcard sentinel: a comment whose trimmed
    /// content equals the reserved marker. All wildcard detection goes
    /// through here; nothing else compares the marker text.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, DomNode::Comment(data) if data.trim() == WILDCARD_MARKER)
    }

    /// Child list of an element, or empty for text and comment nodes.
    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    fn from_node(node: NodeRef<Node>) -> Option<DomNode> {
        match node.value() {
            Node::Element(element) => {
                let mut attrs: Vec<(String, String)> = element
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                attrs.sort();
                Some(DomNode::Element {
                    name: element.name().to_string(),
                    attrs,
                    children: node.children().filter_map(DomNode::from_node).collect(),
                })
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(DomNode::Text(trimmed.to_string()))
                }
            }
            Node::Comment(comment) => Some(DomNode::Comment(comment.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomNode::Element {
                name,
                attrs,
                children,
            } => {
                write!(f, "<{}", name)?;
                for (attr_name, attr_value) in attrs {
                    write!(f, " {}=\"{}\"", attr_name, attr_value)?;
                }
                write!(f, ">")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "</{}>", name)
            }
            DomNode::Text(data) => write!(f, "{}", data),
            DomNode::Comment(data) => write!(f, "<!--{}-->", data),
        }
    }
}

/// Rewrite every `{{ ... }}` placeholder into the wildcard sentinel comment.
///
/// Matching is non-greedy: a placeholder ends at the nearest `}}`. An
/// opening `{{` with no closing `}}` is left verbatim.
pub fn rewrite_wildcards(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str("<!--");
        out.push_str(WILDCARD_MARKER);
        out.push_str("-->");
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

/// Parse a markup fragment into a normalized owned tree.
///
/// The returned node is the synthetic fragment root; its children are the
/// top-level nodes of the source. Parsing never fails: malformed input is
/// compared in whatever recovered shape the parser gives it.
pub fn build_tree(source: &str) -> DomNode {
    let fragment = Html::parse_fragment(source);
    let root = fragment.root_element();
    DomNode::Element {
        name: root.value().name().to_string(),
        attrs: Vec::new(),
        children: root.children().filter_map(DomNode::from_node).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_a_single_placeholder() {
        assert_eq!(
            rewrite_wildcards("<div>{{ anything }}</div>"),
            "<div><!--$ignored-wildcard-element$--></div>"
        );
    }

    #[test]
    fn rewrites_multiple_placeholders() {
        assert_eq!(
            rewrite_wildcards("<div>{{ a }}<p>x</p>{{ b }}</div>"),
            "<div><!--$ignored-wildcard-element$--><p>x</p><!--$ignored-wildcard-element$--></div>"
        );
    }

    #[test]
    fn placeholder_content_is_arbitrary() {
        assert_eq!(
            rewrite_wildcards("{{}}"),
            "<!--$ignored-wildcard-element$-->"
        );
        assert_eq!(
            rewrite_wildcards("{{ ... literally anything ... }}"),
            "<!--$ignored-wildcard-element$-->"
        );
    }

    #[test]
    fn unclosed_placeholder_is_left_alone() {
        assert_eq!(rewrite_wildcards("<div>{{ oops</div>"), "<div>{{ oops</div>");
    }

    #[test]
    fn builds_a_trimmed_tree() {
        let tree = build_tree("<div>\n  <span>  First thing  </span>\n</div>");
        let children = tree.children();
        assert_eq!(children.len(), 1);
        let DomNode::Element { name, children, .. } = &children[0] else {
            panic!("expected an element");
        };
        assert_eq!(name, "div");
        assert_eq!(
            children,
            &[DomNode::Element {
                name: "span".to_string(),
                attrs: vec![],
                children: vec![DomNode::Text("First thing".to_string())],
            }]
        );
    }

    #[test]
    fn whitespace_only_text_is_dropped() {
        let tree = build_tree("<div>   \n\t  </div>");
        assert_eq!(tree.children()[0].children(), &[]);
    }

    #[test]
    fn attributes_are_name_sorted() {
        let a = build_tree("<div class='x' id='1'></div>");
        let b = build_tree("<div id='1' class='x'></div>");
        assert_eq!(a, b);
    }

    #[test]
    fn classifies_the_wildcard_sentinel() {
        assert!(DomNode::Comment("$ignored-wildcard-element$".to_string()).is_wildcard());
        assert!(DomNode::Comment("  $ignored-wildcard-element$  ".to_string()).is_wildcard());
        assert!(!DomNode::Comment("just a comment".to_string()).is_wildcard());
        assert!(!DomNode::Text("$ignored-wildcard-element$".to_string()).is_wildcard());
    }

    #[test]
    fn serializes_back_to_html() {
        let tree = build_tree("<div class='x'><p>Body</p><!-- note --></div>");
        assert_eq!(
            tree.children()[0].to_string(),
            "<div class=\"x\"><p>Body</p><!-- note --></div>"
        );
    }
}
