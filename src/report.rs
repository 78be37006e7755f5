//! Mismatch rendering.
//!
//! Each surviving edit becomes one human-readable message; the full report
//! is the messages joined by blank lines, in the normalizer's order.
//! Messages that show an element look it up by route in whichever tree the
//! node actually lives in: removals and attribute losses point into the
//! actual tree, modification snippets show the expected element.

use crate::diff::{Edit, Route};
use crate::dom::DomNode;

pub fn render_mismatches(mismatches: &[Edit], actual: &DomNode, expected: &DomNode) -> String {
    mismatches
        .iter()
        .map(|mismatch| render_mismatch(mismatch, actual, expected))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_mismatch(mismatch: &Edit, actual: &DomNode, expected: &DomNode) -> String {
    match mismatch {
        Edit::AddElement { element, .. } => {
            format!("HTML has an unexpected element\n{}", fenced(element))
        }
        Edit::RemoveElement { element, .. } => {
            format!("HTML is missing the expected element\n{}", fenced(element))
        }
        Edit::ReplaceElement { old, new, .. } => format!(
            "HTML expected element\n{}\nbut got element\n{}",
            fenced(old),
            fenced(new)
        ),
        Edit::AddAttribute { name, value, .. } => format!(
            "HTML has an unexpected attribute `{}=\"{}\"`",
            name, value
        ),
        Edit::RemoveAttribute {
            route, name, value, ..
        } => format!(
            "HTML is missing the attribute `{}=\"{}\"` on the element\n{}",
            name,
            value,
            snippet_at(actual, route)
        ),
        Edit::ModifyAttribute {
            route,
            name,
            old,
            new,
        } => format!(
            "HTML mismatch on attribute `{}` in element\n{}\nExpected\n{}\nbut got\n{}",
            name,
            snippet_at(expected, route),
            old,
            new
        ),
        Edit::AddText { value, .. } => format!("HTML has an unexpected text\n{}", value),
        Edit::RemoveText { value, .. } => format!("HTML is missing the expected text\n{}", value),
        Edit::ModifyText { old, new, .. } => {
            format!("HTML text mismatch. Expected\n{}\nbut got\n{}", old, new)
        }
        Edit::ModifyComment { old, new, .. } => format!(
            "HTML comment mismatch. Expected\n<!--{}-->\nbut got\n<!--{}-->",
            old, new
        ),
        Edit::ModifyValue { route, old, new } => format!(
            "HTML mismatch on the value of the element\n{}\nExpected\n{}\nbut got\n{}",
            snippet_at(expected, route),
            old,
            new
        ),
        Edit::ModifyChecked { route, old, new } => format!(
            "HTML mismatch on the checked state of the element\n{}\nExpected\n{}\nbut got\n{}",
            snippet_at(expected, route),
            old,
            new
        ),
        Edit::ModifySelected { route, old, new } => format!(
            "HTML mismatch on the selected state of the element\n{}\nExpected\n{}\nbut got\n{}",
            snippet_at(expected, route),
            old,
            new
        ),
    }
}

fn route_to_node<'a>(root: &'a DomNode, route: &Route) -> Option<&'a DomNode> {
    let mut node = root;
    for &index in route.indices() {
        node = node.children().get(index)?;
    }
    Some(node)
}

/// Fenced snippet of the node at `route`, or a placeholder when the route
/// does not resolve (routes are patched-tree coordinates and can fall
/// outside either source tree).
fn snippet_at(root: &DomNode, route: &Route) -> String {
    match route_to_node(root, route) {
        Some(node) => fenced(node),
        None => "???".to_string(),
    }
}

fn fenced(node: &DomNode) -> String {
    format!("```html\n{}\n```", node)
}
