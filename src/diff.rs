//! Raw tree differ: typed, route-addressed edits between two trees.
//!
//! The differ produces the edit script that transforms the expected tree
//! into the actual one, so nodes present only in the actual tree surface as
//! additions and nodes present only in the expected tree surface as
//! removals. It knows nothing about wildcards; the sentinel comment is
//! diffed like any other node and reinterpreted later by the normalizer.

use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::dom::DomNode;

/// Structural path from the tree root to a node: successive child indices.
///
/// The derived ordering is lexicographic over the index sequence, which
/// sorts edits on earlier siblings and shallower subtrees first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route(Vec<usize>);

impl Route {
    pub fn root() -> Route {
        Route(Vec::new())
    }

    /// Route of the child at `index` below this node.
    pub fn child(&self, index: usize) -> Route {
        let mut indices = self.0.clone();
        indices.push(index);
        Route(indices)
    }

    /// The child indices, root first.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Whether `next` addresses the same position or the immediately
    /// following sibling: equal length, equal parent path, and a last index
    /// that is equal or exactly one greater. This is what lets a wildcard
    /// keep absorbing a run of consecutive insertions.
    pub fn is_adjacent_to(&self, next: &Route) -> bool {
        if self.0.len() != next.0.len() {
            return false;
        }
        match (self.0.split_last(), next.0.split_last()) {
            (Some((&last_a, parent_a)), Some((&last_b, parent_b))) => {
                parent_a == parent_b && (last_a == last_b || last_a + 1 == last_b)
            }
            _ => false,
        }
    }
}

impl From<Vec<usize>> for Route {
    fn from(indices: Vec<usize>) -> Route {
        Route(indices)
    }
}

/// One structural or attribute/text difference between the two trees.
///
/// This is the full vocabulary of the raw differ. Every consumer matches
/// exhaustively, so a new kind of edit cannot be silently mishandled.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddElement {
        route: Route,
        element: DomNode,
    },
    RemoveElement {
        route: Route,
        element: DomNode,
    },
    ReplaceElement {
        route: Route,
        old: DomNode,
        new: DomNode,
    },
    AddAttribute {
        route: Route,
        name: String,
        value: String,
    },
    RemoveAttribute {
        route: Route,
        name: String,
        value: String,
    },
    ModifyAttribute {
        route: Route,
        name: String,
        old: String,
        new: String,
    },
    AddText {
        route: Route,
        value: String,
    },
    RemoveText {
        route: Route,
        value: String,
    },
    ModifyText {
        route: Route,
        old: String,
        new: String,
    },
    ModifyComment {
        route: Route,
        old: String,
        new: String,
    },
    ModifyValue {
        route: Route,
        old: String,
        new: String,
    },
    ModifyChecked {
        route: Route,
        old: bool,
        new: bool,
    },
    ModifySelected {
        route: Route,
        old: bool,
        new: bool,
    },
}

impl Edit {
    pub fn route(&self) -> &Route {
        match self {
            Edit::AddElement { route, .. }
            | Edit::RemoveElement { route, .. }
            | Edit::ReplaceElement { route, .. }
            | Edit::AddAttribute { route, .. }
            | Edit::RemoveAttribute { route, .. }
            | Edit::ModifyAttribute { route, .. }
            | Edit::AddText { route, .. }
            | Edit::RemoveText { route, .. }
            | Edit::ModifyText { route, .. }
            | Edit::ModifyComment { route, .. }
            | Edit::ModifyValue { route, .. }
            | Edit::ModifyChecked { route, .. }
            | Edit::ModifySelected { route, .. } => route,
        }
    }
}

/// Compute the raw edit list between two trees.
///
/// Emission order is deterministic depth-first, so edits sharing a route
/// always come out in the same order; the normalizer's stable sort relies
/// on that.
pub fn diff(expected: &DomNode, actual: &DomNode) -> Vec<Edit> {
    let mut edits = Vec::new();
    diff_pair(expected, actual, Route::root(), &mut edits);
    edits
}

fn diff_pair(expected: &DomNode, actual: &DomNode, route: Route, out: &mut Vec<Edit>) {
    if expected == actual {
        return;
    }
    match (expected, actual) {
        (
            DomNode::Element {
                name: expected_name,
                attrs: expected_attrs,
                children: expected_children,
            },
            DomNode::Element {
                name: actual_name,
                attrs: actual_attrs,
                children: actual_children,
            },
        ) if expected_name == actual_name => {
            diff_attributes(expected_name, expected_attrs, actual_attrs, &route, out);
            diff_children(expected_children, actual_children, &route, out);
        }
        (DomNode::Text(old), DomNode::Text(new)) => out.push(Edit::ModifyText {
            route,
            old: old.clone(),
            new: new.clone(),
        }),
        (DomNode::Comment(old), DomNode::Comment(new)) => out.push(Edit::ModifyComment {
            route,
            old: old.clone(),
            new: new.clone(),
        }),
        _ => out.push(Edit::ReplaceElement {
            route,
            old: expected.clone(),
            new: actual.clone(),
        }),
    }
}

/// Elements whose `value` attribute is form state rather than plain markup.
const FORM_VALUE_ELEMENTS: [&str; 4] = ["input", "textarea", "select", "option"];

fn attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(attr_name, _)| attr_name == name)
        .map(|(_, value)| value.as_str())
}

fn diff_attributes(
    element_name: &str,
    expected: &[(String, String)],
    actual: &[(String, String)],
    route: &Route,
    out: &mut Vec<Edit>,
) {
    for (name, expected_value) in expected {
        match attribute(actual, name) {
            Some(actual_value) if actual_value == expected_value => {}
            Some(actual_value) => {
                if name == "value" && FORM_VALUE_ELEMENTS.contains(&element_name) {
                    out.push(Edit::ModifyValue {
                        route: route.clone(),
                        old: expected_value.clone(),
                        new: actual_value.to_string(),
                    });
                } else {
                    out.push(Edit::ModifyAttribute {
                        route: route.clone(),
                        name: name.clone(),
                        old: expected_value.clone(),
                        new: actual_value.to_string(),
                    });
                }
            }
            None => {
                if name == "checked" && element_name == "input" {
                    out.push(Edit::ModifyChecked {
                        route: route.clone(),
                        old: true,
                        new: false,
                    });
                } else if name == "selected" && element_name == "option" {
                    out.push(Edit::ModifySelected {
                        route: route.clone(),
                        old: true,
                        new: false,
                    });
                } else {
                    out.push(Edit::RemoveAttribute {
                        route: route.clone(),
                        name: name.clone(),
                        value: expected_value.clone(),
                    });
                }
            }
        }
    }
    // Attributes only the actual side has. The normalizer discards these,
    // but the raw script reports them like any differ would.
    for (name, value) in actual {
        if attribute(expected, name).is_none() {
            out.push(Edit::AddAttribute {
                route: route.clone(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
}

/// Align two child lists and emit edits for the differences.
///
/// Routes are in patched-tree coordinates: `position` advances past kept and
/// added nodes but not past removals, so for any node that exists in the
/// actual tree the route equals its actual-tree position.
fn diff_children(expected: &[DomNode], actual: &[DomNode], parent: &Route, out: &mut Vec<Edit>) {
    let ops = capture_diff_slices(Algorithm::Myers, expected, actual);
    let mut position = 0usize;
    let mut i = 0;
    while i < ops.len() {
        match ops[i] {
            DiffOp::Equal { len, .. } => {
                position += len;
                i += 1;
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                diff_run(
                    &expected[old_index..old_index + old_len],
                    &actual[new_index..new_index + new_len],
                    parent,
                    &mut position,
                    out,
                );
                i += 1;
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                // A deletion directly followed by an insertion is one
                // replace run, whether or not the op stream merged them.
                if let Some(&DiffOp::Insert {
                    new_index, new_len, ..
                }) = ops.get(i + 1)
                {
                    diff_run(
                        &expected[old_index..old_index + old_len],
                        &actual[new_index..new_index + new_len],
                        parent,
                        &mut position,
                        out,
                    );
                    i += 2;
                } else {
                    for node in &expected[old_index..old_index + old_len] {
                        push_removal(node, parent.child(position), out);
                    }
                    i += 1;
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                for node in &actual[new_index..new_index + new_len] {
                    push_addition(node, parent.child(position), out);
                    position += 1;
                }
                i += 1;
            }
        }
    }
}

/// Pair off the two sides of a replace run positionally; the longer side's
/// tail becomes plain removals or additions.
fn diff_run(
    expected: &[DomNode],
    actual: &[DomNode],
    parent: &Route,
    position: &mut usize,
    out: &mut Vec<Edit>,
) {
    let paired = expected.len().min(actual.len());
    for i in 0..paired {
        diff_pair(&expected[i], &actual[i], parent.child(*position), out);
        *position += 1;
    }
    for node in &expected[paired..] {
        push_removal(node, parent.child(*position), out);
    }
    for node in &actual[paired..] {
        push_addition(node, parent.child(*position), out);
        *position += 1;
    }
}

fn push_removal(node: &DomNode, route: Route, out: &mut Vec<Edit>) {
    match node {
        DomNode::Text(data) => out.push(Edit::RemoveText {
            route,
            value: data.clone(),
        }),
        _ => out.push(Edit::RemoveElement {
            route,
            element: node.clone(),
        }),
    }
}

fn push_addition(node: &DomNode, route: Route, out: &mut Vec<Edit>) {
    match node {
        DomNode::Text(data) => out.push(Edit::AddText {
            route,
            value: data.clone(),
        }),
        _ => out.push(Edit::AddElement {
            route,
            element: node.clone(),
        }),
    }
}
