//! Diff normalization: turn the raw edit script into the minimal list of
//! genuine mismatches, with every wildcard-absorbed edit removed.
//!
//! The raw differ reports the sentinel comment like any other node, so a
//! placeholder shows up as a "removed element" edit (it only exists in the
//! expected tree), optionally followed by additions for whatever the actual
//! tree had in its place. This pass reinterprets that shape:
//!
//! 1. stable-sort the edits by route;
//! 2. split a replacement whose old side is the sentinel into a removal
//!    plus an addition at the same route;
//! 3. drop every attribute addition (extra attributes on the actual side
//!    are tolerated);
//! 4. group runs of additions onto the wildcard removal they trail, using
//!    route adjacency;
//! 5. drop every group headed by a wildcard removal;
//! 6. flatten what survives.
//!
//! Pure and infallible: an empty result means the trees match under
//! wildcard semantics.

use crate::diff::Edit;

pub fn normalize(raw: Vec<Edit>) -> Vec<Edit> {
    let mut edits = raw;
    edits.sort_by(|a, b| a.route().cmp(b.route()));

    let edits = edits
        .into_iter()
        .flat_map(split_wildcard_replace)
        .filter(|edit| !matches!(edit, Edit::AddAttribute { .. }));

    group_by_wildcard(edits)
        .into_iter()
        .filter(|group| !group.first().is_some_and(is_wildcard_removal))
        .flatten()
        .collect()
}

/// The differ may report a sentinel's disappearance and a new node's
/// appearance at the same route as one combined replacement. Splitting it
/// recovers the removal-then-addition shape the grouping step expects.
/// Non-sentinel replacements pass through untouched.
fn split_wildcard_replace(edit: Edit) -> Vec<Edit> {
    match edit {
        Edit::ReplaceElement { route, old, new } if old.is_wildcard() => vec![
            Edit::RemoveElement {
                route: route.clone(),
                element: old,
            },
            Edit::AddElement {
                route,
                element: new,
            },
        ],
        other => vec![other],
    }
}

/// Fold the sorted edit stream into contiguous groups. An edit joins the
/// open group only when that group is headed by a wildcard removal, the
/// group's last member sits adjacent to it, and the edit itself is an
/// addition; anything else opens a new group. A group therefore holds
/// either a single unrelated edit, or a wildcard removal plus the run of
/// consecutive insertions it soaked up.
fn group_by_wildcard(edits: impl Iterator<Item = Edit>) -> Vec<Vec<Edit>> {
    let mut groups: Vec<Vec<Edit>> = Vec::new();
    for edit in edits {
        let extends_open_group = groups.last().is_some_and(|group| {
            group.first().is_some_and(is_wildcard_removal)
                && group
                    .last()
                    .is_some_and(|last| last.route().is_adjacent_to(edit.route()))
                && is_addition(&edit)
        });
        match groups.last_mut() {
            Some(group) if extends_open_group => group.push(edit),
            _ => groups.push(vec![edit]),
        }
    }
    groups
}

fn is_addition(edit: &Edit) -> bool {
    matches!(edit, Edit::AddElement { .. } | Edit::AddText { .. })
}

fn is_wildcard_removal(edit: &Edit) -> bool {
    matches!(edit, Edit::RemoveElement { element, .. } if element.is_wildcard())
}
