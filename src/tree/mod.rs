use crate::models::{FlatNode, NavItem, StructureEntry, ROOT_ID};
use leptos::logging::warn;
use std::collections::{HashMap, HashSet};

/// Why a drag-and-drop move was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MoveRejection {
    /// The drag library reported no source id.
    MissingSource,
    /// The drag library reported no target id.
    MissingTarget,
    UnknownNode(String),
    RootNotMovable,
    /// The target is the dragged node itself or one of its descendants.
    Cycle { dragged: String, target: String },
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRejection::MissingSource => write!(f, "Nothing is being dragged"),
            MoveRejection::MissingTarget => write!(f, "No drop target"),
            MoveRejection::UnknownNode(id) => write!(f, "Unknown menu item: {id}"),
            MoveRejection::RootNotMovable => write!(f, "The menu root cannot be moved"),
            MoveRejection::Cycle { .. } => {
                write!(f, "A menu item cannot be moved into its own submenu")
            }
        }
    }
}

/// Project the nested tree into a flat, parent-indexed list.
///
/// Depth-first, parent before children, input sibling order preserved.
pub(crate) fn flatten(items: &[NavItem]) -> Vec<FlatNode> {
    let mut out = Vec::new();
    flatten_into(items, ROOT_ID, &mut out);
    out
}

fn flatten_into(items: &[NavItem], parent: &str, out: &mut Vec<FlatNode>) {
    for item in items {
        if item.id == ROOT_ID {
            warn!("nav item uses the reserved root id; skipping it and its subtree");
            continue;
        }
        out.push(FlatNode {
            id: item.id.clone(),
            parent: parent.to_string(),
            text: item.label(),
            droppable: true,
            item: item.detached(),
        });
        flatten_into(&item.children, &item.id, out);
    }
}

pub(crate) fn find_node<'a>(tree: &'a [FlatNode], id: &str) -> Option<&'a FlatNode> {
    tree.iter().find(|n| n.id == id)
}

/// Direct children of `parent` in sibling order.
pub(crate) fn children_of<'a>(tree: &'a [FlatNode], parent: &str) -> Vec<&'a FlatNode> {
    tree.iter().filter(|n| n.parent == parent).collect()
}

/// Ancestors of `id`, nearest first, excluding the root sentinel.
///
/// The walk stops after `tree.len()` steps so malformed cyclic data terminates.
pub(crate) fn ancestors_of(tree: &[FlatNode], id: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = id;
    for _ in 0..tree.len() {
        let Some(node) = find_node(tree, cur) else {
            break;
        };
        if node.parent == ROOT_ID {
            break;
        }
        out.push(node.parent.clone());
        cur = node.parent.as_str();
    }
    out
}

pub(crate) fn contains_slug(tree: &[FlatNode], slug: &str) -> bool {
    tree.iter().any(|n| n.item.slug == slug)
}

/// Move `dragged` (with its subtree) under `new_parent` at `destination_index`.
///
/// Never mutates `tree`. Every node of the result is `droppable`.
pub(crate) fn apply_move(
    tree: &[FlatNode],
    dragged: Option<&str>,
    new_parent: Option<&str>,
    destination_index: usize,
) -> Result<Vec<FlatNode>, MoveRejection> {
    let dragged = dragged
        .filter(|s| !s.is_empty())
        .ok_or(MoveRejection::MissingSource)?;
    let new_parent = new_parent
        .filter(|s| !s.is_empty())
        .ok_or(MoveRejection::MissingTarget)?;

    if dragged == ROOT_ID {
        return Err(MoveRejection::RootNotMovable);
    }
    let Some(source_idx) = tree.iter().position(|n| n.id == dragged) else {
        return Err(MoveRejection::UnknownNode(dragged.to_string()));
    };
    if new_parent != ROOT_ID && find_node(tree, new_parent).is_none() {
        return Err(MoveRejection::UnknownNode(new_parent.to_string()));
    }

    let cycle = new_parent == dragged
        || ancestors_of(tree, new_parent).iter().any(|a| a == dragged);
    if cycle {
        return Err(MoveRejection::Cycle {
            dragged: dragged.to_string(),
            target: new_parent.to_string(),
        });
    }

    let mut next: Vec<FlatNode> = tree.to_vec();
    let mut moving = next.remove(source_idx);
    moving.parent = new_parent.to_string();

    let sibling_positions: Vec<usize> = next
        .iter()
        .enumerate()
        .filter(|(_, n)| n.parent == new_parent)
        .map(|(i, _)| i)
        .collect();

    let insert_at = match sibling_positions.get(destination_index) {
        Some(&pos) => pos,
        None => match sibling_positions.last() {
            Some(&last) => last + 1,
            None => next
                .iter()
                .position(|n| n.id == new_parent)
                .map(|p| p + 1)
                .unwrap_or(next.len()),
        },
    };
    next.insert(insert_at, moving);

    for n in next.iter_mut() {
        n.droppable = true;
    }
    Ok(next)
}

/// Rebuild the nested tree from the flat list, renumbering `order` densely.
///
/// Nodes whose parent is missing are promoted to the root level after the
/// real roots so they stay in the payload.
pub(crate) fn build_nested(tree: &[FlatNode]) -> Vec<NavItem> {
    let known: HashSet<&str> = tree.iter().map(|n| n.id.as_str()).collect();

    let mut groups: HashMap<&str, Vec<&FlatNode>> = HashMap::new();
    let mut orphans: Vec<&FlatNode> = Vec::new();
    for node in tree {
        if node.parent == ROOT_ID || known.contains(node.parent.as_str()) {
            groups.entry(node.parent.as_str()).or_default().push(node);
        } else {
            warn!("nav item {} points at missing parent {}", node.id, node.parent);
            orphans.push(node);
        }
    }

    let mut roots: Vec<&FlatNode> = groups.remove(ROOT_ID).unwrap_or_default();
    roots.extend(orphans);

    let mut visited: HashSet<&str> = HashSet::new();
    build_level(&roots, None, &groups, &mut visited)
}

fn build_level<'a>(
    nodes: &[&'a FlatNode],
    parent_id: Option<&str>,
    groups: &HashMap<&str, Vec<&'a FlatNode>>,
    visited: &mut HashSet<&'a str>,
) -> Vec<NavItem> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        let kids = groups
            .get(node.id.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut item = node.item.detached();
        item.parent_id = parent_id.map(|s| s.to_string());
        item.order = out.len() as u32 + 1;
        item.children = build_level(kids, Some(node.id.as_str()), groups, visited);
        out.push(item);
    }
    out
}

/// Pre-order `(id, parentId, order)` rows for the structure sync call.
pub(crate) fn to_structure_payload(items: &[NavItem]) -> Vec<StructureEntry> {
    let mut out = Vec::new();
    payload_into(items, None, &mut out);
    out
}

fn payload_into(items: &[NavItem], parent_id: Option<&str>, out: &mut Vec<StructureEntry>) {
    for (i, item) in items.iter().enumerate() {
        out.push(StructureEntry {
            id: item.id.clone(),
            parent_id: parent_id.map(|s| s.to_string()),
            order: i as u32 + 1,
        });
        payload_into(&item.children, Some(item.id.as_str()), out);
    }
}

/// Nest flat backend rows by `parent_id`, siblings sorted by stored order.
pub(crate) fn nest_rows(rows: Vec<NavItem>) -> Vec<NavItem> {
    let known: HashSet<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut groups: HashMap<Option<String>, Vec<NavItem>> = HashMap::new();
    for mut row in rows {
        row.children.clear();
        let parent = row.parent_id.clone().filter(|p| known.contains(p));
        groups.entry(parent).or_default().push(row);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    }

    let roots = groups.remove(&None).unwrap_or_default();
    attach_rows(roots, &mut groups)
}

fn attach_rows(
    level: Vec<NavItem>,
    groups: &mut HashMap<Option<String>, Vec<NavItem>>,
) -> Vec<NavItem> {
    level
        .into_iter()
        .map(|mut item| {
            let kids = groups.remove(&Some(item.id.clone())).unwrap_or_default();
            item.children = attach_rows(kids, groups);
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Translations;

    fn item(id: &str, children: Vec<NavItem>) -> NavItem {
        let mut translations = Translations::new();
        translations.insert("en".to_string(), id.to_uppercase());
        translations.insert("de".to_string(), String::new());
        NavItem {
            id: id.to_string(),
            parent_id: None,
            slug: id.to_string(),
            path: Some(format!("/{id}")),
            url: None,
            is_external: false,
            translations,
            order: 0,
            children,
        }
    }

    /// a
    /// ├─ b
    /// │  └─ c
    /// └─ d
    /// e
    fn sample() -> Vec<NavItem> {
        vec![
            item("a", vec![item("b", vec![item("c", vec![])]), item("d", vec![])]),
            item("e", vec![]),
        ]
    }

    fn shape(items: &[NavItem]) -> Vec<(String, Option<String>, u32)> {
        to_structure_payload(items)
            .into_iter()
            .map(|e| (e.id, e.parent_id, e.order))
            .collect()
    }

    fn row(id: &str, parent: Option<&str>, order: u32) -> (String, Option<String>, u32) {
        (id.to_string(), parent.map(|s| s.to_string()), order)
    }

    fn assert_dense(items: &[NavItem]) {
        for (i, it) in items.iter().enumerate() {
            assert_eq!(it.order, i as u32 + 1, "order gap at {}", it.id);
            assert_dense(&it.children);
        }
    }

    #[test]
    fn test_flatten_is_depth_first_with_parent_refs() {
        let flat = flatten(&sample());
        let got: Vec<(&str, &str)> = flat
            .iter()
            .map(|n| (n.id.as_str(), n.parent.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![("a", ROOT_ID), ("b", "a"), ("c", "b"), ("d", "a"), ("e", ROOT_ID)]
        );
        assert!(flat.iter().all(|n| n.droppable));
        assert!(flat.iter().all(|n| n.item.children.is_empty()));
        assert_eq!(flat[0].text, "A");
    }

    #[test]
    fn test_flatten_is_idempotent() {
        assert_eq!(flatten(&sample()), flatten(&sample()));
    }

    #[test]
    fn test_flatten_skips_reserved_root_id() {
        let items = vec![item(ROOT_ID, vec![item("x", vec![])]), item("a", vec![])];
        let flat = flatten(&items);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].id, "a");
    }

    #[test]
    fn test_flatten_then_build_nested_round_trips() {
        let nested = build_nested(&flatten(&sample()));
        assert_eq!(
            shape(&nested),
            vec![
                row("a", None, 1),
                row("b", Some("a"), 1),
                row("c", Some("b"), 1),
                row("d", Some("a"), 2),
                row("e", None, 2),
            ]
        );
        assert_eq!(nested[0].children[0].parent_id.as_deref(), Some("a"));
        assert_eq!(nested[0].translations.get("en").map(|s| s.as_str()), Some("A"));
        assert_dense(&nested);
    }

    #[test]
    fn test_build_nested_ignores_stale_order() {
        let mut flat = flatten(&sample());
        for (i, n) in flat.iter_mut().enumerate() {
            n.item.order = 40 - i as u32;
        }
        assert_dense(&build_nested(&flat));
    }

    #[test]
    fn test_build_nested_promotes_orphans_to_root() {
        let mut flat = flatten(&sample());
        if let Some(n) = flat.iter_mut().find(|n| n.id == "d") {
            n.parent = "gone".to_string();
        }
        let nested = build_nested(&flat);
        let roots: Vec<&str> = nested.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["a", "e", "d"]);
        assert_dense(&nested);
    }

    #[test]
    fn test_move_to_front_of_root_level() {
        let two = vec![item("a", vec![]), item("b", vec![])];
        let moved = apply_move(&flatten(&two), Some("b"), Some(ROOT_ID), 0).expect("move ok");
        assert_eq!(
            shape(&build_nested(&moved)),
            vec![row("b", None, 1), row("a", None, 2)]
        );
    }

    #[test]
    fn test_move_reparents_with_subtree() {
        let flat = flatten(&sample());
        let moved = apply_move(&flat, Some("b"), Some("e"), 0).expect("move ok");
        assert_eq!(
            shape(&build_nested(&moved)),
            vec![
                row("a", None, 1),
                row("d", Some("a"), 1),
                row("e", None, 2),
                row("b", Some("e"), 1),
                row("c", Some("b"), 1),
            ]
        );
    }

    #[test]
    fn test_move_clamps_destination_index() {
        let flat = flatten(&sample());
        let moved = apply_move(&flat, Some("e"), Some("a"), 99).expect("move ok");
        let nested = build_nested(&moved);
        let kids: Vec<&str> = nested[0].children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["b", "d", "e"]);
    }

    #[test]
    fn test_move_within_same_parent() {
        let flat = flatten(&sample());
        let moved = apply_move(&flat, Some("d"), Some("a"), 0).expect("move ok");
        let nested = build_nested(&moved);
        let kids: Vec<&str> = nested[0].children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["d", "b"]);
        assert_dense(&nested);
    }

    #[test]
    fn test_move_into_parent_without_children() {
        let flat = flatten(&sample());
        let moved = apply_move(&flat, Some("e"), Some("c"), 0).expect("move ok");
        assert_eq!(find_node(&moved, "e").map(|n| n.parent.as_str()), Some("c"));
        assert_eq!(ancestors_of(&moved, "e"), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_move_rejects_cycle_through_grandchild() {
        let flat = flatten(&sample());
        let err = apply_move(&flat, Some("a"), Some("c"), 0).unwrap_err();
        assert_eq!(
            err,
            MoveRejection::Cycle {
                dragged: "a".to_string(),
                target: "c".to_string()
            }
        );
    }

    #[test]
    fn test_move_rejects_drop_on_self() {
        let flat = flatten(&sample());
        assert!(matches!(
            apply_move(&flat, Some("b"), Some("b"), 0),
            Err(MoveRejection::Cycle { .. })
        ));
    }

    #[test]
    fn test_move_guards_missing_ids() {
        let flat = flatten(&sample());
        assert_eq!(
            apply_move(&flat, None, Some("a"), 0),
            Err(MoveRejection::MissingSource)
        );
        assert_eq!(
            apply_move(&flat, Some("a"), None, 0),
            Err(MoveRejection::MissingTarget)
        );
        assert_eq!(
            apply_move(&flat, Some("zz"), Some("a"), 0),
            Err(MoveRejection::UnknownNode("zz".to_string()))
        );
        assert_eq!(
            apply_move(&flat, Some(ROOT_ID), Some("a"), 0),
            Err(MoveRejection::RootNotMovable)
        );
    }

    #[test]
    fn test_move_normalizes_droppable_and_keeps_input() {
        let mut flat = flatten(&sample());
        for n in flat.iter_mut() {
            n.droppable = false;
        }
        let before = flat.clone();
        let moved = apply_move(&flat, Some("e"), Some(ROOT_ID), 0).expect("move ok");
        assert!(moved.iter().all(|n| n.droppable));
        assert_eq!(flat, before);
    }

    #[test]
    fn test_ancestor_walk_terminates_on_cyclic_data() {
        let mut flat = flatten(&sample());
        if let Some(n) = flat.iter_mut().find(|n| n.id == "a") {
            n.parent = "c".to_string();
        }
        assert!(ancestors_of(&flat, "c").len() <= flat.len());
    }

    #[test]
    fn test_nest_rows_sorts_by_stored_order() {
        let mut b = item("b", vec![]);
        b.parent_id = Some("a".to_string());
        b.order = 2;
        let mut c = item("c", vec![]);
        c.parent_id = Some("a".to_string());
        c.order = 1;
        let mut a = item("a", vec![]);
        a.order = 2;
        let mut z = item("z", vec![]);
        z.order = 1;

        let nested = nest_rows(vec![b, a, c, z]);
        assert_eq!(
            shape(&nested),
            vec![
                row("z", None, 1),
                row("a", None, 2),
                row("c", Some("a"), 1),
                row("b", Some("a"), 2),
            ]
        );
    }

    #[test]
    fn test_children_and_slug_helpers() {
        let flat = flatten(&sample());
        let kids: Vec<&str> = children_of(&flat, "a").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["b", "d"]);
        assert_eq!(children_of(&flat, "b").len(), 1);
        assert!(children_of(&flat, "c").is_empty());
        assert!(contains_slug(&flat, "d"));
        assert!(!contains_slug(&flat, "q"));
    }
}
