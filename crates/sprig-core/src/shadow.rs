//! The renderer's retained copy of the last rendered tree and the structural
//! queries run against it.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::{Component, Cursor, ElementKind, NodePath, Props};

/// Behaviour-free snapshot of a component node.
#[derive(Clone, Debug)]
pub struct ShadowNode {
    pub kind: ElementKind,
    pub path: NodePath,
    pub cursors: SmallVec<[Cursor; 4]>,
    pub props: Props,
    pub children: Vec<ShadowNode>,
}

impl ShadowNode {
    pub fn capture(node: &Component) -> Self {
        ShadowNode {
            kind: node.kind(),
            path: node.path(),
            cursors: node.cursors().into_iter().collect(),
            props: node.props(),
            children: node.children().iter().map(ShadowNode::capture).collect(),
        }
    }

    pub fn find(&self, path: &NodePath) -> Option<&ShadowNode> {
        if self.path == *path {
            return Some(self);
        }
        if !path.is_descendant_of(&self.path) {
            return None;
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Paths of every node whose cursor set contains `cursor`.
    pub fn paths_reading(&self, cursor: Cursor) -> Vec<NodePath> {
        let mut out = Vec::new();
        self.collect_reading(cursor, &mut out);
        out
    }

    fn collect_reading(&self, cursor: Cursor, out: &mut Vec<NodePath>) {
        if self.cursors.contains(&cursor) {
            out.push(self.path.clone());
        }
        for c in &self.children {
            c.collect_reading(cursor, out);
        }
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ShadowNode::count).sum::<usize>()
    }
}

/// True when `next` differs from `prev` in kind or child count anywhere in
/// the subtree, or when there is nothing to compare against.
pub fn structure_changed(prev: Option<&ShadowNode>, next: &Component) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    if prev.kind != next.kind() {
        return true;
    }
    let children = next.children();
    if prev.children.len() != children.len() {
        return true;
    }
    prev.children
        .iter()
        .zip(&children)
        .any(|(p, n)| structure_changed(Some(p), n))
}

/// Reduces `paths` to those with no ancestor in the set.
///
/// Candidates are admitted shortest first, so the result is sorted by path
/// length and then lexically regardless of input order.
pub fn top_most(paths: impl IntoIterator<Item = NodePath>) -> Vec<NodePath> {
    let mut sorted: Vec<NodePath> = paths
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    sorted.sort_by_key(NodePath::text_len);

    let mut admitted: Vec<NodePath> = Vec::new();
    for candidate in sorted {
        if !admitted.iter().any(|a| candidate.is_descendant_of(a)) {
            admitted.push(candidate);
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextLevel, context};

    fn p(s: &str) -> NodePath {
        NodePath::from(s)
    }

    fn tree(build: impl FnOnce()) -> Component {
        let root = Component::root(Props::default());
        context::with_owner(&root, build);
        root
    }

    fn node(kind: ElementKind) -> Component {
        Component::new(kind, Props::default())
    }

    #[test]
    fn test_top_most_drops_descendants() {
        let got = top_most(["0.1.2", "0.1", "0.10", "0.1.2.0", "0.3"].map(p));
        assert_eq!(got, vec![p("0.1"), p("0.3"), p("0.10")]);
    }

    #[test]
    fn test_top_most_idempotent_and_order_independent() {
        let sets: [&[&str]; 3] = [
            &["0.0.1", "0.0", "0.2.1", "0.2.10", "0.2"],
            &["0", "0.1", "0.1.1"],
            &["0.5.5", "0.5.50", "0.55"],
        ];
        for set in sets {
            let forward = top_most(set.iter().map(|s| p(s)));
            let backward = top_most(set.iter().rev().map(|s| p(s)));
            assert_eq!(forward, backward);
            assert_eq!(top_most(forward.clone()), forward);
            for a in &forward {
                assert!(!forward.iter().any(|b| a.is_descendant_of(b)));
            }
        }
    }

    #[test]
    fn test_same_shape_is_not_a_structural_change() {
        let build = || {
            node(ElementKind::Div).body(|_| {
                node(ElementKind::Text(TextLevel::Span));
                node(ElementKind::Button);
            });
        };
        let old = ShadowNode::capture(&tree(build));
        let new = tree(build);
        assert!(!structure_changed(Some(&old), &new));
        assert!(structure_changed(None, &new));
    }

    #[test]
    fn test_kind_or_count_change_is_structural() {
        let old = ShadowNode::capture(&tree(|| {
            node(ElementKind::Div).body(|_| {
                node(ElementKind::Text(TextLevel::Span));
            });
        }));
        let swapped = tree(|| {
            node(ElementKind::Div).body(|_| {
                node(ElementKind::Input);
            });
        });
        let grown = tree(|| {
            node(ElementKind::Div).body(|_| {
                node(ElementKind::Text(TextLevel::Span));
                node(ElementKind::Text(TextLevel::Span));
            });
        });
        assert!(structure_changed(Some(&old), &swapped));
        assert!(structure_changed(Some(&old), &grown));
        // Only the subtree that changed reports it.
        assert!(structure_changed(
            old.find(&p("0.0.0")),
            &swapped.find(&p("0.0.0")).expect("input node")
        ));
    }

    #[test]
    fn test_capture_and_query() {
        let count = crate::signal(0);
        let root = tree(|| {
            node(ElementKind::Div).body(|_| {
                let _ = count.get();
                node(ElementKind::Span);
            });
            node(ElementKind::Form);
        });
        let shadow = ShadowNode::capture(&root);
        assert_eq!(shadow.count(), 4);
        assert_eq!(shadow.find(&p("0.1")).map(|n| n.kind), Some(ElementKind::Form));
        assert!(shadow.find(&p("0.1.0")).is_none());
        assert_eq!(shadow.paths_reading(count.cursor()), vec![p("0.0")]);

        // The snapshot keeps its cursor sets after the live tree is cleared.
        root.clear_cursors();
        assert_eq!(shadow.paths_reading(count.cursor()), vec![p("0.0")]);
    }
}
