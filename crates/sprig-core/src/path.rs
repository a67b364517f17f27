use std::fmt;

/// Position of a node in the component tree, written as dot-separated child
/// ordinals from the root (`"0"`, `"0.2"`, `"0.2.1"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    pub fn root() -> Self {
        NodePath("0".to_owned())
    }

    pub fn child(&self, index: usize) -> Self {
        NodePath(format!("{}.{}", self.0, index))
    }

    pub fn parent(&self) -> Option<NodePath> {
        self.0
            .rsplit_once('.')
            .map(|(parent, _)| NodePath(parent.to_owned()))
    }

    pub fn is_root(&self) -> bool {
        !self.0.contains('.')
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.0.matches('.').count()
    }

    /// Strict descendant test: `0.1.2` descends from `0.1`, `0.10` does not.
    pub fn is_descendant_of(&self, ancestor: &NodePath) -> bool {
        self.0.len() > ancestor.0.len()
            && self.0.starts_with(ancestor.0.as_str())
            && self.0.as_bytes()[ancestor.0.len()] == b'.'
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn text_len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        NodePath(s.to_owned())
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        NodePath(s)
    }
}
