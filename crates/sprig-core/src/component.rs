//! Component nodes and the builder surface intrinsic elements wrap.
//!
//! Nodes are rebuilt from scratch every pass by re-running the root's view.
//! A node registers itself under the current owner when created, taking the
//! next ordinal of its parent as its path. Only signal storage and the
//! renderer's shadow copy survive between passes.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::signal::{self, Cursor, Signal};
use crate::{ElementKind, NodePath, Props, Style, context, effects};

pub type ViewFn = Rc<dyn Fn(&Component)>;

struct NodeData {
    kind: ElementKind,
    path: NodePath,
    props: Props,
    children: Vec<Component>,
    parent: Weak<RefCell<NodeData>>,
    cursors: SmallVec<[Cursor; 4]>,
    view: Option<ViewFn>,
    states: HashMap<String, (TypeId, Cursor)>,
}

/// Cheap, cloneable handle to a node of the component tree.
#[derive(Clone)]
pub struct Component(Rc<RefCell<NodeData>>);

impl Component {
    /// Creates a node and appends it to the current owner.
    ///
    /// Without an open owner the node becomes a root at path `"0"`.
    pub fn new(kind: ElementKind, props: Props) -> Self {
        match context::current_owner() {
            Some(parent) => {
                let mut p = parent.0.borrow_mut();
                let path = p.path.child(p.children.len());
                let node = Self::detached(kind, props, path, Rc::downgrade(&parent.0));
                p.children.push(node.clone());
                node
            }
            None => Self::detached(kind, props, NodePath::root(), Weak::new()),
        }
    }

    /// A root node at `"0"` that is never attached to an owner.
    pub fn root(props: Props) -> Self {
        Self::detached(ElementKind::Root, props, NodePath::root(), Weak::new())
    }

    fn detached(
        kind: ElementKind,
        props: Props,
        path: NodePath,
        parent: Weak<RefCell<NodeData>>,
    ) -> Self {
        Component(Rc::new(RefCell::new(NodeData {
            kind,
            path,
            props,
            children: Vec::new(),
            parent,
            cursors: SmallVec::new(),
            view: None,
            states: HashMap::new(),
        })))
    }

    pub fn path(&self) -> NodePath {
        self.0.borrow().path.clone()
    }

    pub fn kind(&self) -> ElementKind {
        self.0.borrow().kind
    }

    pub fn props(&self) -> Props {
        self.0.borrow().props.clone()
    }

    pub fn with_props_ref<R>(&self, f: impl FnOnce(&Props) -> R) -> R {
        f(&self.0.borrow().props)
    }

    pub fn children(&self) -> Vec<Component> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn parent(&self) -> Option<Component> {
        self.0.borrow().parent.upgrade().map(Component)
    }

    /// Cursors read while this node was the owner during the current pass.
    pub fn cursors(&self) -> Vec<Cursor> {
        self.0.borrow().cursors.to_vec()
    }

    pub fn reads(&self, cursor: Cursor) -> bool {
        self.0.borrow().cursors.contains(&cursor)
    }

    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Finds the node at `path` in this subtree.
    pub fn find(&self, path: &NodePath) -> Option<Component> {
        let data = self.0.borrow();
        if data.path == *path {
            return Some(self.clone());
        }
        if !path.is_descendant_of(&data.path) {
            return None;
        }
        data.children.iter().find_map(|c| c.find(path))
    }

    /// Visits this subtree in document order.
    pub fn walk(&self, f: &mut impl FnMut(&Component)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    pub fn count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_| n += 1);
        n
    }

    // Builder surface. Every step runs with `self` as the owner so nested
    // construction and reads are attributed to it.

    pub fn body(self, f: impl FnOnce(&Component)) -> Self {
        {
            let _owner = context::open(&self);
            f(&self);
        }
        self
    }

    /// Stores `f` as this node's view and runs it. `rebuild` re-runs it.
    pub fn view(self, f: impl Fn(&Component) + 'static) -> Self {
        self.set_view(Rc::new(f));
        self.rebuild();
        self
    }

    pub(crate) fn set_view(&self, view: ViewFn) {
        self.0.borrow_mut().view = Some(view);
    }

    /// Queues `f` to run once after the current pass has been rendered.
    pub fn on_appear(self, f: impl FnOnce(&Component) + 'static) -> Self {
        {
            let _owner = context::open(&self);
            let me = self.clone();
            effects::schedule_effect(move || f(&me));
        }
        self
    }

    pub fn with_props(self, patch: Props) -> Self {
        {
            let _owner = context::open(&self);
            self.0.borrow_mut().props.merge(patch);
        }
        self
    }

    pub fn with_style(self, style: impl Into<Style>) -> Self {
        let style = style.into();
        {
            let _owner = context::open(&self);
            self.0.borrow_mut().props.merge_style(style);
        }
        self
    }

    /// Runs an arbitrary mutation with `self` as the owner.
    pub fn with_extension(self, extension: impl FnOnce(&Component)) -> Self {
        {
            let _owner = context::open(&self);
            extension(&self);
        }
        self
    }

    /// Changes the element kind while the node is still being built.
    pub fn with_kind(self, kind: ElementKind) -> Self {
        self.0.borrow_mut().kind = kind;
        self
    }

    /// Declared state field, lazily created on first access and persisted by
    /// cursor across passes.
    pub fn state<T: 'static>(&self, name: &str, init: impl FnOnce() -> T) -> Signal<T> {
        let cached = self.0.borrow().states.get(name).copied();
        if let Some((ty, cursor)) = cached
            && ty == TypeId::of::<T>()
        {
            return Signal::from_cursor(cursor);
        }
        let path = self.path();
        let cursor = context::with_owner(self, || signal::declare_named(&path, name, init));
        self.0
            .borrow_mut()
            .states
            .insert(name.to_owned(), (TypeId::of::<T>(), cursor));
        Signal::from_cursor(cursor)
    }

    /// Discards the children and re-runs the view, if any.
    pub fn rebuild(&self) {
        let view = {
            let mut data = self.0.borrow_mut();
            data.children.clear();
            data.view.clone()
        };
        if let Some(view) = view {
            let _owner = context::open(self);
            view(self);
        }
    }

    /// Clears the per-pass cursor sets of this subtree.
    pub fn clear_cursors(&self) {
        self.walk(&mut |c| c.0.borrow_mut().cursors.clear());
    }

    /// Records `cursor` as read by this owner and returns the reader path:
    /// the owner's most recently appended child, or its first slot while it
    /// has none.
    pub(crate) fn mark_read(&self, cursor: Cursor) -> NodePath {
        let mut data = self.0.borrow_mut();
        if !data.cursors.contains(&cursor) {
            data.cursors.push(cursor);
        }
        data.path.child(data.children.len().saturating_sub(1))
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Component")
            .field("kind", &data.kind)
            .field("path", &data.path)
            .field("cursors", &data.cursors)
            .field("children", &data.children)
            .finish()
    }
}
