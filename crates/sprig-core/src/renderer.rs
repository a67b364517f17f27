//! Reconciles freshly built component trees onto a [`RenderTarget`].
//!
//! The renderer keeps a [`ShadowNode`] copy of what it last drew and a map
//! from node path to live element. The first call mounts everything. After
//! that, a write either replaces the first subtree whose shape changed or,
//! when nothing changed shape, re-applies props on the reader paths in place.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use bitflags::bitflags;

use crate::shadow::{ShadowNode, structure_changed, top_most};
use crate::{
    Component, Cursor, ElementKind, Error, Event, EventHandler, EventName, NodePath, Props,
    RenderTarget, Result, Style,
};

bitflags! {
    /// What a render call did to the target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderOutcome: u8 {
        const MOUNTED = 1;
        const REPLACED = 1 << 1;
        const PATCHED = 1 << 2;
    }
}

pub struct Renderer<T: RenderTarget> {
    target: T,
    host: T::Element,
    shadow: Option<ShadowNode>,
    handles: HashMap<NodePath, T::Element>,
}

impl<T: RenderTarget> Renderer<T> {
    /// Resolves the host container up front; a missing host is fatal.
    pub fn new(target: T, host_id: &str) -> Result<Self> {
        let host = target
            .element_by_id(host_id)
            .ok_or_else(|| Error::HostNotFound(host_id.to_owned()))?;
        Ok(Self {
            target,
            host,
            shadow: None,
            handles: HashMap::new(),
        })
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn host(&self) -> &T::Element {
        &self.host
    }

    pub fn shadow(&self) -> Option<&ShadowNode> {
        self.shadow.as_ref()
    }

    pub fn handle(&self, path: &NodePath) -> Option<T::Element> {
        self.handles.get(path).cloned()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.shadow.is_some()
    }

    /// Draws `tree`.
    ///
    /// `write` is the cursor whose write triggered the pass and `readers` the
    /// reader paths recorded for it. A pass with no write re-checks the whole
    /// tree: the root is replaced if anything changed shape, otherwise every
    /// mounted node is patched.
    pub fn render(
        &mut self,
        write: Option<Cursor>,
        readers: &BTreeSet<NodePath>,
        tree: &Component,
    ) -> RenderOutcome {
        let Some(shadow) = &self.shadow else {
            self.mount(tree);
            return RenderOutcome::MOUNTED;
        };

        match write {
            Some(cursor) => {
                let changed = top_most(shadow.paths_reading(cursor))
                    .into_iter()
                    .find_map(|path| {
                        let next = tree.find(&path)?;
                        structure_changed(shadow.find(&path), &next).then_some((path, next))
                    });
                if let Some((path, next)) = changed {
                    self.replace_node(&path, &next, tree);
                    return RenderOutcome::REPLACED;
                }
                self.patch(readers.iter().cloned(), tree)
            }
            None => {
                if structure_changed(Some(shadow), tree) {
                    self.replace_node(&NodePath::root(), tree, tree);
                    return RenderOutcome::REPLACED;
                }
                let mut all: Vec<NodePath> = self.handles.keys().cloned().collect();
                all.sort();
                self.patch(all, tree)
            }
        }
    }

    fn mount(&mut self, tree: &Component) {
        self.handles.clear();
        let root = self.render_node(tree);
        self.target.replace_children(&self.host, &[root]);
        self.shadow = Some(ShadowNode::capture(tree));
        log::debug!("mounted {} nodes", self.handles.len());
    }

    /// Swaps the element at `path` for a fresh render of `next`, then
    /// recaptures the shadow from the whole tree.
    ///
    /// Only the root goes into the host container. A non-root path with no
    /// live element was never drawn, so nothing is spliced for it.
    fn replace_node(&mut self, path: &NodePath, next: &Component, tree: &Component) {
        if path.is_root() {
            let fresh = self.render_node(next);
            self.target.replace_children(&self.host, &[fresh]);
            log::debug!("replaced root");
        } else if let Some(old) = self.handles.get(path).cloned() {
            let fresh = self.render_node(next);
            self.target.replace_with(&old, &fresh);
            log::debug!("replaced subtree at {path}");
        } else {
            log::debug!("no element drawn at {path}; skipping replacement");
        }

        let shadow = ShadowNode::capture(tree);
        self.handles.retain(|p, _| shadow.find(p).is_some());
        self.shadow = Some(shadow);
    }

    fn patch(&self, paths: impl IntoIterator<Item = NodePath>, tree: &Component) -> RenderOutcome {
        let mut patched = 0usize;
        for path in paths {
            let (Some(node), Some(el)) = (tree.find(&path), self.handles.get(&path)) else {
                continue;
            };
            node.with_props_ref(|props| self.apply_props(el, node.kind(), props));
            patched += 1;
        }
        log::trace!("patched {patched} nodes");
        if patched > 0 {
            RenderOutcome::PATCHED
        } else {
            RenderOutcome::empty()
        }
    }

    /// Creates the element subtree for `node`, registering every handle.
    fn render_node(&mut self, node: &Component) -> T::Element {
        let el = self.target.create_element(node.kind().tag());
        let path = node.path();
        self.target.set_attribute(&el, "id", path.as_str());
        node.with_props_ref(|props| self.apply_props(&el, node.kind(), props));
        self.handles.insert(path, el.clone());
        for child in node.children() {
            let child_el = self.render_node(&child);
            self.target.append_child(&el, &child_el);
        }
        el
    }

    fn apply_props(&self, el: &T::Element, kind: ElementKind, props: &Props) {
        let t = &self.target;

        if let Some(content) = &props.content {
            t.set_text(el, &content.resolve());
        }
        match &props.style {
            Some(Style::Inline(css)) => t.set_attribute(el, "style", css),
            Some(Style::Record(record)) => {
                for (property, value) in record.iter() {
                    t.set_style(el, property, value);
                }
            }
            None => {}
        }
        for (name, value) in [
            ("id", &props.id),
            ("class", &props.class),
            ("title", &props.title),
        ] {
            if let Some(value) = value {
                t.set_attribute(el, name, value);
            }
        }
        if let Some(hidden) = props.hidden {
            t.set_hidden(el, hidden);
        }

        for name in EventName::ALL {
            let handler = if name == EventName::Input && kind.is_text_input() {
                text_input_handler(props)
            } else {
                props.handlers.get(name).cloned()
            };
            t.bind_event(el, name, handler);
        }

        match kind {
            ElementKind::Input | ElementKind::TextArea => {
                if let Some(value) = &props.value {
                    t.set_value(el, value);
                }
                if let Some(placeholder) = &props.placeholder {
                    t.set_attribute(el, "placeholder", placeholder);
                }
                if let Some(input_type) = props.input_type {
                    t.set_attribute(el, "type", input_type.as_str());
                }
                self.set_flag(el, "required", props.required);
            }
            ElementKind::Button => {
                if let Some(button_type) = props.button_type {
                    t.set_attribute(el, "type", button_type.as_str());
                }
                self.set_flag(el, "disabled", props.disabled);
            }
            ElementKind::Anchor => {
                if let Some(href) = &props.href {
                    t.set_attribute(el, "href", href);
                }
                if let Some(target) = &props.target {
                    t.set_attribute(el, "target", target);
                }
            }
            ElementKind::Image => {
                if let Some(src) = &props.src {
                    t.set_attribute(el, "src", src);
                }
                if let Some(alt) = &props.alt {
                    t.set_attribute(el, "alt", alt);
                }
            }
            _ => {}
        }
    }

    fn set_flag(&self, el: &T::Element, name: &str, flag: Option<bool>) {
        match flag {
            Some(true) => self.target.set_attribute(el, name, ""),
            Some(false) => self.target.remove_attribute(el, name),
            None => {}
        }
    }
}

/// Raw input events on text inputs feed the text callback with the current
/// value, then the generic input handler.
fn text_input_handler(props: &Props) -> Option<EventHandler> {
    let on_text = props.on_text_change.clone();
    let on_input = props.handlers.get(EventName::Input).cloned();
    if on_text.is_none() && on_input.is_none() {
        return None;
    }
    Some(Rc::new(move |event: &Event| {
        if let Some(f) = &on_text {
            f(event.value.clone().unwrap_or_default());
        }
        if let Some(f) = &on_input {
            f(event);
        }
    }))
}
