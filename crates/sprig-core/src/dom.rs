//! Headless [`RenderTarget`] backed by an element arena.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::{Event, EventHandler, EventName, RenderTarget};

new_key_type! {
    pub struct ElementKey;
}

#[derive(Default)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<String>,
    hidden: bool,
    handlers: BTreeMap<EventName, EventHandler>,
    parent: Option<ElementKey>,
    children: Vec<ElementKey>,
}

#[derive(Default)]
struct DomInner {
    elements: SlotMap<ElementKey, ElementData>,
    created: usize,
}

impl DomInner {
    fn detach(&mut self, key: ElementKey) {
        let parent = self.elements.get_mut(key).and_then(|e| e.parent.take());
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(p)) {
            parent.children.retain(|c| *c != key);
        }
    }

    /// Detaches `key` and frees it together with its descendants.
    fn remove_subtree(&mut self, key: ElementKey) {
        self.detach(key);
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(el) = self.elements.remove(k) {
                stack.extend(el.children);
            }
        }
    }

    fn attach(&mut self, parent: ElementKey, child: ElementKey) {
        self.detach(child);
        if let Some(c) = self.elements.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.elements.get_mut(parent) {
            p.children.push(child);
        }
    }

    fn dump_into(&self, key: ElementKey, depth: usize, out: &mut String) {
        let Some(el) = self.elements.get(key) else {
            return;
        };
        let _ = write!(out, "{:indent$}{}", "", el.tag, indent = depth * 2);
        for (name, value) in &el.attributes {
            let _ = write!(out, " {name}={value:?}");
        }
        if !el.style.is_empty() {
            let style: Vec<String> = el.style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
            let _ = write!(out, " style={:?}", style.join("; "));
        }
        if let Some(value) = &el.value {
            let _ = write!(out, " value={value:?}");
        }
        if el.hidden {
            out.push_str(" hidden");
        }
        for name in el.handlers.keys() {
            let _ = write!(out, " @{}", name.as_str());
        }
        if let Some(text) = &el.text {
            let _ = write!(out, " {text:?}");
        }
        out.push('\n');
        for child in &el.children {
            self.dump_into(*child, depth + 1, out);
        }
    }
}

/// In-memory element tree. Clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryDom(Rc<RefCell<DomInner>>);

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding a single `div` with the given id, to mount into.
    pub fn with_host(id: &str) -> Self {
        let dom = Self::new();
        let host = dom.create_element("div");
        dom.set_attribute(&host, "id", id);
        dom
    }

    /// Delivers `event` to the handler bound on `el`, if any. Input events
    /// carrying a value update the element's value first, like a browser does.
    pub fn dispatch(&self, el: ElementKey, event: Event) -> bool {
        let handler = {
            let mut inner = self.0.borrow_mut();
            let Some(data) = inner.elements.get_mut(el) else {
                return false;
            };
            if event.name == EventName::Input
                && let Some(value) = &event.value
            {
                data.value = Some(value.clone());
            }
            data.handlers.get(&event.name).cloned()
        };
        match handler {
            Some(h) => {
                h(&event);
                true
            }
            None => false,
        }
    }

    pub fn click(&self, el: ElementKey) -> bool {
        self.dispatch(el, Event::new(EventName::Click))
    }

    pub fn tag_of(&self, el: ElementKey) -> Option<String> {
        self.0.borrow().elements.get(el).map(|e| e.tag.clone())
    }

    pub fn text_of(&self, el: ElementKey) -> Option<String> {
        self.0.borrow().elements.get(el).and_then(|e| e.text.clone())
    }

    pub fn attribute(&self, el: ElementKey, name: &str) -> Option<String> {
        let inner = self.0.borrow();
        inner.elements.get(el)?.attributes.get(name).cloned()
    }

    pub fn style_of(&self, el: ElementKey, property: &str) -> Option<String> {
        let inner = self.0.borrow();
        inner.elements.get(el)?.style.get(property).cloned()
    }

    pub fn value_of(&self, el: ElementKey) -> Option<String> {
        self.0.borrow().elements.get(el).and_then(|e| e.value.clone())
    }

    pub fn is_hidden(&self, el: ElementKey) -> bool {
        self.0.borrow().elements.get(el).is_some_and(|e| e.hidden)
    }

    pub fn children_of(&self, el: ElementKey) -> Vec<ElementKey> {
        self.0
            .borrow()
            .elements
            .get(el)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    /// Whether `el` is still alive. Replaced subtrees are freed.
    pub fn contains(&self, el: ElementKey) -> bool {
        self.0.borrow().elements.contains_key(el)
    }

    /// Number of elements created over the lifetime of this tree.
    pub fn created(&self) -> usize {
        self.0.borrow().created
    }

    pub fn len(&self) -> usize {
        self.0.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indented outline of every parentless element and its descendants.
    pub fn dump(&self) -> String {
        let inner = self.0.borrow();
        let mut out = String::new();
        for (key, el) in &inner.elements {
            if el.parent.is_none() {
                inner.dump_into(key, 0, &mut out);
            }
        }
        out
    }
}

impl RenderTarget for MemoryDom {
    type Element = ElementKey;

    fn element_by_id(&self, id: &str) -> Option<ElementKey> {
        self.0
            .borrow()
            .elements
            .iter()
            .find(|(_, e)| e.attributes.get("id").is_some_and(|v| v == id))
            .map(|(k, _)| k)
    }

    fn create_element(&self, tag: &str) -> ElementKey {
        let mut inner = self.0.borrow_mut();
        inner.created += 1;
        inner.elements.insert(ElementData {
            tag: tag.to_owned(),
            ..Default::default()
        })
    }

    fn set_attribute(&self, el: &ElementKey, name: &str, value: &str) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            e.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attribute(&self, el: &ElementKey, name: &str) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            e.attributes.remove(name);
        }
    }

    fn set_style(&self, el: &ElementKey, property: &str, value: &str) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            if value.is_empty() {
                e.style.remove(property);
            } else {
                e.style.insert(property.to_owned(), value.to_owned());
            }
        }
    }

    fn set_text(&self, el: &ElementKey, text: &str) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            e.text = Some(text.to_owned());
        }
    }

    fn set_value(&self, el: &ElementKey, value: &str) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            e.value = Some(value.to_owned());
        }
    }

    fn set_hidden(&self, el: &ElementKey, hidden: bool) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            e.hidden = hidden;
        }
    }

    fn bind_event(&self, el: &ElementKey, name: EventName, handler: Option<EventHandler>) {
        if let Some(e) = self.0.borrow_mut().elements.get_mut(*el) {
            match handler {
                Some(h) => {
                    e.handlers.insert(name, h);
                }
                None => {
                    e.handlers.remove(&name);
                }
            }
        }
    }

    fn append_child(&self, parent: &ElementKey, child: &ElementKey) {
        self.0.borrow_mut().attach(*parent, *child);
    }

    fn replace_children(&self, parent: &ElementKey, children: &[ElementKey]) {
        let mut inner = self.0.borrow_mut();
        let old = inner
            .elements
            .get(*parent)
            .map(|e| e.children.clone())
            .unwrap_or_default();
        for child in old {
            if !children.contains(&child) {
                inner.remove_subtree(child);
            }
        }
        for child in children {
            inner.attach(*parent, *child);
        }
    }

    fn replace_with(&self, old: &ElementKey, new: &ElementKey) {
        let mut inner = self.0.borrow_mut();
        let Some(parent) = inner.elements.get(*old).and_then(|e| e.parent) else {
            return;
        };
        inner.detach(*new);
        let Some(index) = inner
            .elements
            .get(parent)
            .and_then(|p| p.children.iter().position(|c| c == old))
        else {
            return;
        };
        if let Some(p) = inner.elements.get_mut(parent) {
            p.children[index] = *new;
        }
        if let Some(n) = inner.elements.get_mut(*new) {
            n.parent = Some(parent);
        }
        if let Some(o) = inner.elements.get_mut(*old) {
            o.parent = None;
        }
        inner.remove_subtree(*old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_host_lookup_and_dump() {
        let dom = MemoryDom::with_host("app");
        let host = dom.element_by_id("app").expect("host");
        let p = dom.create_element("p");
        dom.set_text(&p, "hello");
        dom.set_style(&p, "color", "red");
        dom.append_child(&host, &p);
        assert!(dom.element_by_id("nope").is_none());
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          p style="color: red" "hello"
        "#);
    }

    #[test]
    fn test_replace_with_frees_old_subtree() {
        let dom = MemoryDom::with_host("app");
        let host = dom.element_by_id("app").expect("host");
        let old = dom.create_element("span");
        let inner = dom.create_element("b");
        dom.append_child(&old, &inner);
        dom.append_child(&host, &old);

        let new = dom.create_element("input");
        dom.replace_with(&old, &new);
        assert_eq!(dom.children_of(host), vec![new]);
        assert!(!dom.contains(old));
        assert!(!dom.contains(inner));
        assert_eq!(dom.created(), 4);
    }

    #[test]
    fn test_replace_children_keeps_reused_elements() {
        let dom = MemoryDom::with_host("app");
        let host = dom.element_by_id("app").expect("host");
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        dom.replace_children(&host, &[a, b]);
        dom.replace_children(&host, &[b]);
        assert_eq!(dom.children_of(host), vec![b]);
        assert!(!dom.contains(a));
    }

    #[test]
    fn test_dispatch_replaces_bound_handler() {
        let dom = MemoryDom::new();
        let el = dom.create_element("input");
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        dom.bind_event(&el, EventName::Input, Some(Rc::new(move |_| h.set(h.get() + 1))));
        let h = hits.clone();
        dom.bind_event(&el, EventName::Input, Some(Rc::new(move |_| h.set(h.get() + 10))));

        assert!(dom.dispatch(el, Event::new(EventName::Input).with_value("typed")));
        assert_eq!(hits.get(), 10);
        assert_eq!(dom.value_of(el).as_deref(), Some("typed"));

        dom.bind_event(&el, EventName::Input, None);
        assert!(!dom.dispatch(el, Event::new(EventName::Input)));
    }
}
