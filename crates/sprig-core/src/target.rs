//! The capability set the renderer needs from whatever tree it draws into.
//!
//! A browser host implements it over `web-sys`; [`crate::MemoryDom`] is the
//! headless implementation used by tests and the demo.

use std::fmt::Debug;

use crate::{EventHandler, EventName};

pub trait RenderTarget {
    /// Cheap handle to a live element. Clones refer to the same element.
    type Element: Clone + PartialEq + Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn create_element(&self, tag: &str) -> Self::Element;

    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&self, el: &Self::Element, name: &str);
    /// Sets one property of the element's live style. An empty value removes it.
    fn set_style(&self, el: &Self::Element, property: &str, value: &str);
    fn set_text(&self, el: &Self::Element, text: &str);
    fn set_value(&self, el: &Self::Element, value: &str);
    fn set_hidden(&self, el: &Self::Element, hidden: bool);

    /// Replaces whatever handler was bound for `name`. `None` unbinds.
    fn bind_event(&self, el: &Self::Element, name: EventName, handler: Option<EventHandler>);

    fn append_child(&self, parent: &Self::Element, child: &Self::Element);
    fn replace_children(&self, parent: &Self::Element, children: &[Self::Element]);
    /// Puts `new` where `old` is in its parent and detaches `old`.
    fn replace_with(&self, old: &Self::Element, new: &Self::Element);
}
