//! Owner stack used while a pass is building the tree.
//!
//! Every node created and every signal read is attributed to the innermost
//! open component. Opening returns a guard, and the stack is popped when the
//! guard drops, including when a builder closure panics.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::Component;

thread_local! {
    static OWNERS: RefCell<Vec<Component>> = const { RefCell::new(Vec::new()) };
}

pub fn current_owner() -> Option<Component> {
    OWNERS.with(|st| st.borrow().last().cloned())
}

/// Number of currently open owners.
pub fn depth() -> usize {
    OWNERS.with(|st| st.borrow().len())
}

/// Pushes `component` as the current owner until the guard is dropped.
#[must_use = "the owner is closed as soon as the guard is dropped"]
pub fn open(component: &Component) -> OwnerGuard {
    OWNERS.with(|st| st.borrow_mut().push(component.clone()));
    OwnerGuard {
        _not_send: PhantomData,
    }
}

pub fn with_owner<R>(component: &Component, f: impl FnOnce() -> R) -> R {
    let _guard = open(component);
    f()
}

pub struct OwnerGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        OWNERS.with(|st| {
            st.borrow_mut().pop();
        });
    }
}
