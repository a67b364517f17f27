//! Cursor-addressed signal storage.
//!
//! Values live in a thread-local arena and outlive the components that
//! declared them. A declaration site (owner path plus declaration ordinal or
//! field name) always resolves to the same cursor, so re-running a builder
//! hands back handles to the state written during earlier passes.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::{NodePath, context, scheduler};

new_key_type! {
    struct SlotKey;
}

/// Stable identity of a signal's storage. Assigned in increasing order and
/// never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cursor(u64);

impl Cursor {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded read: the tree position a cursor was consumed for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReaderKey {
    pub path: NodePath,
    pub cursor: Cursor,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Decl {
    Ordinal(usize),
    Named(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Site {
    owner: NodePath,
    decl: Decl,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.decl {
            Decl::Ordinal(n) => write!(f, "{}#{}", self.owner, n),
            Decl::Named(name) => write!(f, "{}.{}", self.owner, name),
        }
    }
}

thread_local! {
    static STORE: RefCell<SignalStore> = RefCell::new(SignalStore::default());
}

#[derive(Default)]
struct SignalStore {
    slots: SlotMap<SlotKey, Rc<dyn Any>>,
    by_cursor: HashMap<Cursor, SlotKey>,
    sites: HashMap<Site, Cursor>,
    /// Declaring site of every cursor allocated for an owner.
    origins: HashMap<Cursor, Site>,
    ordinals: HashMap<NodePath, usize>,
    readers: HashSet<ReaderKey>,
    last_cursor: u64,
}

impl SignalStore {
    fn next_ordinal(&mut self, owner: &NodePath) -> usize {
        let n = self.ordinals.entry(owner.clone()).or_insert(0);
        let ordinal = *n;
        *n += 1;
        ordinal
    }

    fn declare<T: 'static>(&mut self, site: Site, init: impl FnOnce() -> T) -> Cursor {
        if let Some(&cursor) = self.sites.get(&site) {
            let same_type = self
                .by_cursor
                .get(&cursor)
                .and_then(|k| self.slots.get(*k))
                .is_some_and(|slot| slot.is::<RefCell<T>>());
            if same_type {
                return cursor;
            }
            log::warn!(
                "signal site {} re-declared as {}; allocating a new cursor",
                site,
                type_name::<T>()
            );
        }

        let cursor = self.allocate(init());
        self.sites.insert(site.clone(), cursor);
        self.origins.insert(cursor, site);
        cursor
    }

    /// Stores `value` under a fresh cursor.
    fn allocate<T: 'static>(&mut self, value: T) -> Cursor {
        self.last_cursor += 1;
        let cursor = Cursor(self.last_cursor);
        let slot: Rc<dyn Any> = Rc::new(RefCell::new(value));
        let key = self.slots.insert(slot);
        self.by_cursor.insert(cursor, key);
        cursor
    }

    fn describe(&self, cursor: Cursor) -> String {
        match self.origins.get(&cursor) {
            Some(site) => format!("signal {cursor} declared at {site}"),
            None => format!("ownerless signal {cursor}"),
        }
    }

    fn slot(&self, cursor: Cursor) -> Option<Rc<dyn Any>> {
        self.by_cursor
            .get(&cursor)
            .and_then(|k| self.slots.get(*k))
            .cloned()
    }

    fn readers_of(&self, cursor: Cursor) -> BTreeSet<NodePath> {
        self.readers
            .iter()
            .filter(|r| r.cursor == cursor)
            .map(|r| r.path.clone())
            .collect()
    }
}

/// Declares a signal at the next ordinal of the current owner.
///
/// Ordinals restart every pass, so the Nth `signal` call made while building
/// a given node always yields the same cursor. Outside of any owner there is
/// no site to key by and every call allocates a new cursor.
pub fn signal<T: 'static>(initial: T) -> Signal<T> {
    let owner = context::current_owner().map(|c| c.path());
    let cursor = STORE.with(|s| {
        let mut s = s.borrow_mut();
        match owner {
            Some(owner) => {
                let ordinal = s.next_ordinal(&owner);
                s.declare(
                    Site {
                        owner,
                        decl: Decl::Ordinal(ordinal),
                    },
                    || initial,
                )
            }
            None => s.allocate(initial),
        }
    });
    Signal::from_cursor(cursor)
}

pub(crate) fn declare_named<T: 'static>(
    owner: &NodePath,
    name: &str,
    init: impl FnOnce() -> T,
) -> Cursor {
    STORE.with(|s| {
        s.borrow_mut().declare(
            Site {
                owner: owner.clone(),
                decl: Decl::Named(name.to_owned()),
            },
            init,
        )
    })
}

/// Restarts per-owner declaration ordinals. Called at the start of a pass.
pub fn reset_allocation() {
    STORE.with(|s| s.borrow_mut().ordinals.clear());
}

/// Snapshot of reads recorded since the last write.
pub fn tracked_readers() -> Vec<ReaderKey> {
    STORE.with(|s| {
        let mut v: Vec<ReaderKey> = s.borrow().readers.iter().cloned().collect();
        v.sort();
        v
    })
}

fn track(cursor: Cursor) {
    let Some(owner) = context::current_owner() else {
        return;
    };
    let path = owner.mark_read(cursor);
    STORE.with(|s| {
        s.borrow_mut().readers.insert(ReaderKey { path, cursor });
    });
}

fn written(cursor: Cursor) {
    let readers = STORE.with(|s| s.borrow().readers_of(cursor));
    scheduler::notify(cursor, readers);
    // Settles every pending read, not only those of `cursor`.
    STORE.with(|s| s.borrow_mut().readers.clear());
}

/// Handle to a persistent, cursor-addressed value.
pub struct Signal<T: 'static> {
    cursor: Cursor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Signal<T> {}

impl<T: 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.cursor).finish()
    }
}

impl<T: 'static> Signal<T> {
    pub(crate) fn from_cursor(cursor: Cursor) -> Self {
        Self {
            cursor,
            _marker: PhantomData,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn slot(&self) -> Rc<dyn Any> {
        STORE.with(|s| {
            let s = s.borrow();
            s.slot(self.cursor)
                .filter(|slot| slot.is::<RefCell<T>>())
                .unwrap_or_else(|| {
                    panic!(
                        "{} has no slot of type {}",
                        s.describe(self.cursor),
                        type_name::<T>()
                    )
                })
        })
    }

    /// Reads the value without cloning it. Records the read like `get`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track(self.cursor);
        let slot = self.slot();
        let cell = slot
            .downcast_ref::<RefCell<T>>()
            .unwrap_or_else(|| unreachable!());
        let value = cell.borrow();
        f(&value)
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    pub fn set(&self, value: T) {
        {
            let slot = self.slot();
            if let Some(cell) = slot.downcast_ref::<RefCell<T>>() {
                *cell.borrow_mut() = value;
            }
        }
        written(self.cursor);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let slot = self.slot();
            if let Some(cell) = slot.downcast_ref::<RefCell<T>>() {
                f(&mut cell.borrow_mut());
            }
        }
        written(self.cursor);
    }

    /// Splits the handle into an accessor and a mutator closure.
    pub fn split(self) -> (impl Fn() -> T + Clone, impl Fn(T) + Clone)
    where
        T: Clone,
    {
        (move || self.get(), move |v| self.set(v))
    }
}
