//! Decides when the tree is rebuilt and rendered.
//!
//! In deferred mode a write schedules one pass on the next tick of the event
//! loop; further writes until that pass finishes are dropped, so a burst of
//! writes renders once with the final values. In continuous mode every
//! animation frame runs a full pass and writes are ignored.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};
use std::time::Duration;

use web_time::Instant;

use crate::{
    Component, Cursor, EventLoop, FrameId, NodePath, Props, RenderOutcome, effects, signal,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Deferred,
    Continuous,
}

/// Summary of one completed pass, handed to `on_pass` hooks.
#[derive(Clone, Debug)]
pub struct PassReport {
    pub pass: u64,
    pub write: Option<Cursor>,
    /// Reader paths that still resolved in the rebuilt tree.
    pub readers: usize,
    pub outcome: RenderOutcome,
    pub nodes: usize,
    pub elapsed: Duration,
}

type RenderFn = Box<dyn FnMut(Option<Cursor>, &BTreeSet<NodePath>, &Component) -> RenderOutcome>;
type PassHook = Rc<dyn Fn(&PassReport)>;

struct SchedulerInner {
    root: Component,
    event_loop: Rc<dyn EventLoop>,
    render: RefCell<RenderFn>,
    pending: Cell<bool>,
    running: Cell<bool>,
    continuous: Cell<bool>,
    frame: Cell<Option<FrameId>>,
    passes: Cell<u64>,
    hooks: RefCell<Vec<PassHook>>,
}

thread_local! {
    static ACTIVE: RefCell<Weak<SchedulerInner>> = RefCell::new(Weak::new());
}

/// Shared handle to a scheduler. Clones drive the same tree.
#[derive(Clone)]
pub struct Scheduler(Rc<SchedulerInner>);

impl Scheduler {
    /// `view` builds the root's children on every pass; `render` receives the
    /// triggering write, the validated reader paths and the rebuilt root.
    pub fn new(
        view: impl Fn(&Component) + 'static,
        event_loop: Rc<dyn EventLoop>,
        render: impl FnMut(Option<Cursor>, &BTreeSet<NodePath>, &Component) -> RenderOutcome
        + 'static,
    ) -> Self {
        let root = Component::root(Props::default());
        root.set_view(Rc::new(view));
        Scheduler(Rc::new(SchedulerInner {
            root,
            event_loop,
            render: RefCell::new(Box::new(render)),
            pending: Cell::new(false),
            running: Cell::new(false),
            continuous: Cell::new(false),
            frame: Cell::new(None),
            passes: Cell::new(0),
            hooks: RefCell::new(Vec::new()),
        }))
    }

    /// Makes this the thread's active scheduler and runs the first pass.
    pub fn start(&self) {
        ACTIVE.with(|a| *a.borrow_mut() = Rc::downgrade(&self.0));
        run_pass(&self.0, None, BTreeSet::new());
    }

    pub fn root(&self) -> Component {
        self.0.root.clone()
    }

    /// Completed passes, the initial one included.
    pub fn passes(&self) -> u64 {
        self.0.passes.get()
    }

    pub fn is_pending(&self) -> bool {
        self.0.pending.get()
    }

    pub fn is_running(&self) -> bool {
        self.0.running.get()
    }

    pub fn is_continuous(&self) -> bool {
        self.0.continuous.get()
    }

    pub fn on_pass(&self, hook: impl Fn(&PassReport) + 'static) {
        self.0.hooks.borrow_mut().push(Rc::new(hook));
    }

    pub fn start_continuous(&self) {
        if self.0.continuous.replace(true) {
            return;
        }
        log::debug!("continuous rendering started");
        request_frame(&self.0);
    }

    /// Leaves continuous mode and cancels the frame already requested.
    pub fn stop_continuous(&self) {
        if !self.0.continuous.replace(false) {
            return;
        }
        if let Some(id) = self.0.frame.take() {
            self.0.event_loop.cancel_frame(id);
        }
        log::debug!("continuous rendering stopped");
    }
}

/// Called by the signal store after a write.
pub(crate) fn notify(cursor: Cursor, readers: BTreeSet<NodePath>) {
    let Some(inner) = ACTIVE.with(|a| a.borrow().upgrade()) else {
        return;
    };
    if inner.continuous.get() {
        return;
    }
    if inner.pending.get() || inner.running.get() {
        log::trace!("write to {cursor} dropped: a pass is already pending");
        return;
    }
    inner.pending.set(true);
    let weak = Rc::downgrade(&inner);
    inner.event_loop.defer(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            run_pass(&inner, Some(cursor), readers);
        }
    }));
}

fn request_frame(inner: &Rc<SchedulerInner>) {
    let weak = Rc::downgrade(inner);
    let id = inner.event_loop.request_frame(Box::new(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.frame.set(None);
        if !inner.continuous.get() {
            return;
        }
        run_pass(&inner, None, BTreeSet::new());
        if inner.continuous.get() {
            request_frame(&inner);
        }
    }));
    inner.frame.set(Some(id));
}

/// Clears the pass flags when dropped, so a panicking builder does not wedge
/// the scheduler.
struct PassGuard<'a>(&'a SchedulerInner);

impl<'a> PassGuard<'a> {
    fn enter(inner: &'a SchedulerInner) -> Self {
        inner.running.set(true);
        PassGuard(inner)
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.running.set(false);
        self.0.pending.set(false);
    }
}

fn run_pass(inner: &Rc<SchedulerInner>, write: Option<Cursor>, readers: BTreeSet<NodePath>) {
    let started = Instant::now();
    let report = {
        let _pass = PassGuard::enter(inner);

        signal::reset_allocation();
        inner.root.rebuild();

        let readers: BTreeSet<NodePath> = readers
            .into_iter()
            .filter(|p| inner.root.find(p).is_some())
            .collect();
        let outcome = {
            let mut render = inner.render.borrow_mut();
            render(write, &readers, &inner.root)
        };
        effects::drain_effects();

        let pass = inner.passes.get() + 1;
        inner.passes.set(pass);
        PassReport {
            pass,
            write,
            readers: readers.len(),
            outcome,
            nodes: inner.root.count(),
            elapsed: started.elapsed(),
        }
    };
    inner.root.clear_cursors();

    log::trace!(
        "pass {} ({:?}) rendered {} nodes in {:?}",
        report.pass,
        report.outcome,
        report.nodes,
        report.elapsed
    );
    let hooks = inner.hooks.borrow().clone();
    for hook in hooks {
        hook(&report);
    }
}
