use std::cell::RefCell;
use std::collections::VecDeque;

thread_local! {
    static POST_RENDER: RefCell<VecDeque<Box<dyn FnOnce()>>> = const { RefCell::new(VecDeque::new()) };
}

/// Queues `f` to run after the current pass has been rendered.
pub fn schedule_effect(f: impl FnOnce() + 'static) {
    POST_RENDER.with(|q| q.borrow_mut().push_back(Box::new(f)));
}

pub fn pending_effects() -> usize {
    POST_RENDER.with(|q| q.borrow().len())
}

/// Runs the queued effects in FIFO order. Effects queued while draining are
/// left for the next pass. Returns how many ran.
pub fn drain_effects() -> usize {
    let batch = POST_RENDER.with(|q| std::mem::take(&mut *q.borrow_mut()));
    let n = batch.len();
    for f in batch {
        f();
    }
    n
}
