//! Host hooks the scheduler needs: a zero-delay deferral for coalescing
//! writes, and animation frames for continuous mode.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

pub type Task = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

pub trait EventLoop {
    /// Runs `task` on the next tick, after the current synchronous work.
    fn defer(&self, task: Task);
    fn request_frame(&self, task: Task) -> FrameId;
    fn cancel_frame(&self, id: FrameId);
}

/// Headless loop driven by hand. Used by tests and the in-memory host.
#[derive(Default)]
pub struct ManualLoop {
    tasks: RefCell<VecDeque<Task>>,
    frames: RefCell<Vec<(FrameId, Task)>>,
    next_frame: Cell<u64>,
}

impl ManualLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs deferred tasks, including ones queued while running, until none
    /// are left. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut n = 0;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else { break };
            task();
            n += 1;
        }
        n
    }

    /// Fires every frame callback requested before this call.
    pub fn tick_frame(&self) -> usize {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let n = frames.len();
        for (_, task) in frames {
            task();
        }
        n
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl EventLoop for ManualLoop {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }

    fn request_frame(&self, task: Task) -> FrameId {
        let id = FrameId(self.next_frame.get());
        self.next_frame.set(id.0 + 1);
        self.frames.borrow_mut().push((id, task));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        self.frames.borrow_mut().retain(|(f, _)| *f != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_deferred_tasks_run_in_order() {
        let lp = Rc::new(ManualLoop::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..2 {
            let log = log.clone();
            lp.defer(Box::new(move || log.borrow_mut().push(i)));
        }
        {
            let (lp2, log) = (lp.clone(), log.clone());
            lp.defer(Box::new(move || {
                let log = log.clone();
                lp2.defer(Box::new(move || log.borrow_mut().push(9)));
            }));
        }
        assert_eq!(lp.run_until_idle(), 4);
        assert_eq!(*log.borrow(), vec![0, 1, 9]);
    }

    #[test]
    fn test_cancelled_frame_does_not_fire() {
        let lp = ManualLoop::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let a = lp.request_frame(Box::new(move || h.set(h.get() + 1)));
        let h = hits.clone();
        lp.request_frame(Box::new(move || h.set(h.get() + 10)));
        lp.cancel_frame(a);
        assert_eq!(lp.tick_frame(), 1);
        assert_eq!(hits.get(), 10);
        assert_eq!(lp.pending_frames(), 0);
    }
}
