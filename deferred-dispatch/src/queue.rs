//! A single priority level's run queue.
//!
//! Grounded directly on `cordyceps::TransferStack`: the same intrusive,
//! lock-free stack `deferred`'s own waiter list is shaped on, reused here for
//! its other obvious job — a work queue where producers only ever push, and
//! a worker drains the whole backlog in one atomic swap rather than popping
//! one entry at a time under contention.

use cordyceps::transfer_stack::{Links as StackLinks, TransferStack};
use cordyceps::Linked;
use core::ptr::NonNull;
use deferred::Task;

/// One runnable unit, boxed up so it can be linked into a [`TransferStack`].
pub(crate) struct TaskNode {
    links: StackLinks<TaskNode>,
    task: Task,
}

impl TaskNode {
    pub(crate) fn new(task: Task) -> Box<Self> {
        Box::new(Self {
            links: StackLinks::new(),
            task,
        })
    }

    pub(crate) fn run(self: Box<Self>) {
        (self.task)()
    }
}

unsafe impl Linked<StackLinks<TaskNode>> for TaskNode {
    type Handle = Box<TaskNode>;

    fn into_ptr(handle: Box<TaskNode>) -> NonNull<TaskNode> {
        unsafe { NonNull::new_unchecked(Box::into_raw(handle)) }
    }

    unsafe fn from_ptr(ptr: NonNull<TaskNode>) -> Box<TaskNode> {
        Box::from_raw(ptr.as_ptr())
    }

    unsafe fn links(target: NonNull<TaskNode>) -> NonNull<StackLinks<TaskNode>> {
        let links = core::ptr::addr_of_mut!((*target.as_ptr()).links);
        NonNull::new_unchecked(links)
    }
}

/// A single priority level's worth of pending work.
pub(crate) struct RunQueue {
    stack: TransferStack<TaskNode>,
}

impl RunQueue {
    pub(crate) fn new() -> Self {
        Self {
            stack: TransferStack::new(),
        }
    }

    pub(crate) fn push(&self, task: Task) {
        self.stack.push(TaskNode::new(task));
    }

    /// Drain every task currently queued, in the order they should run
    /// (oldest first): `TransferStack::take_all` yields LIFO, so this
    /// reverses it once, same as `deferred::Cell`'s own waiter release.
    pub(crate) fn drain(&self) -> Vec<Box<TaskNode>> {
        let mut batch: Vec<_> = self.stack.take_all().collect();
        batch.reverse();
        batch
    }
}
