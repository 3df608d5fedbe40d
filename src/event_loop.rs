//! Owning event loop for deferred work
//!
//! Everything in the host runs on one thread. Work that must not run while
//! an object is still being constructed (such as a plugin's `init` calling
//! back into its proxy) is posted here and executed on the next turn.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use std::cell::RefCell;

pub type Task = Box<dyn FnOnce()>;

/// Cloneable handle used to post tasks onto an [`EventLoop`]
#[derive(Clone)]
pub struct LoopHandle {
    tx: UnboundedSender<Task>,
}

impl LoopHandle {
    /// Queue `task` for the next turn of the loop.
    ///
    /// Tasks posted after the loop has been dropped are discarded.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        if self.tx.send(Box::new(task)).is_err() {
            debug!("Event loop closed, dropping posted task");
        }
    }
}

pub struct EventLoop {
    tx: UnboundedSender<Task>,
    rx: RefCell<UnboundedReceiver<Task>>,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: RefCell::new(rx),
        }
    }

    #[must_use]
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            tx: self.tx.clone(),
        }
    }

    fn try_next(&self) -> Option<Task> {
        self.rx.borrow_mut().try_recv().ok()
    }

    /// Run queued tasks until the queue is empty, including tasks posted by
    /// the tasks themselves. Returns how many ran.
    pub fn process_pending(&self) -> usize {
        let mut ran = 0;
        // The receiver borrow ends before the task runs, so tasks may post.
        while let Some(task) = self.try_next() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait for and run a single task.
    ///
    /// The receiver is borrowed only inside each poll, so
    /// [`process_pending`](Self::process_pending) may run while this waits.
    pub async fn next_turn(&self) {
        let task = std::future::poll_fn(|cx| self.rx.borrow_mut().poll_recv(cx)).await;
        // `self` keeps a sender alive, so the channel never reports closed.
        if let Some(task) = task {
            task();
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
