//! Single-threaded signals with subscribe-once support
//!
//! Wrappers expose their lifecycle events as [`Signal`]s. A receiver that may
//! be asked to wire the same wrapper more than once uses
//! [`Signal::connect_unique`], which keys the connection by receiver so the
//! handler is installed only the first time.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a connected receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

impl ReceiverId {
    /// Allocate a process-unique receiver id
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type Handler<T> = Rc<dyn Fn(&T)>;

struct Connection<T> {
    receiver: Option<ReceiverId>,
    handler: Handler<T>,
}

pub struct Signal<T> {
    connections: RefCell<Vec<Connection<T>>>,
}

impl<T> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RefCell::new(Vec::new()),
        }
    }

    /// Connect a handler unconditionally
    pub fn connect(&self, handler: impl Fn(&T) + 'static) {
        self.connections.borrow_mut().push(Connection {
            receiver: None,
            handler: Rc::new(handler),
        });
    }

    /// Connect a handler unless `receiver` is already connected.
    ///
    /// Returns `true` when the handler was installed.
    pub fn connect_unique(&self, receiver: ReceiverId, handler: impl Fn(&T) + 'static) -> bool {
        let mut connections = self.connections.borrow_mut();
        if connections.iter().any(|c| c.receiver == Some(receiver)) {
            return false;
        }
        connections.push(Connection {
            receiver: Some(receiver),
            handler: Rc::new(handler),
        });
        true
    }

    #[must_use]
    pub fn is_connected(&self, receiver: ReceiverId) -> bool {
        self.connections
            .borrow()
            .iter()
            .any(|c| c.receiver == Some(receiver))
    }

    /// Invoke every handler with `value`, returning how many ran.
    ///
    /// Handlers are snapshotted first, so a handler may connect to or emit on
    /// this signal without deadlocking the borrow.
    pub fn emit(&self, value: &T) -> usize {
        let handlers: Vec<Handler<T>> = self
            .connections
            .borrow()
            .iter()
            .map(|c| Rc::clone(&c.handler))
            .collect();

        for handler in &handlers {
            handler(value);
        }
        handlers.len()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}
