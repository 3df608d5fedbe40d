//! Handle-keyed wrapper registries
//!
//! Both registries map a native window handle to exactly one wrapper. The
//! wrapper is created on first lookup and lives as long as the registry.

pub mod embed;
pub mod popup;

pub use embed::{EmbedRegistry, EmbedWrapper};
pub use popup::{PopupRegistry, PopupType, PopupWrapper};

use crate::widget::WindowHandle;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Get-or-create table shared by both registries
pub(crate) struct HandleTable<W> {
    entries: RefCell<HashMap<WindowHandle, Rc<W>>>,
}

impl<W> HandleTable<W> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_create(&self, handle: WindowHandle, create: impl FnOnce() -> W) -> Rc<W> {
        let mut entries = self.entries.borrow_mut();
        Rc::clone(entries.entry(handle).or_insert_with(|| Rc::new(create())))
    }

    pub(crate) fn contains_handle(&self, handle: WindowHandle) -> bool {
        self.entries.borrow().contains_key(&handle)
    }

    pub(crate) fn find(&self, predicate: impl Fn(&W) -> bool) -> Option<Rc<W>> {
        self.entries
            .borrow()
            .values()
            .find(|w| predicate(w))
            .map(Rc::clone)
    }

    pub(crate) fn all(&self) -> Vec<Rc<W>> {
        self.entries.borrow().values().map(Rc::clone).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
