use super::HandleTable;
use crate::geometry::Rect;
use crate::signal::Signal;
use crate::widget::WindowHandle;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupType {
    /// Applet embedded into a dock-side container
    Embed,
}

/// Per-handle state of a popup applet window
#[derive(Debug)]
pub struct PopupWrapper {
    handle: WindowHandle,
    plugin_id: RefCell<String>,
    item_key: RefCell<String>,
    popup_type: Cell<Option<PopupType>>,
    geometry_changed: Signal<Rect>,
}

impl PopupWrapper {
    fn new(handle: WindowHandle) -> Self {
        Self {
            handle,
            plugin_id: RefCell::new(String::new()),
            item_key: RefCell::new(String::new()),
            popup_type: Cell::new(None),
            geometry_changed: Signal::new(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    #[must_use]
    pub fn plugin_id(&self) -> String {
        self.plugin_id.borrow().clone()
    }

    pub fn set_plugin_id(&self, plugin_id: &str) {
        *self.plugin_id.borrow_mut() = plugin_id.to_string();
    }

    #[must_use]
    pub fn item_key(&self) -> String {
        self.item_key.borrow().clone()
    }

    pub fn set_item_key(&self, item_key: &str) {
        *self.item_key.borrow_mut() = item_key.to_string();
    }

    #[must_use]
    pub fn popup_type(&self) -> Option<PopupType> {
        self.popup_type.get()
    }

    pub fn set_popup_type(&self, popup_type: PopupType) {
        self.popup_type.set(Some(popup_type));
    }

    /// Geometry the container assigned to the applet content
    pub fn geometry_changed(&self) -> &Signal<Rect> {
        &self.geometry_changed
    }
}

/// Registry of popup applet windows
pub struct PopupRegistry {
    table: HandleTable<PopupWrapper>,
}

impl PopupRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HandleTable::new(),
        }
    }

    pub fn get(&self, handle: WindowHandle) -> Rc<PopupWrapper> {
        self.table.get_or_create(handle, || {
            debug!("Creating popup wrapper for window {}", handle);
            PopupWrapper::new(handle)
        })
    }

    #[must_use]
    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.table.contains_handle(handle)
    }

    #[must_use]
    pub fn contains_item(&self, item_key: &str, popup_type: PopupType) -> bool {
        self.table
            .find(|w| w.popup_type() == Some(popup_type) && *w.item_key.borrow() == item_key)
            .is_some()
    }

    #[must_use]
    pub fn find(&self, item_key: &str) -> Option<Rc<PopupWrapper>> {
        self.table.find(|w| *w.item_key.borrow() == item_key)
    }

    #[must_use]
    pub fn all(&self) -> Vec<Rc<PopupWrapper>> {
        self.table.all()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PopupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
