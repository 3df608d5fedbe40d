use super::HandleTable;
use crate::dock::SizePolicy;
use crate::flags::{PluginFlags, Slot};
use crate::geometry::Rect;
use crate::signal::Signal;
use crate::widget::WindowHandle;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// Per-handle state of an embedded plugin item.
///
/// Metadata is filled in by the lifecycle manager after the wrapper is first
/// looked up. Shell-side events arrive through the signals.
#[derive(Debug)]
pub struct EmbedWrapper {
    handle: WindowHandle,
    plugin_id: RefCell<String>,
    item_key: RefCell<String>,
    slot: Cell<Option<Slot>>,
    size_policy: Cell<SizePolicy>,
    flags: Cell<PluginFlags>,

    theme_changed: Signal<u32>,
    position_changed: Signal<u32>,
    display_mode_changed: Signal<u32>,
    geometry_changed: Signal<Rect>,
    event_message: Signal<String>,
    request_message: Signal<String>,
}

impl EmbedWrapper {
    fn new(handle: WindowHandle) -> Self {
        Self {
            handle,
            plugin_id: RefCell::new(String::new()),
            item_key: RefCell::new(String::new()),
            slot: Cell::new(None),
            size_policy: Cell::new(SizePolicy::default()),
            flags: Cell::new(PluginFlags::empty()),
            theme_changed: Signal::new(),
            position_changed: Signal::new(),
            display_mode_changed: Signal::new(),
            geometry_changed: Signal::new(),
            event_message: Signal::new(),
            request_message: Signal::new(),
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
    pub fn slot(&self) -> Option<Slot> {
        self.slot.get()
    }

    pub fn set_slot(&self, slot: Slot) {
        self.slot.set(Some(slot));
    }

    #[must_use]
    pub fn size_policy(&self) -> SizePolicy {
        self.size_policy.get()
    }

    pub fn set_size_policy(&self, policy: SizePolicy) {
        self.size_policy.set(policy);
    }

    #[must_use]
    pub fn flags(&self) -> PluginFlags {
        self.flags.get()
    }

    pub fn set_flags(&self, flags: PluginFlags) {
        self.flags.set(flags);
    }

    fn matches(&self, item_key: &str, slot: Slot) -> bool {
        self.slot.get() == Some(slot) && *self.item_key.borrow() == item_key
    }

    /// Dock palette changed (raw palette value)
    pub fn theme_changed(&self) -> &Signal<u32> {
        &self.theme_changed
    }

    /// Dock position changed (raw position value)
    pub fn position_changed(&self) -> &Signal<u32> {
        &self.position_changed
    }

    /// Dock display mode changed (raw mode value)
    pub fn display_mode_changed(&self) -> &Signal<u32> {
        &self.display_mode_changed
    }

    /// Geometry the embedding side assigned to this item
    pub fn geometry_changed(&self) -> &Signal<Rect> {
        &self.geometry_changed
    }

    /// Message from the dock addressed to the plugin
    pub fn event_message(&self) -> &Signal<String> {
        &self.event_message
    }

    /// Message from a plugin addressed to the dock
    pub fn request_message(&self) -> &Signal<String> {
        &self.request_message
    }
}

/// Registry of embedded item windows
pub struct EmbedRegistry {
    table: HandleTable<EmbedWrapper>,
}

impl EmbedRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HandleTable::new(),
        }
    }

    /// Return the wrapper for `handle`, creating it on first use
    pub fn get(&self, handle: WindowHandle) -> Rc<EmbedWrapper> {
        self.table.get_or_create(handle, || {
            debug!("Creating embed wrapper for window {}", handle);
            EmbedWrapper::new(handle)
        })
    }

    /// Whether an item is already embedded in `slot`
    #[must_use]
    pub fn contains(&self, item_key: &str, slot: Slot) -> bool {
        self.find(item_key, slot).is_some()
    }

    #[must_use]
    pub fn contains_handle(&self, handle: WindowHandle) -> bool {
        self.table.contains_handle(handle)
    }

    #[must_use]
    pub fn find(&self, item_key: &str, slot: Slot) -> Option<Rc<EmbedWrapper>> {
        self.table.find(|w| w.matches(item_key, slot))
    }

    /// Snapshot of every wrapper, in no particular order
    #[must_use]
    pub fn all(&self) -> Vec<Rc<EmbedWrapper>> {
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

impl Default for EmbedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_same_instance() {
        let registry = EmbedRegistry::new();
        let first = registry.get(WindowHandle(7));
        let second = registry.get(WindowHandle(7));

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_contains_requires_key_and_slot() {
        let registry = EmbedRegistry::new();
        let wrapper = registry.get(WindowHandle(1));
        assert!(!registry.contains("battery", Slot::Tray));

        wrapper.set_item_key("battery");
        wrapper.set_slot(Slot::Tray);

        assert!(registry.contains("battery", Slot::Tray));
        assert!(!registry.contains("battery", Slot::Quick));
        assert!(!registry.contains("sound", Slot::Tray));
    }

    #[test]
    fn test_metadata_survives_lookup() {
        let registry = EmbedRegistry::new();
        registry.get(WindowHandle(3)).set_plugin_id("network");

        assert_eq!(registry.get(WindowHandle(3)).plugin_id(), "network");
        assert!(registry.contains_handle(WindowHandle(3)));
        assert!(!registry.contains_handle(WindowHandle(4)));
    }
}
