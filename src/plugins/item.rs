use crate::flags::{PluginFlags, Slot};
use crate::geometry::Size;
use crate::plugins::api::PluginsItem;
use crate::registry::EmbedWrapper;
use crate::widget::{Widget, WindowHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::warn;

/// Whether an item's content is currently presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Embedded,
    Hidden,
}

/// Shell-owned container hosting one plugin item in one slot
pub struct PluginItem {
    item_key: String,
    slot: Slot,
    flags: PluginFlags,
    plugin: Rc<dyn PluginsItem>,
    container: Rc<dyn Widget>,
    content_key: String,
    content: RefCell<Option<Rc<dyn Widget>>>,
    content_size: Cell<Option<Size>>,
    state: Cell<ItemState>,
    wrapper: RefCell<Option<Rc<EmbedWrapper>>>,
}

impl PluginItem {
    /// `quick_item_key` selects the widget hosted by quick-slot items
    pub fn new(
        plugin: Rc<dyn PluginsItem>,
        item_key: &str,
        slot: Slot,
        flags: PluginFlags,
        container: Rc<dyn Widget>,
        quick_item_key: &str,
    ) -> Self {
        let content_key = match slot {
            Slot::Quick => quick_item_key,
            Slot::Tray | Slot::Fixed => item_key,
        };

        Self {
            item_key: item_key.to_string(),
            slot,
            flags,
            plugin,
            container,
            content_key: content_key.to_string(),
            content: RefCell::new(None),
            content_size: Cell::new(None),
            state: Cell::new(ItemState::Embedded),
            wrapper: RefCell::new(None),
        }
    }

    /// Realize the container and place the plugin's widget inside it.
    ///
    /// Returns the container's native handle.
    pub fn init(&self) -> WindowHandle {
        let handle = self.container.realize();

        match self.plugin.item_widget(&self.content_key) {
            Some(widget) => {
                widget.set_parent(Some(handle));
                *self.content.borrow_mut() = Some(widget);
            }
            None => warn!(
                "{} has no widget for {} in {} slot",
                self.plugin.plugin_name(),
                self.content_key,
                self.slot
            ),
        }

        handle
    }

    #[must_use]
    pub fn item_key(&self) -> &str {
        &self.item_key
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn flags(&self) -> PluginFlags {
        self.flags
    }

    #[must_use]
    pub fn window_handle(&self) -> WindowHandle {
        self.container.realize()
    }

    pub fn container(&self) -> &Rc<dyn Widget> {
        &self.container
    }

    #[must_use]
    pub fn wrapper(&self) -> Option<Rc<EmbedWrapper>> {
        self.wrapper.borrow().clone()
    }

    pub(crate) fn set_wrapper(&self, wrapper: Rc<EmbedWrapper>) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    #[must_use]
    pub fn state(&self) -> ItemState {
        self.state.get()
    }

    pub(crate) fn set_state(&self, state: ItemState) {
        self.state.set(state);
    }

    /// Size last pushed by the embedding side, if any
    #[must_use]
    pub fn content_size(&self) -> Option<Size> {
        self.content_size.get()
    }

    pub fn hide_window(&self) {
        self.container.hide_window();
    }

    pub fn show(&self) {
        self.container.show();
    }

    /// Bring hidden content back after the plugin re-adds the item
    pub fn restore(&self) {
        if let Some(content) = self.content.borrow().as_ref() {
            content.show();
        }
        self.container.show();
        self.state.set(ItemState::Embedded);
    }

    pub fn update_item_widget_size(&self, size: Size) {
        if let Some(content) = self.content.borrow().as_ref() {
            content.set_fixed_size(size);
        }
        self.container.set_fixed_size(size);
        self.content_size.set(Some(size));
    }
}

impl std::fmt::Debug for PluginItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginItem")
            .field("item_key", &self.item_key)
            .field("slot", &self.slot)
            .field("flags", &self.flags)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}
