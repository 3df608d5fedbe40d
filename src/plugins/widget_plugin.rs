//! Lifecycle manager for one loaded widget plugin
//!
//! A [`WidgetPlugin`] sits between a loaded plugin and the dock. The plugin
//! reports items through the [`PluginProxy`] it receives in `init`; each item
//! is classified into slots, embedded once per slot, and wired to its
//! [`EmbedWrapper`] so dock events reach the plugin.

use crate::config::HostConfig;
use crate::context::DockContext;
use crate::dock::{DisplayMode, PaletteType, Position};
use crate::flags::{classify, PluginFlags, Slot};
use crate::event_loop::LoopHandle;
use crate::plugins::api::{PluginProxy, PluginsItem, PropertyBag};
use crate::plugins::item::{ItemState, PluginItem};
use crate::plugins::message::{MessageRouter, PluginMessage};
use crate::registry::{EmbedWrapper, PopupType};
use crate::signal::ReceiverId;
use crate::widget::Widget;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

pub struct WidgetPlugin {
    this: Weak<WidgetPlugin>,
    receiver: ReceiverId,
    plugin: Rc<dyn PluginsItem>,
    properties: Option<Rc<dyn PropertyBag>>,
    context: Rc<DockContext>,
    config: HostConfig,
    items: RefCell<Vec<Rc<PluginItem>>>,
}

impl WidgetPlugin {
    /// Host `plugin` in the dock described by `context`.
    ///
    /// `properties` is the loaded plugin object, used to read flags from
    /// plugins without the V2 capability; `None` means the loader could not
    /// provide it. The plugin's `init` runs on the next turn of the event
    /// loop behind `event_loop`.
    ///
    /// The plugin only receives a weak proxy, so the returned `Rc` must be
    /// kept alive (normally by [`PluginManager`](crate::plugins::PluginManager))
    /// for the plugin to reach the dock.
    pub fn new(
        plugin: Rc<dyn PluginsItem>,
        properties: Option<Rc<dyn PropertyBag>>,
        context: Rc<DockContext>,
        config: HostConfig,
        event_loop: &LoopHandle,
    ) -> Rc<Self> {
        let host = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            receiver: ReceiverId::next(),
            plugin,
            properties,
            context,
            config,
            items: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&host);
        event_loop.post(move || {
            if let Some(host) = weak.upgrade() {
                let proxy: Weak<dyn PluginProxy> = host.this.clone();
                host.plugin.init(proxy);
            }
        });

        if let Some(v2) = host.plugin.as_v2() {
            let router = Rc::new(MessageRouter::new(Rc::clone(&host.context)));
            v2.set_message_callback(router.callback());
        }

        host
    }

    #[must_use]
    pub fn plugin_name(&self) -> String {
        self.plugin.plugin_name()
    }

    /// Items this host embedded, in creation order
    #[must_use]
    pub fn items(&self) -> Vec<Rc<PluginItem>> {
        self.items.borrow().clone()
    }

    #[must_use]
    pub fn item(&self, item_key: &str, slot: Slot) -> Option<Rc<PluginItem>> {
        self.items
            .borrow()
            .iter()
            .find(|i| i.item_key() == item_key && i.slot() == slot)
            .map(Rc::clone)
    }

    /// Current flags of the plugin.
    ///
    /// Prefers the V2 capability, then the flags property of the loaded
    /// object, then the configured fallback.
    #[must_use]
    pub fn plugin_flags(&self) -> PluginFlags {
        if let Some(v2) = self.plugin.as_v2() {
            return v2.flags();
        }

        let fallback = self.config.plugins.fallback_flags;
        let Some(properties) = self.properties.as_ref() else {
            warn!("the instance of plugin loader is missing");
            return fallback;
        };

        let property = &self.config.plugins.flags_property;
        match properties.property(property).as_ref().and_then(flags_from_value) {
            Some(flags) => flags,
            None => {
                warn!("failed to read {} as plugin flags", property);
                fallback
            }
        }
    }

    pub fn on_dock_position_changed(&self, position: u32) {
        self.context.ambient().set_position(position);
        match Position::try_from(position) {
            Ok(position) => self.plugin.position_changed(position),
            Err(e) => warn!("Not forwarding position to {}: {}", self.plugin.plugin_name(), e),
        }
    }

    pub fn on_dock_display_mode_changed(&self, mode: u32) {
        self.context.ambient().set_display_mode(mode);
        match DisplayMode::try_from(mode) {
            Ok(mode) => self.plugin.display_mode_changed(mode),
            Err(e) => warn!("Not forwarding display mode to {}: {}", self.plugin.plugin_name(), e),
        }
    }

    /// Hand a dock message to the plugin if it speaks structured messages
    pub fn on_dock_event_message_arrived(&self, message: &str) {
        match self.plugin.as_v2() {
            Some(v2) => {
                let reply = v2.message(message);
                debug!("{} replied: {}", self.plugin.plugin_name(), reply);
            }
            None => debug!(
                "{} has no structured messaging, dropping message",
                self.plugin.plugin_name()
            ),
        }
    }

    /// The four widgets a plugin may expose for `item_key`
    fn facets(&self, item_key: &str) -> Vec<Rc<dyn Widget>> {
        [
            self.plugin.item_widget(item_key),
            self.plugin.item_widget(&self.config.plugins.quick_item_key),
            self.plugin.item_popup_applet(item_key),
            self.plugin.item_tips_widget(item_key),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn embed_item(&self, item: &dyn PluginsItem, item_key: &str, slot: Slot, flags: PluginFlags) {
        let container = self.context.window_system().create_container(item_key, slot);
        let plugin_item = Rc::new(PluginItem::new(
            Rc::clone(&self.plugin),
            item_key,
            slot,
            flags,
            container,
            &self.config.plugins.quick_item_key,
        ));

        let handle = plugin_item.init();
        let wrapper = self.context.embed().get(handle);
        self.init_connections(&wrapper, &plugin_item);

        wrapper.set_flags(flags);
        wrapper.set_plugin_id(&item.plugin_name());
        wrapper.set_item_key(item_key);
        wrapper.set_slot(slot);
        wrapper.set_size_policy(item.plugin_size_policy());
        plugin_item.set_wrapper(wrapper);

        plugin_item.hide_window();
        plugin_item.show();

        info!("Embedded {} in {} slot as window {}", item_key, slot, handle);
        self.items.borrow_mut().push(plugin_item);
    }

    fn init_connections(&self, wrapper: &Rc<EmbedWrapper>, item: &Rc<PluginItem>) {
        let context = Rc::downgrade(&self.context);
        wrapper.theme_changed().connect_unique(self.receiver, move |raw| {
            let Some(context) = context.upgrade() else {
                return;
            };
            match PaletteType::try_from(*raw) {
                Ok(palette) => context.toolkit().set_palette_type(palette),
                Err(e) => warn!("Ignoring theme change: {}", e),
            }
        });

        let this = self.this.clone();
        wrapper.position_changed().connect_unique(self.receiver, move |raw| {
            if let Some(host) = this.upgrade() {
                host.on_dock_position_changed(*raw);
            }
        });

        let this = self.this.clone();
        wrapper.display_mode_changed().connect_unique(self.receiver, move |raw| {
            if let Some(host) = this.upgrade() {
                host.on_dock_display_mode_changed(*raw);
            }
        });

        let this = self.this.clone();
        wrapper.event_message().connect_unique(self.receiver, move |message| {
            if let Some(host) = this.upgrade() {
                host.on_dock_event_message_arrived(message);
            }
        });

        let embedded = Rc::downgrade(wrapper);
        let item = Rc::downgrade(item);
        wrapper.geometry_changed().connect_unique(self.receiver, move |geometry| {
            let (Some(embedded), Some(item)) = (embedded.upgrade(), item.upgrade()) else {
                return;
            };
            if embedded.slot() == Some(Slot::Quick) {
                item.update_item_widget_size(geometry.size());
            }
        });
    }

    fn send_applet_container_message(&self) {
        if let Some(v2) = self.plugin.as_v2() {
            v2.message(&PluginMessage::applet_container_quick_panel().to_json());
        }
    }
}

impl PluginProxy for WidgetPlugin {
    fn item_added(&self, item: &dyn PluginsItem, item_key: &str) {
        debug!("itemAdded: {}", item_key);
        let flags = self.plugin_flags();
        let slots = classify(flags);
        if slots.is_empty() {
            debug!("{} declares no presentation slot ({:?})", item_key, flags);
        }

        for slot in slots {
            if !self.context.embed().contains(item_key, slot) {
                self.embed_item(item, item_key, slot, flags);
                continue;
            }

            match self.item(item_key, slot) {
                Some(existing) if existing.state() == ItemState::Hidden => {
                    debug!("Restoring {} in {} slot", item_key, slot);
                    existing.restore();
                }
                _ => debug!("{} already embedded in {} slot", item_key, slot),
            }
        }
    }

    fn item_update(&self, _item: &dyn PluginsItem, item_key: &str) {
        for facet in self.facets(item_key) {
            facet.update();
        }
    }

    fn item_removed(&self, _item: &dyn PluginsItem, item_key: &str) {
        for facet in self.facets(item_key) {
            facet.hide();
        }

        for item in self.items.borrow().iter().filter(|i| i.item_key() == item_key) {
            item.set_state(ItemState::Hidden);
        }
    }

    fn request_window_auto_hide(&self, _item: &dyn PluginsItem, _item_key: &str, _auto_hide: bool) {}

    fn request_refresh_window_visible(&self, _item: &dyn PluginsItem, _item_key: &str) {}

    /// Present the applet of `item_key` as a popup. The popup side decides
    /// visibility, so `visible` is only logged.
    fn request_set_applet_visible(&self, item: &dyn PluginsItem, item_key: &str, visible: bool) {
        debug!("requestSetAppletVisible: {} {}", item_key, visible);
        let Some(applet) = item.item_popup_applet(item_key) else {
            warn!("{} plugin applet popup is null", item_key);
            return;
        };

        self.send_applet_container_message();
        applet.set_parent(None);
        let handle = applet.realize();
        applet.set_translucent_background(self.config.applet.translucent);

        let popups = self.context.popup();
        let has_created = popups.contains(handle);
        let popup = popups.get(handle);
        if !has_created {
            let applet = Rc::downgrade(&applet);
            popup.geometry_changed().connect(move |geometry| {
                if let Some(applet) = applet.upgrade() {
                    applet.set_fixed_size(geometry.size());
                    applet.update();
                }
            });
        }

        popup.set_plugin_id(&self.plugin.plugin_name());
        popup.set_item_key(item_key);
        popup.set_popup_type(PopupType::Embed);
        applet.show();
    }

    fn save_value(&self, _item: &dyn PluginsItem, key: &str, _value: Value) {
        debug!("save_value({}) ignored", key);
    }

    fn get_value(&self, _item: &dyn PluginsItem, _key: &str, fallback: Value) -> Value {
        fallback
    }

    fn remove_value(&self, _item: &dyn PluginsItem, keys: &[String]) {
        debug!("remove_value({:?}) ignored", keys);
    }
}

/// Interpret a property value as a flag word. Whole floats and strings
/// holding a decimal integer are accepted as well.
fn flags_from_value(value: &Value) -> Option<PluginFlags> {
    let bits = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
                .map(|f| f as u64)
        })?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(bits).ok().map(PluginFlags::from_bits_retain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_from_number_and_string() {
        assert_eq!(
            flags_from_value(&json!(2)),
            Some(PluginFlags::TYPE_QUICK)
        );
        assert_eq!(
            flags_from_value(&json!(" 4 ")),
            Some(PluginFlags::TYPE_TOOL)
        );
    }

    #[test]
    fn test_flags_from_whole_float() {
        assert_eq!(
            flags_from_value(&json!(4.0)),
            Some(PluginFlags::TYPE_TOOL)
        );
        assert_eq!(flags_from_value(&json!(4.5)), None);
        assert_eq!(flags_from_value(&json!(-2.0)), None);
    }

    #[test]
    fn test_flags_from_unusable_values() {
        assert_eq!(flags_from_value(&json!("tray")), None);
        assert_eq!(flags_from_value(&json!(-1)), None);
        assert_eq!(flags_from_value(&json!(u64::MAX)), None);
        assert_eq!(flags_from_value(&Value::Null), None);
    }
}
