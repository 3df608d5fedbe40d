//! Plugin-facing interfaces
//!
//! These are implemented by the plugin loader on behalf of each loaded
//! module ([`PluginsItem`], optionally [`PluginsItemV2`]) and by the host on
//! behalf of the dock ([`PluginProxy`]).

use crate::dock::{DisplayMode, Position, SizePolicy};
use crate::flags::PluginFlags;
use crate::widget::Widget;
use serde_json::Value;
use std::rc::{Rc, Weak};

/// Callback through which a V2 plugin sends a message to the dock.
///
/// Receives the sending plugin's name and the JSON text and returns the
/// JSON acknowledgment.
pub type MessageCallback = Rc<dyn Fn(&str, &str) -> String>;

/// Interface every loaded plugin provides
pub trait PluginsItem {
    /// Stable plugin identifier
    fn plugin_name(&self) -> String;

    /// Called once, on the event loop turn after the host is constructed
    fn init(&self, proxy: Weak<dyn PluginProxy>);

    fn item_widget(&self, item_key: &str) -> Option<Rc<dyn Widget>>;

    fn item_popup_applet(&self, item_key: &str) -> Option<Rc<dyn Widget>>;

    fn item_tips_widget(&self, item_key: &str) -> Option<Rc<dyn Widget>>;

    fn position_changed(&self, _position: Position) {}

    fn display_mode_changed(&self, _mode: DisplayMode) {}

    fn plugin_size_policy(&self) -> SizePolicy {
        SizePolicy::System
    }

    /// Query the optional V2 capability
    fn as_v2(&self) -> Option<&dyn PluginsItemV2> {
        None
    }
}

/// Extended interface with flags and structured messaging
pub trait PluginsItemV2 {
    fn flags(&self) -> PluginFlags;

    /// Deliver a JSON message to the plugin, returning its JSON reply
    fn message(&self, message: &str) -> String;

    fn set_message_callback(&self, callback: MessageCallback);
}

/// Properties of the loaded plugin object, consulted when the V2 capability
/// is absent
pub trait PropertyBag {
    fn property(&self, name: &str) -> Option<Value>;
}

/// What a plugin may ask of the dock
pub trait PluginProxy {
    fn item_added(&self, item: &dyn PluginsItem, item_key: &str);

    fn item_update(&self, item: &dyn PluginsItem, item_key: &str);

    fn item_removed(&self, item: &dyn PluginsItem, item_key: &str);

    fn request_window_auto_hide(&self, item: &dyn PluginsItem, item_key: &str, auto_hide: bool);

    fn request_refresh_window_visible(&self, item: &dyn PluginsItem, item_key: &str);

    fn request_set_applet_visible(&self, item: &dyn PluginsItem, item_key: &str, visible: bool);

    fn save_value(&self, item: &dyn PluginsItem, key: &str, value: Value);

    fn get_value(&self, item: &dyn PluginsItem, key: &str, fallback: Value) -> Value;

    fn remove_value(&self, item: &dyn PluginsItem, keys: &[String]);
}
