// Plugin hosting: interfaces, embedded items, lifecycle and messaging
pub mod api;
pub mod item;
pub mod manager;
pub mod message;
pub mod widget_plugin;

pub use api::{MessageCallback, PluginProxy, PluginsItem, PluginsItemV2, PropertyBag};
pub use item::{ItemState, PluginItem};
pub use manager::PluginManager;
pub use message::{Ack, MessageRouter, PluginMessage};
pub use widget_plugin::WidgetPlugin;
