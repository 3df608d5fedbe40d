//! Structured plugin messages and the dock-side message router

use crate::context::DockContext;
use crate::dock::{APPLET_CONTAINER_QUICK_PANEL, MSG_APPLET_CONTAINER, MSG_DATA, MSG_TYPE};
use crate::error::{HostError, HostResult};
use crate::plugins::api::MessageCallback;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// JSON message exchanged between the dock and a plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl PluginMessage {
    pub fn new(kind: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Tells an applet it is being shown inside the quick panel
    #[must_use]
    pub fn applet_container_quick_panel() -> Self {
        Self::new(MSG_APPLET_CONTAINER, APPLET_CONTAINER_QUICK_PANEL)
    }

    pub fn parse(text: &str) -> HostResult<Self> {
        serde_json::from_str(text).map_err(|e| HostError::MalformedMessage(e.to_string()))
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        json!({ MSG_TYPE: self.kind, MSG_DATA: self.data }).to_string()
    }
}

/// Reply returned to a plugin after it sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub code: i32,
}

impl Ack {
    pub const OK: Self = Self { code: 0 };

    #[must_use]
    pub fn to_json(&self) -> String {
        json!({ "code": self.code }).to_string()
    }
}

/// Broadcasts plugin messages to every embedded wrapper
pub struct MessageRouter {
    context: Rc<DockContext>,
}

impl MessageRouter {
    #[must_use]
    pub fn new(context: Rc<DockContext>) -> Self {
        Self { context }
    }

    /// Deliver `text` from `plugin_name` as a request message on every
    /// embed wrapper. Always acknowledges with code 0; malformed text is
    /// still delivered verbatim.
    pub fn on_message(&self, plugin_name: &str, text: &str) -> String {
        info!("Plugin callback message: {} {}", plugin_name, text);
        match PluginMessage::parse(text) {
            Ok(message) => debug!("{} sent {} message", plugin_name, message.kind),
            Err(e) => warn!("{}: {}", plugin_name, e),
        }

        let wrappers = self.context.embed().all();
        for wrapper in &wrappers {
            let handlers = wrapper.request_message().emit(&text.to_string());
            debug!(
                "Request message delivered to window {} ({} handlers)",
                wrapper.handle(),
                handlers
            );
        }

        Ack::OK.to_json()
    }

    /// Wrap this router as a callback suitable for
    /// [`PluginsItemV2::set_message_callback`](crate::plugins::api::PluginsItemV2::set_message_callback)
    #[must_use]
    pub fn callback(self: &Rc<Self>) -> MessageCallback {
        let router = Rc::clone(self);
        Rc::new(move |plugin_name, text| router.on_message(plugin_name, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessToolkit, HeadlessWindowSystem};
    use crate::widget::WindowHandle;
    use std::cell::RefCell;

    fn context() -> Rc<DockContext> {
        Rc::new(DockContext::new(
            Rc::new(HeadlessToolkit::default()),
            Rc::new(HeadlessWindowSystem::default()),
        ))
    }

    #[test]
    fn test_applet_container_message_format() {
        let text = PluginMessage::applet_container_quick_panel().to_json();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "AppletContainer");
        assert_eq!(value["data"], "QuickPanelEmbed");
    }

    #[test]
    fn test_parse_rejects_missing_type() {
        assert!(PluginMessage::parse(r#"{"data": 1}"#).is_err());
        let message = PluginMessage::parse(r#"{"type": "Ping"}"#).unwrap();
        assert_eq!(message.kind, "Ping");
        assert_eq!(message.data, Value::Null);
    }

    #[test]
    fn test_empty_registry_acknowledges() {
        let router = MessageRouter::new(context());
        let ack: Ack = serde_json::from_str(&router.on_message("network", "{}")).unwrap();
        assert_eq!(ack, Ack::OK);
    }

    #[test]
    fn test_broadcast_reaches_every_wrapper() {
        let context = context();
        let received = Rc::new(RefCell::new(Vec::new()));

        for id in 1..=3 {
            let received = Rc::clone(&received);
            context
                .embed()
                .get(WindowHandle(id))
                .request_message()
                .connect(move |text| received.borrow_mut().push((id, text.clone())));
        }

        let router = Rc::new(MessageRouter::new(Rc::clone(&context)));
        let callback = router.callback();
        callback("sound", r#"{"type":"Volume"}"#);

        let mut received = received.borrow().clone();
        received.sort();
        assert_eq!(received.len(), 3);
        assert!(received.iter().all(|(_, t)| t == r#"{"type":"Volume"}"#));
    }

    #[test]
    fn test_malformed_message_still_broadcast() {
        let context = context();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        context
            .embed()
            .get(WindowHandle(9))
            .request_message()
            .connect(move |text| sink.borrow_mut().push(text.clone()));

        let router = MessageRouter::new(Rc::clone(&context));
        let ack: Ack = serde_json::from_str(&router.on_message("broken", "not json")).unwrap();

        assert_eq!(ack, Ack::OK);
        assert_eq!(*received.borrow(), vec!["not json".to_string()]);
        assert!(matches!(
            PluginMessage::parse("not json"),
            Err(HostError::MalformedMessage(_))
        ));
    }
}
