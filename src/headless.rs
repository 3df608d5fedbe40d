//! In-memory implementations of the toolkit seams
//!
//! Nothing here talks to a display server. Widgets only record what was done
//! to them, which is what the scenario runner reports and what the tests
//! assert on.

use crate::dock::{DisplayMode, PaletteType, Position, SizePolicy};
use crate::flags::{PluginFlags, Slot};
use crate::geometry::Size;
use crate::plugins::api::{MessageCallback, PluginProxy, PluginsItem, PluginsItemV2, PropertyBag};
use crate::widget::{Toolkit, Widget, WindowHandle, WindowSystem};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

fn next_handle() -> WindowHandle {
    static NEXT: AtomicU64 = AtomicU64::new(0x1000);
    WindowHandle(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Widget that records its state instead of drawing
#[derive(Debug)]
pub struct HeadlessWidget {
    name: String,
    handle: Cell<Option<WindowHandle>>,
    parent: Cell<Option<WindowHandle>>,
    visible: Cell<bool>,
    window_visible: Cell<bool>,
    translucent: Cell<bool>,
    fixed_size: Cell<Option<Size>>,
    updates: Cell<usize>,
}

impl HeadlessWidget {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            handle: Cell::new(None),
            parent: Cell::new(None),
            visible: Cell::new(false),
            window_visible: Cell::new(false),
            translucent: Cell::new(false),
            fixed_size: Cell::new(None),
            updates: Cell::new(0),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle of the native window, if one was realized
    #[must_use]
    pub fn handle(&self) -> Option<WindowHandle> {
        self.handle.get()
    }

    #[must_use]
    pub fn parent(&self) -> Option<WindowHandle> {
        self.parent.get()
    }

    #[must_use]
    pub fn is_window_visible(&self) -> bool {
        self.window_visible.get()
    }

    #[must_use]
    pub fn is_translucent(&self) -> bool {
        self.translucent.get()
    }

    #[must_use]
    pub fn fixed_size(&self) -> Option<Size> {
        self.fixed_size.get()
    }

    /// Number of repaint requests received
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.get()
    }
}

impl Widget for HeadlessWidget {
    fn realize(&self) -> WindowHandle {
        if let Some(handle) = self.handle.get() {
            return handle;
        }
        let handle = next_handle();
        self.handle.set(Some(handle));
        self.window_visible.set(true);
        debug!("{} realized as window {}", self.name, handle);
        handle
    }

    fn set_parent(&self, parent: Option<WindowHandle>) {
        self.parent.set(parent);
    }

    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }

    fn hide_window(&self) {
        self.window_visible.set(false);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn update(&self) {
        self.updates.set(self.updates.get() + 1);
    }

    fn set_fixed_size(&self, size: Size) {
        self.fixed_size.set(Some(size));
    }

    fn set_translucent_background(&self, enabled: bool) {
        self.translucent.set(enabled);
    }
}

/// Creates headless containers and remembers them
#[derive(Debug, Default)]
pub struct HeadlessWindowSystem {
    containers: RefCell<Vec<Rc<HeadlessWidget>>>,
}

impl HeadlessWindowSystem {
    #[must_use]
    pub fn containers(&self) -> Vec<Rc<HeadlessWidget>> {
        self.containers.borrow().clone()
    }

    #[must_use]
    pub fn container(&self, handle: WindowHandle) -> Option<Rc<HeadlessWidget>> {
        self.containers
            .borrow()
            .iter()
            .find(|c| c.handle() == Some(handle))
            .map(Rc::clone)
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn create_container(&self, item_key: &str, slot: Slot) -> Rc<dyn Widget> {
        let container = HeadlessWidget::new(format!("{slot}:{item_key}"));
        self.containers.borrow_mut().push(Rc::clone(&container));
        container
    }
}

#[derive(Debug, Default)]
pub struct HeadlessToolkit {
    palette: Cell<Option<PaletteType>>,
}

impl HeadlessToolkit {
    #[must_use]
    pub fn palette(&self) -> Option<PaletteType> {
        self.palette.get()
    }
}

impl Toolkit for HeadlessToolkit {
    fn set_palette_type(&self, palette: PaletteType) {
        self.palette.set(Some(palette));
    }
}

/// Scriptable plugin backed by headless widgets.
///
/// With V2 flags set it exposes the V2 capability; otherwise its flags are
/// only reachable through [`PropertyBag`].
pub struct HeadlessPlugin {
    name: String,
    v2_flags: Option<PluginFlags>,
    size_policy: SizePolicy,
    initial_items: Vec<String>,
    widgets: RefCell<HashMap<String, Rc<HeadlessWidget>>>,
    applets: RefCell<HashMap<String, Rc<HeadlessWidget>>>,
    tips: RefCell<HashMap<String, Rc<HeadlessWidget>>>,
    properties: RefCell<HashMap<String, Value>>,
    proxy: RefCell<Option<Weak<dyn PluginProxy>>>,
    callback: RefCell<Option<MessageCallback>>,
    init_calls: Cell<usize>,
    received: RefCell<Vec<String>>,
    positions: RefCell<Vec<Position>>,
    display_modes: RefCell<Vec<DisplayMode>>,
}

impl HeadlessPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            v2_flags: None,
            size_policy: SizePolicy::default(),
            initial_items: Vec::new(),
            widgets: RefCell::new(HashMap::new()),
            applets: RefCell::new(HashMap::new()),
            tips: RefCell::new(HashMap::new()),
            properties: RefCell::new(HashMap::new()),
            proxy: RefCell::new(None),
            callback: RefCell::new(None),
            init_calls: Cell::new(0),
            received: RefCell::new(Vec::new()),
            positions: RefCell::new(Vec::new()),
            display_modes: RefCell::new(Vec::new()),
        }
    }

    /// Expose the V2 capability reporting `flags`
    #[must_use]
    pub fn with_v2_flags(mut self, flags: PluginFlags) -> Self {
        self.v2_flags = Some(flags);
        self
    }

    #[must_use]
    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = policy;
        self
    }

    /// Item announced from inside `init`
    #[must_use]
    pub fn with_initial_item(mut self, item_key: impl Into<String>) -> Self {
        self.initial_items.push(item_key.into());
        self
    }

    pub fn set_property(&self, name: &str, value: Value) {
        self.properties.borrow_mut().insert(name.to_string(), value);
    }

    pub fn add_widget(&self, item_key: &str) -> Rc<HeadlessWidget> {
        let widget = HeadlessWidget::new(format!("{}/{}", self.name, item_key));
        self.widgets
            .borrow_mut()
            .insert(item_key.to_string(), Rc::clone(&widget));
        widget
    }

    pub fn add_applet(&self, item_key: &str) -> Rc<HeadlessWidget> {
        let widget = HeadlessWidget::new(format!("{}/{}/applet", self.name, item_key));
        self.applets
            .borrow_mut()
            .insert(item_key.to_string(), Rc::clone(&widget));
        widget
    }

    pub fn add_tips(&self, item_key: &str) -> Rc<HeadlessWidget> {
        let widget = HeadlessWidget::new(format!("{}/{}/tips", self.name, item_key));
        self.tips
            .borrow_mut()
            .insert(item_key.to_string(), Rc::clone(&widget));
        widget
    }

    #[must_use]
    pub fn widget(&self, item_key: &str) -> Option<Rc<HeadlessWidget>> {
        self.widgets.borrow().get(item_key).map(Rc::clone)
    }

    #[must_use]
    pub fn applet(&self, item_key: &str) -> Option<Rc<HeadlessWidget>> {
        self.applets.borrow().get(item_key).map(Rc::clone)
    }

    #[must_use]
    pub fn tips(&self, item_key: &str) -> Option<Rc<HeadlessWidget>> {
        self.tips.borrow().get(item_key).map(Rc::clone)
    }

    #[must_use]
    pub fn init_calls(&self) -> usize {
        self.init_calls.get()
    }

    /// Messages the dock delivered through the V2 interface
    #[must_use]
    pub fn received(&self) -> Vec<String> {
        self.received.borrow().clone()
    }

    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.positions.borrow().clone()
    }

    #[must_use]
    pub fn display_modes(&self) -> Vec<DisplayMode> {
        self.display_modes.borrow().clone()
    }

    fn proxy(&self) -> Option<Rc<dyn PluginProxy>> {
        let proxy = self.proxy.borrow().as_ref().and_then(Weak::upgrade);
        if proxy.is_none() {
            warn!("{} has no dock proxy yet", self.name);
        }
        proxy
    }

    fn with_proxy(&self, call: impl FnOnce(&dyn PluginProxy)) -> bool {
        match self.proxy() {
            Some(proxy) => {
                call(proxy.as_ref());
                true
            }
            None => false,
        }
    }

    /// Announce `item_key` to the dock. Returns `false` before `init`.
    pub fn announce_added(&self, item_key: &str) -> bool {
        self.with_proxy(|proxy| proxy.item_added(self, item_key))
    }

    pub fn announce_update(&self, item_key: &str) -> bool {
        self.with_proxy(|proxy| proxy.item_update(self, item_key))
    }

    pub fn announce_removed(&self, item_key: &str) -> bool {
        self.with_proxy(|proxy| proxy.item_removed(self, item_key))
    }

    pub fn request_applet(&self, item_key: &str, visible: bool) -> bool {
        self.with_proxy(|proxy| proxy.request_set_applet_visible(self, item_key, visible))
    }

    /// Send a message to the dock through the installed callback
    pub fn send_message(&self, text: &str) -> Option<String> {
        let callback = self.callback.borrow().clone()?;
        Some(callback(&self.name, text))
    }
}

impl PluginsItem for HeadlessPlugin {
    fn plugin_name(&self) -> String {
        self.name.clone()
    }

    fn init(&self, proxy: Weak<dyn PluginProxy>) {
        self.init_calls.set(self.init_calls.get() + 1);
        *self.proxy.borrow_mut() = Some(proxy);

        for item_key in &self.initial_items {
            self.announce_added(item_key);
        }
    }

    fn item_widget(&self, item_key: &str) -> Option<Rc<dyn Widget>> {
        self.widget(item_key).map(|w| w as Rc<dyn Widget>)
    }

    fn item_popup_applet(&self, item_key: &str) -> Option<Rc<dyn Widget>> {
        self.applet(item_key).map(|w| w as Rc<dyn Widget>)
    }

    fn item_tips_widget(&self, item_key: &str) -> Option<Rc<dyn Widget>> {
        self.tips(item_key).map(|w| w as Rc<dyn Widget>)
    }

    fn position_changed(&self, position: Position) {
        self.positions.borrow_mut().push(position);
    }

    fn display_mode_changed(&self, mode: DisplayMode) {
        self.display_modes.borrow_mut().push(mode);
    }

    fn plugin_size_policy(&self) -> SizePolicy {
        self.size_policy
    }

    fn as_v2(&self) -> Option<&dyn PluginsItemV2> {
        if self.v2_flags.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl PluginsItemV2 for HeadlessPlugin {
    fn flags(&self) -> PluginFlags {
        self.v2_flags.unwrap_or(PluginFlags::UNADAPTED)
    }

    fn message(&self, message: &str) -> String {
        self.received.borrow_mut().push(message.to_string());
        String::new()
    }

    fn set_message_callback(&self, callback: MessageCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }
}

impl PropertyBag for HeadlessPlugin {
    fn property(&self, name: &str) -> Option<Value> {
        self.properties.borrow().get(name).cloned()
    }
}
