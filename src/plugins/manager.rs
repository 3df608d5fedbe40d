use crate::config::HostConfig;
use crate::context::DockContext;
use crate::event_loop::LoopHandle;
use crate::plugins::api::{PluginsItem, PropertyBag};
use crate::plugins::widget_plugin::WidgetPlugin;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Owner of every hosted plugin for the lifetime of the dock.
///
/// Plugins only hold a weak proxy to their [`WidgetPlugin`], so a host stays
/// functional exactly as long as the manager keeps it.
pub struct PluginManager {
    context: Rc<DockContext>,
    config: HostConfig,
    event_loop: LoopHandle,
    plugins: RefCell<Vec<Rc<WidgetPlugin>>>,
}

impl PluginManager {
    #[must_use]
    pub fn new(context: Rc<DockContext>, config: HostConfig, event_loop: LoopHandle) -> Self {
        Self {
            context,
            config,
            event_loop,
            plugins: RefCell::new(Vec::new()),
        }
    }

    /// Host `plugin` and keep it alive. Its `init` runs on the next loop turn.
    pub fn load_plugin(
        &self,
        plugin: Rc<dyn PluginsItem>,
        properties: Option<Rc<dyn PropertyBag>>,
    ) -> Rc<WidgetPlugin> {
        info!("Loading plugin {}", plugin.plugin_name());
        let host = WidgetPlugin::new(
            plugin,
            properties,
            Rc::clone(&self.context),
            self.config.clone(),
            &self.event_loop,
        );
        self.plugins.borrow_mut().push(Rc::clone(&host));
        host
    }

    /// Drop the host of `name`. Returns `false` if no such plugin is loaded.
    pub fn unload_plugin(&self, name: &str) -> bool {
        let mut plugins = self.plugins.borrow_mut();
        let before = plugins.len();
        plugins.retain(|host| host.plugin_name() != name);
        before != plugins.len()
    }

    #[must_use]
    pub fn get_plugin(&self, name: &str) -> Option<Rc<WidgetPlugin>> {
        self.plugins
            .borrow()
            .iter()
            .find(|host| host.plugin_name() == name)
            .map(Rc::clone)
    }

    /// Loaded hosts, in load order
    #[must_use]
    pub fn plugins(&self) -> Vec<Rc<WidgetPlugin>> {
        self.plugins.borrow().clone()
    }

    pub fn context(&self) -> &Rc<DockContext> {
        &self.context
    }
}
