//! Scenario replay
//!
//! A scenario declares a set of headless plugins and an ordered list of
//! dock/plugin events. [`ScenarioRunner`] drives the real lifecycle manager
//! with them and reports the resulting presentation state.

use crate::config::HostConfig;
use crate::context::DockContext;
use crate::dock::{SizePolicy, PROP_PLUGIN_FLAGS};
use crate::event_loop::EventLoop;
use crate::error::{HostError, HostResult};
use crate::flags::{PluginFlags, Slot};
use crate::geometry::Rect;
use crate::headless::{HeadlessPlugin, HeadlessToolkit, HeadlessWindowSystem};
use crate::plugins::{ItemState, PluginManager, PluginsItem, PropertyBag, WidgetPlugin};
use crate::widget::{Toolkit, Widget, WindowSystem};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    /// Flags reported through the V2 interface
    #[serde(default)]
    pub flags: Option<PluginFlags>,
    /// Raw flags property for plugins without the V2 interface
    #[serde(default)]
    pub legacy_flags: Option<serde_json::Value>,
    #[serde(default)]
    pub size_policy: SizePolicy,
    /// Whether the plugin provides a quick-panel widget
    #[serde(default)]
    pub quick_widget: bool,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// Items announced from the plugin's `init`
    #[serde(default)]
    pub init_items: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub key: String,
    #[serde(default = "default_true")]
    pub widget: bool,
    #[serde(default)]
    pub applet: bool,
    #[serde(default)]
    pub tips: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Add {
        plugin: String,
        item: String,
    },
    Update {
        plugin: String,
        item: String,
    },
    Remove {
        plugin: String,
        item: String,
    },
    Applet {
        plugin: String,
        item: String,
        #[serde(default = "default_true")]
        visible: bool,
    },
    /// Dock moved; delivered through every embed wrapper
    Position {
        value: u32,
    },
    DisplayMode {
        value: u32,
    },
    Theme {
        value: u32,
    },
    /// Dock message addressed to one embedded item
    DockMessage {
        item: String,
        slot: Slot,
        text: String,
    },
    Geometry {
        item: String,
        slot: Slot,
        width: u32,
        height: u32,
    },
    PopupGeometry {
        item: String,
        width: u32,
        height: u32,
    },
    /// Plugin-originated message through its installed callback
    PluginMessage {
        plugin: String,
        text: String,
    },
}

impl Scenario {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read scenario file")?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("Failed to parse scenario file")
    }
}

struct HostedPlugin {
    plugin: Rc<HeadlessPlugin>,
    host: Rc<WidgetPlugin>,
}

pub struct ScenarioRunner {
    event_loop: EventLoop,
    manager: PluginManager,
    toolkit: Rc<HeadlessToolkit>,
    window_system: Rc<HeadlessWindowSystem>,
    plugins: Vec<HostedPlugin>,
}

impl ScenarioRunner {
    /// Instantiate every plugin of `scenario` and run their deferred `init`
    pub fn new(scenario: &Scenario, config: &HostConfig) -> Self {
        let event_loop = EventLoop::new();
        let toolkit = Rc::new(HeadlessToolkit::default());
        let window_system = Rc::new(HeadlessWindowSystem::default());
        let context = Rc::new(DockContext::new(
            Rc::clone(&toolkit) as Rc<dyn Toolkit>,
            Rc::clone(&window_system) as Rc<dyn WindowSystem>,
        ));
        let manager = PluginManager::new(context, config.clone(), event_loop.handle());

        let plugins = scenario
            .plugins
            .iter()
            .map(|spec| {
                let plugin = Rc::new(build_plugin(spec, config));
                let host = manager.load_plugin(
                    Rc::clone(&plugin) as Rc<dyn PluginsItem>,
                    Some(Rc::clone(&plugin) as Rc<dyn PropertyBag>),
                );
                HostedPlugin { plugin, host }
            })
            .collect();

        let runner = Self {
            event_loop,
            manager,
            toolkit,
            window_system,
            plugins,
        };
        runner.event_loop.process_pending();
        runner
    }

    pub fn context(&self) -> &Rc<DockContext> {
        self.manager.context()
    }

    fn hosted(&self, name: &str) -> HostResult<&HostedPlugin> {
        self.plugins
            .iter()
            .find(|p| p.plugin.plugin_name() == name)
            .ok_or_else(|| HostError::UnknownPlugin(name.to_string()))
    }

    /// Apply every step, logging and skipping the ones that fail
    pub fn run(&self, steps: &[Step]) {
        for (index, step) in steps.iter().enumerate() {
            if let Err(e) = self.apply(step) {
                warn!("Step {} skipped: {}", index + 1, e);
            }
        }
    }

    /// Apply one step and drain the event loop
    pub fn apply(&self, step: &Step) -> HostResult<()> {
        info!("Applying {:?}", step);
        match step {
            Step::Add { plugin, item } => {
                self.hosted(plugin)?.plugin.announce_added(item);
            }
            Step::Update { plugin, item } => {
                self.hosted(plugin)?.plugin.announce_update(item);
            }
            Step::Remove { plugin, item } => {
                self.hosted(plugin)?.plugin.announce_removed(item);
            }
            Step::Applet {
                plugin,
                item,
                visible,
            } => {
                self.hosted(plugin)?.plugin.request_applet(item, *visible);
            }
            Step::Position { value } => {
                for wrapper in self.context().embed().all() {
                    wrapper.position_changed().emit(value);
                }
            }
            Step::DisplayMode { value } => {
                for wrapper in self.context().embed().all() {
                    wrapper.display_mode_changed().emit(value);
                }
            }
            Step::Theme { value } => {
                for wrapper in self.context().embed().all() {
                    wrapper.theme_changed().emit(value);
                }
            }
            Step::DockMessage { item, slot, text } => {
                let wrapper = self.context().embed().find(item, *slot).ok_or_else(|| {
                    HostError::UnknownWrapper {
                        item_key: item.clone(),
                        slot: slot.to_string(),
                    }
                })?;
                wrapper.event_message().emit(text);
            }
            Step::Geometry {
                item,
                slot,
                width,
                height,
            } => {
                let wrapper = self.context().embed().find(item, *slot).ok_or_else(|| {
                    HostError::UnknownWrapper {
                        item_key: item.clone(),
                        slot: slot.to_string(),
                    }
                })?;
                wrapper
                    .geometry_changed()
                    .emit(&Rect::new(0, 0, *width, *height));
            }
            Step::PopupGeometry {
                item,
                width,
                height,
            } => {
                let wrapper =
                    self.context()
                        .popup()
                        .find(item)
                        .ok_or_else(|| HostError::UnknownWrapper {
                            item_key: item.clone(),
                            slot: "popup".to_string(),
                        })?;
                wrapper
                    .geometry_changed()
                    .emit(&Rect::new(0, 0, *width, *height));
            }
            Step::PluginMessage { plugin, text } => {
                let hosted = self.hosted(plugin)?;
                match hosted.plugin.send_message(text) {
                    Some(ack) => info!("{} got {}", plugin, ack),
                    None => warn!("{} has no message callback", plugin),
                }
            }
        }

        self.event_loop.process_pending();
        Ok(())
    }

    /// Snapshot of what the dock currently presents
    #[must_use]
    pub fn report(&self) -> Report {
        let mut items = Vec::new();
        for hosted in &self.plugins {
            for item in hosted.host.items() {
                let container = self.window_system.container(item.window_handle());
                items.push(ItemReport {
                    plugin: hosted.plugin.plugin_name(),
                    item_key: item.item_key().to_string(),
                    slot: item.slot(),
                    state: item.state(),
                    container_visible: item.container().is_visible(),
                    window_visible: container.is_some_and(|c| c.is_window_visible()),
                    content_size: item
                        .content_size()
                        .map(|s| (s.width, s.height)),
                });
            }
        }

        let popups = self
            .context()
            .popup()
            .all()
            .iter()
            .map(|popup| PopupReport {
                plugin: popup.plugin_id(),
                item_key: popup.item_key(),
            })
            .collect();

        Report {
            items,
            popups,
            embed_wrappers: self.context().embed().len(),
            position: self.context().ambient().raw_position(),
            display_mode: self.context().ambient().raw_display_mode(),
            palette: self.toolkit.palette().map(|p| format!("{p:?}")),
        }
    }
}

fn build_plugin(spec: &PluginSpec, config: &HostConfig) -> HeadlessPlugin {
    let mut plugin = HeadlessPlugin::new(&spec.name).with_size_policy(spec.size_policy);
    if let Some(flags) = spec.flags {
        plugin = plugin.with_v2_flags(flags);
    }
    for item_key in &spec.init_items {
        plugin = plugin.with_initial_item(item_key);
    }

    if let Some(raw) = &spec.legacy_flags {
        plugin.set_property(PROP_PLUGIN_FLAGS, raw.clone());
    }
    if spec.quick_widget {
        plugin.add_widget(&config.plugins.quick_item_key);
    }
    for item in &spec.items {
        if item.widget {
            plugin.add_widget(&item.key);
        }
        if item.applet {
            plugin.add_applet(&item.key);
        }
        if item.tips {
            plugin.add_tips(&item.key);
        }
    }
    plugin
}

#[derive(Debug, Clone)]
pub struct ItemReport {
    pub plugin: String,
    pub item_key: String,
    pub slot: Slot,
    pub state: ItemState,
    pub container_visible: bool,
    pub window_visible: bool,
    pub content_size: Option<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct PopupReport {
    pub plugin: String,
    pub item_key: String,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub items: Vec<ItemReport>,
    pub popups: Vec<PopupReport>,
    pub embed_wrappers: usize,
    pub position: Option<u32>,
    pub display_mode: Option<u32>,
    pub palette: Option<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Embedded items ({} wrappers):", self.embed_wrappers)?;
        for item in &self.items {
            write!(
                f,
                "  {:<16} {:<20} {:<6} {:?} container={} native={}",
                item.plugin,
                item.item_key,
                item.slot,
                item.state,
                if item.container_visible { "shown" } else { "hidden" },
                if item.window_visible { "shown" } else { "hidden" },
            )?;
            if let Some((w, h)) = item.content_size {
                write!(f, " size={w}x{h}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Popups:")?;
        for popup in &self.popups {
            writeln!(f, "  {:<16} {}", popup.plugin, popup.item_key)?;
        }

        let show = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        writeln!(f, "Position: {}", show(self.position))?;
        writeln!(f, "Display mode: {}", show(self.display_mode))?;
        write!(f, "Palette: {}", self.palette.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
plugins:
  - name: network
    flags: TYPE_QUICK
    quick_widget: true
    init_items: [network-item]
    items:
      - key: network-item
        applet: true
  - name: trash
    legacy_flags: 4
    items:
      - key: trash-item
steps:
  - { action: add, plugin: trash, item: trash-item }
  - { action: geometry, item: network-item, slot: quick, width: 120, height: 48 }
  - { action: applet, plugin: network, item: network-item }
  - { action: popup_geometry, item: network-item, width: 300, height: 200 }
  - { action: position, value: 2 }
  - { action: theme, value: 2 }
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        assert_eq!(scenario.plugins.len(), 2);
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(scenario.plugins[0].flags, Some(PluginFlags::TYPE_QUICK));
        assert!(matches!(scenario.steps[4], Step::Position { value: 2 }));
    }

    #[test]
    fn test_replay_scenario() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        let runner = ScenarioRunner::new(&scenario, &HostConfig::default());
        runner.run(&scenario.steps);

        let report = runner.report();
        let slots: Vec<_> = report
            .items
            .iter()
            .map(|i| (i.item_key.as_str(), i.slot))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("network-item", Slot::Quick),
                ("network-item", Slot::Tray),
                ("trash-item", Slot::Fixed),
            ]
        );
        assert_eq!(report.items[0].content_size, Some((120, 48)));
        assert_eq!(report.items[1].content_size, None);
        assert_eq!(report.popups.len(), 1);
        assert_eq!(report.position, Some(2));
        assert_eq!(report.palette.as_deref(), Some("Dark"));
        assert!(report.to_string().contains("trash-item"));
    }

    #[test]
    fn test_unknown_plugin_step_fails() {
        let runner = ScenarioRunner::new(&Scenario::default(), &HostConfig::default());
        let step = Step::Add {
            plugin: "ghost".to_string(),
            item: "x".to_string(),
        };
        assert_eq!(
            runner.apply(&step),
            Err(HostError::UnknownPlugin("ghost".to_string()))
        );
    }
}
