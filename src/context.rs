use crate::dock::AmbientState;
use crate::registry::{EmbedRegistry, PopupRegistry};
use crate::widget::{Toolkit, WindowSystem};
use std::rc::Rc;

/// Dock-wide services shared by every plugin host.
///
/// One instance lives for the whole shell session and is handed to each
/// [`WidgetPlugin`](crate::plugins::WidgetPlugin) and to the message router.
pub struct DockContext {
    embed: EmbedRegistry,
    popup: PopupRegistry,
    ambient: AmbientState,
    toolkit: Rc<dyn Toolkit>,
    window_system: Rc<dyn WindowSystem>,
}

impl DockContext {
    pub fn new(toolkit: Rc<dyn Toolkit>, window_system: Rc<dyn WindowSystem>) -> Self {
        Self {
            embed: EmbedRegistry::new(),
            popup: PopupRegistry::new(),
            ambient: AmbientState::new(),
            toolkit,
            window_system,
        }
    }

    pub fn embed(&self) -> &EmbedRegistry {
        &self.embed
    }

    pub fn popup(&self) -> &PopupRegistry {
        &self.popup
    }

    pub fn ambient(&self) -> &AmbientState {
        &self.ambient
    }

    pub fn toolkit(&self) -> &dyn Toolkit {
        self.toolkit.as_ref()
    }

    pub fn window_system(&self) -> &dyn WindowSystem {
        self.window_system.as_ref()
    }
}
