//! Seams to the UI toolkit the host runs on
//!
//! The host never paints or lays anything out itself. It only moves widgets
//! between parents, toggles visibility and forwards sizes, through these
//! traits.

use crate::dock::PaletteType;
use crate::flags::Slot;
use crate::geometry::Size;
use std::fmt;
use std::rc::Rc;

/// Opaque identity of a realized native window.
///
/// This is the key of both the embed and popup registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A toolkit widget, either plugin-owned or a shell-owned container
pub trait Widget {
    /// Force creation of the native window and return its handle.
    ///
    /// Repeated calls return the same handle.
    fn realize(&self) -> WindowHandle;

    /// Reparent the widget. `None` makes it a top-level window.
    fn set_parent(&self, parent: Option<WindowHandle>);

    fn show(&self);

    fn hide(&self);

    /// Hide the native window backing this widget while leaving the widget
    /// itself in its current state
    fn hide_window(&self);

    fn is_visible(&self) -> bool;

    /// Schedule a repaint
    fn update(&self);

    fn set_fixed_size(&self, size: Size);

    fn set_translucent_background(&self, enabled: bool);
}

/// Shell window manager: creates the containers items are embedded in
pub trait WindowSystem {
    fn create_container(&self, item_key: &str, slot: Slot) -> Rc<dyn Widget>;
}

/// Application-wide toolkit state
pub trait Toolkit {
    fn set_palette_type(&self, palette: PaletteType);
}
