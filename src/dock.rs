//! Dock-wide enums, reserved keys and the ambient state cache
//!
//! The dock reports its position, display mode and palette as raw integers.
//! They are converted here, and the last reported raw values are cached so
//! that late-binding consumers can read them without subscribing.

use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Reserved item key under which a plugin exposes its quick-panel widget
pub const QUICK_ITEM_KEY: &str = "quick_item_key";

/// Property consulted on plugins that lack the V2 capability
pub const PROP_PLUGIN_FLAGS: &str = "pluginFlags";

/// Structured message field names
pub const MSG_TYPE: &str = "type";
pub const MSG_DATA: &str = "data";

/// Message type announcing the container an applet is embedded into
pub const MSG_APPLET_CONTAINER: &str = "AppletContainer";

/// Container value used when an applet is shown inside the quick panel
pub const APPLET_CONTAINER_QUICK_PANEL: &str = "QuickPanelEmbed";

/// Edge of the screen the dock is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Top,
    Right,
    Bottom,
    Left,
}

impl TryFrom<u32> for Position {
    type Error = HostError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Top),
            1 => Ok(Self::Right),
            2 => Ok(Self::Bottom),
            3 => Ok(Self::Left),
            other => Err(HostError::InvalidPosition(other)),
        }
    }
}

impl From<Position> for u32 {
    fn from(position: Position) -> Self {
        match position {
            Position::Top => 0,
            Position::Right => 1,
            Position::Bottom => 2,
            Position::Left => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Fashion,
    Efficient,
}

impl TryFrom<u32> for DisplayMode {
    type Error = HostError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fashion),
            1 => Ok(Self::Efficient),
            other => Err(HostError::InvalidDisplayMode(other)),
        }
    }
}

impl From<DisplayMode> for u32 {
    fn from(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Fashion => 0,
            DisplayMode::Efficient => 1,
        }
    }
}

/// Palette applied to the toolkit when the dock theme changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteType {
    Unknown,
    Light,
    Dark,
}

impl TryFrom<u32> for PaletteType {
    type Error = HostError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Light),
            2 => Ok(Self::Dark),
            other => Err(HostError::InvalidPaletteType(other)),
        }
    }
}

/// Layout hint a plugin declares for its items. Opaque to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizePolicy {
    #[default]
    System,
    Custom,
}

/// Last position and display mode reported by the dock.
///
/// Values are stored raw, exactly as they arrived.
#[derive(Debug, Default)]
pub struct AmbientState {
    position: Cell<Option<u32>>,
    display_mode: Cell<Option<u32>>,
}

impl AmbientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&self, position: u32) {
        self.position.set(Some(position));
    }

    pub fn set_display_mode(&self, mode: u32) {
        self.display_mode.set(Some(mode));
    }

    #[must_use]
    pub fn raw_position(&self) -> Option<u32> {
        self.position.get()
    }

    #[must_use]
    pub fn raw_display_mode(&self) -> Option<u32> {
        self.display_mode.get()
    }

    /// Current position, if one was reported and it is a known value
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position.get().and_then(|raw| Position::try_from(raw).ok())
    }

    #[must_use]
    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.display_mode
            .get()
            .and_then(|raw| DisplayMode::try_from(raw).ok())
    }
}
