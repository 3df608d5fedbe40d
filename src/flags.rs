//! Plugin capability flags and slot classification
//!
//! A plugin declares what it is through a bitmask. The bits are not
//! exclusive, and a single item may end up in several presentation slots at
//! once.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

bitflags! {
    /// Capability bits a plugin reports about itself
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PluginFlags: u32 {
        const TYPE_QUICK = 1 << 1;
        const TYPE_TOOL = 1 << 2;
        const TYPE_SYSTEM = 1 << 3;
        const TYPE_TRAY = 1 << 4;
        /// Plugin written against the legacy interface without flag support
        const TYPE_UNADAPTED = 1 << 5;
        const ATTRIBUTE_NORMAL = 1 << 9;
    }
}

impl PluginFlags {
    /// Flags assumed when a plugin's flags cannot be determined
    pub const UNADAPTED: Self = Self::TYPE_UNADAPTED.union(Self::ATTRIBUTE_NORMAL);

    /// Bits that earn a tray slot
    const TRAY_MASK: Self = Self::TYPE_QUICK
        .union(Self::TYPE_SYSTEM)
        .union(Self::TYPE_TRAY)
        .union(Self::ATTRIBUTE_NORMAL);
}

impl Default for PluginFlags {
    fn default() -> Self {
        Self::UNADAPTED
    }
}

/// Presentation category a plugin item can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Quick,
    Tray,
    Fixed,
}

impl Slot {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Tray => "tray",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a flag set to the slots its items must occupy.
///
/// `TYPE_QUICK` also satisfies the tray predicate, so a quick plugin always
/// gets a tray item as well. An empty result is a valid outcome.
#[must_use]
pub fn classify(flags: PluginFlags) -> BTreeSet<Slot> {
    let mut slots = BTreeSet::new();

    if flags.contains(PluginFlags::TYPE_QUICK) {
        slots.insert(Slot::Quick);
    }
    if flags.intersects(PluginFlags::TRAY_MASK) {
        slots.insert(Slot::Tray);
    }
    if flags.contains(PluginFlags::TYPE_TOOL) {
        slots.insert(Slot::Fixed);
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_fans_out_to_tray() {
        let slots = classify(PluginFlags::TYPE_QUICK);
        assert_eq!(slots.into_iter().collect::<Vec<_>>(), vec![Slot::Quick, Slot::Tray]);
    }

    #[test]
    fn test_tray_predicate() {
        for flags in [
            PluginFlags::TYPE_SYSTEM,
            PluginFlags::TYPE_TRAY,
            PluginFlags::ATTRIBUTE_NORMAL,
        ] {
            let slots = classify(flags);
            assert_eq!(slots.len(), 1, "{flags:?}");
            assert!(slots.contains(&Slot::Tray));
        }
    }

    #[test]
    fn test_tool_is_fixed_only() {
        let slots = classify(PluginFlags::TYPE_TOOL);
        assert_eq!(slots.into_iter().collect::<Vec<_>>(), vec![Slot::Fixed]);
    }

    #[test]
    fn test_no_slot_flags() {
        assert!(classify(PluginFlags::empty()).is_empty());
        assert!(classify(PluginFlags::TYPE_UNADAPTED).is_empty());
    }

    #[test]
    fn test_all_slots() {
        let slots = classify(PluginFlags::TYPE_QUICK | PluginFlags::TYPE_TOOL);
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_unadapted_default_lands_in_tray() {
        let slots = classify(PluginFlags::default());
        assert_eq!(slots.into_iter().collect::<Vec<_>>(), vec![Slot::Tray]);
    }

    #[test]
    fn test_flags_yaml_format() {
        let flags: PluginFlags = serde_yaml::from_str("TYPE_QUICK | TYPE_TOOL").unwrap();
        assert_eq!(flags, PluginFlags::TYPE_QUICK | PluginFlags::TYPE_TOOL);
    }
}
