use crate::dock::{PROP_PLUGIN_FLAGS, QUICK_ITEM_KEY};
use crate::flags::PluginFlags;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Host configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostConfig {
    #[serde(default)]
    pub plugins: PluginsConfig,
    #[serde(default)]
    pub applet: AppletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Item key plugins use for their quick-panel widget
    #[serde(default = "default_quick_item_key")]
    pub quick_item_key: String,

    /// Property read from legacy plugins to learn their flags
    #[serde(default = "default_flags_property")]
    pub flags_property: String,

    /// Flags assumed when a plugin's flags cannot be read
    #[serde(default = "default_fallback_flags")]
    pub fallback_flags: PluginFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppletConfig {
    /// Composite applet windows with a translucent background
    #[serde(default = "default_true")]
    pub translucent: bool,
}

// Default value functions
fn default_quick_item_key() -> String {
    QUICK_ITEM_KEY.to_string()
}

fn default_flags_property() -> String {
    PROP_PLUGIN_FLAGS.to_string()
}

fn default_fallback_flags() -> PluginFlags {
    PluginFlags::UNADAPTED
}

fn default_true() -> bool {
    true
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            quick_item_key: default_quick_item_key(),
            flags_property: default_flags_property(),
            fallback_flags: default_fallback_flags(),
        }
    }
}

impl Default for AppletConfig {
    fn default() -> Self {
        Self { translucent: true }
    }
}

impl HostConfig {
    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: HostConfig =
            serde_yaml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path.as_ref(), contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get default configuration path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;

        Ok(home.join(".dock-plugin-host").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plugins_config() {
        let config = PluginsConfig::default();
        assert_eq!(config.quick_item_key, "quick_item_key");
        assert_eq!(config.flags_property, "pluginFlags");
        assert_eq!(config.fallback_flags, PluginFlags::UNADAPTED);
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
plugins:
  fallback_flags: TYPE_TRAY
applet:
  translucent: false
"#;
        let config: HostConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.plugins.fallback_flags, PluginFlags::TYPE_TRAY);
        assert_eq!(config.plugins.quick_item_key, "quick_item_key");
        assert!(!config.applet.translucent);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: HostConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.applet.translucent);
    }
}
