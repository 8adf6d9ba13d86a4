//! Persistent importer settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::naming::{TemplateStore, DEFAULT_TEMPLATES};
use crate::util::Result;

const APP_DIR: &str = "texture-importer";

/// Importer settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Configs
    pub configs_path: Option<PathBuf>,
    pub current_config: Option<String>,

    // Scan
    pub include_subfolders: bool,

    // Recent texture directories (most recent first)
    pub recent_paths: Vec<PathBuf>,
    pub num_recent_paths: usize,

    // Naming templates, see `crate::naming`
    pub templates: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            configs_path: None,
            current_config: None,
            include_subfolders: false,
            recent_paths: Vec::new(),
            num_recent_paths: 10,
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Settings {
    /// Directory holding settings and the default config directory
    fn app_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    /// Get settings file path
    pub fn path() -> Option<PathBuf> {
        Self::app_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring broken settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Could not save settings {}: {}", path.display(), e);
            }
        }
    }

    /// Save settings to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Directory configs are loaded from and saved to
    pub fn configs_dir(&self) -> PathBuf {
        match &self.configs_path {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ => Self::app_dir()
                .map(|p| p.join("configs"))
                .unwrap_or_else(|| PathBuf::from("configs")),
        }
    }

    /// Add a directory to the recent list (moves to top if already present)
    pub fn add_recent(&mut self, path: PathBuf) {
        self.recent_paths.retain(|p| p != &path);
        self.recent_paths.insert(0, path);
        self.recent_paths.truncate(self.num_recent_paths);
    }

    /// Get recent directories (filters out non-existent)
    pub fn recent_paths(&self) -> Vec<&PathBuf> {
        self.recent_paths.iter().filter(|p| p.is_dir()).collect()
    }

    /// Restore every setting to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl TemplateStore for Settings {
    fn template(&self, key: &str) -> Option<String> {
        self.templates.get(key).cloned()
    }

    fn set_template(&mut self, key: &str, template: &str) {
        self.templates.insert(key.to_string(), template.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{NamingResolver, MATERIAL_NODE_PATTERN};
    use tempfile::TempDir;

    #[test]
    fn test_defaults_include_templates() {
        let settings = Settings::default();
        assert_eq!(settings.template(MATERIAL_NODE_PATTERN).as_deref(), Some("{}_mat"));
        assert_eq!(settings.num_recent_paths, 10);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.include_subfolders = true;
        settings.current_config = Some("arnold".into());
        settings.set_template(MATERIAL_NODE_PATTERN, "{}_shader");
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
        assert_eq!(NamingResolver::new(&loaded).material_node_name("wood"), "wood_shader");
    }

    #[test]
    fn test_partial_and_broken_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        std::fs::write(&path, r#"{"include_subfolders": true}"#).unwrap();
        let loaded = Settings::load_from(&path);
        assert!(loaded.include_subfolders);
        assert_eq!(loaded.num_recent_paths, 10);

        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(Settings::load_from(&dir.path().join("missing.json")), Settings::default());
    }

    #[test]
    fn test_add_recent() {
        let mut settings = Settings {
            num_recent_paths: 3,
            ..Settings::default()
        };
        for p in ["a", "b", "c", "d"] {
            settings.add_recent(PathBuf::from(p));
        }
        settings.add_recent(PathBuf::from("c"));
        assert_eq!(
            settings.recent_paths,
            vec![PathBuf::from("c"), PathBuf::from("d"), PathBuf::from("b")]
        );
    }

    #[test]
    fn test_configs_dir_override_and_reset() {
        let mut settings = Settings::default();
        settings.configs_path = Some(PathBuf::from("/studio/configs"));
        assert_eq!(settings.configs_dir(), PathBuf::from("/studio/configs"));

        settings.reset();
        assert_eq!(settings, Settings::default());
        assert!(settings.configs_dir().ends_with("configs"));
    }
}
