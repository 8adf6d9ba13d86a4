//! Channel configs and their JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pattern::{references, Token};
use crate::util::{Error, Result};

/// One texture channel: which attribute a file pattern feeds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigChannel {
    /// Shading attribute the texture connects to (e.g. `baseColor`).
    pub attribute: String,
    /// Filename pattern, see [`crate::pattern`].
    pub pattern: String,
    /// Colorspace passed through to the host.
    pub colorspace: String,
}

impl ConfigChannel {
    /// Create a channel.
    pub fn new(
        attribute: impl Into<String>,
        pattern: impl Into<String>,
        colorspace: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            pattern: pattern.into(),
            colorspace: colorspace.into(),
        }
    }

    /// Whether the pattern references a placeholder token.
    pub fn references(&self, token: Token) -> bool {
        references(&self.pattern, token)
    }
}

/// Named, ordered collection of channels.
///
/// Channel order matters: it is the order networks list their channels in,
/// and the first `$material` channel is the one materials are discovered
/// from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Config name, also the file stem on disk.
    pub name: String,
    /// Renderer plugin tag.
    pub renderer: Option<String>,
    /// Channels in priority order.
    pub channels: Vec<ConfigChannel>,
}

impl Config {
    /// Create an empty config.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style channel append.
    pub fn with_channel(mut self, channel: ConfigChannel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Any channel pattern references `$mesh`.
    pub fn has_mesh(&self) -> bool {
        self.channels.iter().any(|c| c.references(Token::Mesh))
    }

    /// Any channel pattern references `$material`.
    pub fn has_material(&self) -> bool {
        self.channels.iter().any(|c| c.references(Token::Material))
    }

    /// File name for this config: sanitized name plus `.json`.
    pub fn file_name(&self) -> String {
        format!("{}.json", sanitize_file_stem(&self.name))
    }

    /// Load a config file, failing on I/O or parse errors.
    ///
    /// A missing or empty `name` defaults to the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let value: serde_json::Value = serde_json::from_str(&text)?;
        if !value.is_object() {
            return Err(Error::invalid_config(path, "top level is not an object"));
        }
        let mut config: Config = serde_json::from_value(value)?;

        if config.name.is_empty() {
            config.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(config)
    }

    /// Load a config file, logging and returning `None` if it is unusable.
    pub fn from_json(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::error!("Could not load config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write this config as pretty JSON.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write this config into `dir` under [`Config::file_name`].
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        self.to_json(&path)?;
        Ok(path)
    }

    /// Load every `*.json` config in a directory, skipping unusable files.
    ///
    /// Configs are sorted by name, case-insensitively and ignoring spaces.
    pub fn load_dir(dir: impl AsRef<Path>) -> Vec<Self> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Could not read config directory {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut configs: Vec<Config> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(Self::from_json)
            .collect();

        configs.sort_by_cached_key(|c| sort_key(&c.name));
        configs
    }
}

/// Replace characters that are not allowed in file names.
pub fn sanitize_file_stem(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let sanitized = sanitized.trim_end_matches(['.', ' ']);
    if sanitized.is_empty() {
        "config".to_string()
    } else {
        sanitized.to_string()
    }
}

fn sort_key(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Config {
        Config::new("Arnold PBR")
            .with_channel(ConfigChannel::new("baseColor", "$mesh_$material_BaseColor.$udim.png", "sRGB"))
            .with_channel(ConfigChannel::new("specularRoughness", "$mesh_$material_Roughness.$udim.png", "Raw"))
    }

    #[test]
    fn test_predicates() {
        let config = sample();
        assert!(config.has_mesh());
        assert!(config.has_material());

        let config = Config::new("flat").with_channel(ConfigChannel::new("baseColor", "diffuse.png", "sRGB"));
        assert!(!config.has_mesh());
        assert!(!config.has_material());
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(sample().file_name(), "Arnold PBR.json");
        assert_eq!(Config::new("a/b:c*").file_name(), "a_b_c_.json");
        assert_eq!(Config::new("  ").file_name(), "config.json");
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            renderer: Some("arnold".into()),
            ..sample()
        };
        let path = config.save_in(dir.path()).unwrap();
        assert!(path.ends_with("Arnold PBR.json"));

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_name_defaults_to_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vray.json");
        fs::write(
            &path,
            r#"{"renderer": null, "channels": [{"attribute": "Diffuse", "pattern": "$material_diff.png"}]}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.name, "vray");
        assert_eq!(config.renderer, None);
        assert_eq!(config.channels.len(), 1);
        assert_eq!(config.channels[0].colorspace, "");
    }

    #[test]
    fn test_malformed_json_is_none() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(Config::from_json(&broken).is_none());

        let list = dir.path().join("list.json");
        fs::write(&list, "[1, 2, 3]").unwrap();
        assert!(matches!(Config::load(&list), Err(Error::InvalidConfig { .. })));
        assert!(Config::from_json(&list).is_none());
    }

    #[test]
    fn test_load_dir_skips_and_sorts() {
        let dir = TempDir::new().unwrap();
        Config::new("beta").save_in(dir.path()).unwrap();
        Config::new("Alpha Two").save_in(dir.path()).unwrap();
        Config::new("alpha").save_in(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), "nope").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = Config::load_dir(dir.path()).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alpha", "Alpha Two", "beta"]);
    }

    #[test]
    fn test_load_dir_missing() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_dir(dir.path().join("missing")).is_empty());
    }
}
