//! Plugin lookup by host application and renderer.

use std::collections::BTreeMap;

use super::{HostPlugin, OfflineHost};
use crate::util::{Error, Result};

/// Creates a plugin instance.
pub type PluginFactory = fn() -> Box<dyn HostPlugin>;

/// Registry of `(dcc, renderer)` plugin factories.
///
/// A plugin registered without a renderer is the dcc's base plugin, used
/// when no renderer-specific plugin exists.
#[derive(Clone, Default)]
pub struct Registry {
    plugins: BTreeMap<(String, String), PluginFactory>,
}

impl Registry {
    /// Dcc name of the built-in offline host.
    pub const OFFLINE: &'static str = "offline";

    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in plugins.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Self::OFFLINE, None, || Box::new(OfflineHost::new()));
        registry
    }

    /// Register a plugin for a dcc, optionally specific to a renderer.
    pub fn register(&mut self, dcc: &str, renderer: Option<&str>, factory: PluginFactory) {
        let key = (dcc.to_string(), renderer.unwrap_or_default().to_string());
        if self.plugins.insert(key, factory).is_some() {
            tracing::debug!("Replaced plugin {}/{}", dcc, renderer.unwrap_or("-"));
        }
    }

    /// Create the plugin registered for exactly `(dcc, renderer)`.
    pub fn get(&self, dcc: &str, renderer: Option<&str>) -> Result<Box<dyn HostPlugin>> {
        let renderer = renderer.unwrap_or_default();
        self.plugins
            .get(&(dcc.to_string(), renderer.to_string()))
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownPlugin {
                dcc: dcc.to_string(),
                renderer: renderer.to_string(),
            })
    }

    /// Create the best plugin for `(dcc, renderer)`.
    ///
    /// Falls back to the dcc's base plugin, then to [`OfflineHost`].
    pub fn resolve(&self, dcc: &str, renderer: Option<&str>) -> Box<dyn HostPlugin> {
        match self.get(dcc, renderer) {
            Ok(plugin) => plugin,
            Err(e) => {
                tracing::error!("{}", e);
                self.get(dcc, None).unwrap_or_else(|_| {
                    tracing::error!("Could not find plugin, using no plugin instead (dcc: {})", dcc);
                    Box::new(OfflineHost::new())
                })
            }
        }
    }

    /// Registered dcc names, sorted.
    pub fn dccs(&self) -> Vec<&str> {
        let mut dccs: Vec<&str> = self.plugins.keys().map(|(dcc, _)| dcc.as_str()).collect();
        dccs.dedup();
        dccs
    }

    /// Renderers registered for a dcc, sorted.
    pub fn renderers(&self, dcc: &str) -> Vec<&str> {
        self.plugins
            .keys()
            .filter(|(d, r)| d == dcc && !r.is_empty())
            .map(|(_, r)| r.as_str())
            .collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.plugins.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Mesh, MeshSelectionProvider, NetworkConsumer, NodeExistencePredicate};
    use crate::network::Network;

    struct FakeArnold;

    impl MeshSelectionProvider for FakeArnold {
        fn meshes(&self) -> Vec<Mesh> {
            vec![Mesh::from_path("|pCube1")]
        }
    }

    impl NodeExistencePredicate for FakeArnold {
        fn exists(&self, _name: &str) -> bool {
            false
        }
    }

    impl NetworkConsumer for FakeArnold {
        fn create_network(&mut self, _network: &Network) -> Result<()> {
            Ok(())
        }
    }

    impl HostPlugin for FakeArnold {
        fn display_name(&self) -> &str {
            "Arnold"
        }

        fn attributes(&self) -> Vec<String> {
            vec!["baseColor".into(), "specularRoughness".into(), "normalCamera".into()]
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::with_builtin();
        registry.register("maya", None, || Box::new(OfflineHost::new()));
        registry.register("maya", Some("arnold"), || Box::new(FakeArnold));
        registry
    }

    #[test]
    fn test_listing() {
        let registry = registry();
        assert_eq!(registry.dccs(), vec!["maya", "offline"]);
        assert_eq!(registry.renderers("maya"), vec!["arnold"]);
        assert!(registry.renderers("offline").is_empty());
    }

    #[test]
    fn test_get_exact() {
        let registry = registry();
        let plugin = registry.get("maya", Some("arnold")).unwrap();
        assert_eq!(plugin.display_name(), "Arnold");
        assert_eq!(plugin.attributes().len(), 3);
        assert_eq!(plugin.meshes()[0].name, "pCube1");

        assert!(matches!(
            registry.get("maya", Some("redshift")),
            Err(Error::UnknownPlugin { .. })
        ));
    }

    #[test]
    fn test_resolve_fallbacks() {
        let registry = registry();
        assert_eq!(registry.resolve("maya", Some("arnold")).display_name(), "Arnold");
        // Unknown renderer -> dcc base plugin
        assert_eq!(registry.resolve("maya", Some("vray")).display_name(), "Offline");
        // Unknown dcc -> offline host
        assert_eq!(registry.resolve("max", Some("vray")).display_name(), "Offline");
    }
}
