//! Naming template storage.

use std::collections::HashMap;

use super::{
    DEFAULT_NAME, FILE_NODE_PATTERN, MATERIAL_NODE_PATTERN, NORMAL_NODE_PATTERN,
    PLACE_NODE_PATTERN, SHADINGENGINE_NODE_PATTERN,
};

/// Built-in templates, used when a store has no value for a key.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (MATERIAL_NODE_PATTERN, "{}_mat"),
    (FILE_NODE_PATTERN, "{}_tex"),
    (SHADINGENGINE_NODE_PATTERN, "{}_sg"),
    (PLACE_NODE_PATTERN, "{}_place"),
    (NORMAL_NODE_PATTERN, "{}_normal"),
    (DEFAULT_NAME, "default"),
];

/// Built-in template for a key.
pub fn default_template(key: &str) -> Option<&'static str> {
    DEFAULT_TEMPLATES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Key/value store holding the live naming templates.
pub trait TemplateStore {
    /// Get the stored template for a key.
    fn template(&self, key: &str) -> Option<String>;

    /// Store a template for a key.
    fn set_template(&mut self, key: &str, template: &str);
}

/// In-memory template store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    templates: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store (every key falls back to its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, template: &str) -> Self {
        self.set_template(key, template);
        self
    }
}

impl TemplateStore for MemoryStore {
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

    #[test]
    fn test_defaults() {
        assert_eq!(default_template(MATERIAL_NODE_PATTERN), Some("{}_mat"));
        assert_eq!(default_template(DEFAULT_NAME), Some("default"));
        assert_eq!(default_template("unknown"), None);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.template(FILE_NODE_PATTERN), None);
        store.set_template(FILE_NODE_PATTERN, "tex_{}");
        assert_eq!(store.template(FILE_NODE_PATTERN).as_deref(), Some("tex_{}"));
    }
}
