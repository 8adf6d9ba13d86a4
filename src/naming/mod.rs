//! Node naming templates.
//!
//! Node names are built from user-editable templates such as `{}_mat`. The
//! templates live in a [`TemplateStore`] (the persisted settings, or an
//! in-memory store in tests) and are looked up on every call, so edits
//! take effect immediately.
//!
//! [`NamingResolver::reverse`] inverts a template: it recognises a string
//! that already looks like a generated name and recovers the identity it
//! was built from.

mod resolver;
mod store;

pub use resolver::*;
pub use store::*;

/// Template key for material nodes.
pub const MATERIAL_NODE_PATTERN: &str = "material_node_pattern";

/// Template key for file texture nodes.
pub const FILE_NODE_PATTERN: &str = "file_node_pattern";

/// Template key for shading engine / shading group nodes.
pub const SHADINGENGINE_NODE_PATTERN: &str = "shadingengine_node_pattern";

/// Template key for 2d placement nodes.
pub const PLACE_NODE_PATTERN: &str = "place_node_pattern";

/// Template key for normal map nodes.
pub const NORMAL_NODE_PATTERN: &str = "normal_node_pattern";

/// Key for the material name used when a config has neither `$mesh` nor
/// `$material`. The value is a plain name, not a template.
pub const DEFAULT_NAME: &str = "default_name";
