//! # Texture Importer
//!
//! Infers texture shading networks from filename patterns.
//!
//! A [`Config`](config::Config) lists channels such as
//! `baseColor <- $mesh_$material_BaseColor.$udim.png`. Scanning a texture
//! directory with it discovers which materials exist per mesh and which
//! file feeds which shading attribute, producing one
//! [`Network`](network::Network) per mesh/material pair. Building the actual
//! shading nodes is left to a host plugin.
//!
//! ## Modules
//!
//! - [`util`] - Error handling
//! - [`pattern`] - Channel pattern expansion (optional groups, placeholders, UDIM)
//! - [`locator`] - Filesystem globbing
//! - [`config`] - Channel configs and persisted settings
//! - [`naming`] - Node naming templates
//! - [`host`] - Host application traits and plugin registry
//! - [`network`] - Network data model and builder
//!
//! ## Example
//!
//! ```ignore
//! use texture_importer::prelude::*;
//!
//! let config = Config::load("configs/arnold.json")?;
//! let host = OfflineHost::new().with_mesh(Mesh::from_path("|chair"));
//! let settings = Settings::load();
//!
//! let builder = NetworkBuilder::new(&host, &host, &settings);
//! for network in builder.get_networks("sourceimages", &config, false)? {
//!     println!("{}", network.material_node_name);
//! }
//! ```

pub mod util;
pub mod pattern;
pub mod locator;
pub mod config;
pub mod naming;
pub mod host;
pub mod network;

// Re-export commonly used types
pub use util::{Error, Result};
pub use config::{Config, ConfigChannel, Settings};
pub use network::{Network, NetworkBuilder, NetworkChannel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::config::{Config, ConfigChannel, Settings};
    pub use crate::host::{
        HostPlugin, Mesh, MeshSelectionProvider, NetworkConsumer, NodeExistencePredicate,
        OfflineHost, Registry,
    };
    pub use crate::locator::FileLocator;
    pub use crate::naming::{MemoryStore, NamingResolver, TemplateStore};
    pub use crate::network::{Network, NetworkBuilder, NetworkChannel, Scan};
    pub use crate::pattern::{glob_patterns, regex_patterns, Tokens};
}
