//! Texture networks.
//!
//! A [`Network`] is everything needed to build one material in the host:
//! the material identity, its node name, and one [`NetworkChannel`] per
//! config channel carrying the texture file that feeds it.
//!
//! ## Example
//!
//! ```ignore
//! use texture_importer::prelude::*;
//!
//! let host = OfflineHost::default();
//! let settings = Settings::load();
//! let builder = NetworkBuilder::new(&host, &host, &settings);
//!
//! for network in builder.get_networks("textures/", &config, false)? {
//!     println!("{} -> {}", network.material_name, network.material_node_name);
//!     for channel in network.resolved_channels() {
//!         println!("  {}: {}", channel.attribute_name, channel.file_path.as_ref().unwrap().display());
//!     }
//! }
//! ```

mod builder;

pub use builder::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::host::Mesh;
use crate::pattern::is_udim_path;

/// Resolved channels for one mesh/material identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Mesh this network was resolved for, if the config uses `$mesh`.
    pub mesh: Option<Mesh>,
    /// Material name captured from a filename, if the config uses `$material`.
    pub material: Option<String>,
    /// Identity used to build node names.
    pub material_name: String,
    /// Material node name in the host scene.
    pub material_node_name: String,
    /// Whether the material node already exists in the host scene.
    pub exists: bool,
    /// One entry per distinct config attribute, in config order.
    pub channels: Vec<NetworkChannel>,
}

impl Network {
    /// Channels that found a texture file.
    pub fn resolved_channels(&self) -> impl Iterator<Item = &NetworkChannel> {
        self.channels.iter().filter(|c| c.is_resolved())
    }

    /// Whether no channel found a texture file.
    pub fn is_empty(&self) -> bool {
        self.resolved_channels().next().is_none()
    }

    /// Look up a channel by attribute name.
    pub fn channel(&self, attribute: &str) -> Option<&NetworkChannel> {
        self.channels.iter().find(|c| c.attribute_name == attribute)
    }

    /// Mesh name, if any.
    pub fn mesh_name(&self) -> Option<&str> {
        self.mesh.as_ref().map(|m| m.name.as_str())
    }
}

/// One texture file feeding one shading attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkChannel {
    /// Shading attribute name.
    pub attribute_name: String,
    /// File node name, empty when no file was found (skip marker).
    pub file_node_name: String,
    /// Colorspace passed through from the config.
    pub colorspace: String,
    /// Absolute texture path; the tile index is replaced with `<UDIM>` for
    /// UDIM patterns.
    pub file_path: Option<PathBuf>,
    /// Whether the file node already exists in the host scene.
    pub exists: bool,
}

impl NetworkChannel {
    /// Whether a texture file was found for this channel.
    pub fn is_resolved(&self) -> bool {
        self.file_path.is_some() && !self.file_node_name.is_empty()
    }

    /// Whether the file path is a UDIM sequence.
    pub fn is_udim(&self) -> bool {
        self.file_path.as_deref().is_some_and(is_udim_path)
    }
}
