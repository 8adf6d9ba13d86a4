//! Host application integration.
//!
//! The importer never talks to a 3D application directly. Everything it
//! needs from the host goes through these traits:
//!
//! - [`MeshSelectionProvider`] - the current selection, for `$mesh` configs
//! - [`NodeExistencePredicate`] - whether a node name is already taken
//! - [`NetworkConsumer`] - builds shading nodes from a resolved [`Network`]
//!
//! [`HostPlugin`] bundles all three with the lists a config editor needs.
//! Plugins are looked up by `(dcc, renderer)` in a [`Registry`].

mod offline;
mod registry;

pub use offline::*;
pub use registry::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::util::Result;

/// A selected mesh.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mesh {
    /// Short name, substituted for `$mesh`.
    pub name: String,
    /// Full host path (e.g. a Maya DAG path).
    pub path: String,
}

impl Mesh {
    /// Create a mesh with an explicit short name.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a mesh from a `|`-separated host path.
    ///
    /// The short name is the last path component.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .rsplit('|')
            .find(|part| !part.is_empty())
            .unwrap_or(&path)
            .to_string();
        Self { name, path }
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Source of the meshes selected in the host.
pub trait MeshSelectionProvider {
    /// Selected meshes, in selection order.
    fn meshes(&self) -> Vec<Mesh>;
}

impl MeshSelectionProvider for Vec<Mesh> {
    fn meshes(&self) -> Vec<Mesh> {
        self.clone()
    }
}

impl MeshSelectionProvider for [Mesh] {
    fn meshes(&self) -> Vec<Mesh> {
        self.to_vec()
    }
}

/// Answers whether a node name already exists in the host scene.
pub trait NodeExistencePredicate {
    /// Whether a node called `name` exists.
    fn exists(&self, name: &str) -> bool;
}

impl<F> NodeExistencePredicate for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, name: &str) -> bool {
        self(name)
    }
}

/// Creates host nodes from resolved networks.
pub trait NetworkConsumer {
    /// Build the material, file and utility nodes for a network.
    fn create_network(&mut self, network: &Network) -> Result<()>;
}

/// A host/renderer integration.
pub trait HostPlugin: MeshSelectionProvider + NodeExistencePredicate + NetworkConsumer {
    /// Name shown in renderer pickers.
    fn display_name(&self) -> &str;

    /// Shading attributes the renderer's material exposes.
    fn attributes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Colorspaces offered for texture files.
    fn colorspaces(&self) -> Vec<String> {
        Vec::new()
    }
}
