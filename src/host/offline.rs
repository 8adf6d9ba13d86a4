//! Host without a 3D application.
//!
//! Holds a fixed selection and a set of node names, and records networks
//! instead of building nodes. Used by the command-line tool and tests.

use std::collections::BTreeSet;

use super::{HostPlugin, Mesh, MeshSelectionProvider, NetworkConsumer, NodeExistencePredicate};
use crate::network::Network;
use crate::util::Result;

/// In-memory host.
#[derive(Clone, Debug, Default)]
pub struct OfflineHost {
    selection: Vec<Mesh>,
    nodes: BTreeSet<String>,
    created: Vec<Network>,
}

impl OfflineHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: select a mesh.
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.selection.push(mesh);
        self
    }

    /// Builder-style: mark a node name as existing.
    pub fn with_node(mut self, name: impl Into<String>) -> Self {
        self.nodes.insert(name.into());
        self
    }

    /// Replace the selection.
    pub fn select(&mut self, meshes: impl IntoIterator<Item = Mesh>) {
        self.selection = meshes.into_iter().collect();
    }

    /// Networks recorded by [`NetworkConsumer::create_network`].
    pub fn created(&self) -> &[Network] {
        &self.created
    }

    /// All existing node names.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }
}

impl MeshSelectionProvider for OfflineHost {
    fn meshes(&self) -> Vec<Mesh> {
        self.selection.clone()
    }
}

impl NodeExistencePredicate for OfflineHost {
    fn exists(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }
}

impl NetworkConsumer for OfflineHost {
    fn create_network(&mut self, network: &Network) -> Result<()> {
        self.nodes.insert(network.material_node_name.clone());
        for channel in network.resolved_channels() {
            self.nodes.insert(channel.file_node_name.clone());
        }
        tracing::debug!(
            "Recorded network {} ({} channels)",
            network.material_node_name,
            network.resolved_channels().count()
        );
        self.created.push(network.clone());
        Ok(())
    }
}

impl HostPlugin for OfflineHost {
    fn display_name(&self) -> &str {
        "Offline"
    }
}
