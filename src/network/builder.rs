//! Network inference from a texture directory.
//!
//! Resolution runs in three nested passes:
//!
//! 1. **Meshes** - the host selection if any channel uses `$mesh`, otherwise
//!    a single pass without a mesh.
//! 2. **Materials** - captured from files matching the *first* channel that
//!    uses `$material`; other channels are not consulted. Without a
//!    `$material` channel there is a single pass without a material.
//! 3. **Channels** - for every (mesh, material) pair each channel takes the
//!    first expanded pattern that matches any file; lower-priority
//!    alternatives are never tried once one matches. Channels sharing an
//!    attribute collapse into one entry: the first that finds a file wins.
//!
//! The directory is listed once per [`Scan`]; every pattern is matched
//! against that listing.
//!
//! Pairs where no channel found a file are dropped.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::{Network, NetworkChannel};
use crate::config::{Config, ConfigChannel};
use crate::host::{Mesh, MeshSelectionProvider, NodeExistencePredicate};
use crate::locator::FileLocator;
use crate::naming::{NamingResolver, TemplateStore, MATERIAL_NODE_PATTERN};
use crate::pattern::{collapse_udim_path, glob_patterns, regex_patterns, Token, Tokens};
use crate::util::{Error, Result};

/// Builds [`Network`]s from a directory and a [`Config`].
///
/// The builder only holds the host collaborators; directory, config and
/// subfolder policy are passed per call, so one builder can serve any
/// number of independent scans.
pub struct NetworkBuilder<'a> {
    selection: &'a dyn MeshSelectionProvider,
    scene: &'a dyn NodeExistencePredicate,
    naming: NamingResolver<'a>,
}

impl<'a> NetworkBuilder<'a> {
    /// Create a builder.
    ///
    /// - `selection` supplies meshes for configs that use `$mesh`
    /// - `scene` answers whether a node name already exists
    /// - `templates` holds the live naming templates
    pub fn new(
        selection: &'a dyn MeshSelectionProvider,
        scene: &'a dyn NodeExistencePredicate,
        templates: &'a dyn TemplateStore,
    ) -> Self {
        Self {
            selection,
            scene,
            naming: NamingResolver::new(templates),
        }
    }

    /// Naming resolver used for node names.
    pub fn naming(&self) -> &NamingResolver<'a> {
        &self.naming
    }

    /// Start a scan of `path` with `config`.
    pub fn scan<'s>(&'s self, path: impl AsRef<Path>, config: &'s Config, include_subfolders: bool) -> Scan<'s> {
        Scan {
            selection: self.selection,
            scene: self.scene,
            naming: self.naming,
            config,
            locator: FileLocator::new(path, include_subfolders),
        }
    }

    /// Resolve every importable network under `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSelection`] if the config uses `$mesh` and nothing is
    ///   selected
    /// - [`Error::NotFound`] if a mesh yields no materials, no network has
    ///   any texture, or `path` cannot be read
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), config = %config.name))]
    pub fn get_networks(
        &self,
        path: impl AsRef<Path>,
        config: &Config,
        include_subfolders: bool,
    ) -> Result<Vec<Network>> {
        self.scan(path, config, include_subfolders).networks()
    }
}

impl std::fmt::Debug for NetworkBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkBuilder").finish_non_exhaustive()
    }
}

/// A single scan: one directory, one config.
pub struct Scan<'s> {
    selection: &'s dyn MeshSelectionProvider,
    scene: &'s dyn NodeExistencePredicate,
    naming: NamingResolver<'s>,
    config: &'s Config,
    locator: FileLocator,
}

impl<'s> Scan<'s> {
    /// Locator used for this scan.
    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }

    /// Meshes to resolve: the host selection, or a single `None` pass.
    pub fn meshes(&self) -> Result<Vec<Option<Mesh>>> {
        if !self.config.has_mesh() {
            return Ok(vec![None]);
        }

        let meshes = self.selection.meshes();
        if meshes.is_empty() {
            return Err(Error::NoSelection);
        }
        tracing::debug!("{} selected meshes", meshes.len());
        Ok(meshes.into_iter().map(Some).collect())
    }

    /// Materials for a mesh, in first-seen order, or a single `None` pass.
    ///
    /// Only the first channel referencing `$material` is used.
    pub fn materials(&self, mesh: Option<&Mesh>) -> Result<Vec<Option<String>>> {
        let Some(channel) = self
            .config
            .channels
            .iter()
            .find(|c| c.references(Token::Material))
        else {
            return Ok(vec![None]);
        };
        let mesh_name = mesh.map(|m| m.name.as_str());

        let mut files: Vec<PathBuf> = Vec::new();
        for pattern in glob_patterns(&channel.pattern, &Tokens::glob().with_mesh(mesh_name)) {
            files.extend(self.locator.glob(&pattern)?);
        }
        let relative: Vec<String> = files.iter().map(|f| self.locator.relative(f)).collect();

        let mut materials: Vec<String> = Vec::new();
        for re in material_regexes(channel, mesh_name) {
            for candidate in &relative {
                let Some(m) = re.captures(candidate).and_then(|caps| caps.get(1)) else {
                    continue;
                };
                if !materials.iter().any(|existing| existing == m.as_str()) {
                    materials.push(m.as_str().to_string());
                }
            }
        }

        if materials.is_empty() {
            return Err(Error::not_found(format!(
                "no materials found for {} with pattern {:?}",
                mesh_name.map(|m| format!("mesh {m}")).unwrap_or_else(|| "the current config".into()),
                channel.pattern
            )));
        }
        tracing::debug!("materials for {:?}: {:?}", mesh_name, materials);
        Ok(materials.into_iter().map(Some).collect())
    }

    /// Resolve the network for one (mesh, material) pair.
    ///
    /// Returns `None` if no channel found a texture file.
    pub fn network(&self, mesh: Option<&Mesh>, material: Option<&str>) -> Result<Option<Network>> {
        let mesh_name = mesh.map(|m| m.name.as_str());

        let identity: Vec<&str> = [mesh_name, material].into_iter().flatten().filter(|s| !s.is_empty()).collect();
        let mut material_name = if identity.is_empty() {
            self.naming.default_name()
        } else {
            identity.join("_")
        };

        // A name that already looks like a material node name is reused as
        // is, so re-importing into a named scene does not wrap it twice.
        let material_node_name = match self.naming.reverse(MATERIAL_NODE_PATTERN, &material_name) {
            Some(bare) => std::mem::replace(&mut material_name, bare),
            None => self.naming.material_node_name(&material_name),
        };

        let mut network = Network {
            mesh: mesh.cloned(),
            material: material.map(str::to_string),
            exists: self.scene.exists(&material_node_name),
            material_name,
            material_node_name,
            channels: Vec::with_capacity(self.config.channels.len()),
        };

        let tokens = Tokens::glob().with_mesh(mesh_name).with_material(material);
        for channel in &self.config.channels {
            // One entry per attribute; the first channel that resolves wins
            let earlier = network
                .channels
                .iter()
                .position(|c| c.attribute_name == channel.attribute);
            if let Some(index) = earlier {
                if network.channels[index].is_resolved() {
                    tracing::debug!(
                        "{}: {} already resolved, ignoring {:?}",
                        network.material_name,
                        channel.attribute,
                        channel.pattern
                    );
                    continue;
                }
            }

            let file_path = self.find_file(channel, &tokens)?;
            let resolved = self.network_channel(&network.material_name, channel, file_path);
            match earlier {
                Some(index) => network.channels[index] = resolved,
                None => network.channels.push(resolved),
            }
        }

        if network.is_empty() {
            tracing::debug!("Dropping {} (no textures)", network.material_name);
            return Ok(None);
        }
        Ok(Some(network))
    }

    /// Resolve every network of the scan.
    pub fn networks(&self) -> Result<Vec<Network>> {
        let mut networks = Vec::new();
        for mesh in self.meshes()? {
            for material in self.materials(mesh.as_ref())? {
                if let Some(network) = self.network(mesh.as_ref(), material.as_deref())? {
                    networks.push(network);
                }
            }
        }

        if networks.is_empty() {
            return Err(Error::not_found("no textures found to import with the current config"));
        }
        tracing::info!("Resolved {} networks", networks.len());
        Ok(networks)
    }

    /// First file of the first expanded pattern that matches anything.
    fn find_file(&self, channel: &ConfigChannel, tokens: &Tokens) -> Result<Option<PathBuf>> {
        for pattern in glob_patterns(&channel.pattern, tokens) {
            if let Some(file) = self.locator.glob(&pattern)?.into_iter().next() {
                tracing::trace!("{}: {:?} -> {}", channel.attribute, pattern, file.display());
                if channel.references(Token::Udim) {
                    return Ok(Some(collapse_udim_path(&file)));
                }
                return Ok(Some(file));
            }
        }
        Ok(None)
    }

    fn network_channel(
        &self,
        material_name: &str,
        channel: &ConfigChannel,
        file_path: Option<PathBuf>,
    ) -> NetworkChannel {
        let file_node_name = if file_path.is_some() {
            self.naming.file_node_name(material_name, &channel.attribute)
        } else {
            String::new()
        };
        let exists = !file_node_name.is_empty() && self.scene.exists(&file_node_name);

        NetworkChannel {
            attribute_name: channel.attribute.clone(),
            file_node_name,
            colorspace: channel.colorspace.clone(),
            file_path,
            exists,
        }
    }
}

/// Compile the material-capturing regexes for a channel.
///
/// Matched against root-relative paths, anchored at a path component
/// boundary and at the end.
fn material_regexes(channel: &ConfigChannel, mesh_name: Option<&str>) -> Vec<Regex> {
    regex_patterns(&channel.pattern, &Tokens::regex().with_mesh(mesh_name))
        .into_iter()
        .filter_map(|body| match Regex::new(&format!("(?:^|/)(?:{})$", body)) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Skipping material pattern {:?}: {}", body, e);
                None
            }
        })
        .collect()
}
