//! Channel configs and importer settings.
//!
//! A [`Config`] is the declarative input of a scan: an ordered list of
//! [`ConfigChannel`]s, each binding a filename pattern to a shading
//! attribute. Configs are stored one per JSON file:
//!
//! ```json
//! {
//!     "name": "arnold",
//!     "renderer": "arnold",
//!     "channels": [
//!         {"attribute": "baseColor", "pattern": "$mesh_$material_BaseColor.$udim.png", "colorspace": "sRGB"}
//!     ]
//! }
//! ```
//!
//! [`Settings`] persists everything else between sessions, including the
//! naming templates.

mod model;
mod settings;

pub use model::*;
pub use settings::Settings;
