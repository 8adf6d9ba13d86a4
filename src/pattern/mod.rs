//! Channel pattern resolution.
//!
//! A channel pattern is a filename template such as
//! `$mesh_$material_(BaseColor|Albedo).$udim.png`. This module expands it
//! into concrete search patterns:
//!
//! - **Optional groups**: every parenthesized group `(a|b)` is an
//!   alternation that always includes the empty alternative, so `(x)` is
//!   read as `(x|)`. A pattern with k groups expands to the cartesian
//!   product of their alternatives.
//! - **Placeholders**: `$mesh`, `$material` and `$udim` are substituted after
//!   group expansion. A placeholder with no value is left as literal text.
//! - **Glob form** ([`glob_patterns`]) is used to search the filesystem.
//! - **Regex form** ([`regex_patterns`]) is used to re-match found files and
//!   capture the material name.
//!
//! ## Example
//!
//! ```
//! use texture_importer::pattern::{glob_patterns, Tokens};
//!
//! let patterns = glob_patterns("tex_(A|B)_$mesh.png", &Tokens::glob().mesh("chair"));
//! assert_eq!(patterns, vec!["tex_A_chair.png", "tex_B_chair.png", "tex__chair.png"]);
//! ```

mod glob;
mod resolve;
mod udim;

pub use glob::*;
pub use resolve::*;
pub use udim::*;

/// Mesh placeholder token.
pub const MESH_TOKEN: &str = "$mesh";

/// Material placeholder token.
pub const MATERIAL_TOKEN: &str = "$material";

/// UDIM tile placeholder token.
pub const UDIM_TOKEN: &str = "$udim";

/// Default glob wildcard for `$mesh` and `$material`.
pub const WILDCARD: &str = "*";

/// Default `$udim` substitution: exactly four digits.
pub const UDIM_GLOB: &str = "[0-9][0-9][0-9][0-9]";

/// Default regex substitution for `$material`: a non-greedy word capture.
pub const MATERIAL_CAPTURE: &str = r"(\w+?)";

/// Marker that replaces the tile index in resolved UDIM file paths.
pub const UDIM_MARKER: &str = "<UDIM>";
