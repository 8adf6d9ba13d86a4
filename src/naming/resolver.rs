//! Template formatting and reverse matching.

use regex::Regex;
use thiserror::Error;

use super::{
    default_template, TemplateStore, DEFAULT_NAME, FILE_NODE_PATTERN, MATERIAL_NODE_PATTERN,
    NORMAL_NODE_PATTERN, PLACE_NODE_PATTERN, SHADINGENGINE_NODE_PATTERN,
};

/// Characters accepted as an identity when reverse matching a name.
const IDENTITY_CAPTURE: &str = r"([\w\-. ]+)";

/// Malformed naming template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `{` without a matching `}`
    #[error("unmatched '{{' at offset {0}")]
    UnmatchedOpen(usize),

    /// `}` outside a field
    #[error("single '}}' at offset {0}")]
    UnmatchedClose(usize),

    /// Field that is neither `{}` nor `{N}`
    #[error("unsupported field '{{{0}}}'")]
    UnsupportedField(String),

    /// Mixing `{}` and `{N}` fields
    #[error("cannot mix automatic and manual field numbering")]
    MixedNumbering,

    /// Field refers to a part that was not supplied
    #[error("field {index} but only {count} parts")]
    MissingPart { index: usize, count: usize },
}

/// Parsed template piece.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Field(usize),
}

fn parse_template(template: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut auto = 0usize;
    let mut numbering: Option<bool> = None; // Some(true) = automatic
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if let Some(&(_, '{')) = chars.peek() {
                    chars.next();
                    text.push('{');
                    continue;
                }

                let mut field = String::new();
                let mut closed = false;
                for (_, fc) in chars.by_ref() {
                    if fc == '}' {
                        closed = true;
                        break;
                    }
                    field.push(fc);
                }
                if !closed {
                    return Err(TemplateError::UnmatchedOpen(pos));
                }

                let is_auto = field.is_empty();
                if *numbering.get_or_insert(is_auto) != is_auto {
                    return Err(TemplateError::MixedNumbering);
                }
                let index = if is_auto {
                    auto += 1;
                    auto - 1
                } else {
                    field
                        .parse::<usize>()
                        .map_err(|_| TemplateError::UnsupportedField(field.clone()))?
                };

                if !text.is_empty() {
                    pieces.push(Piece::Text(std::mem::take(&mut text)));
                }
                pieces.push(Piece::Field(index));
            }
            '}' => {
                if let Some(&(_, '}')) = chars.peek() {
                    chars.next();
                    text.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClose(pos));
                }
            }
            c => text.push(c),
        }
    }
    if !text.is_empty() {
        pieces.push(Piece::Text(text));
    }
    Ok(pieces)
}

/// Format a template with positional parts.
///
/// `{}` takes the next part, `{N}` part N, `{{` and `}}` are literal braces.
/// Parts without a field are ignored.
pub fn format_template(template: &str, parts: &[&str]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + parts.iter().map(|p| p.len()).sum::<usize>());
    for piece in parse_template(template)? {
        match piece {
            Piece::Text(text) => out.push_str(&text),
            Piece::Field(index) => {
                let part = parts.get(index).ok_or(TemplateError::MissingPart {
                    index,
                    count: parts.len(),
                })?;
                out.push_str(part);
            }
        }
    }
    Ok(out)
}

/// Build the anchored regex that recognises names generated by a template.
///
/// Returns `None` unless the template has exactly one field.
pub fn reverse_regex(template: &str) -> Option<Regex> {
    let pieces = parse_template(template).ok()?;
    if pieces.iter().filter(|p| matches!(p, Piece::Field(_))).count() != 1 {
        return None;
    }

    let mut source = String::from("^");
    for piece in &pieces {
        match piece {
            Piece::Text(text) => source.push_str(&regex::escape(text)),
            Piece::Field(_) => source.push_str(IDENTITY_CAPTURE),
        }
    }
    source.push('$');
    Regex::new(&source).ok()
}

/// Turns identities into node names using the live templates of a store.
#[derive(Clone, Copy)]
pub struct NamingResolver<'a> {
    store: &'a dyn TemplateStore,
}

impl<'a> NamingResolver<'a> {
    /// Create a resolver over a template store.
    pub fn new(store: &'a dyn TemplateStore) -> Self {
        Self { store }
    }

    /// Live template for a key, falling back to the built-in default.
    pub fn template(&self, key: &str) -> Option<String> {
        self.store
            .template(key)
            .or_else(|| default_template(key).map(str::to_string))
    }

    /// Format the template for `key` with `parts`.
    ///
    /// Never fails: an unknown key or malformed template degrades to the
    /// parts joined by `_`.
    pub fn resolve(&self, key: &str, parts: &[&str]) -> String {
        let Some(template) = self.template(key) else {
            tracing::warn!("No naming template for {:?}, joining parts", key);
            return parts.join("_");
        };
        match format_template(&template, parts) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Bad naming template {:?} for {:?}: {}", template, key, e);
                parts.join("_")
            }
        }
    }

    /// Recover the identity from a name built with the template for `key`.
    ///
    /// Returns `None` if the candidate does not look like a generated name or
    /// the template does not have exactly one field.
    pub fn reverse(&self, key: &str, candidate: &str) -> Option<String> {
        let template = self.template(key)?;
        let Some(re) = reverse_regex(&template) else {
            tracing::debug!("Template {:?} for {:?} cannot be reversed", template, key);
            return None;
        };
        re.captures(candidate).map(|caps| caps[1].to_string())
    }

    /// Name used when there is neither a mesh nor a material.
    pub fn default_name(&self) -> String {
        self.template(DEFAULT_NAME)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "default".to_string())
    }

    /// Material node name for a material name.
    pub fn material_node_name(&self, material_name: &str) -> String {
        self.resolve(MATERIAL_NODE_PATTERN, &[material_name])
    }

    /// File node name for `{material_name}_{attribute}`.
    pub fn file_node_name(&self, material_name: &str, attribute: &str) -> String {
        let material_attribute = format!("{}_{}", material_name, attribute);
        self.resolve(FILE_NODE_PATTERN, &[&material_attribute])
    }

    /// Shading engine name for a material name.
    pub fn shading_engine_name(&self, material_name: &str) -> String {
        self.resolve(SHADINGENGINE_NODE_PATTERN, &[material_name])
    }

    /// Placement node name for a material name.
    pub fn place_node_name(&self, material_name: &str) -> String {
        self.resolve(PLACE_NODE_PATTERN, &[material_name])
    }

    /// Normal map node name for a material name.
    pub fn normal_node_name(&self, material_name: &str) -> String {
        self.resolve(NORMAL_NODE_PATTERN, &[material_name])
    }
}

impl std::fmt::Debug for NamingResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingResolver").finish_non_exhaustive()
    }
}
