//! Template expansion and placeholder substitution.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use super::glob::{glob_to_regex, GlobFlavor};
use super::{MATERIAL_CAPTURE, MATERIAL_TOKEN, MESH_TOKEN, UDIM_GLOB, UDIM_TOKEN, WILDCARD};

/// A group without alternation, e.g. `(x)`.
static SINGLE_GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^|]+?)\)").unwrap());

/// Any parenthesized group, non-greedy.
static GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.+?\)").unwrap());

/// Placeholder token in a channel pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// `$mesh`
    Mesh,
    /// `$material`
    Material,
    /// `$udim`
    Udim,
}

impl Token {
    /// All tokens, in substitution order.
    pub const ALL: [Token; 3] = [Token::Mesh, Token::Material, Token::Udim];

    /// Literal text of the token.
    pub fn as_str(self) -> &'static str {
        match self {
            Token::Mesh => MESH_TOKEN,
            Token::Material => MATERIAL_TOKEN,
            Token::Udim => UDIM_TOKEN,
        }
    }
}

/// Check whether a pattern references a placeholder token.
pub fn references(pattern: &str, token: Token) -> bool {
    pattern.contains(token.as_str())
}

/// Values substituted for the placeholder tokens.
///
/// A `None` (or empty) value leaves the token's literal text in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Value for `$mesh`.
    pub mesh: Option<String>,
    /// Value for `$material`.
    pub material: Option<String>,
    /// Value for `$udim`.
    pub udim: Option<String>,
}

impl Tokens {
    /// No substitutions at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Defaults for filesystem globbing: wildcard mesh and material,
    /// four-digit udim.
    pub fn glob() -> Self {
        Self {
            mesh: Some(WILDCARD.to_string()),
            material: Some(WILDCARD.to_string()),
            udim: Some(UDIM_GLOB.to_string()),
        }
    }

    /// Defaults for regex re-matching: wildcard mesh, capturing material,
    /// four-digit udim.
    pub fn regex() -> Self {
        Self {
            mesh: Some(WILDCARD.to_string()),
            material: Some(MATERIAL_CAPTURE.to_string()),
            udim: Some(UDIM_GLOB.to_string()),
        }
    }

    /// Set the `$mesh` value.
    pub fn mesh(mut self, mesh: impl Into<String>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    /// Set or clear the `$mesh` value.
    pub fn with_mesh(mut self, mesh: Option<&str>) -> Self {
        self.mesh = mesh.map(str::to_string);
        self
    }

    /// Set the `$material` value.
    pub fn material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set or clear the `$material` value.
    pub fn with_material(mut self, material: Option<&str>) -> Self {
        self.material = material.map(str::to_string);
        self
    }

    /// Set the `$udim` value.
    pub fn udim(mut self, udim: impl Into<String>) -> Self {
        self.udim = Some(udim.into());
        self
    }

    /// Value for a token, if one was supplied and is non-empty.
    pub fn get(&self, token: Token) -> Option<&str> {
        let value = match token {
            Token::Mesh => &self.mesh,
            Token::Material => &self.material,
            Token::Udim => &self.udim,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Piece of an expanded pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Token),
}

/// Expand the optional groups of a pattern.
///
/// Every group contributes its alternatives plus the empty alternative, and
/// the result is their cartesian product with the first group varying
/// slowest. Replacement is textual: if a group's text occurs more than once,
/// every occurrence takes the same alternative. Unbalanced parentheses are
/// left as literal text.
pub fn expand_groups(pattern: &str) -> Vec<String> {
    let normalized = SINGLE_GROUP_RE.replace_all(pattern, "(${1}|)");

    let groups: Vec<(&str, SmallVec<[&str; 4]>)> = GROUP_RE
        .find_iter(&normalized)
        .map(|m| {
            let key = m.as_str();
            let mut alternatives: SmallVec<[&str; 4]> = key[1..key.len() - 1].split('|').collect();
            if !alternatives.iter().any(|a| a.is_empty()) {
                alternatives.push("");
            }
            (key, alternatives)
        })
        .collect();

    let mut resolved = vec![normalized.to_string()];
    for (key, alternatives) in &groups {
        resolved = resolved
            .iter()
            .flat_map(|partial| alternatives.iter().map(move |alt| partial.replace(key, alt)))
            .collect();
    }
    resolved
}

/// Resolve a pattern into glob patterns, one per group combination.
///
/// Order is deterministic: callers rely on "first pattern with a match wins".
pub fn glob_patterns(pattern: &str, tokens: &Tokens) -> Vec<String> {
    expand_groups(pattern)
        .iter()
        .map(|expanded| render_glob(expanded, tokens))
        .collect()
}

/// Resolve a pattern into regex patterns, one per group combination.
///
/// Literal text, `$mesh` and `$udim` values are treated as glob text and
/// translated (`.` becomes a literal dot, `*` one or more word characters).
/// The `$material` value is inserted verbatim as a regex fragment, by
/// default [`MATERIAL_CAPTURE`]. The returned patterns are unanchored.
pub fn regex_patterns(pattern: &str, tokens: &Tokens) -> Vec<String> {
    expand_groups(pattern)
        .iter()
        .map(|expanded| render_regex(expanded, tokens))
        .collect()
}

/// Resolve a single, group-free pattern with explicit substitutions.
pub fn resolve_pattern(pattern: &str, tokens: &Tokens) -> String {
    render_glob(pattern, tokens)
}

fn render_glob(expanded: &str, tokens: &Tokens) -> String {
    let mut out = String::with_capacity(expanded.len());
    for segment in segments(expanded) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(token) => out.push_str(tokens.get(token).unwrap_or(token.as_str())),
        }
    }
    out
}

fn render_regex(expanded: &str, tokens: &Tokens) -> String {
    let mut out = String::with_capacity(expanded.len() * 2);
    for segment in segments(expanded) {
        match segment {
            Segment::Literal(text) => out.push_str(&glob_to_regex(text, GlobFlavor::Word)),
            Segment::Placeholder(Token::Material) => match tokens.get(Token::Material) {
                Some(fragment) => out.push_str(fragment),
                None => out.push_str(&regex::escape(MATERIAL_TOKEN)),
            },
            Segment::Placeholder(token) => {
                let text = tokens.get(token).unwrap_or(token.as_str());
                out.push_str(&glob_to_regex(text, GlobFlavor::Word));
            }
        }
    }
    out
}

/// Split an expanded pattern into literal text and placeholder tokens.
fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while let Some(offset) = s[i..].find('$') {
        let at = i + offset;
        match Token::ALL.iter().find(|t| s[at..].starts_with(t.as_str())) {
            Some(&token) => {
                if literal_start < at {
                    out.push(Segment::Literal(&s[literal_start..at]));
                }
                out.push(Segment::Placeholder(token));
                i = at + token.as_str().len();
                literal_start = i;
            }
            None => i = at + 1,
        }
    }
    if literal_start < s.len() {
        out.push(Segment::Literal(&s[literal_start..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_group_gains_empty_alternative() {
        assert_eq!(expand_groups("a(x)b"), vec!["axb", "ab"]);
        assert_eq!(expand_groups("a(x|)b"), vec!["axb", "ab"]);
    }

    #[test]
    fn test_group_cardinality() {
        let p = glob_patterns("tex_(A|B)_$mesh", &Tokens::none());
        assert_eq!(p, vec!["tex_A_$mesh", "tex_B_$mesh", "tex__$mesh"]);

        // 3 x 2 x 4
        let p = expand_groups("(a|b)_(c)_(d|e|f).png");
        assert_eq!(p.len(), 24);
        assert_eq!(p[0], "a_c_d.png");
        assert_eq!(p[1], "a_c_e.png");
        assert_eq!(p[3], "a_c_.png");
        assert_eq!(p[23], "__.png");
    }

    #[test]
    fn test_no_groups() {
        assert_eq!(expand_groups("plain.png"), vec!["plain.png"]);
        assert_eq!(expand_groups(""), vec![""]);
    }

    #[test]
    fn test_repeated_group_is_textual() {
        // Both occurrences take the same alternative; the second group key is
        // already gone, so its alternatives only produce repeats.
        let p = expand_groups("(a)_(a)");
        assert_eq!(p.len(), 4);
        assert_eq!(p, vec!["a_a", "a_a", "_", "_"]);
    }

    #[test]
    fn test_unbalanced_groups_stay_literal() {
        assert_eq!(expand_groups("tex_(A|B.png"), vec!["tex_(A|B.png"]);
        let p = regex_patterns("tex_(A|B.png", &Tokens::regex());
        assert_eq!(p.len(), 1);
        assert!(Regex::new(&p[0]).is_ok());
    }

    #[test]
    fn test_placeholder_substitution() {
        let tokens = Tokens::glob().mesh("chair").material("wood");
        assert_eq!(
            resolve_pattern("$mesh_$material.$udim.png", &tokens),
            "chair_wood.[0-9][0-9][0-9][0-9].png"
        );
    }

    #[test]
    fn test_missing_value_keeps_token() {
        let tokens = Tokens::glob().with_mesh(None);
        assert_eq!(resolve_pattern("$mesh_$material.png", &tokens), "$mesh_*.png");

        let tokens = Tokens::glob().mesh("");
        assert_eq!(resolve_pattern("$mesh.png", &tokens), "$mesh.png");
    }

    #[test]
    fn test_placeholder_inside_group() {
        let p = glob_patterns("tex(_$udim).png", &Tokens::glob());
        assert_eq!(p, vec!["tex_[0-9][0-9][0-9][0-9].png", "tex.png"]);
    }

    #[test]
    fn test_regex_pattern_captures_material() {
        let p = regex_patterns("$mesh_$material_diff.$udim.png", &Tokens::regex().mesh("chair"));
        assert_eq!(p, vec![r"chair_(\w+?)_diff\.[0-9][0-9][0-9][0-9]\.png"]);

        let re = Regex::new(&format!("^{}$", p[0])).unwrap();
        let caps = re.captures("chair_wood_diff.1001.png").unwrap();
        assert_eq!(&caps[1], "wood");
    }

    #[test]
    fn test_regex_wildcard_literal() {
        let p = regex_patterns("*_$material.png", &Tokens::regex());
        assert_eq!(p, vec![r"\w+_(\w+?)\.png"]);
    }

    #[test]
    fn test_regex_mesh_is_escaped() {
        let p = regex_patterns("$mesh.$material.png", &Tokens::regex().mesh("chair.001"));
        assert_eq!(p, vec![r"chair\.001\.(\w+?)\.png"]);
    }

    #[test]
    fn test_references() {
        assert!(references("$mesh_color.png", Token::Mesh));
        assert!(!references("$mesh_color.png", Token::Material));
        assert!(references("x.$udim.exr", Token::Udim));
    }

    #[test]
    fn test_dollar_without_token() {
        let p = glob_patterns("$price_$material.png", &Tokens::glob());
        assert_eq!(p, vec!["$price_*.png"]);
    }
}
