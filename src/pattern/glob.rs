//! Glob to regex translation.
//!
//! Supports `*`, `?` and `[...]` / `[!...]` character classes. Everything
//! else is matched literally. An unclosed `[` is a literal bracket.

use regex::Regex;

/// How glob wildcards are rendered in regex form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobFlavor {
    /// Filesystem semantics within one path component:
    /// `*` is any run of characters, `?` any single character.
    Path,
    /// Filename re-matching semantics: `*` is one or more word characters,
    /// `?` a single word character.
    Word,
}

impl GlobFlavor {
    fn star(self) -> &'static str {
        match self {
            GlobFlavor::Path => "[^/]*",
            GlobFlavor::Word => r"\w+",
        }
    }

    fn question(self) -> &'static str {
        match self {
            GlobFlavor::Path => "[^/]",
            GlobFlavor::Word => r"\w",
        }
    }
}

/// Check whether a string contains glob metacharacters.
pub fn has_magic(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Translate a glob fragment into an (unanchored) regex fragment.
pub fn glob_to_regex(glob: &str, flavor: GlobFlavor) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                // Collapse runs of stars
                while i + 1 < chars.len() && chars[i + 1] == '*' {
                    i += 1;
                }
                out.push_str(flavor.star());
            }
            '?' => out.push_str(flavor.question()),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end;
                }
                None => out.push_str(r"\["),
            },
            c => push_escaped(&mut out, c),
        }
        i += 1;
    }

    out
}

/// Compile a single glob path component into an anchored regex.
///
/// Returns `None` (after logging) if the translated pattern does not compile.
pub fn compile_component(glob: &str) -> Option<Regex> {
    let source = format!("^{}$", glob_to_regex(glob, GlobFlavor::Path));
    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Skipping glob component {:?}: {}", glob, e);
            None
        }
    }
}

/// Find the index of the `]` closing a class opened at `start`.
///
/// A `]` directly after `[` or `[!` belongs to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if j < chars.len() && chars[j] == '!' {
        j += 1;
    }
    if j < chars.len() && chars[j] == ']' {
        j += 1;
    }
    while j < chars.len() {
        if chars[j] == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn translate_class(body: &[char]) -> String {
    let mut out = String::from("[");
    let mut rest = body;
    if let Some(('!', tail)) = rest.split_first() {
        out.push('^');
        rest = tail;
    } else if let Some(('^', tail)) = rest.split_first() {
        out.push_str(r"\^");
        rest = tail;
    }
    for &c in rest {
        match c {
            '\\' | '[' | ']' | '&' | '~' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push(']');
    out
}

fn push_escaped(out: &mut String, c: char) {
    if regex_syntax_meta(c) {
        out.push('\\');
    }
    out.push(c);
}

fn regex_syntax_meta(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '#'
            | '&' | '-' | '~'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(glob: &str, name: &str) -> bool {
        compile_component(glob).map(|re| re.is_match(name)).unwrap_or(false)
    }

    #[test]
    fn test_star_and_question() {
        assert!(matches("*_baseColor.png", "chair_baseColor.png"));
        assert!(matches("*_baseColor.png", "_baseColor.png"));
        assert!(!matches("*_baseColor.png", "chair_baseColor.png.bak"));
        assert!(matches("tex?.png", "tex1.png"));
        assert!(!matches("tex?.png", "tex12.png"));
    }

    #[test]
    fn test_dot_is_literal() {
        assert!(matches("a.png", "a.png"));
        assert!(!matches("a.png", "aXpng"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("t.[0-9][0-9][0-9][0-9].exr", "t.1001.exr"));
        assert!(!matches("t.[0-9][0-9][0-9][0-9].exr", "t.100.exr"));
        assert!(matches("[!a]x", "bx"));
        assert!(!matches("[!a]x", "ax"));
        assert!(matches("[]]x", "]x"));
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        assert_eq!(glob_to_regex("a[b", GlobFlavor::Path), r"a\[b");
        assert!(matches("a[b", "a[b"));
    }

    #[test]
    fn test_word_flavor() {
        assert_eq!(glob_to_regex("*_diff.png", GlobFlavor::Word), r"\w+_diff\.png");
        assert_eq!(glob_to_regex("a?", GlobFlavor::Word), r"a\w");
    }

    #[test]
    fn test_regex_meta_escaped() {
        let re = Regex::new(&glob_to_regex("a+b(1)$", GlobFlavor::Path)).unwrap();
        assert!(re.is_match("a+b(1)$"));
    }

    #[test]
    fn test_has_magic() {
        assert!(has_magic("*.png"));
        assert!(has_magic("t.[0-9].png"));
        assert!(!has_magic("plain.png"));
    }
}
