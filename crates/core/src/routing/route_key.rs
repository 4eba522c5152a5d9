use std::fmt;

use serde::{Deserialize, Serialize};

use crate::directory::Directory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "letter", rename_all = "snake_case")]
pub enum RouteKey {
    Letter(char),
    /// Empty identifier, or one that starts with a digit or symbol after prefix stripping.
    NonAlpha,
}

impl RouteKey {
    pub fn letter_or(self, fallback: char) -> char {
        match self {
            Self::Letter(letter) => letter,
            Self::NonAlpha => fallback.to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => write!(f, "{letter}"),
            Self::NonAlpha => f.write_str("non-alpha"),
        }
    }
}

/// Case-folds the identifier, drops leading punctuation, and repeatedly removes the longest
/// matching exception prefix. A prefix only matches at a word boundary, and is never removed
/// when nothing would remain.
pub fn strip_exception_prefixes(identifier: &str, prefixes: &[String]) -> String {
    let prefixes: Vec<String> = prefixes
        .iter()
        .map(|prefix| fold(prefix))
        .filter(|prefix| !prefix.is_empty())
        .collect();

    let mut current = trim_leading_symbols(&fold(identifier)).to_string();
    while let Some(rest) = strip_once(&current, &prefixes) {
        current = rest;
    }
    current
}

fn strip_once(text: &str, prefixes: &[String]) -> Option<String> {
    prefixes
        .iter()
        .filter_map(|prefix| {
            let rest = text.strip_prefix(prefix.as_str())?;
            if rest.chars().next().map_or(true, char::is_alphanumeric) {
                return None;
            }
            let rest = trim_leading_symbols(rest);
            (!rest.is_empty()).then_some((prefix.len(), rest))
        })
        .max_by_key(|(length, _)| *length)
        .map(|(_, rest)| rest.to_string())
}

fn fold(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn trim_leading_symbols(text: &str) -> &str {
    text.trim_start_matches(|ch: char| !ch.is_alphanumeric())
}

/// Letter of the first alphanumeric character left after prefix stripping. A digit, a non-ASCII
/// letter, or nothing at all yields `NonAlpha`. An identifier that is only a prefix ("The")
/// keeps it, so it routes to `T` rather than to the non-alpha fallback.
pub fn resolve_route_key(identifier: &str, prefixes: &[String]) -> RouteKey {
    let stripped = strip_exception_prefixes(identifier, prefixes);
    match stripped.chars().find(|ch| ch.is_alphanumeric()) {
        Some(first) if first.is_ascii_alphabetic() => RouteKey::Letter(first.to_ascii_uppercase()),
        _ => RouteKey::NonAlpha,
    }
}

impl Directory {
    pub fn resolve_route_key(&self, identifier: &str) -> RouteKey {
        resolve_route_key(identifier, self.exception_prefixes())
    }

    /// Route key with the non-alpha sentinel mapped to the configured fallback letter.
    pub fn route_letter(&self, identifier: &str) -> char {
        self.resolve_route_key(identifier).letter_or(self.non_alpha_letter())
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_route_key, strip_exception_prefixes, RouteKey};

    fn prefixes() -> Vec<String> {
        ["The", "A", "An", "City of", "County of", "City"].iter().map(|p| p.to_string()).collect()
    }

    fn key(identifier: &str) -> RouteKey {
        resolve_route_key(identifier, &prefixes())
    }

    #[test]
    fn strips_leading_article() {
        assert_eq!(key("The Great Company"), RouteKey::Letter('G'));
        assert_eq!(key("  the   great company"), RouteKey::Letter('G'));
        assert_eq!(key("Great Company"), RouteKey::Letter('G'));
    }

    #[test]
    fn prefix_requires_word_boundary() {
        assert_eq!(key("Theodore Plumbing"), RouteKey::Letter('T'));
        assert_eq!(key("Ace Hardware"), RouteKey::Letter('A'));
        assert_eq!(key("Anchor Bay"), RouteKey::Letter('A'));
        assert_eq!(key("The, Great Company"), RouteKey::Letter('G'));
    }

    #[test]
    fn longest_prefix_wins_and_prefixes_chain() {
        assert_eq!(key("City of Springfield"), RouteKey::Letter('S'));
        assert_eq!(key("City Lights Bakery"), RouteKey::Letter('L'));
        assert_eq!(key("The City of Boston"), RouteKey::Letter('B'));
    }

    #[test]
    fn prefix_alone_is_not_stripped() {
        assert_eq!(key("The"), RouteKey::Letter('T'));
        assert_eq!(key("A"), RouteKey::Letter('A'));
        assert_eq!(strip_exception_prefixes("The ...", &prefixes()), "the ...");
    }

    #[test]
    fn non_alphabetic_identifiers_yield_sentinel() {
        assert_eq!(key(""), RouteKey::NonAlpha);
        assert_eq!(key("   "), RouteKey::NonAlpha);
        assert_eq!(key("3M Company"), RouteKey::NonAlpha);
        assert_eq!(key("The 1st Bank"), RouteKey::NonAlpha);
        assert_eq!(key("Élan Studio"), RouteKey::NonAlpha);
        assert_eq!(RouteKey::NonAlpha.letter_or('a'), 'A');
        assert_eq!(RouteKey::Letter('Q').letter_or('A'), 'Q');
    }

    #[test]
    fn leading_punctuation_is_skipped_with_or_without_prefix() {
        assert_eq!(key("\"Zeta\" Corp"), RouteKey::Letter('Z'));
        assert_eq!(key("The \"Zeta\" Corp"), RouteKey::Letter('Z'));
        assert_eq!(key("(Zeta) Corp"), RouteKey::Letter('Z'));
        assert_eq!(key("& Sons Hardware"), RouteKey::Letter('S'));
        assert_eq!(key("\"The Zeta Corp\""), RouteKey::Letter('Z'));
        assert_eq!(key("(3M) Company"), RouteKey::NonAlpha);
        assert_eq!(key("..."), RouteKey::NonAlpha);
        assert_eq!(strip_exception_prefixes("\"Zeta\" Corp", &prefixes()), "zeta\" corp");
    }

    #[test]
    fn works_without_prefixes() {
        assert_eq!(resolve_route_key("the great company", &[]), RouteKey::Letter('T'));
    }
}
