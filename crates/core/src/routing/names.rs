use crate::directory::Directory;
use crate::domain::staff::StaffEntry;

/// Lowercase, punctuation dropped, whitespace collapsed.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameMatch<T> {
    Unique(T),
    Ambiguous(Vec<T>),
    NotFound,
}

impl<T> NameMatch<T> {
    pub fn unique(self) -> Option<T> {
        match self {
            Self::Unique(value) => Some(value),
            _ => None,
        }
    }
}

/// Exact normalized equality wins. Otherwise each requested token must prefix the
/// candidate token at the same position ("jason" and "jason l" both match "Jason L.").
pub fn match_name<'a, T, I>(requested: &str, candidates: I) -> NameMatch<T>
where
    T: Copy + 'a,
    I: IntoIterator<Item = (&'a str, T)>,
{
    let wanted = normalize_name(requested);
    if wanted.is_empty() {
        return NameMatch::NotFound;
    }
    let wanted_tokens: Vec<&str> = wanted.split(' ').collect();

    let mut exact = Vec::new();
    let mut prefixed = Vec::new();
    for (name, value) in candidates {
        let normalized = normalize_name(name);
        if normalized == wanted {
            exact.push(value);
        } else if tokens_prefix(&wanted_tokens, &normalized) {
            prefixed.push(value);
        }
    }

    let pool = if exact.is_empty() { prefixed } else { exact };
    match pool.len() {
        0 => NameMatch::NotFound,
        1 => NameMatch::Unique(pool[0]),
        _ => NameMatch::Ambiguous(pool),
    }
}

fn tokens_prefix(wanted: &[&str], candidate: &str) -> bool {
    let candidate: Vec<&str> = candidate.split(' ').collect();
    wanted.len() <= candidate.len()
        && wanted.iter().zip(&candidate).all(|(want, have)| have.starts_with(want))
}

pub fn match_staff_name<'a>(
    directory: &'a Directory,
    requested: &str,
) -> NameMatch<&'a StaffEntry> {
    match_name(requested, directory.staff().iter().map(|entry| (entry.name.as_str(), entry)))
}

/// A restricted name that is not backed by a staff entry, matched with the staff policy.
/// Ambiguous matches still count: every candidate is restricted.
pub fn match_restricted_name<'a>(directory: &'a Directory, requested: &str) -> Option<&'a str> {
    let names = directory.restricted_names().iter().map(|name| (name.as_str(), name.as_str()));
    match match_name(requested, names) {
        NameMatch::Unique(name) => Some(name),
        NameMatch::Ambiguous(names) => names.first().copied(),
        NameMatch::NotFound => None,
    }
}
