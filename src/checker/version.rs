use serde::{Deserialize, Serialize};

/// Ordering used to pick the latest of a package's published versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOrdering {
    /// Plain string comparison, so "9.0.0" sorts above "10.0.0".
    #[default]
    Lexicographic,
    /// Semantic version precedence. Candidates that don't parse are ignored
    /// unless none parse at all.
    Semver,
}

/// Returns the greatest version under `ordering`, or `None` when there are
/// no candidates.
pub fn select_latest<'a, I>(versions: I, ordering: VersionOrdering) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let versions: Vec<&str> = versions.into_iter().filter(|v| !v.is_empty()).collect();

    match ordering {
        VersionOrdering::Lexicographic => lexicographic_max(&versions),
        VersionOrdering::Semver => semver_max(&versions).or_else(|| lexicographic_max(&versions)),
    }
}

fn lexicographic_max(versions: &[&str]) -> Option<String> {
    versions.iter().max().map(|v| v.to_string())
}

fn semver_max(versions: &[&str]) -> Option<String> {
    versions
        .iter()
        .filter_map(|v| {
            semver::Version::parse(v.trim_start_matches('v'))
                .ok()
                .map(|parsed| (parsed, *v))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, original)| original.to_string())
}
