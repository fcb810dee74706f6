use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Manifest,
    Runtime,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Manifest => "manifest",
            Origin::Runtime => "runtime",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A package to check.
///
/// For manifest entries `declared_range` is the range string from the
/// manifest. It plays no part in version resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub declared_range: String,
    pub origin: Origin,
}

impl Dependency {
    pub fn declared(name: impl Into<String>, declared_range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_range: declared_range.into(),
            origin: Origin::Manifest,
        }
    }

    /// The synthetic entry for a locally installed runtime. The probed
    /// version is kept as its declared range.
    pub fn runtime(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_range: version.into(),
            origin: Origin::Runtime,
        }
    }
}
