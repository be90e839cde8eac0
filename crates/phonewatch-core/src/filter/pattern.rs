//! Package pattern parsing.

/// Wildcard marker accepted at the end of a rule pattern.
pub const WILDCARD: char = '*';

/// A rule pattern classified by how it matches package identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagePattern<'a> {
    /// Matches exactly one package identifier.
    Exact(&'a str),
    /// Matches every identifier starting with the prefix.
    Prefix(&'a str),
    /// Never matches: a `*` in the middle, more than one `*`, or a bare `*`.
    Malformed,
}

impl<'a> PackagePattern<'a> {
    /// Classify a raw rule pattern.
    #[must_use]
    pub fn parse(pattern: &'a str) -> Self {
        match pattern.find(WILDCARD) {
            None => Self::Exact(pattern),
            Some(idx) if idx + 1 == pattern.len() && idx > 0 => Self::Prefix(&pattern[..idx]),
            Some(_) => Self::Malformed,
        }
    }

    /// Check whether a package identifier matches this pattern.
    #[must_use]
    pub fn matches(&self, package: &str) -> bool {
        match self {
            Self::Exact(exact) => *exact == package,
            Self::Prefix(prefix) => package.starts_with(prefix),
            Self::Malformed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact() {
        assert_eq!(
            PackagePattern::parse("com.android.vending"),
            PackagePattern::Exact("com.android.vending")
        );
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(
            PackagePattern::parse("com.android.*"),
            PackagePattern::Prefix("com.android.")
        );
    }

    #[test]
    fn test_parse_malformed() {
        for raw in ["*", "com.*.foo", "com.**", "*com"] {
            assert_eq!(PackagePattern::parse(raw), PackagePattern::Malformed, "{raw}");
        }
    }

    #[test]
    fn test_prefix_respects_dot_boundary() {
        let pattern = PackagePattern::parse("com.android.*");
        assert!(pattern.matches("com.android.systemui"));
        assert!(pattern.matches("com.android.vending"));
        assert!(!pattern.matches("com.androidx.foo"));
        assert!(!pattern.matches("com.android"));
    }

    #[test]
    fn test_malformed_never_matches() {
        assert!(!PackagePattern::Malformed.matches("anything"));
        assert!(!PackagePattern::parse("*").matches("com.bank"));
    }
}
