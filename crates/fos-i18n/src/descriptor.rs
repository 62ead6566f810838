//! Key descriptor matching
//!
//! A descriptor is a key plus the namespaces it may live in. Either part can
//! be unconstrained, in which case it matches anything on the other side.

/// Namespace argument accepted by lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsFallback {
    One(String),
    Many(Vec<String>),
}

impl NsFallback {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(ns) => std::slice::from_ref(ns),
            Self::Many(list) => list,
        }
    }
}

impl From<&str> for NsFallback {
    fn from(ns: &str) -> Self {
        Self::One(ns.to_string())
    }
}

impl From<String> for NsFallback {
    fn from(ns: String) -> Self {
        Self::One(ns)
    }
}

impl From<Vec<String>> for NsFallback {
    fn from(list: Vec<String>) -> Self {
        Self::Many(list)
    }
}

/// Key and resolved namespaces. `None` means unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor<'a> {
    pub key: Option<&'a str>,
    pub ns: Option<Vec<&'a str>>,
}

/// Resolve a namespace list, falling back to `default_ns` when absent.
///
/// With neither present the result is unconstrained. Both sides of a
/// comparison must go through this function.
pub fn resolve_ns<'a>(
    ns: Option<&'a [String]>,
    default_ns: Option<&'a str>,
) -> Option<Vec<&'a str>> {
    match ns {
        Some(list) => Some(list.iter().map(String::as_str).collect()),
        None => default_ns.map(|d| vec![d]),
    }
}

/// Whether two descriptors can refer to the same translation
pub fn compare_descriptors(descriptor: &KeyDescriptor<'_>, criteria: &KeyDescriptor<'_>) -> bool {
    let key_matches = match (descriptor.key, criteria.key) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    };
    let ns_matches = match (&descriptor.ns, &criteria.ns) {
        (Some(a), Some(b)) => a.iter().any(|ns| b.contains(ns)),
        _ => true,
    };
    key_matches && ns_matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc<'a>(key: Option<&'a str>, ns: Option<Vec<&'a str>>) -> KeyDescriptor<'a> {
        KeyDescriptor { key, ns }
    }

    #[test]
    fn test_key_match() {
        assert!(compare_descriptors(&desc(Some("a"), None), &desc(Some("a"), None)));
        assert!(!compare_descriptors(&desc(Some("a"), None), &desc(Some("b"), None)));
        // Absent key is a wildcard on either side
        assert!(compare_descriptors(&desc(None, None), &desc(Some("b"), None)));
        assert!(compare_descriptors(&desc(Some("a"), None), &desc(None, None)));
    }

    #[test]
    fn test_namespace_intersection() {
        let query = desc(Some("a"), Some(vec!["common", "forms"]));
        assert!(compare_descriptors(&query, &desc(Some("a"), Some(vec!["forms"]))));
        assert!(!compare_descriptors(&query, &desc(Some("a"), Some(vec!["errors"]))));
        assert!(compare_descriptors(&query, &desc(Some("a"), None)));
        assert!(!compare_descriptors(&desc(None, Some(vec![])), &desc(Some("a"), Some(vec!["x"]))));
    }

    #[test]
    fn test_resolve_ns() {
        let explicit = NsFallback::from("forms");
        assert_eq!(resolve_ns(Some(explicit.as_slice()), Some("common")), Some(vec!["forms"]));
        assert_eq!(resolve_ns(None, Some("common")), Some(vec!["common"]));
        assert_eq!(resolve_ns(None, None), None);

        let many = NsFallback::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(resolve_ns(Some(many.as_slice()), None), Some(vec!["a", "b"]));
    }

    #[test]
    fn test_default_ns_applies_to_both_sides() {
        // Binding without ns and query without ns both land in the default
        let binding = desc(Some("k"), resolve_ns(None, Some("common")));
        let query = desc(Some("k"), resolve_ns(None, Some("common")));
        assert!(compare_descriptors(&query, &binding));

        let other = [String::from("errors")];
        let scoped = desc(Some("k"), resolve_ns(Some(&other[..]), Some("common")));
        assert!(!compare_descriptors(&query, &scoped));
    }
}
