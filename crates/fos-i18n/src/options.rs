//! Overlay Configuration

use serde::Deserialize;

/// Modifier keys that arm highlighting and clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ModifierKey {
    Alt,
    Control,
    Shift,
    Meta,
}

/// Overlay options
///
/// Deserializes from the camelCase shape the page-side configuration uses;
/// every missing field takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Keys that must all be held for hover highlighting and clicks
    pub highlight_keys: Vec<ModifierKey>,

    /// CSS color of the highlight outline
    pub highlight_color: String,

    /// Outline width in pixels
    pub highlight_width: u32,

    /// Lower-case tag names that are never tracked
    pub restricted_elements: Vec<String>,

    /// Namespace assumed for bindings and queries that carry none.
    /// Without one, an absent namespace matches any namespace.
    pub default_ns: Option<String>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            highlight_keys: vec![ModifierKey::Alt],
            highlight_color: "rgb(255, 0, 0)".to_string(),
            highlight_width: 5,
            restricted_elements: vec!["script".to_string(), "style".to_string()],
            default_ns: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ObserverOptions::default();
        assert_eq!(options.highlight_keys, vec![ModifierKey::Alt]);
        assert_eq!(options.highlight_width, 5);
        assert!(options.restricted_elements.iter().any(|t| t == "script"));
        assert!(options.default_ns.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{
            "highlightKeys": ["Shift", "Control"],
            "highlightWidth": 2,
            "defaultNs": "common"
        }"#;
        let options: ObserverOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.highlight_keys, vec![ModifierKey::Shift, ModifierKey::Control]);
        assert_eq!(options.highlight_width, 2);
        assert_eq!(options.default_ns.as_deref(), Some("common"));
        // Untouched fields keep their defaults
        assert_eq!(options.highlight_color, "rgb(255, 0, 0)");
        assert_eq!(options.restricted_elements, vec!["script", "style"]);
    }

    #[test]
    fn test_deserialize_rejects_unknown_key() {
        let result: Result<ObserverOptions, _> =
            serde_json::from_str(r#"{ "highlightKeys": ["Hyper"] }"#);
        assert!(result.is_err());
    }
}
