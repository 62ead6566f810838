//! Element and node metadata
//!
//! A [`NodeMeta`] lists the key bindings found on one text or attribute
//! node. An [`ElementMeta`] aggregates the node metadata of every tracked
//! node inside one element, plus its highlight state.

use fos_dom::{Document, DomError, NodeId};
use indexmap::IndexMap;

use crate::highlighter;

/// One translation key bound to a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: String,
    pub default_value: Option<String>,
    pub ns: Option<String>,
}

impl KeyBinding {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default_value: None,
            ns: None,
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }
}

/// Metadata of a single text or attribute node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMeta {
    pub keys: Vec<KeyBinding>,
}

impl NodeMeta {
    pub fn new(keys: Vec<KeyBinding>) -> Self {
        Self { keys }
    }
}

impl From<KeyBinding> for NodeMeta {
    fn from(binding: KeyBinding) -> Self {
        Self { keys: vec![binding] }
    }
}

/// Outline style of the highlight overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub color: String,
    pub width: u32,
}

impl HighlightStyle {
    /// Inline CSS for the overlay element
    pub fn to_css(&self) -> String {
        format!(
            "position: absolute; pointer-events: none; outline: {}px solid {};",
            self.width, self.color
        )
    }
}

/// A drawn highlight. Owns its attached overlay element and is the only
/// handle that can detach it.
#[derive(Debug, PartialEq, Eq)]
pub struct ActiveHighlight {
    overlay: NodeId,
}

impl ActiveHighlight {
    /// Overlay element in the document
    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    /// Detach the overlay, handing it back for reuse
    fn detach(self, doc: &mut Document) -> Option<NodeId> {
        match doc.tree_mut().remove(self.overlay) {
            Ok(()) => Some(self.overlay),
            Err(err) => {
                tracing::warn!("Failed to remove highlight overlay {}: {}", self.overlay, err);
                None
            }
        }
    }
}

/// Aggregated metadata of one tracked element
#[derive(Debug)]
pub struct ElementMeta {
    element: NodeId,
    /// Tracked nodes inside the element, keyed by identity
    pub nodes: IndexMap<NodeId, NodeMeta>,
    /// Holds the element through both cleanup passes while set
    pub prevent_clean: bool,
    highlight: Option<ActiveHighlight>,
    /// Detached overlay kept for the next highlight
    spare_overlay: Option<NodeId>,
    style: Option<HighlightStyle>,
}

impl ElementMeta {
    pub fn new(element: NodeId) -> Self {
        Self {
            element,
            nodes: IndexMap::new(),
            prevent_clean: false,
            highlight: None,
            spare_overlay: None,
            style: None,
        }
    }

    /// Element this record describes
    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight.is_some()
    }

    /// Overlay element, present only while highlighted
    pub fn highlight_el(&self) -> Option<NodeId> {
        self.highlight.as_ref().map(ActiveHighlight::overlay)
    }

    /// Whether a highlighter has been attached
    pub fn can_highlight(&self) -> bool {
        self.style.is_some()
    }

    pub(crate) fn install_style(&mut self, style: &HighlightStyle) {
        if self.style.as_ref() != Some(style) {
            self.style = Some(style.clone());
        }
    }

    /// Whether an overlay element is held, attached or not
    pub(crate) fn has_overlay(&self) -> bool {
        self.highlight.is_some() || self.spare_overlay.is_some()
    }

    pub(crate) fn adopt_overlay(&mut self, overlay: NodeId) {
        debug_assert!(!self.has_overlay());
        self.spare_overlay = Some(overlay);
    }

    /// Give up the detached overlay, if any
    pub(crate) fn take_spare_overlay(&mut self) -> Option<NodeId> {
        self.spare_overlay.take()
    }

    /// Draw the overlay for this element.
    ///
    /// Returns `false` when no highlighter is attached or the element is not
    /// in the document. Calling it again while highlighted is a no-op.
    pub fn highlight(&mut self, doc: &mut Document) -> Result<bool, DomError> {
        let Some(style) = &self.style else {
            return Ok(false);
        };
        if self.highlight.is_some() {
            return Ok(true);
        }
        if !doc.tree().is_connected(self.element) {
            return Ok(false);
        }

        let reuse = self.spare_overlay.take();
        let overlay = highlighter::draw_overlay(doc, reuse, self.element, style)?;
        self.highlight = Some(ActiveHighlight { overlay });
        Ok(true)
    }

    /// Detach the overlay if one is drawn. The element keeps it for reuse.
    pub fn unhighlight(&mut self, doc: &mut Document) {
        if let Some(active) = self.highlight.take() {
            self.spare_overlay = active.detach(doc);
        }
    }

    /// Every binding of every tracked node, in node insertion order
    pub fn keys_and_defaults(&self) -> Vec<KeyBinding> {
        self.nodes
            .values()
            .flat_map(|node| node.keys.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> HighlightStyle {
        HighlightStyle { color: "blue".into(), width: 2 }
    }

    #[test]
    fn test_keys_and_defaults_order() {
        let mut meta = ElementMeta::new(NodeId::ROOT);
        let mut doc = Document::default();
        let a = doc.tree_mut().create_text("a");
        let b = doc.tree_mut().create_text("b");

        meta.nodes.insert(a, NodeMeta::new(vec![
            KeyBinding::new("one").with_default("One"),
            KeyBinding::new("two").with_ns("common"),
        ]));
        meta.nodes.insert(b, KeyBinding::new("three").into());

        let keys: Vec<_> = meta.keys_and_defaults().into_iter().map(|k| k.key).collect();
        assert_eq!(keys, vec!["one", "two", "three"]);
        assert_eq!(meta.keys_and_defaults()[0].default_value.as_deref(), Some("One"));
    }

    #[test]
    fn test_highlight_requires_style_and_connection() {
        let mut doc = Document::default();
        let body = doc.body();
        let el = doc.tree_mut().create_element("p");
        let mut meta = ElementMeta::new(el);

        // No highlighter attached yet
        assert_eq!(meta.highlight(&mut doc), Ok(false));

        meta.install_style(&style());
        // Detached element
        assert_eq!(meta.highlight(&mut doc), Ok(false));
        assert!(meta.highlight_el().is_none());

        doc.tree_mut().append_child(body, el).unwrap();
        assert_eq!(meta.highlight(&mut doc), Ok(true));
        let overlay = meta.highlight_el().unwrap();
        assert!(doc.tree().is_connected(overlay));

        // Idempotent
        assert_eq!(meta.highlight(&mut doc), Ok(true));
        assert_eq!(meta.highlight_el(), Some(overlay));

        meta.unhighlight(&mut doc);
        assert!(!meta.is_highlighted());
        assert!(!doc.tree().is_connected(overlay));

        // Second teardown is harmless
        meta.unhighlight(&mut doc);
    }

    #[test]
    fn test_highlight_cycles_reuse_overlay() {
        let mut doc = Document::default();
        let body = doc.body();
        let el = doc.tree_mut().create_element("p");
        doc.tree_mut().append_child(body, el).unwrap();
        let mut meta = ElementMeta::new(el);
        meta.install_style(&style());

        meta.highlight(&mut doc).unwrap();
        let overlay = meta.highlight_el().unwrap();
        meta.unhighlight(&mut doc);
        doc.tree_mut().take_records();
        let arena = doc.tree().len();

        for _ in 0..100 {
            assert_eq!(meta.highlight(&mut doc), Ok(true));
            assert_eq!(meta.highlight_el(), Some(overlay));
            meta.unhighlight(&mut doc);
        }
        assert_eq!(doc.tree().len(), arena);
        assert!(!doc.tree().is_connected(overlay));

        // Only the attach/detach pair is recorded per cycle
        let records = doc.tree_mut().take_records();
        assert_eq!(records.len(), 200);
        assert!(records.iter().all(|r| r.target == body));
    }

    #[test]
    fn test_style_css() {
        let css = style().to_css();
        assert!(css.contains("outline: 2px solid blue"));
    }
}
