//! Element highlighter
//!
//! Attaches the configured outline style to element metadata. The overlay
//! itself is drawn lazily by [`ElementMeta::highlight`]. Overlay elements
//! are recycled: a tracked element keeps its detached overlay, and overlays
//! of untracked elements go back to a small pool for the next registration.

use std::collections::VecDeque;

use fos_dom::{Document, DomError, NodeId};

use crate::meta::{ElementMeta, HighlightStyle};
use crate::I18N_HIGHLIGHTER_ATTRIBUTE;

/// Maximum detached overlays kept for reuse
const OVERLAY_POOL_SIZE: usize = 16;

/// Element highlighter
#[derive(Debug, Clone)]
pub struct ElementHighlighter {
    style: HighlightStyle,
    spare_overlays: VecDeque<NodeId>,
}

impl ElementHighlighter {
    pub fn new(color: &str, width: u32) -> Self {
        Self {
            style: HighlightStyle {
                color: color.to_string(),
                width,
            },
            spare_overlays: VecDeque::new(),
        }
    }

    pub fn style(&self) -> &HighlightStyle {
        &self.style
    }

    /// Make `meta` highlightable. Safe to call on every registration.
    pub fn init_highlighter(&mut self, element: NodeId, meta: &mut ElementMeta) {
        debug_assert_eq!(meta.element(), element);
        meta.install_style(&self.style);
        if !meta.has_overlay() {
            if let Some(overlay) = self.spare_overlays.pop_front() {
                meta.adopt_overlay(overlay);
            }
        }
    }

    /// Take back the detached overlay of an element that is no longer tracked
    pub(crate) fn recycle(&mut self, meta: &mut ElementMeta) {
        let Some(overlay) = meta.take_spare_overlay() else {
            return;
        };
        if self.spare_overlays.len() < OVERLAY_POOL_SIZE {
            self.spare_overlays.push_back(overlay);
        } else {
            tracing::trace!("Overlay pool full, dropping {}", overlay);
        }
    }

    /// Number of pooled overlays
    pub fn pooled(&self) -> usize {
        self.spare_overlays.len()
    }
}

/// Append an overlay `div` for `target` to the document body, reusing a
/// detached overlay when one is given
pub(crate) fn draw_overlay(
    doc: &mut Document,
    reuse: Option<NodeId>,
    target: NodeId,
    style: &HighlightStyle,
) -> Result<NodeId, DomError> {
    let body = doc.body();
    let tree = doc.tree_mut();

    let overlay = reuse.unwrap_or_else(|| tree.create_element("div"));
    let marker = target.index().to_string();
    if tree.get_attribute(overlay, I18N_HIGHLIGHTER_ATTRIBUTE) != Some(marker.as_str()) {
        tree.set_attribute(overlay, I18N_HIGHLIGHTER_ATTRIBUTE, &marker)?;
    }
    let css = style.to_css();
    if tree.get_attribute(overlay, "style") != Some(css.as_str()) {
        tree.set_attribute(overlay, "style", &css)?;
    }
    tree.append_child(body, overlay)?;

    tracing::trace!("Highlight overlay {} drawn for {}", overlay, target);
    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let mut highlighter = ElementHighlighter::new("rgb(255, 0, 0)", 5);
        let mut meta = ElementMeta::new(NodeId::ROOT);
        assert!(!meta.can_highlight());

        highlighter.init_highlighter(NodeId::ROOT, &mut meta);
        highlighter.init_highlighter(NodeId::ROOT, &mut meta);
        assert!(meta.can_highlight());
        assert!(!meta.is_highlighted());
    }

    #[test]
    fn test_overlay_marks_target() {
        let mut doc = Document::default();
        let body = doc.body();
        let target = doc.tree_mut().create_element("span");
        let highlighter = ElementHighlighter::new("green", 1);

        let overlay = draw_overlay(&mut doc, None, target, highlighter.style()).unwrap();
        let tree = doc.tree();
        assert_eq!(tree.parent(overlay), Some(body));
        assert_eq!(
            tree.get_attribute(overlay, I18N_HIGHLIGHTER_ATTRIBUTE),
            Some(target.index().to_string().as_str())
        );
        assert!(tree.get_attribute(overlay, "style").unwrap().contains("green"));
    }

    #[test]
    fn test_recycled_overlay_moves_to_new_element() {
        let mut doc = Document::default();
        let body = doc.body();
        let first = doc.tree_mut().create_element("p");
        let second = doc.tree_mut().create_element("p");
        doc.tree_mut().append_child(body, first).unwrap();
        doc.tree_mut().append_child(body, second).unwrap();
        let mut highlighter = ElementHighlighter::new("green", 1);

        let mut old = ElementMeta::new(first);
        highlighter.init_highlighter(first, &mut old);
        old.highlight(&mut doc).unwrap();
        let overlay = old.highlight_el().unwrap();
        old.unhighlight(&mut doc);
        highlighter.recycle(&mut old);
        assert_eq!(highlighter.pooled(), 1);

        let mut new = ElementMeta::new(second);
        highlighter.init_highlighter(second, &mut new);
        assert_eq!(highlighter.pooled(), 0);
        let arena = doc.tree().len();
        new.highlight(&mut doc).unwrap();
        assert_eq!(new.highlight_el(), Some(overlay));
        assert_eq!(doc.tree().len(), arena);
        assert_eq!(
            doc.tree().get_attribute(overlay, I18N_HIGHLIGHTER_ATTRIBUTE),
            Some(second.index().to_string().as_str())
        );
    }
}
