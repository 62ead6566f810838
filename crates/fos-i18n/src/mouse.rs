//! Mouse and modifier-key interaction
//!
//! The platform layer feeds raw pointer and key events in; the handler keeps
//! the hovered tracked element outlined while every highlight key is held
//! and reports clicks on it.

use std::collections::HashSet;

use fos_dom::{Document, DomError, NodeId};

use crate::meta::ElementMeta;
use crate::options::ModifierKey;
use crate::store::ElementStore;
use crate::I18N_ATTRIBUTE_NAME;

#[derive(Debug)]
pub struct MouseEventHandler {
    highlight_keys: Vec<ModifierKey>,
    pressed: HashSet<ModifierKey>,
    running: bool,
    /// Tracked element under the pointer
    hovered: Option<NodeId>,
    /// Element whose overlay this handler drew
    highlighted: Option<NodeId>,
}

impl MouseEventHandler {
    pub fn new(highlight_keys: Vec<ModifierKey>) -> Self {
        Self {
            highlight_keys,
            pressed: HashSet::new(),
            running: false,
            hovered: None,
            highlighted: None,
        }
    }

    pub fn run(&mut self) {
        if !self.running {
            tracing::debug!("Mouse tracking started");
        }
        self.running = true;
    }

    /// Stop tracking. Overlays are torn down by the owner of the store.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("Mouse tracking stopped");
        }
        self.running = false;
        self.pressed.clear();
        self.hovered = None;
        self.highlighted = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Whether every configured highlight key is held
    pub fn keys_down(&self) -> bool {
        self.highlight_keys.iter().all(|key| self.pressed.contains(key))
    }

    pub fn key_down(
        &mut self,
        doc: &mut Document,
        store: &mut ElementStore,
        key: ModifierKey,
    ) -> Result<(), DomError> {
        self.pressed.insert(key);
        self.refresh(doc, store)
    }

    pub fn key_up(
        &mut self,
        doc: &mut Document,
        store: &mut ElementStore,
        key: ModifierKey,
    ) -> Result<(), DomError> {
        self.pressed.remove(&key);
        self.refresh(doc, store)
    }

    /// Window lost focus: key-up events will not arrive
    pub fn blur(&mut self, doc: &mut Document, store: &mut ElementStore) -> Result<(), DomError> {
        self.pressed.clear();
        self.refresh(doc, store)
    }

    /// Pointer moved onto `target` (`None` when it left the document)
    pub fn mouse_over(
        &mut self,
        doc: &mut Document,
        store: &mut ElementStore,
        target: Option<NodeId>,
    ) -> Result<(), DomError> {
        if !self.running {
            return Ok(());
        }
        self.hovered = match target {
            Some(t) => closest_tracked(doc, t),
            None => None,
        };
        self.refresh(doc, store)
    }

    /// Element to report for a click on `target`, if armed
    pub fn click(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        if !self.running || !self.keys_down() {
            return None;
        }
        closest_tracked(doc, target)
    }

    fn refresh(&mut self, doc: &mut Document, store: &mut ElementStore) -> Result<(), DomError> {
        let wanted = if self.running && self.keys_down() { self.hovered } else { None };
        // The overlay may have gone with a cleaned element or a keyed unhighlight
        let current = self
            .highlighted
            .filter(|&el| store.get(el).is_some_and(ElementMeta::is_highlighted));
        if wanted == current {
            self.highlighted = current;
            return Ok(());
        }

        if let Some(meta) = self.highlighted.take().and_then(|old| store.get_mut(old)) {
            meta.unhighlight(doc);
        }
        if let Some(element) = wanted {
            if let Some(meta) = store.get_mut(element) {
                if meta.highlight(doc)? {
                    self.highlighted = Some(element);
                }
            }
        }
        Ok(())
    }
}

/// Nearest inclusive ancestor element carrying the tracking marker.
/// Attribute targets resolve through their owner.
fn closest_tracked(doc: &Document, target: NodeId) -> Option<NodeId> {
    let tree = doc.tree();
    let start = match tree.get(target)?.as_attribute() {
        Some(attr) => attr.owner?,
        None => target,
    };
    tree.closest_with_attribute(start, I18N_ATTRIBUTE_NAME)
}
