//! Element Registry
//!
//! Tracks which elements hold translatable nodes. Node discovery calls
//! [`ElementRegistry::register`]; the document watcher calls
//! [`ElementRegistry::cleanup_removed_nodes`] once per mutation batch and
//! [`ElementRegistry::cleanup_lingering_key_attributes`] on an idle sweep.
//!
//! All calls are synchronous and must come from the thread that owns the
//! document.

use std::collections::HashSet;

use fos_dom::{Document, MutationRecord, MutationType, NodeId};

use crate::descriptor::{compare_descriptors, resolve_ns, KeyDescriptor, NsFallback};
use crate::highlighter::ElementHighlighter;
use crate::meta::{ElementMeta, KeyBinding, NodeMeta};
use crate::mouse::MouseEventHandler;
use crate::options::{ModifierKey, ObserverOptions};
use crate::store::ElementStore;
use crate::{
    I18N_ATTRIBUTE_NAME, I18N_RESTRICT_ATTRIBUTE, I18N_WRAPPED_ONLY_DATA_ATTRIBUTE, I18nError,
};

/// Payload handed to the click callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationClick {
    pub target: NodeId,
    pub keys_and_defaults: Vec<KeyBinding>,
}

type TranslationOnClick = Box<dyn FnMut(TranslationClick)>;

pub struct ElementRegistry {
    options: ObserverOptions,
    store: ElementStore,
    highlighter: ElementHighlighter,
    event_handler: MouseEventHandler,
    on_click: TranslationOnClick,
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("options", &self.options)
            .field("store", &self.store)
            .field("event_handler", &self.event_handler)
            .finish_non_exhaustive()
    }
}

impl ElementRegistry {
    pub fn new(
        options: ObserverOptions,
        store: ElementStore,
        on_click: impl FnMut(TranslationClick) + 'static,
    ) -> Self {
        let highlighter =
            ElementHighlighter::new(&options.highlight_color, options.highlight_width);
        let event_handler = MouseEventHandler::new(options.highlight_keys.clone());
        Self {
            options,
            store,
            highlighter,
            event_handler,
            on_click: Box::new(on_click),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn is_tracked(&self, element: NodeId) -> bool {
        self.store.contains(element)
    }

    fn is_restricted(&self, doc: &Document, element: NodeId) -> bool {
        let tree = doc.tree();
        let restricted_tag = tree.tag_name(element).is_some_and(|tag| {
            self.options
                .restricted_elements
                .iter()
                .any(|r| r.eq_ignore_ascii_case(tag))
        });
        restricted_tag || tree.closest_with_attribute(element, I18N_RESTRICT_ATTRIBUTE).is_some()
    }

    /// Record that `node` inside `element` carries `node_meta`.
    ///
    /// Restricted elements and non-elements are ignored. Re-registering a
    /// node replaces its metadata.
    pub fn register(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        node: NodeId,
        node_meta: NodeMeta,
    ) {
        if !doc.tree().get(element).is_some_and(|n| n.is_element()) {
            tracing::debug!("Ignoring registration on non-element {}", element);
            return;
        }
        if self.is_restricted(doc, element) {
            tracing::trace!("Element {} is restricted", element);
            return;
        }

        if !self.store.contains(element) {
            self.store.set(element, ElementMeta::new(element));
            if let Err(err) = doc.tree_mut().set_attribute(element, I18N_ATTRIBUTE_NAME, "true") {
                tracing::warn!("Failed to mark {}: {}", element, err);
            }
            tracing::debug!("Tracking element {}", element);
        }

        if let Some(meta) = self.store.get_mut(element) {
            meta.nodes.insert(node, node_meta);
            self.highlighter.init_highlighter(element, meta);
        }
    }

    /// Visit every tracked element in insertion order
    pub fn for_each_element(&self, f: impl FnMut(NodeId, &ElementMeta)) {
        self.store.for_each_element(f);
    }

    /// Drop key-only attribute nodes that lost their owner, then clean
    /// elements left without nodes.
    pub fn cleanup_lingering_key_attributes(&mut self, doc: &mut Document) {
        let tree = doc.tree();
        let mut emptied = Vec::new();

        self.store.for_each_element_mut(|element, meta| {
            if meta.prevent_clean {
                return;
            }
            meta.nodes.retain(|&node, _| {
                let lingering = tree
                    .get(node)
                    .and_then(|n| n.as_attribute())
                    .is_some_and(|attr| {
                        attr.name == I18N_WRAPPED_ONLY_DATA_ATTRIBUTE && attr.owner.is_none()
                    });
                !lingering
            });
            if meta.nodes.is_empty() {
                emptied.push(element);
            }
        });

        if !emptied.is_empty() {
            tracing::debug!("Lingering sweep cleans {} elements", emptied.len());
        }
        for element in emptied {
            self.clean_element(doc, element);
        }
    }

    /// Apply one mutation batch. `removed_nodes` must hold every node the
    /// batch removed. Elements left without nodes are cleaned even when the
    /// set is empty.
    pub fn cleanup_removed_nodes(&mut self, doc: &mut Document, removed_nodes: &HashSet<NodeId>) {
        let mut to_clean = Vec::new();

        self.store.for_each_element_mut(|element, meta| {
            if meta.prevent_clean {
                return;
            }
            let element_removed = removed_nodes.contains(&element);
            if !element_removed {
                meta.nodes.retain(|node, _| !removed_nodes.contains(node));
            }
            if element_removed || meta.nodes.is_empty() {
                to_clean.push(element);
            }
        });

        if !to_clean.is_empty() {
            tracing::debug!(
                "Cleanup of {} removed nodes drops {} elements",
                removed_nodes.len(),
                to_clean.len()
            );
        }
        for element in to_clean {
            self.clean_element(doc, element);
        }
    }

    fn clean_element(&mut self, doc: &mut Document, element: NodeId) {
        let Some(mut meta) = self.store.remove(element) else {
            return;
        };
        meta.unhighlight(doc);
        self.highlighter.recycle(&mut meta);
        if let Err(err) = doc.tree_mut().remove_attribute(element, I18N_ATTRIBUTE_NAME) {
            tracing::warn!("Failed to unmark {}: {}", element, err);
        }
        tracing::trace!("Element {} untracked", element);
    }

    /// Tracked elements with a binding matching `key` in `ns`.
    ///
    /// An absent key matches every key; an absent namespace resolves to the
    /// configured default on both sides.
    pub fn find_all(&self, key: Option<&str>, ns: Option<&NsFallback>) -> Vec<&ElementMeta> {
        let default_ns = self.options.default_ns.as_deref();
        let query = KeyDescriptor {
            key,
            ns: resolve_ns(ns.map(NsFallback::as_slice), default_ns),
        };

        self.store
            .iter()
            .filter(|(_, meta)| {
                meta.nodes.values().flat_map(|node| &node.keys).any(|binding| {
                    let candidate = KeyDescriptor {
                        key: Some(binding.key.as_str()),
                        ns: resolve_ns(binding.ns.as_ref().map(std::slice::from_ref), default_ns),
                    };
                    compare_descriptors(&query, &candidate)
                })
            })
            .map(|(_, meta)| meta)
            .collect()
    }

    /// Start pointer tracking when `mouse_highlight` is set
    pub fn run(&mut self, mouse_highlight: bool) {
        if mouse_highlight {
            self.event_handler.run();
        }
    }

    /// Stop pointer tracking and remove every overlay. Tracked data stays.
    pub fn stop(&mut self, doc: &mut Document) {
        self.event_handler.stop();
        self.store.for_each_element_mut(|_, meta| meta.unhighlight(doc));
    }

    pub fn is_running(&self) -> bool {
        self.event_handler.is_running()
    }

    /// Outline every element `find_all` returns. Returns the elements drawn.
    pub fn highlight(
        &mut self,
        doc: &mut Document,
        key: Option<&str>,
        ns: Option<&NsFallback>,
    ) -> Result<Vec<NodeId>, I18nError> {
        let targets: Vec<NodeId> =
            self.find_all(key, ns).into_iter().map(ElementMeta::element).collect();
        let mut drawn = Vec::with_capacity(targets.len());
        for element in targets {
            if let Some(meta) = self.store.get_mut(element) {
                if meta.highlight(doc)? {
                    drawn.push(element);
                }
            }
        }
        Ok(drawn)
    }

    /// Reverse [`highlight`](Self::highlight)
    pub fn unhighlight(&mut self, doc: &mut Document, elements: &[NodeId]) {
        for &element in elements {
            if let Some(meta) = self.store.get_mut(element) {
                meta.unhighlight(doc);
            }
        }
    }

    /// Hold an element through cleanup (e.g. while it is being edited).
    /// Returns `false` if the element is not tracked.
    pub fn set_prevent_clean(&mut self, element: NodeId, prevent: bool) -> bool {
        match self.store.get_mut(element) {
            Some(meta) => {
                meta.prevent_clean = prevent;
                true
            }
            None => false,
        }
    }

    pub fn handle_mouse_over(
        &mut self,
        doc: &mut Document,
        target: Option<NodeId>,
    ) -> Result<(), I18nError> {
        Ok(self.event_handler.mouse_over(doc, &mut self.store, target)?)
    }

    pub fn handle_key_down(
        &mut self,
        doc: &mut Document,
        key: ModifierKey,
    ) -> Result<(), I18nError> {
        Ok(self.event_handler.key_down(doc, &mut self.store, key)?)
    }

    pub fn handle_key_up(&mut self, doc: &mut Document, key: ModifierKey) -> Result<(), I18nError> {
        Ok(self.event_handler.key_up(doc, &mut self.store, key)?)
    }

    pub fn handle_blur(&mut self, doc: &mut Document) -> Result<(), I18nError> {
        Ok(self.event_handler.blur(doc, &mut self.store)?)
    }

    /// Pointer click on `target`. Returns whether the click callback ran.
    ///
    /// A marked element with no metadata is an invariant violation and is
    /// reported as [`I18nError::UntrackedElement`].
    pub fn handle_click(&mut self, doc: &Document, target: NodeId) -> Result<bool, I18nError> {
        let Some(element) = self.event_handler.click(doc, target) else {
            return Ok(false);
        };
        let meta = self.store.get(element).ok_or(I18nError::UntrackedElement(element))?;
        let click = TranslationClick {
            target: element,
            keys_and_defaults: meta.keys_and_defaults(),
        };
        (self.on_click)(click);
        Ok(true)
    }
}

/// Every node removed by one mutation batch: removed roots, their
/// descendants and the attribute nodes of removed elements. Nodes that were
/// re-inserted within the batch are skipped.
pub fn removed_nodes(doc: &Document, records: &[MutationRecord]) -> HashSet<NodeId> {
    let tree = doc.tree();
    let mut removed = HashSet::new();

    let roots = records
        .iter()
        .filter(|r| r.mutation_type == MutationType::ChildList)
        .flat_map(|r| r.removed_nodes.iter().copied());

    for root in roots {
        if tree.is_connected(root) || removed.contains(&root) {
            continue;
        }
        for node in std::iter::once(root).chain(tree.descendants(root)) {
            removed.insert(node);
            removed.extend(tree.attributes(node).iter().copied());
        }
    }
    removed
}
