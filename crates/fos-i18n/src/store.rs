//! Element metadata store
//!
//! Maps element identity to its [`ElementMeta`]. Iteration follows insertion
//! order and stays stable across removals.

use fos_dom::NodeId;
use indexmap::IndexMap;

use crate::meta::ElementMeta;

#[derive(Debug, Default)]
pub struct ElementStore {
    elements: IndexMap<NodeId, ElementMeta>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: NodeId) -> Option<&ElementMeta> {
        self.elements.get(&element)
    }

    pub fn get_mut(&mut self, element: NodeId) -> Option<&mut ElementMeta> {
        self.elements.get_mut(&element)
    }

    /// Insert or replace. A replaced entry keeps its position.
    pub fn set(&mut self, element: NodeId, meta: ElementMeta) {
        self.elements.insert(element, meta);
    }

    /// Remove and return the entry, preserving the order of the rest
    pub fn remove(&mut self, element: NodeId) -> Option<ElementMeta> {
        self.elements.shift_remove(&element)
    }

    pub fn contains(&self, element: NodeId) -> bool {
        self.elements.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn for_each_element(&self, mut f: impl FnMut(NodeId, &ElementMeta)) {
        for (&element, meta) in &self.elements {
            f(element, meta);
        }
    }

    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(NodeId, &mut ElementMeta)) {
        for (&element, meta) in &mut self.elements {
            f(element, meta);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ElementMeta)> {
        self.elements.iter().map(|(&element, meta)| (element, meta))
    }

    /// Tracked elements in insertion order
    pub fn elements(&self) -> Vec<NodeId> {
        self.elements.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::DomTree;

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut tree = DomTree::new();
        let ids: Vec<NodeId> = (0..4).map(|_| tree.create_element("p")).collect();

        let mut store = ElementStore::new();
        for &id in &ids {
            store.set(id, ElementMeta::new(id));
        }
        assert!(store.remove(ids[1]).is_some());
        assert!(store.remove(ids[1]).is_none());

        assert_eq!(store.elements(), vec![ids[0], ids[2], ids[3]]);

        // Replacing keeps the slot
        let mut replacement = ElementMeta::new(ids[0]);
        replacement.prevent_clean = true;
        store.set(ids[0], replacement);
        assert_eq!(store.elements()[0], ids[0]);
        assert!(store.get(ids[0]).unwrap().prevent_clean);
    }

    #[test]
    fn test_for_each_element() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");

        let mut store = ElementStore::new();
        store.set(a, ElementMeta::new(a));
        store.set(b, ElementMeta::new(b));

        store.for_each_element_mut(|_, meta| meta.prevent_clean = true);

        let mut seen = Vec::new();
        store.for_each_element(|el, meta| {
            assert!(meta.prevent_clean);
            seen.push(el);
        });
        assert_eq!(seen, vec![a, b]);
        assert_eq!(store.len(), 2);
        assert!(store.contains(a));
    }
}
