//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: a removed subtree stays in the arena, detached, so
//! ids held elsewhere keep pointing at the same node.

use crate::{DomError, MutationRecord, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    records: Vec<MutationRecord>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            records: Vec::new(),
        }
    }

    /// Document root
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::InvalidNode(id))
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::comment(content))
    }

    /// Append `child` as the last child of `parent`, detaching it first if needed
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.node(parent)?;
        if !matches!(parent_node.data, NodeData::Document | NodeData::Element(_)) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.node(child)?;
        if matches!(child_node.data, NodeData::Document | NodeData::Attribute(_)) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if self.ancestors(parent).any(|a| a == child) || parent == child {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.remove_child(old_parent, child)?;
        }

        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        self.records.push(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(())
    }

    /// Detach `child` from `parent`. The subtree stays in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.node(child)?;
        self.node(parent)?;
        let siblings = &mut self.nodes[parent.index()].children;
        let pos = siblings
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })?;
        siblings.remove(pos);
        self.nodes[child.index()].parent = None;
        self.records.push(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        tracing::trace!("Removed {} from {}", child, parent);
        Ok(child)
    }

    /// Detach `node` from its parent, if it has one
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.node(node)?.parent {
            self.remove_child(parent, node)?;
        }
        Ok(())
    }

    /// Replace the content of a text node
    pub fn set_text(&mut self, node: NodeId, content: &str) -> Result<(), DomError> {
        let n = self.nodes.get_mut(node.index()).ok_or(DomError::InvalidNode(node))?;
        match &mut n.data {
            NodeData::Text(t) => {
                let old = std::mem::replace(&mut t.content, content.to_string());
                self.records.push(MutationRecord::character_data(node, old));
                Ok(())
            }
            _ => Err(DomError::InvalidNode(node)),
        }
    }

    /// Set an attribute, creating its node on first use. Returns the attribute node.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<NodeId, DomError> {
        if !self.node(element)?.is_element() {
            return Err(DomError::NotAnElement(element));
        }

        if let Some(attr) = self.attribute_node(element, name) {
            if let Some(data) = self.nodes[attr.index()].as_attribute_mut() {
                let old = std::mem::replace(&mut data.value, value.to_string());
                let name = data.name.clone();
                self.records.push(MutationRecord::attribute(element, &name, Some(old)));
            }
            return Ok(attr);
        }

        let mut node = Node::attribute(name, value);
        if let Some(data) = node.as_attribute_mut() {
            data.owner = Some(element);
        }
        let attr = self.alloc(node);
        if let Some(el) = self.nodes[element.index()].as_element_mut() {
            el.attrs.push(attr);
        }
        self.records.push(MutationRecord::attribute(element, &name.to_ascii_lowercase(), None));
        Ok(attr)
    }

    /// Remove an attribute. The attribute node survives with no owner.
    pub fn remove_attribute(
        &mut self,
        element: NodeId,
        name: &str,
    ) -> Result<Option<NodeId>, DomError> {
        if !self.node(element)?.is_element() {
            return Err(DomError::NotAnElement(element));
        }
        let Some(attr) = self.attribute_node(element, name) else {
            return Ok(None);
        };

        if let Some(el) = self.nodes[element.index()].as_element_mut() {
            el.attrs.retain(|&a| a != attr);
        }
        let mut old = None;
        if let Some(data) = self.nodes[attr.index()].as_attribute_mut() {
            data.owner = None;
            old = Some(data.value.clone());
        }
        self.records.push(MutationRecord::attribute(element, &name.to_ascii_lowercase(), old));
        Ok(Some(attr))
    }

    /// Attribute node of `element` called `name`
    pub fn attribute_node(&self, element: NodeId, name: &str) -> Option<NodeId> {
        let el = self.get(element)?.as_element()?;
        el.attrs.iter().copied().find(|&a| {
            self.get(a)
                .and_then(Node::as_attribute)
                .is_some_and(|data| data.name.eq_ignore_ascii_case(name))
        })
    }

    /// Attribute value
    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        let attr = self.attribute_node(element, name)?;
        self.get(attr)?.as_attribute().map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.attribute_node(element, name).is_some()
    }

    /// Attribute nodes owned by `element`
    pub fn attributes(&self, element: NodeId) -> &[NodeId] {
        self.get(element)
            .and_then(Node::as_element)
            .map(|e| e.attrs.as_slice())
            .unwrap_or(&[])
    }

    /// Owning element of an attribute node
    pub fn owner_element(&self, attr: NodeId) -> Option<NodeId> {
        self.get(attr)?.as_attribute()?.owner
    }

    /// Lower-case tag name of an element
    pub fn tag_name(&self, element: NodeId) -> Option<&str> {
        self.get(element)?.as_element().map(|e| e.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Proper ancestors, nearest first
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// All descendants in pre-order, excluding `node` itself and attributes
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Whether `node` is reachable from the document root
    pub fn is_connected(&self, node: NodeId) -> bool {
        let Some(n) = self.get(node) else {
            return false;
        };
        if let Some(attr) = n.as_attribute() {
            return attr.owner.is_some_and(|owner| self.is_connected(owner));
        }
        node == self.root() || self.ancestors(node).any(|a| a == self.root())
    }

    /// Nearest inclusive ancestor element carrying attribute `name`
    pub fn closest_with_attribute(&self, element: NodeId, name: &str) -> Option<NodeId> {
        std::iter::once(element)
            .chain(self.ancestors(element))
            .find(|&n| self.has_attribute(n, name))
    }

    /// Drain pending mutation records
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn has_pending_records(&self) -> bool {
        !self.records.is_empty()
    }
}
