#![forbid(unsafe_code)]

//! Arena-backed dock tree and its structural edits.
//!
//! # Invariants
//!
//! 1. The root is always a container and has no parent.
//! 2. Exactly one content element exists and it is always attached.
//! 3. No container other than the root has fewer than two children.
//! 4. Parent links and child lists agree.
//!
//! [`DockTree::add_structure_element`] and
//! [`DockTree::remove_structure_element`] preserve all four; detached frame
//! elements may exist between a removal and a re-insertion.

use std::collections::BTreeMap;

use panekit_core::{CompassDirection, Orientation, Size};

use crate::element::{
    CONTENT_ID, ContainerElement, DockElement, DockElementKind, FrameElement, NodeId,
};
use crate::error::DockError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockTree {
    root: NodeId,
    content: NodeId,
    next_id: NodeId,
    next_container: u64,
    nodes: BTreeMap<NodeId, DockElement>,
    index: BTreeMap<String, NodeId>,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DockTree {
    /// Tree holding a horizontal root container with only the content.
    #[must_use]
    pub fn new() -> Self {
        let content = NodeId::FIRST_CONTENT;
        let root = NodeId::FIRST_ROOT;
        let root_id = "container-0".to_string();

        let mut content_element =
            DockElement::new(CONTENT_ID, Size::default(), DockElementKind::Content);
        content_element.parent = Some(root);
        let root_element = DockElement::new(
            root_id.clone(),
            Size::default(),
            DockElementKind::Container(ContainerElement {
                orientation: Orientation::Horizontal,
                children: vec![content],
            }),
        );

        let mut nodes = BTreeMap::new();
        nodes.insert(content, content_element);
        nodes.insert(root, root_element);
        let mut index = BTreeMap::new();
        index.insert(CONTENT_ID.to_string(), content);
        index.insert(root_id, root);

        Self {
            root,
            content,
            next_id: NodeId::FIRST_FREE,
            next_container: 1,
            nodes,
            index,
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn content(&self) -> NodeId {
        self.content
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&DockElement> {
        self.nodes.get(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut DockElement> {
        self.nodes.get_mut(&node)
    }

    /// Look an element up by its string id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DockElement)> {
        self.nodes.iter().map(|(id, element)| (*id, element))
    }

    /// Frame nodes in id order.
    pub fn frames(&self) -> impl Iterator<Item = (NodeId, &DockElement, &FrameElement)> {
        self.nodes
            .iter()
            .filter_map(|(id, element)| element.frame().map(|frame| (*id, element, frame)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, node: NodeId) -> Result<&DockElement, DockError> {
        self.nodes.get(&node).ok_or(DockError::MissingNode { node })
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> Result<&mut DockElement, DockError> {
        self.nodes.get_mut(&node).ok_or(DockError::MissingNode { node })
    }

    pub(crate) fn container_mut(
        &mut self,
        node: NodeId,
    ) -> Result<&mut ContainerElement, DockError> {
        let element = self.node_mut(node)?;
        match &mut element.kind {
            DockElementKind::Container(container) => Ok(container),
            _ => Err(DockError::NotAContainer {
                id: element.id.clone(),
            }),
        }
    }

    pub(crate) fn frame_mut(&mut self, node: NodeId) -> Result<&mut FrameElement, DockError> {
        let element = self.node_mut(node)?;
        match &mut element.kind {
            DockElementKind::Frame(frame) => Ok(frame),
            _ => Err(DockError::NotAFrame {
                id: element.id.clone(),
            }),
        }
    }

    fn id_of(&self, node: NodeId) -> String {
        self.nodes
            .get(&node)
            .map_or_else(|| format!("#{}", node.get()), |element| element.id.clone())
    }

    /// Register a detached frame element.
    pub fn create_frame(
        &mut self,
        id: impl Into<String>,
        size: Size,
        frame: FrameElement,
    ) -> Result<NodeId, DockError> {
        self.alloc(DockElement::new(id, size, DockElementKind::Frame(frame)))
    }

    pub(crate) fn alloc(&mut self, element: DockElement) -> Result<NodeId, DockError> {
        if self.index.contains_key(&element.id) {
            return Err(DockError::DuplicateElementId { id: element.id });
        }
        let node = self.next_id;
        self.next_id = self.next_id.checked_next()?;
        self.index.insert(element.id.clone(), node);
        self.nodes.insert(node, element);
        Ok(node)
    }

    pub(crate) fn alloc_container(
        &mut self,
        orientation: Orientation,
        size: Size,
    ) -> Result<NodeId, DockError> {
        let mut id = format!("container-{}", self.next_container);
        while self.index.contains_key(&id) {
            self.next_container += 1;
            id = format!("container-{}", self.next_container);
        }
        self.next_container += 1;
        self.alloc(DockElement::new(
            id,
            size,
            DockElementKind::Container(ContainerElement {
                orientation,
                children: Vec::new(),
            }),
        ))
    }

    fn delete(&mut self, node: NodeId) {
        if let Some(element) = self.nodes.remove(&node) {
            self.index.remove(&element.id);
        }
    }

    /// Drop a detached frame from the arena.
    pub fn discard(&mut self, node: NodeId) -> Result<DockElement, DockError> {
        let element = self.node(node)?;
        if !element.is_frame() {
            return Err(DockError::NotAFrame {
                id: element.id.clone(),
            });
        }
        if element.parent.is_some() {
            return Err(DockError::AlreadyAttached {
                id: element.id.clone(),
            });
        }
        let removed = self.nodes.remove(&node).ok_or(DockError::MissingNode { node })?;
        self.index.remove(&removed.id);
        Ok(removed)
    }

    /// Whether `node` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Whether `node` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|element| element.parent);
        }
        false
    }

    /// Whether the subtree at `node` holds the content.
    #[must_use]
    pub fn contains_content(&self, node: NodeId) -> bool {
        self.contains(node, self.content)
    }

    /// Insert a detached `element` beside `relative_to`.
    ///
    /// West/north insert before, east/south after. Inserting next to the
    /// root redirects to its first or last child while the root already has
    /// the required orientation (or at most one child); otherwise the root
    /// is wrapped in a new container. A parent with a different orientation
    /// and two or more children gets a new intermediate container around
    /// `relative_to`, which keeps `relative_to`'s saved size.
    pub fn add_structure_element(
        &mut self,
        relative_to: NodeId,
        element: NodeId,
        direction: CompassDirection,
    ) -> Result<(), DockError> {
        self.node(relative_to)?;
        let inserted = self.node(element)?;
        if inserted.parent.is_some() || element == self.root {
            return Err(DockError::AlreadyAttached {
                id: inserted.id.clone(),
            });
        }
        if !self.is_attached(relative_to) {
            return Err(DockError::NotAttached {
                id: self.id_of(relative_to),
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            relative_to = %self.id_of(relative_to),
            element = %self.id_of(element),
            %direction,
            "add structure element"
        );
        self.insert_relative(relative_to, element, direction)
    }

    fn insert_relative(
        &mut self,
        relative_to: NodeId,
        element: NodeId,
        direction: CompassDirection,
    ) -> Result<(), DockError> {
        let orientation = direction.orientation();

        if relative_to == self.root {
            let root = self.root;
            let container = self.container_mut(root)?;
            if container.orientation == orientation || container.children.len() <= 1 {
                let target = if direction.is_leading() {
                    container.children.first().copied()
                } else {
                    container.children.last().copied()
                };
                if let Some(child) = target {
                    return self.insert_relative(child, element, direction);
                }
                container.orientation = orientation;
                container.children.push(element);
                self.node_mut(element)?.parent = Some(root);
                return Ok(());
            }
            let size = self.node(root)?.size;
            let wrapper = self.alloc_container(orientation, size)?;
            self.container_mut(wrapper)?.children.push(root);
            self.node_mut(root)?.parent = Some(wrapper);
            self.root = wrapper;
            return self.insert_relative(root, element, direction);
        }

        let parent = self.node(relative_to)?.parent.ok_or_else(|| DockError::NotAttached {
            id: self.id_of(relative_to),
        })?;
        let container = self.container_mut(parent)?;
        if container.orientation == orientation || container.children.len() <= 1 {
            let index = container
                .children
                .iter()
                .position(|child| *child == relative_to)
                .ok_or(DockError::MissingNode { node: relative_to })?;
            let at = if direction.is_leading() { index } else { index + 1 };
            container.orientation = orientation;
            container.children.insert(at, element);
            self.node_mut(element)?.parent = Some(parent);
            return Ok(());
        }

        let size = self.node(relative_to)?.size;
        let wrapper = self.alloc_container(orientation, size)?;
        self.replace_child(parent, relative_to, wrapper)?;
        self.container_mut(wrapper)?.children.push(relative_to);
        self.node_mut(relative_to)?.parent = Some(wrapper);
        self.insert_relative(relative_to, element, direction)
    }

    /// Detach `element` from the structure, collapsing containers left with
    /// a single child. The element itself stays in the arena.
    pub fn remove_structure_element(&mut self, element: NodeId) -> Result<(), DockError> {
        if element == self.root {
            return Err(DockError::CannotRemoveRoot {
                id: self.id_of(element),
            });
        }
        if element == self.content {
            return Err(DockError::CannotRemoveContent);
        }
        let parent = self.node(element)?.parent.ok_or_else(|| DockError::NotAttached {
            id: self.id_of(element),
        })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(element = %self.id_of(element), "remove structure element");
        self.container_mut(parent)?
            .children
            .retain(|child| *child != element);
        self.node_mut(element)?.parent = None;
        self.collapse(parent)
    }

    fn collapse(&mut self, container: NodeId) -> Result<(), DockError> {
        let children = self.node(container)?.children().to_vec();
        if container == self.root {
            // A root holding a single container hands the root role over.
            if let [only] = children.as_slice() {
                let only = *only;
                if self.node(only)?.is_container() {
                    self.node_mut(only)?.parent = None;
                    self.root = only;
                    self.delete(container);
                }
            }
            return Ok(());
        }
        match children.as_slice() {
            [] => {
                self.remove_structure_element(container)?;
                self.delete(container);
            }
            [only] => {
                let only = *only;
                let size = self.node(container)?.size;
                let grand = self.node(container)?.parent.ok_or_else(|| {
                    DockError::NotAttached {
                        id: self.id_of(container),
                    }
                })?;
                self.replace_child(grand, container, only)?;
                let hoisted = self.node_mut(only)?;
                hoisted.parent = Some(grand);
                hoisted.size = size;
                self.delete(container);
                self.collapse(grand)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), DockError> {
        let container = self.container_mut(parent)?;
        let slot = container
            .children
            .iter_mut()
            .find(|child| **child == old)
            .ok_or(DockError::MissingNode { node: old })?;
        *slot = new;
        self.node_mut(new)?.parent = Some(parent);
        Ok(())
    }

    /// Position of `frame` relative to the content.
    ///
    /// Walks up from the content to the first ancestor whose subtree also
    /// holds the frame; the frame sits before or after the content's branch
    /// along that ancestor's orientation.
    pub fn frame_position(&self, frame: NodeId) -> Result<CompassDirection, DockError> {
        let mut branch = self.content;
        let mut parent = self.node(branch)?.parent;
        while let Some(ancestor) = parent {
            let element = self.node(ancestor)?;
            if let Some(container) = element.container() {
                let frame_index = container
                    .children
                    .iter()
                    .position(|child| self.contains(*child, frame));
                if let Some(frame_index) = frame_index {
                    let content_index = container
                        .children
                        .iter()
                        .position(|child| *child == branch)
                        .ok_or(DockError::MissingNode { node: branch })?;
                    if frame_index != content_index {
                        return Ok(CompassDirection::from_relation(
                            container.orientation,
                            frame_index < content_index,
                        ));
                    }
                }
            }
            branch = ancestor;
            parent = element.parent;
        }
        Err(DockError::UnknownFramePosition {
            id: self.id_of(frame),
        })
    }

    /// Check all structural invariants.
    pub fn validate(&self) -> Result<(), DockError> {
        let broken = |reason: String| Err(DockError::BrokenInvariant { reason });

        let Some(root) = self.nodes.get(&self.root) else {
            return broken(format!("root {} missing", self.root.get()));
        };
        if !root.is_container() {
            return broken(format!("root {:?} is not a container", root.id));
        }
        if root.parent.is_some() {
            return broken(format!("root {:?} has a parent", root.id));
        }

        let mut seen = 0_usize;
        let mut contents = 0_usize;
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            seen += 1;
            let Some(element) = self.nodes.get(&node) else {
                return broken(format!("child {} missing", node.get()));
            };
            if element.is_content() {
                contents += 1;
            }
            if let Some(container) = element.container() {
                if node != self.root && container.children.len() < 2 {
                    return broken(format!(
                        "container {:?} has {} children",
                        element.id,
                        container.children.len()
                    ));
                }
                for child in &container.children {
                    let parent = self.nodes.get(child).and_then(|c| c.parent);
                    if parent != Some(node) {
                        return broken(format!(
                            "child {} of {:?} does not point back",
                            child.get(),
                            element.id
                        ));
                    }
                    stack.push(*child);
                }
            }
            if seen > self.nodes.len() {
                return broken("cycle in dock tree".to_string());
            }
        }
        if contents != 1 || !self.is_attached(self.content) {
            return broken(format!("expected one attached content, found {contents}"));
        }

        for (node, element) in &self.nodes {
            if self.index.get(&element.id) != Some(node) {
                return broken(format!("index entry for {:?} is stale", element.id));
            }
            // Only frames may be detached.
            if *node != self.root && !element.is_frame() && !self.is_attached(*node) {
                return broken(format!("{:?} is detached", element.id));
            }
        }
        if self.index.len() != self.nodes.len() {
            return broken("index and arena sizes differ".to_string());
        }
        Ok(())
    }

    /// Rebuild from a fully linked arena (used by snapshot restore).
    pub(crate) fn from_parts(
        root: NodeId,
        content: NodeId,
        nodes: BTreeMap<NodeId, DockElement>,
    ) -> Result<Self, DockError> {
        let mut index = BTreeMap::new();
        for (node, element) in &nodes {
            if index.insert(element.id.clone(), *node).is_some() {
                return Err(DockError::DuplicateElementId {
                    id: element.id.clone(),
                });
            }
        }
        let next_id = match nodes.keys().next_back() {
            Some(last) => last.checked_next()?,
            None => NodeId::MIN,
        };
        let tree = Self {
            root,
            content,
            next_id,
            next_container: nodes.len() as u64,
            nodes,
            index,
        };
        tree.validate()?;
        Ok(tree)
    }
}
