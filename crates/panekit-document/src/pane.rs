#![forbid(unsafe_code)]

//! The document pane: tab groups, documents and the pane-wide selection.
//!
//! Exactly one pane is active at a time; its selected tab is the selected
//! document of the whole document pane. Every operation that can move the
//! selection ends with [`DocumentPane::notify_selection`], which compares
//! against the last reported document id so each real change is reported
//! once and reselecting the same document is silent.

use panekit_core::InstanceId;

use crate::config::DocumentPaneConfig;
use crate::document::DocumentData;
use crate::error::DocumentError;
use crate::events::DocumentPaneEvent;
use crate::structure::{PaneData, SplitData, StructureId, StructureTree};

#[derive(Debug, Clone)]
pub struct DocumentPane {
    instance: InstanceId,
    config: DocumentPaneConfig,
    pub(crate) tree: StructureTree,
    pub(crate) active: StructureId,
    last_selected: Option<String>,
    pub(crate) events: Vec<DocumentPaneEvent>,
}

impl Default for DocumentPane {
    fn default() -> Self {
        Self::new(DocumentPaneConfig::default())
    }
}

impl DocumentPane {
    #[must_use]
    pub fn new(config: DocumentPaneConfig) -> Self {
        let tree = StructureTree::new();
        let active = tree.root();
        Self::with_tree(config, tree, active)
    }

    pub(crate) fn with_tree(
        config: DocumentPaneConfig,
        tree: StructureTree,
        active: StructureId,
    ) -> Self {
        let last_selected = tree
            .pane(active)
            .ok()
            .and_then(PaneData::selected)
            .map(|document| document.id.clone());
        Self {
            instance: InstanceId::next(),
            config,
            tree,
            active,
            last_selected,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    #[must_use]
    pub const fn config(&self) -> &DocumentPaneConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DocumentPaneConfig) {
        self.config = config;
    }

    #[must_use]
    pub const fn tree(&self) -> &StructureTree {
        &self.tree
    }

    #[must_use]
    pub const fn root(&self) -> StructureId {
        self.tree.root()
    }

    #[must_use]
    pub const fn active_pane(&self) -> StructureId {
        self.active
    }

    #[must_use]
    pub fn panes(&self) -> Vec<StructureId> {
        self.tree.panes()
    }

    #[must_use]
    pub fn splits(&self) -> Vec<StructureId> {
        self.tree.splits()
    }

    pub fn pane_data(&self, pane: StructureId) -> Result<&PaneData, DocumentError> {
        self.tree.pane(pane)
    }

    pub fn split_data(&self, split: StructureId) -> Result<&SplitData, DocumentError> {
        self.tree.split(split)
    }

    /// All open documents in visual order.
    #[must_use]
    pub fn documents(&self) -> Vec<&DocumentData> {
        self.tree
            .documents()
            .into_iter()
            .map(|(_, document)| document)
            .collect()
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.tree.document_count()
    }

    #[must_use]
    pub fn document(&self, id: &str) -> Option<&DocumentData> {
        let pane = self.tree.pane_of(id)?;
        self.tree.pane(pane).ok()?.document(id)
    }

    #[must_use]
    pub fn pane_of(&self, id: &str) -> Option<StructureId> {
        self.tree.pane_of(id)
    }

    /// The selected tab of the active pane.
    #[must_use]
    pub fn selected_document(&self) -> Option<&DocumentData> {
        self.tree.pane(self.active).ok()?.selected()
    }

    /// Drain queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<DocumentPaneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Open a document in the active pane. An already open document is
    /// selected instead.
    pub fn open_document(&mut self, document: DocumentData) -> Result<StructureId, DocumentError> {
        let pane = self.active;
        self.open_document_in(pane, document)
    }

    /// Open a document in `pane`, or select it wherever it is already open.
    pub fn open_document_in(
        &mut self,
        pane: StructureId,
        document: DocumentData,
    ) -> Result<StructureId, DocumentError> {
        if let Some(existing) = self.tree.pane_of(&document.id) {
            self.select_document(&document.id)?;
            return Ok(existing);
        }
        let id = document.id.clone();
        let data = self.tree.pane_mut(pane)?;
        let index = data.push(document);
        data.select(index);
        self.active = pane;
        #[cfg(feature = "tracing")]
        tracing::debug!(document = %id, pane = pane.get(), "document opened");
        self.events.push(DocumentPaneEvent::Opened { document: id, pane });
        self.notify_selection();
        Ok(pane)
    }

    fn can_close(&self, document: &DocumentData) -> bool {
        self.config.closeable && document.closable
    }

    /// Close one document. Closing the last document of a pane other than
    /// the root merges that pane away.
    pub fn close_document(&mut self, id: &str) -> Result<DocumentData, DocumentError> {
        let document = self
            .document(id)
            .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?;
        if !self.can_close(document) {
            return Err(DocumentError::NotClosable { id: id.to_string() });
        }
        self.close_unchecked(id)
    }

    fn close_unchecked(&mut self, id: &str) -> Result<DocumentData, DocumentError> {
        let (pane, _, removed) = self.detach_document(id)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(document = id, pane = pane.get(), "document closed");
        self.events.push(DocumentPaneEvent::Closed {
            document: removed.id.clone(),
            pane,
        });
        self.merge_if_emptied(pane)?;
        self.notify_selection();
        Ok(removed)
    }

    /// Close every closable document; the rest stay open.
    pub fn close_all(&mut self) -> Result<Vec<DocumentData>, DocumentError> {
        self.close_matching(|_| true)
    }

    /// Close every closable document except `id`.
    pub fn close_others(&mut self, id: &str) -> Result<Vec<DocumentData>, DocumentError> {
        if self.tree.pane_of(id).is_none() {
            return Err(DocumentError::MissingDocument { id: id.to_string() });
        }
        self.close_matching(|document| document.id != id)
    }

    fn close_matching(
        &mut self,
        mut filter: impl FnMut(&DocumentData) -> bool,
    ) -> Result<Vec<DocumentData>, DocumentError> {
        let ids: Vec<String> = self
            .tree
            .documents()
            .into_iter()
            .filter(|(_, document)| self.can_close(document) && filter(document))
            .map(|(_, document)| document.id.clone())
            .collect();
        let mut closed = Vec::with_capacity(ids.len());
        for id in ids {
            closed.push(self.close_unchecked(&id)?);
        }
        Ok(closed)
    }

    /// Select a document and activate its pane.
    pub fn select_document(&mut self, id: &str) -> Result<(), DocumentError> {
        let pane = self
            .tree
            .pane_of(id)
            .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?;
        let data = self.tree.pane_mut(pane)?;
        if let Some(index) = data.index_of(id) {
            data.select(index);
        }
        self.active = pane;
        self.notify_selection();
        Ok(())
    }

    /// Make `pane` the active tab group, as when it gains focus.
    pub fn activate_pane(&mut self, pane: StructureId) -> Result<(), DocumentError> {
        self.tree.pane(pane)?;
        self.active = pane;
        self.notify_selection();
        Ok(())
    }

    /// Apply an edit to an open document and post
    /// [`DocumentPaneEvent::DocumentChanged`] for its pane. Tab order and
    /// selection are left alone.
    pub fn update_document(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut DocumentData),
    ) -> Result<(), DocumentError> {
        let pane = self
            .tree
            .pane_of(id)
            .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?;
        let current = self
            .tree
            .pane(pane)?
            .document(id)
            .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?;
        let mut updated = current.clone();
        edit(&mut updated);
        if updated == *current {
            return Ok(());
        }
        let renamed = updated.id != id;
        if renamed && self.tree.pane_of(&updated.id).is_some() {
            return Err(DocumentError::DuplicateDocument { id: updated.id });
        }

        let document = updated.id.clone();
        if let Some(slot) = self.tree.pane_mut(pane)?.document_mut(id) {
            *slot = updated;
        }
        self.events
            .push(DocumentPaneEvent::DocumentChanged { document, pane });
        if renamed {
            self.notify_selection();
        }
        Ok(())
    }

    /// Remove a document from its pane without events or merging.
    pub(crate) fn detach_document(
        &mut self,
        id: &str,
    ) -> Result<(StructureId, usize, DocumentData), DocumentError> {
        let missing = || DocumentError::MissingDocument { id: id.to_string() };
        let pane = self.tree.pane_of(id).ok_or_else(missing)?;
        let data = self.tree.pane_mut(pane)?;
        let index = data.index_of(id).ok_or_else(missing)?;
        let document = data.remove(index).ok_or_else(missing)?;
        Ok((pane, index, document))
    }

    /// Merge `pane` away if it is empty and not the root.
    pub(crate) fn merge_if_emptied(&mut self, pane: StructureId) -> Result<(), DocumentError> {
        let emptied = self.tree.pane(pane).is_ok_and(PaneData::is_empty);
        if emptied && pane != self.tree.root() {
            self.merge(pane)?;
        }
        Ok(())
    }

    /// Report a selection change if the selected document differs from the
    /// last one reported.
    pub(crate) fn notify_selection(&mut self) {
        let current = self.selected_document().map(|document| document.id.clone());
        if current != self.last_selected {
            let previous = std::mem::replace(&mut self.last_selected, current.clone());
            #[cfg(feature = "tracing")]
            tracing::trace!(?previous, ?current, "selection changed");
            self.events
                .push(DocumentPaneEvent::SelectionChanged { previous, current });
        }
    }
}
