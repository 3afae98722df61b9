#![forbid(unsafe_code)]

//! Persisted split structure.
//!
//! Only document ids are stored. Restoring asks the host to resolve each id
//! back into [`DocumentData`]; ids it no longer knows are skipped, so a
//! saved layout survives documents that went away.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::DocumentPaneConfig;
use crate::document::DocumentData;
use crate::error::DocumentError;
use crate::pane::DocumentPane;
use crate::structure::{
    PaneData, SplitData, SplitOrientation, StructureId, StructureNode, StructureTree,
};

/// Current schema version for document pane snapshots.
pub const DOCUMENT_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureRecord {
    Pane {
        documents: Vec<String>,
        #[serde(default)]
        selected: Option<String>,
    },
    Split {
        orientation: SplitOrientation,
        divider_location: f64,
        first: Box<StructureRecord>,
        last: Box<StructureRecord>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPaneSnapshot {
    pub schema_version: u16,
    pub root: StructureRecord,
    /// Selected document of the whole document pane.
    #[serde(default)]
    pub selected: Option<String>,
}

impl DocumentPaneSnapshot {
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|err| DocumentError::InvalidSnapshot {
            reason: err.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|err| DocumentError::InvalidSnapshot {
            reason: err.to_string(),
        })
    }
}

impl DocumentPane {
    pub fn to_snapshot(&self) -> Result<DocumentPaneSnapshot, DocumentError> {
        Ok(DocumentPaneSnapshot {
            schema_version: DOCUMENT_SNAPSHOT_SCHEMA_VERSION,
            root: record(self.tree(), self.root())?,
            selected: self.selected_document().map(|document| document.id.clone()),
        })
    }

    /// Rebuild a document pane, resolving stored ids through `resolve`.
    pub fn from_snapshot(
        config: DocumentPaneConfig,
        snapshot: &DocumentPaneSnapshot,
        mut resolve: impl FnMut(&str) -> Option<DocumentData>,
    ) -> Result<Self, DocumentError> {
        if snapshot.schema_version != DOCUMENT_SNAPSHOT_SCHEMA_VERSION {
            return Err(DocumentError::InvalidSnapshot {
                reason: format!("unsupported schema version {}", snapshot.schema_version),
            });
        }

        let mut tree = StructureTree::new();
        let placeholder = tree.root();
        let mut seen = BTreeSet::new();
        let root = build(&mut tree, &snapshot.root, &mut resolve, &mut seen)?;
        tree.set_root(root);
        tree.remove(placeholder);
        tree.validate()?;

        let active = snapshot
            .selected
            .as_deref()
            .and_then(|id| tree.pane_of(id))
            .or_else(|| tree.find_closest_pane(root))
            .ok_or_else(|| DocumentError::InvalidSnapshot {
                reason: "snapshot holds no pane".to_string(),
            })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            panes = tree.panes().len(),
            documents = tree.document_count(),
            "document snapshot restored"
        );
        Ok(Self::with_tree(config, tree, active))
    }
}

fn record(tree: &StructureTree, node: StructureId) -> Result<StructureRecord, DocumentError> {
    match tree.get(node) {
        Some(StructureNode::Pane(pane)) => Ok(StructureRecord::Pane {
            documents: pane
                .documents()
                .iter()
                .map(|document| document.id.clone())
                .collect(),
            selected: pane.selected().map(|document| document.id.clone()),
        }),
        Some(StructureNode::Split(split)) => Ok(StructureRecord::Split {
            orientation: split.orientation,
            divider_location: split.divider_location,
            first: Box::new(record(tree, split.first)?),
            last: Box::new(record(tree, split.last)?),
        }),
        None => Err(DocumentError::MissingPane { node }),
    }
}

fn build(
    tree: &mut StructureTree,
    record: &StructureRecord,
    resolve: &mut impl FnMut(&str) -> Option<DocumentData>,
    seen: &mut BTreeSet<String>,
) -> Result<StructureId, DocumentError> {
    match record {
        StructureRecord::Pane {
            documents,
            selected,
        } => {
            let mut pane = PaneData::default();
            for id in documents {
                if !seen.insert(id.clone()) {
                    return Err(DocumentError::DuplicateDocument { id: id.clone() });
                }
                if let Some(document) = resolve(id) {
                    pane.push(document);
                }
            }
            if let Some(index) = selected.as_deref().and_then(|id| pane.index_of(id)) {
                pane.select(index);
            }
            tree.alloc(None, StructureNode::Pane(pane))
        }
        StructureRecord::Split {
            orientation,
            divider_location,
            first,
            last,
        } => {
            if !divider_location.is_finite() || !(0.0..=1.0).contains(divider_location) {
                return Err(DocumentError::InvalidSnapshot {
                    reason: format!("divider location {divider_location} outside 0..=1"),
                });
            }
            let first = build(tree, first, resolve, seen)?;
            let last = build(tree, last, resolve, seen)?;
            let split = tree.alloc(
                None,
                StructureNode::Split(SplitData {
                    orientation: *orientation,
                    divider_location: *divider_location,
                    first,
                    last,
                }),
            )?;
            tree.set_parent(first, Some(split));
            tree.set_parent(last, Some(split));
            Ok(split)
        }
    }
}
