use std::collections::HashMap;

use crate::error::NotFound;
use crate::ids::{FieldId, RecordId, ViewId};
use crate::piece::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewItemKind {
    /// Projection of a schema field.
    Field(FieldId),
    /// Zero bits private to this view.
    Reserved,
}

/// One item of a [`ViewRecord`], placed in the view's own bit layout.
#[derive(Debug, Clone)]
pub struct ViewItem {
    pub(crate) name: String,
    pub(crate) kind: ViewItemKind,
    pub(crate) bit_len: usize,
    pub(crate) pieces: Vec<Piece>,
}

impl ViewItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ViewItemKind {
        self.kind
    }

    pub fn field(&self) -> Option<FieldId> {
        match self.kind {
            ViewItemKind::Field(id) => Some(id),
            ViewItemKind::Reserved => None,
        }
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('_')
    }

    /// Lowest bit offset among the item's pieces.
    pub fn offset(&self) -> usize {
        self.pieces.iter().map(Piece::offset).min().unwrap_or(0)
    }
}

/// A record as seen through a [`View`].
#[derive(Debug, Clone)]
pub struct ViewRecord {
    pub(crate) record: RecordId,
    pub(crate) name: String,
    pub(crate) bit_len: usize,
    pub(crate) items: Vec<ViewItem>,
    pub(crate) item_index: HashMap<String, usize>,
}

impl ViewRecord {
    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn byte_len(&self) -> usize {
        bit_span::byte_len(self.bit_len)
    }

    pub fn items(&self) -> &[ViewItem] {
        &self.items
    }

    pub fn item_position(&self, name: &str) -> Result<usize, NotFound> {
        self.item_index
            .get(name)
            .copied()
            .ok_or_else(|| NotFound::new("item", name, &self.name))
    }

    pub fn item(&self, name: &str) -> Result<&ViewItem, NotFound> {
        self.item_position(name).map(|i| &self.items[i])
    }
}

/// A named re-projection of the map's records into a bit layout.
#[derive(Debug, Clone)]
pub struct View {
    pub(crate) id: ViewId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) records: Vec<ViewRecord>,
    pub(crate) record_index: HashMap<String, usize>,
}

impl View {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_main(&self) -> bool {
        self.id.0 == 0
    }

    pub fn records(&self) -> &[ViewRecord] {
        &self.records
    }

    pub fn record(&self, name: &str) -> Result<&ViewRecord, NotFound> {
        self.record_index
            .get(name)
            .map(|&i| &self.records[i])
            .ok_or_else(|| NotFound::new("record", name, &self.name))
    }
}
