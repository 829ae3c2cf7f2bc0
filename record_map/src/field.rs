use crate::ids::{FieldId, RecordId};
use crate::kind::{FieldKind, KindTag};
use crate::piece::Piece;

/// A typed, bit-addressed unit of data within a record.
///
/// Reserved-bit runs are fields too, with [`FieldKind::Reserved`].
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) record: RecordId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) bit_len: usize,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) kind: FieldKind,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// The record that owns this field.
    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn byte_len(&self) -> usize {
        bit_span::byte_len(self.bit_len)
    }

    /// Pieces in the record's main bit layout, in concatenation order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self.kind, FieldKind::Reserved)
    }

    /// Hidden fields are excluded from default listings but stay addressable.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('_')
    }

    /// Lowest bit offset among the field's pieces.
    pub fn first_offset(&self) -> usize {
        self.pieces.iter().map(Piece::offset).min().unwrap_or(0)
    }
}
