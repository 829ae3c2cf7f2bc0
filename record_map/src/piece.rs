use crate::ids::{FieldId, ViewId};

/// The item a [`Piece`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceOwner {
    /// A schema field, in its record's main bit layout.
    Field(FieldId),
    /// An item of a view record: `(view, record position, item position)`.
    ViewItem {
        view: ViewId,
        record: usize,
        item: usize,
    },
}

/// A contiguous bit span inside a record's bit layout.
///
/// A field's logical bit pattern is the concatenation of its pieces in
/// `index` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    offset: usize,
    len: usize,
    index: usize,
    owner: PieceOwner,
}

impl Piece {
    pub(crate) fn new(offset: usize, len: usize, index: usize, owner: PieceOwner) -> Self {
        Self {
            offset,
            len,
            index,
            owner,
        }
    }

    /// Copy of this piece re-parented to another owner.
    pub(crate) fn with_owner(self, owner: PieceOwner) -> Self {
        Self { owner, ..self }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last bit. Map construction rejects spans whose end does
    /// not fit in `usize`.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Position among the owner's pieces, starting at 0.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn owner(&self) -> PieceOwner {
        self.owner
    }
}
