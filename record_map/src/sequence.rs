use crate::piece::{Piece, PieceOwner};

/// Cursor handing out consecutive, non-overlapping piece offsets.
///
/// The only place piece offsets are computed during map construction.
///
/// ```
/// use record_map::FieldSequence;
///
/// let mut seq = FieldSequence::new();
/// assert_eq!(seq.advance(3), Some(0));
/// assert_eq!(seq.advance(5), Some(3));
/// assert_eq!(seq.position(), 8);
/// assert_eq!(seq.advance(usize::MAX), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSequence {
    cursor: usize,
}

impl FieldSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bit position, i.e. the total length handed out so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Reserves `len` bits and returns their offset, or `None` when the
    /// span would run past `usize::MAX`. The cursor is unchanged on `None`.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        let offset = self.cursor;
        self.cursor = offset.checked_add(len)?;
        Some(offset)
    }

    /// Moves the cursor past an explicitly placed span, never backwards.
    pub(crate) fn skip_past(&mut self, end: usize) {
        self.cursor = self.cursor.max(end);
    }

    pub(crate) fn piece(&mut self, len: usize, index: usize, owner: PieceOwner) -> Option<Piece> {
        let offset = self.advance(len)?;
        Some(Piece::new(offset, len, index, owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FieldId;

    #[test]
    fn pieces_are_consecutive() {
        let mut seq = FieldSequence::new();
        let a = seq.piece(4, 0, PieceOwner::Field(FieldId(0))).unwrap();
        let b = seq.piece(12, 0, PieceOwner::Field(FieldId(1))).unwrap();
        assert_eq!((a.offset(), a.end()), (0, 4));
        assert_eq!((b.offset(), b.end()), (4, 16));
    }

    #[test]
    fn skip_never_rewinds() {
        let mut seq = FieldSequence::new();
        seq.advance(10).unwrap();
        seq.skip_past(4);
        assert_eq!(seq.position(), 10);
        seq.skip_past(20);
        assert_eq!(seq.position(), 20);
    }

    #[test]
    fn overflowing_advance_keeps_the_cursor() {
        let mut seq = FieldSequence::new();
        seq.advance(8).unwrap();
        assert_eq!(seq.advance(usize::MAX), None);
        assert!(seq.piece(usize::MAX - 7, 0, PieceOwner::Field(FieldId(0))).is_none());
        assert_eq!(seq.position(), 8);
    }
}
