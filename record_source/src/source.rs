use bit_span::BitOrder;
use record_map::Piece;

use crate::error::Result;

/// A storage medium holding every record of one map.
pub trait Source {
    /// Identity of the medium. Always a fresh copy.
    fn media_id(&self) -> Vec<u8>;

    fn is_active(&self) -> bool;

    /// Drops anything the backend keeps cached between transfers.
    fn clear_caches(&mut self);

    /// Binds to the main-layout bytes of the named record.
    fn record(&self, name: &str) -> Result<Box<dyn RecordSource>>;

    /// Persists pending writes; `force` persists even when nothing changed.
    fn flush(&mut self, force: bool) -> Result<()>;
}

/// Bit transfers against one record's main bit layout.
///
/// A piece's offset is relative to the start of the record.
pub trait RecordSource {
    /// Copies the piece's bits into `dst` starting at bit `dst_offset`.
    fn get_piece(&self, piece: &Piece, order: BitOrder, dst: &mut [u8], dst_offset: usize)
    -> Result<()>;

    /// Copies bits of `src` starting at `src_offset` into the piece.
    fn set_piece(&mut self, piece: &Piece, order: BitOrder, src: &[u8], src_offset: usize)
    -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Short diagnostic label of the bound bytes.
    fn describe(&self) -> String;
}
