use bit_span::{
    BitOrder, ByteOrder, copy_bits, is_zero, new_buffer, pad_len, sub_bits, to_bit_string,
    value_offset,
};
use record_map::{EnumItem, Field, FieldId, FieldKind, Map, Piece, ViewItem};
use record_source::RecordSource;

use crate::error::{DataError, Result};
use crate::format::FormatConfig;
use crate::kinds::{self, Codec, RESERVED};
use crate::record::RecordData;
use crate::value::{FieldValue, ValueClass};

/// Binding of one view item to the source of its record.
///
/// Items are transferred as aligned value buffers: `byte_len(bit_len)` bytes
/// with the item's bits at [`value_offset`] and every other bit clear.
#[derive(Debug, Clone)]
pub struct ItemData {
    name: String,
    field: Option<FieldId>,
    reserved: bool,
    bit_len: usize,
    /// Placement in the view's bit layout.
    pieces: Vec<Piece>,
    byte_order: ByteOrder,
    bit_order: BitOrder,
    hidden: bool,
}

impl ItemData {
    pub(crate) fn new(map: &Map, item: &ViewItem) -> Self {
        let field = item.field();
        Self {
            name: item.name().to_string(),
            field,
            reserved: field.is_none_or(|id| map.field_by_id(id).is_reserved()),
            bit_len: item.bit_len(),
            pieces: item.pieces().to_vec(),
            byte_order: map.byte_order(),
            bit_order: map.bit_order(),
            hidden: item.is_hidden(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema field this item projects; `None` for view padding.
    pub fn field(&self) -> Option<FieldId> {
        self.field
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn byte_len(&self) -> usize {
        bit_span::byte_len(self.bit_len)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Lowest bit offset of the item in its view record.
    pub fn offset(&self) -> usize {
        self.pieces.iter().map(Piece::offset).min().unwrap_or(0)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    pub(crate) fn kind<'m>(&self, map: &'m Map) -> &'m FieldKind {
        match self.field {
            Some(id) => map.field_by_id(id).kind(),
            None => &RESERVED,
        }
    }

    /// Where a narrowed item's bits sit inside its field's value buffer:
    /// the trailing bits under `Msb0`, the leading bits under `Lsb0`.
    fn narrow_offset(&self, field_bits: usize) -> usize {
        let skip = match self.bit_order {
            BitOrder::Msb0 => field_bits - self.bit_len,
            BitOrder::Lsb0 => 0,
        };
        value_offset(self.bit_order, field_bits) + skip
    }

    fn read_field(&self, field: &Field, source: &dyn RecordSource) -> Result<Vec<u8>> {
        let mut buf = new_buffer(field.bit_len());
        let mut cursor = value_offset(self.bit_order, field.bit_len());
        for piece in field.pieces() {
            source.get_piece(piece, self.bit_order, &mut buf, cursor)?;
            cursor += piece.len();
        }
        Ok(buf)
    }

    pub(crate) fn read(&self, map: &Map, source: &dyn RecordSource) -> Result<Vec<u8>> {
        let field = match self.field {
            Some(id) if !self.reserved => map.field_by_id(id),
            _ => return Ok(new_buffer(self.bit_len)),
        };
        let full = self.read_field(field, source)?;
        if field.bit_len() == self.bit_len {
            return Ok(full);
        }
        Ok(sub_bits(
            self.bit_order,
            &full,
            self.narrow_offset(field.bit_len()),
            self.bit_len,
        )?)
    }

    fn check_value(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.byte_len() {
            return Err(DataError::Length {
                field: self.name.clone(),
                expected: self.byte_len(),
                actual: value.len(),
                unit: "bytes",
            });
        }
        let start = value_offset(self.bit_order, self.bit_len);
        let pad = pad_len(self.bit_len);
        let outside_clear = is_zero(self.bit_order, value, 0, start)?
            && is_zero(self.bit_order, value, start + self.bit_len, pad - start)?;
        if !outside_clear {
            return Err(DataError::Overflow {
                field: self.name.clone(),
                value: format!("0x{}", hex::encode_upper(value)),
                bits: self.bit_len,
            });
        }
        if self.reserved && !is_zero(self.bit_order, value, start, self.bit_len)? {
            return Err(DataError::ReservedNotZero {
                field: self.name.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn write(&self, map: &Map, source: &mut dyn RecordSource, value: &[u8]) -> Result<()> {
        self.check_value(value)?;
        let Some(id) = self.field else {
            return Ok(());
        };
        let field = map.field_by_id(id);
        let order = self.bit_order;

        let full = if field.bit_len() == self.bit_len {
            value.to_vec()
        } else {
            let mut full = self.read_field(field, &*source)?;
            copy_bits(
                order,
                value,
                value_offset(order, self.bit_len),
                &mut full,
                self.narrow_offset(field.bit_len()),
                self.bit_len,
            )?;
            full
        };

        let mut cursor = value_offset(order, field.bit_len());
        for piece in field.pieces() {
            source.set_piece(piece, order, &full, cursor)?;
            cursor += piece.len();
        }
        Ok(())
    }
}

/// Typed read access to one item of a [`RecordData`].
#[derive(Clone, Copy)]
pub struct ItemRef<'a> {
    record: &'a RecordData,
    item: &'a ItemData,
}

impl<'a> ItemRef<'a> {
    pub(crate) fn new(record: &'a RecordData, item: &'a ItemData) -> Self {
        Self { record, item }
    }

    pub fn data(&self) -> &'a ItemData {
        self.item
    }

    pub fn name(&self) -> &'a str {
        self.item.name()
    }

    pub fn kind(&self) -> &'a FieldKind {
        self.item.kind(self.record.map())
    }

    pub fn is_hidden(&self) -> bool {
        self.item.is_hidden()
    }

    pub(crate) fn codec(&self) -> Codec<'a> {
        codec_for(self.record.map(), self.record.config(), self.item)
    }

    /// The item's aligned value buffer.
    pub fn get_bytes(&self) -> Result<Vec<u8>> {
        self.item.read(self.record.map(), self.record.source())
    }

    /// Decodes the item into `class`, if its kind produces that shape.
    pub fn get_as(&self, class: ValueClass) -> Result<FieldValue> {
        let raw = self.get_bytes()?;
        kinds::decode(&self.codec(), &raw, class)
    }

    pub fn text(&self) -> Result<String> {
        Ok(self
            .get_as(ValueClass::Text)?
            .into_text()
            .unwrap_or_default())
    }

    /// Stored value of an enumeration with its table entry, or the
    /// `Invalid` sentinel when the value is not in the table. `None` for
    /// other kinds.
    pub fn enumerated(&self) -> Result<Option<(i64, EnumItem)>> {
        match self.kind() {
            FieldKind::Enumeration { inverted, items } => {
                let raw = self.get_bytes()?;
                kinds::enumeration_entry(&self.codec(), &raw, *inverted, items).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// `name = text [bits]` diagnostic line.
    pub fn render(&self) -> Result<String> {
        let raw = self.get_bytes()?;
        let codec = self.codec();
        let text = kinds::decode(&codec, &raw, ValueClass::Text)?
            .into_text()
            .unwrap_or_default();
        let order = self.item.bit_order();
        let bits = to_bit_string(
            order,
            &raw,
            value_offset(order, self.item.bit_len()),
            self.item.bit_len(),
        )?;
        Ok(format!("{} = {} [{}]", self.item.name(), text, bits))
    }
}

/// Typed write access to one item of a [`RecordData`].
pub struct ItemMut<'a> {
    record: &'a mut RecordData,
    index: usize,
}

impl<'a> ItemMut<'a> {
    pub(crate) fn new(record: &'a mut RecordData, index: usize) -> Self {
        Self { record, index }
    }

    pub fn reader(&self) -> ItemRef<'_> {
        ItemRef::new(&*self.record, &self.record.items[self.index])
    }

    pub fn set_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.record.write_item(self.index, value)
    }

    /// Encodes `value`, if the item's kind accepts its shape, and stores it.
    pub fn set_with(&mut self, value: impl Into<FieldValue>) -> Result<()> {
        let raw = kinds::encode(&self.reader().codec(), &value.into())?;
        self.set_bytes(&raw)
    }
}

pub(crate) fn codec_for<'a>(map: &'a Map, config: &'a FormatConfig, item: &'a ItemData) -> Codec<'a> {
    Codec {
        name: item.name(),
        kind: item.kind(map),
        bits: item.bit_len(),
        byte_order: item.byte_order(),
        bit_order: item.bit_order(),
        config,
    }
}
