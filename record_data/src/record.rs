use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bit_span::{BitOrder, ByteOrder, byte_len, copy_bits, is_zero, new_buffer, value_offset};
use record_map::{Map, NotFound, RecordId, ViewId, ViewRecord};
use record_source::RecordSource;

use crate::error::{DataError, Result};
use crate::format::FormatConfig;
use crate::item::{ItemData, ItemMut, ItemRef};
use crate::value::{FieldValue, ValueClass};

/// Live data of one record as laid out by one view.
pub struct RecordData {
    map: Arc<Map>,
    config: Arc<FormatConfig>,
    view: ViewId,
    record: RecordId,
    name: String,
    bit_len: usize,
    byte_order: ByteOrder,
    bit_order: BitOrder,
    source: Box<dyn RecordSource>,
    pub(crate) items: Vec<ItemData>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordData")
            .field("name", &self.name)
            .field("view", &self.view)
            .field("bit_len", &self.bit_len)
            .field("source", &self.source.describe())
            .field("items", &self.items.len())
            .finish()
    }
}

impl RecordData {
    pub(crate) fn new(
        map: Arc<Map>,
        config: Arc<FormatConfig>,
        view: ViewId,
        record: &ViewRecord,
        source: Box<dyn RecordSource>,
    ) -> Self {
        let items: Vec<ItemData> = record
            .items()
            .iter()
            .map(|item| ItemData::new(&map, item))
            .collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name().to_string(), i))
            .collect();
        Self {
            byte_order: map.byte_order(),
            bit_order: map.bit_order(),
            map,
            config,
            view,
            record: record.record(),
            name: record.name().to_string(),
            bit_len: record.bit_len(),
            source,
            items,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_id(&self) -> RecordId {
        self.record
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn byte_len(&self) -> usize {
        byte_len(self.bit_len)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn source(&self) -> &dyn RecordSource {
        &*self.source
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Every item, hidden ones included, in view order.
    pub fn items(&self) -> impl Iterator<Item = ItemRef<'_>> {
        self.items.iter().map(move |item| ItemRef::new(self, item))
    }

    /// Items whose name does not start with `_`.
    pub fn visible_items(&self) -> impl Iterator<Item = ItemRef<'_>> {
        self.items().filter(|item| !item.is_hidden())
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| NotFound::new("item", name, &self.name).into())
    }

    pub fn item(&self, name: &str) -> Result<ItemRef<'_>> {
        let i = self.position(name)?;
        Ok(ItemRef::new(self, &self.items[i]))
    }

    pub fn item_mut(&mut self, name: &str) -> Result<ItemMut<'_>> {
        let i = self.position(name)?;
        Ok(ItemMut::new(self, i))
    }

    /// Shorthand for `item(name)?.get_as(class)`.
    pub fn get(&self, name: &str, class: ValueClass) -> Result<FieldValue> {
        self.item(name)?.get_as(class)
    }

    /// Shorthand for `item_mut(name)?.set_with(value)`.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.item_mut(name)?.set_with(value)
    }

    pub(crate) fn write_item(&mut self, index: usize, value: &[u8]) -> Result<()> {
        let RecordData {
            map, items, source, ..
        } = self;
        items[index].write(map, &mut **source, value)
    }

    /// The whole record assembled from its items, in this view's layout.
    pub fn get_bytes(&self) -> Result<Vec<u8>> {
        let order = self.bit_order;
        let mut buf = new_buffer(self.bit_len);
        for item in &self.items {
            let value = item.read(&self.map, &*self.source)?;
            let mut cursor = value_offset(order, item.bit_len());
            for piece in item.pieces() {
                copy_bits(order, &value, cursor, &mut buf, piece.offset(), piece.len())?;
                cursor += piece.len();
            }
        }
        Ok(buf)
    }

    /// Splits `bytes` across the items. Every reserved item is checked to be
    /// zero before anything is written.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.byte_len() {
            return Err(DataError::Length {
                field: self.name.clone(),
                expected: self.byte_len(),
                actual: bytes.len(),
                unit: "bytes",
            });
        }

        let order = self.bit_order;
        let mut values = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let mut value = new_buffer(item.bit_len());
            let start = value_offset(order, item.bit_len());
            let mut cursor = start;
            for piece in item.pieces() {
                copy_bits(order, bytes, piece.offset(), &mut value, cursor, piece.len())?;
                cursor += piece.len();
            }
            if item.is_reserved() && !is_zero(order, &value, start, item.bit_len())? {
                return Err(DataError::ReservedNotZero {
                    field: item.name().to_string(),
                });
            }
            values.push(value);
        }

        for (index, value) in values.iter().enumerate() {
            self.write_item(index, value)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.source.flush()?)
    }
}
