use std::collections::HashMap;

use crate::error::NotFound;
use crate::ids::{FieldId, RecordId};

/// A named, fixed-length group of fields.
#[derive(Debug, Clone)]
pub struct Record {
    pub(crate) id: RecordId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) data_type: i32,
    pub(crate) bit_len: usize,
    pub(crate) fields: Vec<FieldId>,
    pub(crate) field_index: HashMap<String, FieldId>,
}

impl Record {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Application-defined record type tag.
    pub fn data_type(&self) -> i32 {
        self.data_type
    }

    /// Sum of the bit lengths of the record's items.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn byte_len(&self) -> usize {
        bit_span::byte_len(self.bit_len)
    }

    /// Items in declaration order.
    pub fn field_ids(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn field_id(&self, name: &str) -> Result<FieldId, NotFound> {
        self.field_index
            .get(name)
            .copied()
            .ok_or_else(|| NotFound::new("field", name, &self.name))
    }
}
