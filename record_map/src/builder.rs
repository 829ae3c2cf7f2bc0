//! Definitions a [`Map`] is built from.
//!
//! Definitions are plain data; nothing is checked until
//! [`MapBuilder::build`], which either returns a fully validated map or an
//! error naming the offending record, field or view.

use bit_span::{BitOrder, ByteOrder};

use crate::error::Result;
use crate::kind::{EnumItem, FieldKind, Radix};
use crate::map::{Map, Version};

/// Definition of one record item.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: Option<String>,
    pub(crate) description: String,
    pub(crate) bit_len: usize,
    pub(crate) kind: FieldKind,
    pub(crate) pieces: Option<Vec<(usize, usize)>>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind, bit_len: usize) -> Self {
        Self {
            name: Some(name.into()),
            description: String::new(),
            bit_len,
            kind,
            pieces: None,
        }
    }

    /// Reserved bits, auto-named `RUF_<offset>`.
    pub fn reserved(bit_len: usize) -> Self {
        Self {
            name: None,
            description: String::new(),
            bit_len,
            kind: FieldKind::Reserved,
            pieces: None,
        }
    }

    /// A one-bit boolean labelled `True`/`False`.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::boolean(), 1)
    }

    pub fn integer(name: impl Into<String>, bits: usize) -> Self {
        Self::new(name, FieldKind::Integer { radix: Radix::Decimal }, bits)
    }

    pub fn currency(name: impl Into<String>, bits: usize) -> Self {
        Self::new(name, FieldKind::Currency, bits)
    }

    pub fn date(name: impl Into<String>, bits: usize) -> Self {
        Self::new(name, FieldKind::Date, bits)
    }

    pub fn time(name: impl Into<String>, bits: usize) -> Self {
        Self::new(name, FieldKind::Time, bits)
    }

    pub fn bit_array(name: impl Into<String>, bits: usize) -> Self {
        Self::new(name, FieldKind::BitArray, bits)
    }

    pub fn byte_array(name: impl Into<String>, bits: usize) -> Self {
        Self::new(name, FieldKind::ByteArray, bits)
    }

    pub fn integer_array(name: impl Into<String>, element_bits: usize, count: usize) -> Self {
        Self::new(
            name,
            FieldKind::IntegerArray {
                element_bits,
                count,
            },
            element_bits.saturating_mul(count),
        )
    }

    pub fn enumeration(
        name: impl Into<String>,
        bits: usize,
        items: impl IntoIterator<Item = EnumItem>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Enumeration {
                inverted: false,
                items: items.into_iter().collect(),
            },
            bits,
        )
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Overrides the bit length.
    pub fn bits(mut self, bit_len: usize) -> Self {
        self.bit_len = bit_len;
        self
    }

    /// Custom labels of a Boolean field. Ignored for other kinds.
    pub fn labels(mut self, true_label: impl Into<String>, false_label: impl Into<String>) -> Self {
        if let FieldKind::Boolean { .. } = self.kind {
            self.kind = FieldKind::Boolean {
                true_label: true_label.into(),
                false_label: false_label.into(),
            };
        }
        self
    }

    /// Hexadecimal display for an Integer field. Ignored for other kinds.
    pub fn hex(mut self) -> Self {
        if let FieldKind::Integer { radix } = &mut self.kind {
            *radix = Radix::Hex;
        }
        self
    }

    /// Stores an Enumeration field bit-inverted. Ignored for other kinds.
    pub fn inverted(mut self) -> Self {
        if let FieldKind::Enumeration { inverted, .. } = &mut self.kind {
            *inverted = true;
        }
        self
    }

    /// Explicit `(offset, len)` placement in the record's bit layout, in
    /// concatenation order. Without it the field follows the previous one.
    pub fn pieces(mut self, spans: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.pieces = Some(spans.into_iter().collect());
        self
    }
}

/// Definition of one record.
#[derive(Debug, Clone)]
pub struct RecordDef {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) data_type: i32,
    pub(crate) fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data_type: 0,
            fields: Vec::new(),
        }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn data_type(mut self, tag: i32) -> Self {
        self.data_type = tag;
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ViewItemDef {
    Field { name: String, bits: Option<usize> },
    Reserved(usize),
}

/// Items of one record inside an alternative view, laid out in the order
/// they are added.
#[derive(Debug, Clone)]
pub struct ViewRecordBuilder {
    pub(crate) record: String,
    pub(crate) items: Vec<ViewItemDef>,
}

impl ViewRecordBuilder {
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            items: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.items.push(ViewItemDef::Field {
            name: name.into(),
            bits: None,
        });
        self
    }

    /// Projects a field with a narrower width than its schema declaration.
    pub fn field_bits(mut self, name: impl Into<String>, bits: usize) -> Self {
        self.items.push(ViewItemDef::Field {
            name: name.into(),
            bits: Some(bits),
        });
        self
    }

    /// View-private zero padding, auto-named `ZERO_<offset>`.
    pub fn reserved(mut self, bits: usize) -> Self {
        self.items.push(ViewItemDef::Reserved(bits));
        self
    }
}

/// Definition of an alternative view.
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) records: Vec<ViewRecordBuilder>,
}

impl ViewBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            records: Vec::new(),
        }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn record(mut self, record: ViewRecordBuilder) -> Self {
        self.records.push(record);
        self
    }
}

/// Fluent front end of [`Map::new`].
///
/// ```
/// use record_map::{FieldDef, MapBuilder, RecordDef};
///
/// let map = MapBuilder::new("Card")
///     .record(
///         RecordDef::new("Header")
///             .field(FieldDef::boolean("flag"))
///             .field(FieldDef::integer("code", 7)),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(map.record("Header").unwrap().bit_len(), 8);
/// assert_eq!(map.main_view().name(), "Main");
/// ```
#[derive(Debug, Clone)]
pub struct MapBuilder {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) version: Version,
    pub(crate) byte_order: ByteOrder,
    pub(crate) bit_order: BitOrder,
    pub(crate) records: Vec<RecordDef>,
    pub(crate) main_view_name: String,
    pub(crate) main_view_description: String,
    pub(crate) views: Vec<ViewBuilder>,
}

impl MapBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: Version::new(1, 0, 0),
            byte_order: ByteOrder::Big,
            bit_order: BitOrder::Msb0,
            records: Vec::new(),
            main_view_name: "Main".to_string(),
            main_view_description: String::new(),
            views: Vec::new(),
        }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn bit_order(mut self, order: BitOrder) -> Self {
        self.bit_order = order;
        self
    }

    pub fn record(mut self, record: RecordDef) -> Self {
        self.records.push(record);
        self
    }

    pub fn main_view(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.main_view_name = name.into();
        self.main_view_description = description.into();
        self
    }

    pub fn view(mut self, view: ViewBuilder) -> Self {
        self.views.push(view);
        self
    }

    pub fn build(self) -> Result<Map> {
        Map::new(
            self.name,
            self.description,
            self.version,
            self.byte_order,
            self.bit_order,
            self.records,
            self.main_view_name,
            self.main_view_description,
            self.views,
        )
    }
}
