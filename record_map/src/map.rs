use std::collections::HashMap;
use std::fmt;

use bit_span::{BitOrder, ByteOrder};
use log::{debug, warn};

use crate::builder::{RecordDef, ViewBuilder};
use crate::engage::engage;
use crate::error::{NotFound, Result};
use crate::field::Field;
use crate::ids::{FieldId, RecordId, ViewId};
use crate::record::Record;
use crate::validate::validate;
use crate::view::View;

/// `major.minor.release` schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub release: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, release: u16) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.release)
    }
}

/// A complete, validated record schema.
///
/// Records, fields and views live in flat arenas owned by the map; every
/// upward link is an index handle resolved through it. A `Map` is immutable
/// and `Send + Sync`, so one instance can be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Map {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) version: Version,
    pub(crate) byte_order: ByteOrder,
    pub(crate) bit_order: BitOrder,
    pub(crate) records: Vec<Record>,
    pub(crate) fields: Vec<Field>,
    pub(crate) views: Vec<View>,
    pub(crate) record_index: HashMap<String, RecordId>,
    pub(crate) view_index: HashMap<String, ViewId>,
}

impl Map {
    /// Engages the definitions into a map, then validates every rule.
    ///
    /// No partially built map is ever returned.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: Version,
        byte_order: ByteOrder,
        bit_order: BitOrder,
        records: Vec<RecordDef>,
        main_view_name: impl Into<String>,
        main_view_description: impl Into<String>,
        views: Vec<ViewBuilder>,
    ) -> Result<Self> {
        let mut map = Self {
            name: name.into(),
            description: description.into(),
            version,
            byte_order,
            bit_order,
            records: Vec::new(),
            fields: Vec::new(),
            views: Vec::new(),
            record_index: HashMap::new(),
            view_index: HashMap::new(),
        };

        let built = engage(
            &mut map,
            records,
            main_view_name.into(),
            main_view_description.into(),
            views,
        )
        .and_then(|()| validate(&map));

        match built {
            Ok(()) => {
                debug!(
                    "map {:?} v{}: {} records, {} fields, {} views",
                    map.name,
                    map.version,
                    map.records.len(),
                    map.fields.len(),
                    map.views.len()
                );
                Ok(map)
            }
            Err(e) => {
                warn!("map {:?} rejected: {}", map.name, e);
                Err(e)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Records in declaration order, which is also main-view order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, name: &str) -> std::result::Result<&Record, NotFound> {
        self.record_index
            .get(name)
            .map(|id| &self.records[id.0])
            .ok_or_else(|| NotFound::new("record", name, &self.name))
    }

    pub fn record_by_id(&self, id: RecordId) -> &Record {
        &self.records[id.0]
    }

    pub fn field(&self, record: &str, field: &str) -> std::result::Result<&Field, NotFound> {
        let id = self.record(record)?.field_id(field)?;
        Ok(&self.fields[id.0])
    }

    pub fn field_by_id(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields of `record` in declaration order.
    pub fn fields_of<'a>(&'a self, record: &'a Record) -> impl Iterator<Item = &'a Field> + 'a {
        record.fields.iter().map(move |id| &self.fields[id.0])
    }

    /// The physical storage layout. Always present.
    pub fn main_view(&self) -> &View {
        &self.views[0]
    }

    pub fn view(&self, name: &str) -> std::result::Result<&View, NotFound> {
        self.view_index
            .get(name)
            .map(|id| &self.views[id.0])
            .ok_or_else(|| NotFound::new("view", name, &self.name))
    }

    pub fn view_by_id(&self, id: ViewId) -> &View {
        &self.views[id.0]
    }

    /// Main view first, then alternative views in declaration order.
    pub fn views(&self) -> &[View] {
        &self.views
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn map_is_shareable() {
        assert_send_sync::<Map>();
    }

    #[test]
    fn version_display() {
        assert_eq!(Version::new(2, 10, 3).to_string(), "2.10.3");
        assert!(Version::new(1, 2, 0) < Version::new(1, 10, 0));
    }
}
