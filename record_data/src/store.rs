use std::sync::Arc;

use log::debug;
use record_map::Map;
use record_source::Source;

use crate::error::Result;
use crate::format::FormatConfig;
use crate::record::RecordData;
use crate::view::ViewData;

/// Every view of a map bound to one storage source.
///
/// The whole tree is built eagerly: one [`ViewData`] per view, one
/// [`RecordData`] per view record, one item binding per view item. Not
/// synchronised; callers serialise access to one store.
///
/// ```
/// use std::sync::Arc;
///
/// use record_data::{StoreData, ValueClass};
/// use record_map::{FieldDef, MapBuilder, RecordDef};
/// use record_source::ImageSource;
///
/// let map = Arc::new(
///     MapBuilder::new("Card")
///         .record(
///             RecordDef::new("Header")
///                 .field(FieldDef::boolean("flag"))
///                 .field(FieldDef::integer("code", 7)),
///         )
///         .build()
///         .unwrap(),
/// );
/// let source = ImageSource::in_memory(&map);
/// let mut store = StoreData::new(map, source).unwrap();
///
/// let header = store.record_mut("Header").unwrap();
/// header.set("flag", true).unwrap();
/// header.set("code", 42).unwrap();
///
/// assert_eq!(header.get_bytes().unwrap(), vec![0b1010_1010]);
/// assert_eq!(header.item("code").unwrap().text().unwrap(), "42");
/// assert!(header.get("flag", ValueClass::Date).is_err());
/// ```
#[derive(Debug)]
pub struct StoreData<S: Source> {
    map: Arc<Map>,
    config: Arc<FormatConfig>,
    source: S,
    views: Vec<ViewData>,
}

impl<S: Source> StoreData<S> {
    pub fn new(map: Arc<Map>, source: S) -> Result<Self> {
        Self::with_config(map, source, FormatConfig::default())
    }

    pub fn with_config(map: Arc<Map>, source: S, config: FormatConfig) -> Result<Self> {
        let config = Arc::new(config);
        let mut views = Vec::with_capacity(map.views().len());
        for view in map.views() {
            let mut records = Vec::with_capacity(view.records().len());
            for record in view.records() {
                let bound = source.record(record.name())?;
                records.push(RecordData::new(
                    Arc::clone(&map),
                    Arc::clone(&config),
                    view.id(),
                    record,
                    bound,
                ));
            }
            views.push(ViewData::new(view.id(), view.name().to_string(), records));
        }

        debug!(
            "store for map {:?} v{}: {} views bound",
            map.name(),
            map.version(),
            views.len()
        );
        Ok(Self {
            map,
            config,
            source,
            views,
        })
    }

    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Direct access to the backend, for lifecycle calls the [`Source`]
    /// trait does not cover.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Main view first, then alternative views in declaration order.
    pub fn views(&self) -> &[ViewData] {
        &self.views
    }

    fn position(&self, name: &str) -> Result<usize> {
        let view = self.map.view(name)?;
        Ok(view.id().index())
    }

    pub fn view(&self, name: &str) -> Result<&ViewData> {
        let i = self.position(name)?;
        Ok(&self.views[i])
    }

    pub fn view_mut(&mut self, name: &str) -> Result<&mut ViewData> {
        let i = self.position(name)?;
        Ok(&mut self.views[i])
    }

    pub fn main_view(&self) -> &ViewData {
        &self.views[0]
    }

    pub fn main_view_mut(&mut self) -> &mut ViewData {
        &mut self.views[0]
    }

    /// A record of the main view.
    pub fn record(&self, name: &str) -> Result<&RecordData> {
        self.main_view().record(name)
    }

    /// A record of the main view.
    pub fn record_mut(&mut self, name: &str) -> Result<&mut RecordData> {
        self.main_view_mut().record_mut(name)
    }

    pub fn media_id(&self) -> Vec<u8> {
        self.source.media_id()
    }

    pub fn is_active(&self) -> bool {
        self.source.is_active()
    }

    pub fn clear_caches(&mut self) {
        self.source.clear_caches();
    }

    pub fn flush(&mut self, force: bool) -> Result<()> {
        Ok(self.source.flush(force)?)
    }

    /// Releases the tree and hands the source back.
    pub fn into_source(self) -> S {
        self.source
    }
}

