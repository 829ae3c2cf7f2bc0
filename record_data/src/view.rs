use std::collections::HashMap;

use record_map::{NotFound, ViewId};

use crate::error::Result;
use crate::record::RecordData;

/// Live records of one view.
#[derive(Debug)]
pub struct ViewData {
    id: ViewId,
    name: String,
    records: Vec<RecordData>,
    index: HashMap<String, usize>,
}

impl ViewData {
    pub(crate) fn new(id: ViewId, name: String, records: Vec<RecordData>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name().to_string(), i))
            .collect();
        Self {
            id,
            name,
            records,
            index,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[RecordData] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [RecordData] {
        &mut self.records
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| NotFound::new("record", name, &self.name).into())
    }

    pub fn record(&self, name: &str) -> Result<&RecordData> {
        let i = self.position(name)?;
        Ok(&self.records[i])
    }

    pub fn record_mut(&mut self, name: &str) -> Result<&mut RecordData> {
        let i = self.position(name)?;
        Ok(&mut self.records[i])
    }
}
