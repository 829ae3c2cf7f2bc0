//! First construction step: wires definitions into the map's arenas and
//! places every piece. Rule checking is left to [`crate::validate`].

use std::collections::HashMap;

use crate::builder::{FieldDef, RecordDef, ViewBuilder, ViewItemDef, ViewRecordBuilder};
use crate::error::{Result, SchemaError};
use crate::field::Field;
use crate::ids::{FieldId, RecordId, ViewId};
use crate::map::Map;
use crate::piece::{Piece, PieceOwner};
use crate::record::Record;
use crate::sequence::FieldSequence;
use crate::view::{View, ViewItem, ViewItemKind, ViewRecord};

pub(crate) fn engage(
    map: &mut Map,
    records: Vec<RecordDef>,
    main_view_name: String,
    main_view_description: String,
    views: Vec<ViewBuilder>,
) -> Result<()> {
    if map.name.trim().is_empty() {
        return Err(SchemaError::EmptyName(map.name.clone()));
    }

    for def in records {
        engage_record(map, def)?;
    }

    let main = main_view(map, main_view_name, main_view_description);
    map.view_index.insert(main.name.clone(), main.id);
    map.views.push(main);

    for builder in views {
        if map.view_index.contains_key(&builder.name) {
            return Err(SchemaError::DuplicateView {
                map: map.name.clone(),
                view: builder.name,
            });
        }
        let view = engage_view(map, ViewId(map.views.len()), builder)?;
        map.view_index.insert(view.name.clone(), view.id);
        map.views.push(view);
    }

    Ok(())
}

fn engage_record(map: &mut Map, def: RecordDef) -> Result<()> {
    if map.record_index.contains_key(&def.name) {
        return Err(SchemaError::DuplicateRecord {
            map: map.name.clone(),
            record: def.name,
        });
    }

    let id = RecordId(map.records.len());
    let mut seq = FieldSequence::new();
    let mut fields = Vec::with_capacity(def.fields.len());
    let mut field_index = HashMap::with_capacity(def.fields.len());

    for field_def in def.fields {
        let field = engage_field(id, &def.name, FieldId(map.fields.len()), field_def, &mut seq)?;
        if field_index.insert(field.name.clone(), field.id).is_some() {
            return Err(SchemaError::DuplicateField {
                record: def.name,
                field: field.name,
            });
        }
        fields.push(field.id);
        map.fields.push(field);
    }

    let mut bit_len = 0usize;
    for field_id in &fields {
        let field = &map.fields[field_id.0];
        bit_len = bit_len
            .checked_add(field.bit_len)
            .ok_or_else(|| SchemaError::LayoutOverflow {
                record: def.name.clone(),
                field: field.name.clone(),
            })?;
    }
    map.record_index.insert(def.name.clone(), id);
    map.records.push(Record {
        id,
        name: def.name,
        description: def.description,
        data_type: def.data_type,
        bit_len,
        fields,
        field_index,
    });
    Ok(())
}

fn engage_field(
    record: RecordId,
    record_name: &str,
    id: FieldId,
    def: FieldDef,
    seq: &mut FieldSequence,
) -> Result<Field> {
    let owner = PieceOwner::Field(id);
    let first = match &def.pieces {
        Some(spans) => spans.iter().map(|&(offset, _)| offset).min().unwrap_or(0),
        None => seq.position(),
    };
    let name = def.name.unwrap_or_else(|| format!("RUF_{first}"));
    let overflow = || SchemaError::LayoutOverflow {
        record: record_name.to_string(),
        field: name.clone(),
    };

    let pieces: Vec<Piece> = match def.pieces {
        Some(spans) => {
            let mut pieces = Vec::with_capacity(spans.len());
            for (index, &(offset, len)) in spans.iter().enumerate() {
                let end = offset.checked_add(len).ok_or_else(overflow)?;
                seq.skip_past(end);
                pieces.push(Piece::new(offset, len, index, owner));
            }
            pieces
        }
        None => vec![seq.piece(def.bit_len, 0, owner).ok_or_else(overflow)?],
    };

    Ok(Field {
        id,
        record,
        name,
        description: def.description,
        bit_len: def.bit_len,
        pieces,
        kind: def.kind,
    })
}

fn view_record(record: RecordId, name: String, bit_len: usize, items: Vec<ViewItem>) -> ViewRecord {
    let item_index = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.name.clone(), i))
        .collect();
    ViewRecord {
        record,
        name,
        bit_len,
        items,
        item_index,
    }
}

/// The main view mirrors every record's own field order and pieces.
fn main_view(map: &Map, name: String, description: String) -> View {
    let id = ViewId(0);
    let records: Vec<ViewRecord> = map
        .records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let items = record
                .fields
                .iter()
                .enumerate()
                .map(|(item, &field_id)| {
                    let field = &map.fields[field_id.0];
                    let owner = PieceOwner::ViewItem {
                        view: id,
                        record: position,
                        item,
                    };
                    ViewItem {
                        name: field.name.clone(),
                        kind: ViewItemKind::Field(field_id),
                        bit_len: field.bit_len,
                        pieces: field.pieces.iter().map(|p| p.with_owner(owner)).collect(),
                    }
                })
                .collect();
            view_record(record.id, record.name.clone(), record.bit_len, items)
        })
        .collect();

    View {
        id,
        name,
        description,
        record_index: index_of(&records),
        records,
    }
}

fn engage_view(map: &Map, id: ViewId, builder: ViewBuilder) -> Result<View> {
    let mut records = Vec::with_capacity(builder.records.len());
    for (position, record_builder) in builder.records.into_iter().enumerate() {
        let record = engage_view_record(map, id, &builder.name, position, record_builder)?;
        if records.iter().any(|r: &ViewRecord| r.name == record.name) {
            return Err(SchemaError::DuplicateRecord {
                map: builder.name,
                record: record.name,
            });
        }
        records.push(record);
    }

    Ok(View {
        id,
        name: builder.name,
        description: builder.description,
        record_index: index_of(&records),
        records,
    })
}

fn engage_view_record(
    map: &Map,
    view: ViewId,
    view_name: &str,
    position: usize,
    builder: ViewRecordBuilder,
) -> Result<ViewRecord> {
    let record = map
        .record(&builder.record)
        .map_err(|_| SchemaError::UnknownRecord {
            view: view_name.to_string(),
            record: builder.record.clone(),
        })?;

    let mut seq = FieldSequence::new();
    let mut items: Vec<ViewItem> = Vec::with_capacity(builder.items.len());

    for (item, def) in builder.items.into_iter().enumerate() {
        let owner = PieceOwner::ViewItem {
            view,
            record: position,
            item,
        };
        let engaged = match def {
            ViewItemDef::Field { name, bits } => {
                let field_id = record
                    .field_id(&name)
                    .map_err(|_| SchemaError::UnknownField {
                        view: view_name.to_string(),
                        record: record.name.clone(),
                        field: name.clone(),
                    })?;
                if items.iter().any(|i| i.name == name) {
                    return Err(SchemaError::DuplicateViewItem {
                        view: view_name.to_string(),
                        record: record.name.clone(),
                        field: name,
                    });
                }
                let field_bits = map.fields[field_id.0].bit_len;
                let bit_len = bits.unwrap_or(field_bits);
                if bit_len == 0 || bit_len > field_bits {
                    return Err(SchemaError::ViewFieldWidth {
                        view: view_name.to_string(),
                        record: record.name.clone(),
                        field: name,
                        bits: bit_len,
                        field_bits,
                    });
                }
                let piece = place(&mut seq, bit_len, owner, view_name, &record.name, &name)?;
                ViewItem {
                    name,
                    kind: ViewItemKind::Field(field_id),
                    bit_len,
                    pieces: vec![piece],
                }
            }
            ViewItemDef::Reserved(bit_len) => {
                let name = format!("ZERO_{}", seq.position());
                let piece = place(&mut seq, bit_len, owner, view_name, &record.name, &name)?;
                ViewItem {
                    name,
                    kind: ViewItemKind::Reserved,
                    bit_len,
                    pieces: vec![piece],
                }
            }
        };
        items.push(engaged);
    }

    Ok(view_record(record.id, record.name.clone(), seq.position(), items))
}

fn place(
    seq: &mut FieldSequence,
    bit_len: usize,
    owner: PieceOwner,
    view: &str,
    record: &str,
    item: &str,
) -> Result<Piece> {
    seq.piece(bit_len, 0, owner)
        .ok_or_else(|| SchemaError::ViewItemRule {
            view: view.to_string(),
            error: Box::new(SchemaError::LayoutOverflow {
                record: record.to_string(),
                field: item.to_string(),
            }),
        })
}

fn index_of(records: &[ViewRecord]) -> HashMap<String, usize> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name.clone(), i))
        .collect()
}
