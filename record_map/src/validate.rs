//! Second construction step: every per-field, per-record and per-view rule.

use std::collections::HashSet;

use crate::error::{Result, SchemaError};
use crate::field::Field;
use crate::kind::{FieldKind, bits_for_count};
use crate::map::Map;
use crate::piece::Piece;
use crate::record::Record;
use crate::view::{View, ViewItemKind};

pub(crate) fn validate(map: &Map) -> Result<()> {
    for record in &map.records {
        validate_record(map, record)?;
    }
    for view in &map.views {
        validate_view(map, view)?;
    }
    Ok(())
}

fn validate_record(map: &Map, record: &Record) -> Result<()> {
    if record.fields.is_empty() {
        return Err(SchemaError::EmptyRecord(record.name.clone()));
    }

    let actual = total(map.fields_of(record).map(Field::bit_len)).unwrap_or(usize::MAX);
    if actual != record.bit_len {
        return Err(SchemaError::RecordLength {
            record: record.name.clone(),
            declared: record.bit_len,
            actual,
        });
    }

    let mut spans: Vec<(&Piece, &str)> = Vec::new();
    for field in map.fields_of(record) {
        validate_field(record, field)?;
        for piece in &field.pieces {
            if piece.end() > record.bit_len {
                return Err(SchemaError::PieceOutOfRecord {
                    record: record.name.clone(),
                    field: field.name.clone(),
                    offset: piece.offset(),
                    len: piece.len(),
                    record_bits: record.bit_len,
                });
            }
            spans.push((piece, field.name.as_str()));
        }
    }

    spans.sort_by_key(|(piece, _)| piece.offset());
    for pair in spans.windows(2) {
        let (first, first_name) = pair[0];
        let (second, second_name) = pair[1];
        if second.offset() < first.end() {
            return Err(SchemaError::PieceOverlap {
                record: record.name.clone(),
                first: first_name.to_string(),
                second: second_name.to_string(),
                offset: second.offset(),
            });
        }
    }
    Ok(())
}

fn validate_field(record: &Record, field: &Field) -> Result<()> {
    validate_width(&record.name, &field.name, &field.kind, field.bit_len)?;

    let pieces = total(field.pieces.iter().map(Piece::len)).ok_or_else(|| {
        SchemaError::LayoutOverflow {
            record: record.name.clone(),
            field: field.name.clone(),
        }
    })?;
    if pieces != field.bit_len {
        return Err(SchemaError::PieceLength {
            record: record.name.clone(),
            field: field.name.clone(),
            pieces,
            bits: field.bit_len,
        });
    }

    match &field.kind {
        FieldKind::Boolean {
            true_label,
            false_label,
        } if true_label.to_lowercase() == false_label.to_lowercase() => {
            Err(SchemaError::BooleanLabels {
                record: record.name.clone(),
                field: field.name.clone(),
                label: true_label.clone(),
            })
        }
        FieldKind::Enumeration { items, .. } => validate_enumeration(record, field, items),
        _ => Ok(()),
    }
}

/// Rules that depend only on a kind and a width. Applied to every schema
/// field and again to every view item that narrows one.
fn validate_width(record: &str, field: &str, kind: &FieldKind, bits: usize) -> Result<()> {
    let tag = kind.tag();
    let limits = tag.limits();
    if bits < limits.min || bits > limits.max {
        return Err(SchemaError::BitLength {
            record: record.to_string(),
            field: field.to_string(),
            kind: tag,
            bits,
            min: limits.min,
            max: limits.max,
        });
    }
    if bits % limits.modulo != 0 {
        return Err(SchemaError::BitModulo {
            record: record.to_string(),
            field: field.to_string(),
            kind: tag,
            bits,
            modulo: limits.modulo,
        });
    }

    match kind {
        FieldKind::Enumeration { items, .. } if !items.is_empty() => {
            let needed = bits_for_count(items.len());
            if bits < needed {
                return Err(SchemaError::EnumTooNarrow {
                    record: record.to_string(),
                    field: field.to_string(),
                    items: items.len(),
                    needed,
                    bits,
                });
            }
            Ok(())
        }
        FieldKind::IntegerArray {
            element_bits,
            count,
        } if !(1..=64).contains(element_bits)
            || *count == 0
            || element_bits.checked_mul(*count) != Some(bits) =>
        {
            Err(SchemaError::ArrayShape {
                record: record.to_string(),
                field: field.to_string(),
                element_bits: *element_bits,
                count: *count,
                bits,
            })
        }
        _ => Ok(()),
    }
}

fn total(mut lens: impl Iterator<Item = usize>) -> Option<usize> {
    lens.try_fold(0usize, usize::checked_add)
}

fn validate_enumeration(
    record: &Record,
    field: &Field,
    items: &[crate::kind::EnumItem],
) -> Result<()> {
    if items.is_empty() {
        return Err(SchemaError::EnumEmpty {
            record: record.name.clone(),
            field: field.name.clone(),
        });
    }
    let mut values = HashSet::with_capacity(items.len());
    let mut labels = HashSet::with_capacity(items.len());
    for item in items {
        if !values.insert(item.value) {
            return Err(SchemaError::EnumDuplicateValue {
                record: record.name.clone(),
                field: field.name.clone(),
                value: item.value,
            });
        }
        if !labels.insert(item.label.as_str()) {
            return Err(SchemaError::EnumDuplicateLabel {
                record: record.name.clone(),
                field: field.name.clone(),
                label: item.label.clone(),
            });
        }
    }
    Ok(())
}

fn validate_view(map: &Map, view: &View) -> Result<()> {
    for view_record in &view.records {
        let actual = total(view_record.items.iter().map(|i| i.bit_len)).unwrap_or(usize::MAX);
        if actual != view_record.bit_len {
            return Err(SchemaError::ViewRecordLength {
                view: view.name.clone(),
                record: view_record.name.clone(),
                declared: view_record.bit_len,
                actual,
            });
        }

        for item in &view_record.items {
            let pieces = total(item.pieces.iter().map(Piece::len)).unwrap_or(usize::MAX);
            if pieces != item.bit_len {
                return Err(SchemaError::PieceLength {
                    record: view_record.name.clone(),
                    field: item.name.clone(),
                    pieces,
                    bits: item.bit_len,
                });
            }
            if let ViewItemKind::Field(id) = item.kind {
                let field = &map.fields[id.0];
                if item.bit_len > field.bit_len {
                    return Err(SchemaError::ViewFieldWidth {
                        view: view.name.clone(),
                        record: view_record.name.clone(),
                        field: item.name.clone(),
                        bits: item.bit_len,
                        field_bits: field.bit_len,
                    });
                }
                if item.bit_len < field.bit_len {
                    validate_width(&view_record.name, &item.name, &field.kind, item.bit_len)
                        .map_err(|error| SchemaError::ViewItemRule {
                            view: view.name.clone(),
                            error: Box::new(error),
                        })?;
                }
            }
        }
    }
    Ok(())
}
