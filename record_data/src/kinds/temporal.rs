use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use super::Codec;
use crate::error::Result;
use crate::format::{DATE_PATTERN, TIME_PATTERN};
use crate::value::{FieldValue, ValueClass};

/// Days from 0001-01-01 (day 1) to the 2000-01-01 epoch of Date fields.
const EPOCH_DAYS_FROM_CE: i32 = 730_120;

const MINUTES_PER_DAY: u64 = 24 * 60;

fn date_at(codec: &Codec<'_>, offset: u64) -> Result<NaiveDate> {
    i32::try_from(offset)
        .ok()
        .and_then(|days| days.checked_add(EPOCH_DAYS_FROM_CE))
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| codec.overflow(offset))
}

fn offset_of(codec: &Codec<'_>, date: NaiveDate) -> Result<Vec<u8>> {
    let days = date.num_days_from_ce() - EPOCH_DAYS_FROM_CE;
    let days = u64::try_from(days).map_err(|_| codec.overflow(date))?;
    codec.write_uint(days)
}

/// Offset 0 is the unset date.
pub(super) fn decode_date(codec: &Codec<'_>, raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    let offset = codec.read_uint(raw)?;
    match class {
        ValueClass::Date if offset == 0 => Ok(FieldValue::Null),
        ValueClass::Date => Ok(FieldValue::Date(date_at(codec, offset)?)),
        ValueClass::Int => Ok(FieldValue::Int(codec.read_int(raw)?)),
        ValueClass::Text if offset == 0 => Ok(FieldValue::Text(String::new())),
        ValueClass::Text => Ok(FieldValue::Text(
            date_at(codec, offset)?.format(DATE_PATTERN).to_string(),
        )),
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode_date(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    match value {
        FieldValue::Null => codec.write_uint(0),
        FieldValue::Date(date) => offset_of(codec, *date),
        FieldValue::DateTime(at) => offset_of(codec, at.date()),
        FieldValue::Text(text) if text.trim().is_empty() => codec.write_uint(0),
        FieldValue::Text(text) => {
            let date = NaiveDate::parse_from_str(text.trim(), DATE_PATTERN)
                .map_err(|_| codec.unparsable(text, "dd/mm/yyyy date"))?;
            offset_of(codec, date)
        }
        other => Err(codec.reject(other)),
    }
}

fn time_at(codec: &Codec<'_>, minutes: u64) -> Result<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return Err(codec.overflow(minutes));
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
        .ok_or_else(|| codec.overflow(minutes))
}

fn minutes_of(codec: &Codec<'_>, time: NaiveTime) -> Result<Vec<u8>> {
    codec.write_uint(u64::from(time.hour() * 60 + time.minute()))
}

/// Time fields hold minutes since midnight.
pub(super) fn decode_time(codec: &Codec<'_>, raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    let minutes = codec.read_uint(raw)?;
    match class {
        ValueClass::Time => Ok(FieldValue::Time(time_at(codec, minutes)?)),
        ValueClass::Int => Ok(FieldValue::Int(codec.read_int(raw)?)),
        ValueClass::Text => Ok(FieldValue::Text(
            time_at(codec, minutes)?.format(TIME_PATTERN).to_string(),
        )),
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode_time(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    match value {
        FieldValue::Time(time) => minutes_of(codec, *time),
        FieldValue::DateTime(at) => minutes_of(codec, at.time()),
        FieldValue::Int(minutes) => match u64::try_from(*minutes) {
            Ok(m) if m < MINUTES_PER_DAY => codec.write_uint(m),
            _ => Err(codec.overflow(minutes)),
        },
        FieldValue::Text(text) => {
            let time = NaiveTime::parse_from_str(text.trim(), TIME_PATTERN)
                .map_err(|_| codec.unparsable(text, "HH:mm time"))?;
            minutes_of(codec, time)
        }
        other => Err(codec.reject(other)),
    }
}
