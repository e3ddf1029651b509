//! `.dbf` attribute table decoding (spec §4.6, §4.7).
//!
//! Delegated to the `dbase` crate by the teacher; here it is CORE (spec §2),
//! so it gets the same byteorder-driven treatment as the SHP/SHX decoders
//! rather than an external dependency (see `DESIGN.md`). Field layout is
//! grounded in `examples/jblindsay-whitebox-tools/src/vector/shapefile/attributes.rs`,
//! which lays out the same 32-byte header/field-descriptor shape from
//! scratch, without a crate, albeit more roughly than what follows.

use crate::error::{Error, Result};
use crate::primitive::{read_fixed_string, read_u16_le, read_u32_le, read_u8};
use crate::ByteSource;

const DBF_HEADER_RECORD_COUNT_OFFSET: u64 = 4;
const DBF_FIELD_DESCRIPTORS_OFFSET: u64 = 32;
const FIELD_TERMINATOR: u8 = 0x0D;
const DELETION_FLAG_LIVE: u8 = 0x20;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: char,
    pub size: u8,
    pub decimals: u8,
}

#[derive(Debug, Copy, Clone)]
pub struct DbfHeader {
    pub record_count: u32,
    pub header_size: u16,
    pub record_size: u16,
}

pub struct DbfHeaderDecoder;

impl DbfHeaderDecoder {
    /// Reads the header and field schema, checking the record count against
    /// the SHX-implied total (spec §8 property 2).
    pub fn read(src: &mut dyn ByteSource, tot_records: u64) -> Result<(DbfHeader, Vec<FieldDescriptor>)> {
        src.seek(DBF_HEADER_RECORD_COUNT_OFFSET)?;
        let record_count = read_u32_le(src)?;
        if u64::from(record_count) != tot_records {
            return Err(Error::DbfMismatched {
                dbf: record_count,
                shx: tot_records as u32,
            });
        }
        let header_size = read_u16_le(src)?;
        let record_size = read_u16_le(src)?;

        src.seek(DBF_FIELD_DESCRIPTORS_OFFSET)?;
        let mut fields = Vec::new();
        while src.tell()? + 1 < u64::from(header_size) {
            let name = read_fixed_string(src, 11)?;
            let kind = read_u8(src)? as char;
            src.skip(4)?;
            let size = read_u8(src)?;
            let decimals = read_u8(src)?;
            src.skip(14)?;
            fields.push(FieldDescriptor { name, kind, size, decimals });
        }

        let terminator = read_u8(src)?;
        if terminator != FIELD_TERMINATOR {
            return Err(Error::DbfInvalid("missing 0x0D field descriptor terminator"));
        }

        Ok((DbfHeader { record_count, header_size, record_size }, fields))
    }
}

/// One decoded attribute value (spec §3 AttributeRow).
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Text(_) => None,
        }
    }
}

/// An ordered mapping from field name to typed value, prefixed by the
/// synthetic `_deleted` key (spec §3 AttributeRow).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeRow {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeRow {
    fn new(deleted: bool) -> Self {
        AttributeRow {
            entries: vec![("_deleted".to_string(), AttributeValue::Bool(deleted))],
        }
    }

    fn push(&mut self, name: String, value: AttributeValue) {
        self.entries.push((name, value));
    }

    pub fn deleted(&self) -> bool {
        matches!(self.entries[0].1, AttributeValue::Bool(b) if b)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

pub struct DbfRecordDecoder;

impl DbfRecordDecoder {
    pub fn read(
        src: &mut dyn ByteSource,
        header: &DbfHeader,
        fields: &[FieldDescriptor],
        ordinal: u64,
        dbf_size: u64,
    ) -> Result<AttributeRow> {
        let record_size = u64::from(header.record_size);
        let position = u64::from(header.header_size) + (ordinal - 1) * record_size;
        if position > dbf_size.saturating_sub(record_size) + 1 {
            return Err(Error::DbfEofReached);
        }

        src.seek(position)?;
        let deletion_flag = read_u8(src)?;
        let mut row = AttributeRow::new(deletion_flag != DELETION_FLAG_LIVE);

        for field in fields {
            let raw = read_fixed_string(src, field.size as usize)?;
            let value = coerce_field(field.kind, raw);
            row.push(field.name.clone(), value);
        }

        Ok(row)
    }
}

fn coerce_field(kind: char, raw: String) -> AttributeValue {
    match kind {
        'D' => AttributeValue::Text(parse_dbf_date(&raw).unwrap_or(raw)),
        'L' => {
            let truthy = raw
                .chars()
                .next()
                .is_some_and(|c| matches!(c, 'Y' | 'y' | 'T' | 't'));
            AttributeValue::Bool(truthy)
        }
        _ => AttributeValue::Text(raw),
    }
}

/// Parses a `YYYYMMDD` date field into ISO `YYYY-MM-DD`, per spec §4.7.
/// Returns `None` if the raw value is not a well-formed calendar date, in
/// which case the caller falls back to the raw trimmed string.
fn parse_dbf_date(raw: &str) -> Option<String> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: u32 = raw[0..4].parse().ok()?;
    let month: u32 = raw[4..6].parse().ok()?;
    let day: u32 = raw[6..8].parse().ok()?;
    if month == 0 || month > 12 || day == 0 || day > days_in_month(year, month) {
        return None;
    }
    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}
