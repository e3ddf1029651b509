//! Joins geometry and attribute records by ordinal (spec §4.9, §5).
//!
//! Peek-then-advance discipline mirrors the `IteratorState` state machine in
//! `geozero-shp/src/reader.rs`'s `ShapeIterator`, but exposes ordinal-based
//! random access (via the `.shx` index) rather than a forward-only
//! `Iterator`, since spec §5 calls for `seek`/`rewind` as well as `next`.

use crate::dbf::{AttributeRow, DbfHeader, DbfRecordDecoder, FieldDescriptor};
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::header::ShapeKind;
use crate::shp_record::{ShpRecordDecoder, SuppressFlags};
use crate::shx::ShxIndex;
use crate::ByteSource;

/// The output shape a caller wants out of [`RecordCursor::read`] (spec §5).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    GeometryStruct,
    Wkt,
    GeoJsonGeometry,
    GeoJsonFeature,
}

/// Per-dataset configuration (spec §10.2): no process-wide state, just the
/// handful of knobs that change how records are decoded and rendered.
#[derive(Debug, Copy, Clone, Default)]
pub struct DatasetOptions {
    pub suppress_z: bool,
    pub suppress_m: bool,
    pub default_format: OutputFormat,
}

impl DatasetOptions {
    pub(crate) fn suppress_flags(&self) -> SuppressFlags {
        SuppressFlags {
            suppress_z: self.suppress_z,
            suppress_m: self.suppress_m,
        }
    }
}

/// One joined geometry + attribute record (spec §3 Record).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub geometry: Geometry,
    pub attributes: AttributeRow,
}

/// A [`Record`] already rendered into the format the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutput {
    Struct(Record),
    Wkt(String),
    GeoJsonGeometry(String),
    GeoJsonFeature(String),
}

/// Reads joined geometry/attribute records by 1-based ordinal.
///
/// `current` tracks the ordinal the cursor would read next; `None` means
/// end-of-dataset. `read`/`take` never run past `tot_records` and never wrap.
pub struct RecordCursor<'a> {
    shp: &'a mut dyn ByteSource,
    shx_src: &'a mut dyn ByteSource,
    shx_index: &'a ShxIndex,
    dbf_src: &'a mut dyn ByteSource,
    dbf_header: &'a DbfHeader,
    dbf_fields: &'a [FieldDescriptor],
    dbf_size: u64,
    declared_kind: ShapeKind,
    flags: SuppressFlags,
    current: Option<u64>,
}

impl<'a> RecordCursor<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        shp: &'a mut dyn ByteSource,
        shx_src: &'a mut dyn ByteSource,
        shx_index: &'a ShxIndex,
        dbf_src: &'a mut dyn ByteSource,
        dbf_header: &'a DbfHeader,
        dbf_fields: &'a [FieldDescriptor],
        dbf_size: u64,
        declared_kind: ShapeKind,
        options: DatasetOptions,
    ) -> Self {
        let current = if shx_index.tot_records() > 0 { Some(1) } else { None };
        RecordCursor {
            shp,
            shx_src,
            shx_index,
            dbf_src,
            dbf_header,
            dbf_fields,
            dbf_size,
            declared_kind,
            flags: options.suppress_flags(),
            current,
        }
    }

    /// Returns to the first record, or to end-of-dataset if it's empty.
    pub fn rewind(&mut self) {
        self.current = if self.shx_index.tot_records() > 0 { Some(1) } else { None };
    }

    /// Advances to the following ordinal, or to end-of-dataset past the last one.
    pub fn next(&mut self) {
        self.current = self.current.and_then(|ordinal| {
            let next = ordinal + 1;
            (next <= self.shx_index.tot_records()).then_some(next)
        });
    }

    /// Jumps directly to ordinal `i` (1-based).
    pub fn seek(&mut self, i: u64) -> Result<()> {
        if i == 0 || i > self.shx_index.tot_records() {
            return Err(Error::IndexOutOfRange(i as i64));
        }
        self.current = Some(i);
        Ok(())
    }

    pub fn current_record(&self) -> Option<u64> {
        self.current
    }

    fn decode_current(&mut self, ordinal: u64) -> Result<Record> {
        let entry = self.shx_index.entry(self.shx_src, ordinal)?;
        self.shp.seek(entry.shp_offset)?;
        let (_, geometry) = ShpRecordDecoder::read(self.shp, self.declared_kind, self.flags)?;
        let attributes = DbfRecordDecoder::read(
            self.dbf_src,
            self.dbf_header,
            self.dbf_fields,
            ordinal,
            self.dbf_size,
        )?;
        Ok(Record { geometry, attributes })
    }

    /// Reads the current record without advancing. Returns `None` at
    /// end-of-dataset, matching the `Iterator::next` convention without
    /// actually being one (calling `read` twice in a row returns the same
    /// record).
    pub fn read(&mut self, format: OutputFormat) -> Option<Result<RecordOutput>> {
        let ordinal = self.current?;
        let kind = self.declared_kind;
        let flags = self.flags;
        Some(
            self.decode_current(ordinal)
                .map(|record| render(record, format, kind, flags)),
        )
    }

    /// Reads the current record, then advances (spec §5 `take`).
    pub fn take(&mut self, format: OutputFormat) -> Option<Result<RecordOutput>> {
        let out = self.read(format);
        self.next();
        out
    }
}

fn render(record: Record, format: OutputFormat, kind: ShapeKind, flags: SuppressFlags) -> RecordOutput {
    match format {
        OutputFormat::GeometryStruct => RecordOutput::Struct(record),
        OutputFormat::Wkt => RecordOutput::Wkt(crate::wkt::to_wkt(&record.geometry, kind, flags)),
        OutputFormat::GeoJsonGeometry => RecordOutput::GeoJsonGeometry(crate::geojson::to_geometry_json(
            &record.geometry,
            kind,
            flags,
        )),
        OutputFormat::GeoJsonFeature => RecordOutput::GeoJsonFeature(crate::geojson::to_feature_json(
            &record.geometry,
            &record.attributes,
            kind,
            flags,
        )),
    }
}
