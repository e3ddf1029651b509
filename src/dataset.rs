//! Wires the three per-dataset sources (`.shp`/`.shx`/`.dbf`) plus an
//! optional `.prj` together into one handle, and hands out [`RecordCursor`]s
//! over them (spec §5, §11).
//!
//! Grounded on `geozero-shp/src/reader.rs`'s `Reader<T>`: a `new` from a bare
//! source, `add_index_source`/`add_dbf_source` to attach the companion
//! files, and a `from_path` convenience that probes for `.shx`/`.dbf`
//! siblings without failing immediately if one is absent -- the error only
//! surfaces once something actually needs it.

use crate::byte_source::StreamSource;
use crate::cursor::{DatasetOptions, RecordCursor};
use crate::dbf::{DbfHeader, DbfHeaderDecoder, FieldDescriptor};
use crate::error::{Error, Result};
use crate::header::{Header, ShpHeaderDecoder};
use crate::shx::ShxIndex;
use crate::ByteSource;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

struct ShxAttachment {
    source: Box<dyn ByteSource>,
    index: ShxIndex,
}

struct DbfAttachment {
    source: Box<dyn ByteSource>,
    header: DbfHeader,
    fields: Vec<FieldDescriptor>,
    size: u64,
}

/// A Shapefile dataset: the mandatory `.shp` geometry stream plus whichever
/// of `.shx`/`.dbf`/`.prj` have been attached.
pub struct Dataset {
    shp: Box<dyn ByteSource>,
    header: Header,
    shx: Option<ShxAttachment>,
    dbf: Option<DbfAttachment>,
    prj: Option<String>,
    pub options: DatasetOptions,
}

impl Dataset {
    /// Reads the `.shp` header from `source` and holds onto it as the
    /// dataset's geometry stream. No companion files are attached yet.
    pub fn new(mut source: Box<dyn ByteSource>) -> Result<Self> {
        let header = ShpHeaderDecoder::read(source.as_mut())?;
        Ok(Dataset {
            shp: source,
            header,
            shx: None,
            dbf: None,
            prj: None,
            options: DatasetOptions::default(),
        })
    }

    /// Attaches a `.shx` index, which a later [`Dataset::add_dbf_source`]
    /// and [`Dataset::cursor`] both depend on for the total record count.
    pub fn add_index_source(&mut self, mut source: Box<dyn ByteSource>) -> Result<()> {
        let size = source.size()?;
        let index = ShxIndex::from_file_size(size);
        self.shx = Some(ShxAttachment { source, index });
        Ok(())
    }

    /// Attaches a `.dbf` attribute source. Requires a `.shx` index to
    /// already be attached, since the DBF record count is cross-checked
    /// against it (spec §8 property 2).
    pub fn add_dbf_source(&mut self, mut source: Box<dyn ByteSource>) -> Result<()> {
        let tot_records = self
            .shx
            .as_ref()
            .ok_or_else(|| Error::FileNotFound(".shx index source must be attached before .dbf".to_string()))?
            .index
            .tot_records();
        let size = source.size()?;
        let (header, fields) = DbfHeaderDecoder::read(source.as_mut(), tot_records)?;
        self.dbf = Some(DbfAttachment { source, header, fields, size });
        Ok(())
    }

    /// Stores the verbatim contents of a `.prj` projection file (spec §11:
    /// passthrough only, no parsing or validation of the projection text).
    pub fn set_prj(&mut self, wkt: String) {
        self.prj = Some(wkt);
    }

    pub fn prj(&self) -> Option<&str> {
        self.prj.as_deref()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The attribute field schema, if a `.dbf` source has been attached
    /// (mirrors the teacher's `property_file` test's use of `dbase::Reader::fields`).
    pub fn dbf_fields(&self) -> Option<&[FieldDescriptor]> {
        self.dbf.as_ref().map(|d| d.fields.as_slice())
    }

    pub fn tot_records(&self) -> Option<u64> {
        self.shx.as_ref().map(|s| s.index.tot_records())
    }

    /// Builds a cursor over this dataset. Requires both `.shx` and `.dbf`
    /// to have been attached, since records are joined by ordinal across
    /// both.
    pub fn cursor(&mut self) -> Result<RecordCursor<'_>> {
        let shx = self
            .shx
            .as_mut()
            .ok_or_else(|| Error::FileNotFound(".shx index source not attached".to_string()))?;
        let dbf = self
            .dbf
            .as_mut()
            .ok_or_else(|| Error::FileNotFound(".dbf source not attached".to_string()))?;
        Ok(RecordCursor::new(
            self.shp.as_mut(),
            shx.source.as_mut(),
            &shx.index,
            dbf.source.as_mut(),
            &dbf.header,
            &dbf.fields,
            dbf.size,
            self.header.kind,
            self.options,
        ))
    }
}

impl Dataset {
    /// Opens a dataset from a `.shp` path, attaching `.shx`/`.dbf`/`.prj`
    /// siblings that exist alongside it. A missing companion file is not an
    /// error here -- it surfaces later, from whichever operation needed it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let shp_path = path.as_ref().to_path_buf();
        let shx_path = shp_path.with_extension("shx");
        let dbf_path = shp_path.with_extension("dbf");
        let prj_path = shp_path.with_extension("prj");

        let shp_file = File::open(&shp_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(shp_path.display().to_string())
            } else {
                Error::FileOpen(e)
            }
        })?;
        let mut dataset = Dataset::new(Box::new(StreamSource::new(BufReader::new(shp_file))))?;

        if shx_path.exists() {
            let shx_file = File::open(&shx_path).map_err(Error::FileOpen)?;
            dataset.add_index_source(Box::new(StreamSource::new(BufReader::new(shx_file))))?;
        }

        if dbf_path.exists() {
            let dbf_file = File::open(&dbf_path).map_err(Error::FileOpen)?;
            dataset.add_dbf_source(Box::new(StreamSource::new(BufReader::new(dbf_file))))?;
        }

        if prj_path.exists() {
            let contents = std::fs::read_to_string(&prj_path).map_err(Error::FileOpen)?;
            dataset.set_prj(contents);
        }

        Ok(dataset)
    }
}
