//! Byte-level decoders for ESRI Shapefile (`.shp`/`.shx`/`.dbf`) datasets,
//! with WKT and GeoJSON emission.
//!
//! Reads a Shapefile's three files into a structured, strongly-typed
//! geometry and attribute model without going through a generic geospatial
//! abstraction layer: every decoder here speaks the Shapefile wire format
//! directly.

mod byte_source;
mod cursor;
mod dataset;
mod dbf;
mod error;
mod geojson;
mod geometry;
mod header;
mod polygon_orientation;
mod primitive;
mod shp_record;
mod shx;
mod wkt;

pub use crate::byte_source::{ByteSource, StreamSource};
pub use crate::cursor::{DatasetOptions, OutputFormat, Record, RecordCursor, RecordOutput};
pub use crate::dataset::Dataset;
pub use crate::dbf::{AttributeRow, AttributeValue, FieldDescriptor};
pub use crate::error::{Error, Result};
pub use crate::geometry::{Geometry, MultiPoint, Part, Point, PolyLine, Polygon, PolygonPart, NO_DATA};
pub use crate::header::{BBox, Header, ShapeKind};
pub use crate::shp_record::SuppressFlags;
