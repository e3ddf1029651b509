//! The 100-byte header shared by `.shp` and `.shx` (spec §4.3, §6).

use crate::error::{Error, Result};
use crate::primitive::{read_f64_le, read_u32_le};
use crate::ByteSource;
use std::fmt;

pub(crate) const HEADER_SIZE: u64 = 100;
const SHAPE_KIND_OFFSET: u64 = 32;

/// The thirteen shape kinds the Shapefile specification defines.
///
/// Numeric tags match the specification; `ShapeKind::from_code` is the only
/// way to construct one from an untrusted integer, so a value of this type
/// is always one of the thirteen known tags (see `geozero_shp::ShapeType`
/// for the teacher's equivalent closed enum).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    NullShape = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
}

impl ShapeKind {
    pub fn from_code(code: i32) -> Option<ShapeKind> {
        match code {
            0 => Some(ShapeKind::NullShape),
            1 => Some(ShapeKind::Point),
            3 => Some(ShapeKind::PolyLine),
            5 => Some(ShapeKind::Polygon),
            8 => Some(ShapeKind::MultiPoint),
            11 => Some(ShapeKind::PointZ),
            13 => Some(ShapeKind::PolyLineZ),
            15 => Some(ShapeKind::PolygonZ),
            18 => Some(ShapeKind::MultiPointZ),
            21 => Some(ShapeKind::PointM),
            23 => Some(ShapeKind::PolyLineM),
            25 => Some(ShapeKind::PolygonM),
            28 => Some(ShapeKind::MultiPointM),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// True for the four kinds carrying a Z ordinate (spec §3 Dimensions).
    pub fn has_z(self) -> bool {
        matches!(
            self,
            ShapeKind::PointZ | ShapeKind::PolyLineZ | ShapeKind::PolygonZ | ShapeKind::MultiPointZ
        )
    }

    /// True for every kind carrying an (optional) M ordinate.
    pub fn has_m(self) -> bool {
        matches!(
            self,
            ShapeKind::PointZ
                | ShapeKind::PolyLineZ
                | ShapeKind::PolygonZ
                | ShapeKind::MultiPointZ
                | ShapeKind::PointM
                | ShapeKind::PolyLineM
                | ShapeKind::PolygonM
                | ShapeKind::MultiPointM
        )
    }

    pub fn is_polygon(self) -> bool {
        matches!(self, ShapeKind::Polygon | ShapeKind::PolygonZ | ShapeKind::PolygonM)
    }

    pub fn is_polyline(self) -> bool {
        matches!(self, ShapeKind::PolyLine | ShapeKind::PolyLineZ | ShapeKind::PolyLineM)
    }

    pub fn is_multipoint(self) -> bool {
        matches!(self, ShapeKind::MultiPoint | ShapeKind::MultiPointZ | ShapeKind::MultiPointM)
    }

    pub fn is_point(self) -> bool {
        matches!(self, ShapeKind::Point | ShapeKind::PointZ | ShapeKind::PointM)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::NullShape => "NullShape",
            ShapeKind::Point => "Point",
            ShapeKind::PolyLine => "PolyLine",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::MultiPoint => "MultiPoint",
            ShapeKind::PointZ => "PointZ",
            ShapeKind::PolyLineZ => "PolyLineZ",
            ShapeKind::PolygonZ => "PolygonZ",
            ShapeKind::MultiPointZ => "MultiPointZ",
            ShapeKind::PointM => "PointM",
            ShapeKind::PolyLineM => "PolyLineM",
            ShapeKind::PolygonM => "PolygonM",
            ShapeKind::MultiPointM => "MultiPointM",
        };
        write!(f, "{name}")
    }
}

/// The file bounding box, with Z/M ranges present only when the declared
/// shape kind carries that dimension (spec §3 BBox).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: Option<f64>,
    pub zmax: Option<f64>,
    pub mmin: Option<f64>,
    pub mmax: Option<f64>,
}

impl BBox {
    pub fn x_range(&self) -> [f64; 2] {
        [self.xmin, self.xmax]
    }

    pub fn y_range(&self) -> [f64; 2] {
        [self.ymin, self.ymax]
    }
}

/// Parsed SHP/SHX header (spec §4.3): declared shape kind plus file bbox.
#[derive(Debug, Copy, Clone)]
pub struct Header {
    pub kind: ShapeKind,
    pub bbox: BBox,
}

/// Decodes the 100-byte header shared by `.shp` and `.shx`.
pub struct ShpHeaderDecoder;

impl ShpHeaderDecoder {
    pub fn read(src: &mut dyn ByteSource) -> Result<Header> {
        src.seek(SHAPE_KIND_OFFSET)?;
        let code = read_u32_le(src)? as i32;
        let kind = ShapeKind::from_code(code).ok_or(Error::UnsupportedShapeKind(code))?;

        let xmin = read_f64_le(src)?;
        let ymin = read_f64_le(src)?;
        let xmax = read_f64_le(src)?;
        let ymax = read_f64_le(src)?;
        let zmin_raw = read_f64_le(src)?;
        let zmax_raw = read_f64_le(src)?;
        let mmin_raw = read_f64_le(src)?;
        let mmax_raw = read_f64_le(src)?;

        let bbox = BBox {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin: kind.has_z().then_some(zmin_raw),
            zmax: kind.has_z().then_some(zmax_raw),
            mmin: kind.has_m().then_some(mmin_raw),
            mmax: kind.has_m().then_some(mmax_raw),
        };

        Ok(Header { kind, bbox })
    }
}
