//! The structured geometry model (spec §3).
//!
//! Z is `Option<f64>`, present only for the four Z-kinds. M is also
//! `Option<f64>`, with `None` standing for the measure sentinel (any raw
//! value `< -1e38`) as well as for "this kind carries no M at all" — the
//! spec's open question on absent-vs-numeric M is resolved this way (see
//! `SPEC_FULL.md` §12.1): a dedicated sum type over an `f64` newtype would
//! only rename the same distinction, so we use the option the spec itself
//! suggests as the simplest faithful model.

use crate::header::BBox;

pub const NO_DATA: f64 = -1e38;

/// Any M value at or below this is the "no measure" sentinel (spec §3).
pub fn is_no_data(m: f64) -> bool {
    m < NO_DATA
}

/// Collapses a raw on-disk M value into the absent-or-present model.
pub fn measure_from_raw(raw: f64) -> Option<f64> {
    if is_no_data(raw) {
        None
    } else {
        Some(raw)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Point {
    pub fn xy(x: f64, y: f64) -> Self {
        Point { x, y, z: None, m: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPoint {
    pub bbox: BBox,
    pub points: Vec<Point>,
}

/// An ordered sequence of points making up one ring or one polyline part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolyLine {
    pub bbox: BBox,
    pub parts: Vec<Part>,
}

/// One outer ring plus its holes, already assembled by
/// [`crate::polygon_orientation`] from the raw ring list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonPart {
    pub rings: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub bbox: BBox,
    pub parts: Vec<PolygonPart>,
}

/// A decoded shape record (spec §3 Record.geometry).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Null,
    Point(Point),
    MultiPoint(MultiPoint),
    PolyLine(PolyLine),
    Polygon(Polygon),
}
