//! Decodes a single `.shp` record body into a tagged [`Geometry`] (spec §4.5).
//!
//! Record number and content length are big-endian; everything past them is
//! little-endian. Following `geozero-shp/src/header.rs`'s own comment on
//! this, we keep the two primitive readers distinct rather than abstract
//! over endianness (spec §9 "Mixed-endian record layout").

use crate::error::{Error, Result};
use crate::geometry::{measure_from_raw, Geometry, MultiPoint, Part, Point, PolyLine};
use crate::header::{BBox, ShapeKind};
use crate::polygon_orientation::assemble_polygon;
use crate::primitive::{read_f64_le, read_i32_be, read_i32_le, read_u32_le};
use crate::ByteSource;

/// Drops the Z and/or M channel from decoded output while still requiring
/// the on-wire bytes to be consumed, so file offsets stay correct (spec
/// §4.5 "Suppression flags").
#[derive(Debug, Default, Copy, Clone)]
pub struct SuppressFlags {
    pub suppress_z: bool,
    pub suppress_m: bool,
}

pub struct RecordHeader {
    pub record_number: i32,
    pub content_length_words: i32,
}

pub struct ShpRecordDecoder;

impl ShpRecordDecoder {
    /// Reads one record at the source's current position. Returns the
    /// record header (caller can cross-check `record_number` against the
    /// ordinal it expected) and the decoded geometry.
    pub fn read(
        src: &mut dyn ByteSource,
        declared: ShapeKind,
        flags: SuppressFlags,
    ) -> Result<(RecordHeader, Geometry)> {
        let record_number = read_i32_be(src)?;
        let content_length_words = read_i32_be(src)?;
        let header = RecordHeader {
            record_number,
            content_length_words,
        };

        let record_kind_code = read_i32_le(src)?;
        if record_kind_code == 0 {
            return Ok((header, Geometry::Null));
        }
        if record_kind_code != declared.code() {
            return Err(Error::WrongRecordKind {
                declared,
                actual: record_kind_code,
            });
        }

        let geometry = if declared.is_point() {
            Geometry::Point(read_point_record(src, declared, flags)?)
        } else if declared.is_multipoint() {
            Geometry::MultiPoint(read_multipoint(src, declared, flags)?)
        } else if declared.is_polyline() {
            Geometry::PolyLine(read_polyline(src, declared, flags)?)
        } else if declared.is_polygon() {
            let polyline = read_polyline(src, declared, flags)?;
            Geometry::Polygon(assemble_polygon(polyline)?)
        } else {
            unreachable!("NullShape is handled by the record_kind_code == 0 branch above")
        };

        Ok((header, geometry))
    }
}

fn apply_suppression(mut point: Point, flags: SuppressFlags) -> Point {
    if flags.suppress_z {
        point.z = None;
    }
    if flags.suppress_m {
        point.m = None;
    }
    point
}

fn read_point_record(src: &mut dyn ByteSource, kind: ShapeKind, flags: SuppressFlags) -> Result<Point> {
    let x = read_f64_le(src)?;
    let y = read_f64_le(src)?;
    let z = if kind.has_z() { Some(read_f64_le(src)?) } else { None };
    let m = if kind.has_m() {
        measure_from_raw(read_f64_le(src)?)
    } else {
        None
    };
    Ok(apply_suppression(Point { x, y, z, m }, flags))
}

fn read_bbox_xy(src: &mut dyn ByteSource) -> Result<(f64, f64, f64, f64)> {
    let xmin = read_f64_le(src)?;
    let ymin = read_f64_le(src)?;
    let xmax = read_f64_le(src)?;
    let ymax = read_f64_le(src)?;
    Ok((xmin, ymin, xmax, ymax))
}

fn read_range(src: &mut dyn ByteSource) -> Result<(f64, f64)> {
    let lo = read_f64_le(src)?;
    let hi = read_f64_le(src)?;
    Ok((lo, hi))
}

fn read_multipoint(src: &mut dyn ByteSource, kind: ShapeKind, flags: SuppressFlags) -> Result<MultiPoint> {
    let (xmin, ymin, xmax, ymax) = read_bbox_xy(src)?;
    let count = read_u32_le(src)? as usize;

    let mut points: Vec<Point> = (0..count)
        .map(|_| -> Result<Point> {
            let x = read_f64_le(src)?;
            let y = read_f64_le(src)?;
            Ok(Point { x, y, z: None, m: None })
        })
        .collect::<Result<_>>()?;

    let mut zmin = None;
    let mut zmax = None;
    if kind.has_z() {
        let (lo, hi) = read_range(src)?;
        zmin = Some(lo);
        zmax = Some(hi);
        for p in &mut points {
            p.z = Some(read_f64_le(src)?);
        }
    }

    let mut mmin = None;
    let mut mmax = None;
    if kind.has_m() {
        let (lo, hi) = read_range(src)?;
        mmin = Some(lo);
        mmax = Some(hi);
        for p in &mut points {
            p.m = measure_from_raw(read_f64_le(src)?);
        }
    }

    if flags.suppress_z {
        zmin = None;
        zmax = None;
        for p in &mut points {
            p.z = None;
        }
    }
    if flags.suppress_m {
        mmin = None;
        mmax = None;
        for p in &mut points {
            p.m = None;
        }
    }

    Ok(MultiPoint {
        bbox: BBox { xmin, xmax, ymin, ymax, zmin, zmax, mmin, mmax },
        points,
    })
}

fn read_polyline(src: &mut dyn ByteSource, kind: ShapeKind, flags: SuppressFlags) -> Result<PolyLine> {
    let (xmin, ymin, xmax, ymax) = read_bbox_xy(src)?;
    let num_parts = read_u32_le(src)? as usize;
    let num_points = read_u32_le(src)? as usize;

    let starts: Vec<usize> = (0..num_parts)
        .map(|_| read_u32_le(src).map(|v| v as usize))
        .collect::<Result<_>>()?;

    let mut flat_points: Vec<Point> = (0..num_points)
        .map(|_| -> Result<Point> {
            let x = read_f64_le(src)?;
            let y = read_f64_le(src)?;
            Ok(Point { x, y, z: None, m: None })
        })
        .collect::<Result<_>>()?;

    let mut zmin = None;
    let mut zmax = None;
    if kind.has_z() {
        let (lo, hi) = read_range(src)?;
        zmin = Some(lo);
        zmax = Some(hi);
        for p in &mut flat_points {
            p.z = Some(read_f64_le(src)?);
        }
    }

    let mut mmin = None;
    let mut mmax = None;
    if kind.has_m() {
        let (lo, hi) = read_range(src)?;
        mmin = Some(lo);
        mmax = Some(hi);
        for p in &mut flat_points {
            p.m = measure_from_raw(read_f64_le(src)?);
        }
    }

    if flags.suppress_z {
        zmin = None;
        zmax = None;
        for p in &mut flat_points {
            p.z = None;
        }
    }
    if flags.suppress_m {
        mmin = None;
        mmax = None;
        for p in &mut flat_points {
            p.m = None;
        }
    }

    let parts = partition_into_parts(flat_points, &starts);

    Ok(PolyLine {
        bbox: BBox { xmin, xmax, ymin, ymax, zmin, zmax, mmin, mmax },
        parts,
    })
}

/// Splits a flat point list into parts by comparing the running index
/// against the next part's declared start (spec §4.5 readPolyLine).
fn partition_into_parts(points: Vec<Point>, starts: &[usize]) -> Vec<Part> {
    if starts.is_empty() {
        return vec![Part { points }];
    }
    let mut parts = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(points.len());
        let slice = points.get(start..end).unwrap_or(&[]).to_vec();
        parts.push(Part { points: slice });
    }
    parts
}
