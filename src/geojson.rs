//! GeoJSON emission (spec §4.11).
//!
//! `geozero-core/src/geojson_writer.rs`'s `GeoJsonWriter` hand-assembles
//! JSON by writing literal byte slices and `format!`-ed fragments rather
//! than building a `serde_json::Value` tree; that's the idiom this module
//! follows, just over our own [`Geometry`]/[`AttributeRow`] types instead of
//! a `GeomProcessor`/`PropertyProcessor` callback pair.
//!
//! Shapefile rings wind clockwise-outer/counter-clockwise-hole; GeoJSON
//! requires the opposite, so every ring is reversed on the way out.

use crate::dbf::{AttributeRow, AttributeValue};
use crate::geometry::{Geometry, MultiPoint, Part, Point, PolyLine, Polygon, PolygonPart};
use crate::header::ShapeKind;
use crate::shp_record::SuppressFlags;

/// See `crate::wkt::dims`: Z follows the declared kind directly so an empty
/// ordinate set still tags correctly; M additionally needs a concrete
/// (non-sentinel) measure somewhere in the geometry (spec §4.11).
fn dims(points: impl Iterator<Item = Point>, kind: ShapeKind, flags: SuppressFlags) -> (bool, bool) {
    let has_z = kind.has_z() && !flags.suppress_z;
    let m_capable = kind.has_m() && !flags.suppress_m;
    let has_m = m_capable && points.any(|p| p.m.is_some());
    (has_z, has_m)
}

fn type_name(base: &str, has_m: bool) -> String {
    if has_m {
        format!("{base}M")
    } else {
        base.to_string()
    }
}

fn coord_array(p: Point, has_z: bool, has_m: bool) -> String {
    let mut s = format!("[{},{}", p.x, p.y);
    if has_z {
        s.push_str(&format!(",{}", p.z.unwrap_or(0.0)));
    }
    if has_m {
        s.push_str(&format!(",{}", p.m.unwrap_or(0.0)));
    }
    s.push(']');
    s
}

fn coord_list(points: &[Point], has_z: bool, has_m: bool) -> String {
    points
        .iter()
        .map(|&p| coord_array(p, has_z, has_m))
        .collect::<Vec<_>>()
        .join(",")
}

/// Reverses ring winding (Shapefile CW-outer/CCW-hole -> GeoJSON CCW-outer/CW-hole).
fn reversed_ring(ring: &Part) -> Vec<Point> {
    let mut points = ring.points.clone();
    points.reverse();
    points
}

fn ring_coords(ring: &Part, has_z: bool, has_m: bool) -> String {
    format!("[{}]", coord_list(&reversed_ring(ring), has_z, has_m))
}

fn polygon_part_coords(part: &PolygonPart, has_z: bool, has_m: bool) -> String {
    let rings = part
        .rings
        .iter()
        .map(|r| ring_coords(r, has_z, has_m))
        .collect::<Vec<_>>()
        .join(",");
    format!("[{rings}]")
}

fn point_geometry_json(p: &Point, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(std::iter::once(*p), kind, flags);
    format!(
        r#"{{"type": "{}", "coordinates": {}}}"#,
        type_name("Point", has_m),
        coord_array(*p, has_z, has_m)
    )
}

fn multipoint_geometry_json(mp: &MultiPoint, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(mp.points.iter().copied(), kind, flags);
    format!(
        r#"{{"type": "{}", "coordinates": [{}]}}"#,
        type_name("MultiPoint", has_m),
        coord_list(&mp.points, has_z, has_m)
    )
}

fn polyline_geometry_json(pl: &PolyLine, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(pl.parts.iter().flat_map(|p| p.points.iter().copied()), kind, flags);
    if pl.parts.len() == 1 {
        format!(
            r#"{{"type": "{}", "coordinates": [{}]}}"#,
            type_name("LineString", has_m),
            coord_list(&pl.parts[0].points, has_z, has_m)
        )
    } else {
        let parts = pl
            .parts
            .iter()
            .map(|part| format!("[{}]", coord_list(&part.points, has_z, has_m)))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"{{"type": "{}", "coordinates": [{}]}}"#,
            type_name("MultiLineString", has_m),
            parts
        )
    }
}

fn polygon_geometry_json(poly: &Polygon, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(
        poly.parts
            .iter()
            .flat_map(|part| part.rings.iter().flat_map(|r| r.points.iter().copied())),
        kind,
        flags,
    );
    if poly.parts.len() == 1 {
        format!(
            r#"{{"type": "{}", "coordinates": {}}}"#,
            type_name("Polygon", has_m),
            polygon_part_coords(&poly.parts[0], has_z, has_m)
        )
    } else {
        let parts = poly
            .parts
            .iter()
            .map(|part| polygon_part_coords(part, has_z, has_m))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"{{"type": "{}", "coordinates": [{}]}}"#,
            type_name("MultiPolygon", has_m),
            parts
        )
    }
}

/// Renders a decoded geometry to a GeoJSON geometry object. `kind` and
/// `flags` decide Z/M suffixing the same way as `crate::wkt::to_wkt`. A
/// `NullShape` record has no GeoJSON geometry equivalent, so it renders as
/// JSON `null`.
pub fn to_geometry_json(geometry: &Geometry, kind: ShapeKind, flags: SuppressFlags) -> String {
    match geometry {
        Geometry::Null => "null".to_string(),
        Geometry::Point(p) => point_geometry_json(p, kind, flags),
        Geometry::MultiPoint(mp) => multipoint_geometry_json(mp, kind, flags),
        Geometry::PolyLine(pl) => polyline_geometry_json(pl, kind, flags),
        Geometry::Polygon(poly) => polygon_geometry_json(poly, kind, flags),
    }
}

fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn property_json(name: &str, value: &AttributeValue) -> String {
    match value {
        AttributeValue::Text(s) => format!(r#""{}": "{}""#, escape_json_string(name), escape_json_string(s)),
        AttributeValue::Bool(b) => format!(r#""{}": {}"#, escape_json_string(name), b),
    }
}

fn properties_json(attributes: &AttributeRow) -> String {
    let fields = attributes
        .iter()
        .map(|(name, value)| property_json(name, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{fields}}}")
}

/// A flat bbox array for the GeoJSON `bbox` member: `[xmin,ymin,(zmin),(mmin),xmax,ymax,(zmax),(mmax)]`.
fn bbox_array(geometry: &Geometry) -> Option<String> {
    let (x_range, y_range, zmin, zmax, mmin, mmax) = match geometry {
        Geometry::Null => return None,
        Geometry::Point(_) => return None,
        Geometry::MultiPoint(mp) => (
            mp.bbox.x_range(),
            mp.bbox.y_range(),
            mp.bbox.zmin,
            mp.bbox.zmax,
            mp.bbox.mmin,
            mp.bbox.mmax,
        ),
        Geometry::PolyLine(pl) => (
            pl.bbox.x_range(),
            pl.bbox.y_range(),
            pl.bbox.zmin,
            pl.bbox.zmax,
            pl.bbox.mmin,
            pl.bbox.mmax,
        ),
        Geometry::Polygon(poly) => (
            poly.bbox.x_range(),
            poly.bbox.y_range(),
            poly.bbox.zmin,
            poly.bbox.zmax,
            poly.bbox.mmin,
            poly.bbox.mmax,
        ),
    };

    let mut values = vec![x_range[0], y_range[0]];
    if let Some(z) = zmin {
        values.push(z);
    }
    if let Some(m) = mmin {
        values.push(m);
    }
    values.push(x_range[1]);
    values.push(y_range[1]);
    if let Some(z) = zmax {
        values.push(z);
    }
    if let Some(m) = mmax {
        values.push(m);
    }

    let joined = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
    Some(format!("[{joined}]"))
}

/// Renders a geometry + attribute row as a GeoJSON Feature (spec §4.11).
pub fn to_feature_json(geometry: &Geometry, attributes: &AttributeRow, kind: ShapeKind, flags: SuppressFlags) -> String {
    let bbox = bbox_array(geometry);
    let bbox_member = bbox.map(|b| format!(r#""bbox": {b}, "#)).unwrap_or_default();
    format!(
        r#"{{"type": "Feature", {bbox_member}"properties": {}, "geometry": {}}}"#,
        properties_json(attributes),
        to_geometry_json(geometry, kind, flags)
    )
}
