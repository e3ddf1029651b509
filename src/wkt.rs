//! WKT text emission (spec §4.10).
//!
//! Grounded on `geozero-core/src/wkt_writer.rs`'s `WktWriter`: a tag string
//! opens the geometry, commas separate successive coordinates/rings/parts,
//! and a coordinate is `"x y"` plus an optional trailing `" z"` and/or
//! `" m"`. That writer streams through a `GeomProcessor` callback interface
//! tied to `geo-types`; since this crate doesn't depend on either, the same
//! begin/comma/end shape is rebuilt here as plain functions over
//! [`crate::geometry::Geometry`].

use crate::geometry::{Geometry, MultiPoint, Part, Point, PolyLine, Polygon, PolygonPart};
use crate::header::ShapeKind;
use crate::shp_record::SuppressFlags;

/// Whether the Z/M channels should be suffixed at all, per spec §4.10: Z
/// follows the declared shape kind directly (so an empty ordinate set still
/// gets tagged correctly), while M additionally requires at least one
/// concrete (non-sentinel) measure somewhere in the geometry.
fn dims(points: impl Iterator<Item = Point>, kind: ShapeKind, flags: SuppressFlags) -> (bool, bool) {
    let has_z = kind.has_z() && !flags.suppress_z;
    let m_capable = kind.has_m() && !flags.suppress_m;
    let has_m = m_capable && points.any(|p| p.m.is_some());
    (has_z, has_m)
}

/// `Z`, `M`, `ZM`, or empty, appended to the WKT type tag (spec §4.10: "Suffix
/// `Z` iff...", "Suffix `M` iff..."). Same idea as `geojson.rs`'s `type_name`,
/// just both letters instead of only `M`.
fn dims_suffix(has_z: bool, has_m: bool) -> &'static str {
    match (has_z, has_m) {
        (true, true) => "ZM",
        (true, false) => "Z",
        (false, true) => "M",
        (false, false) => "",
    }
}

fn point_coords(p: Point, has_z: bool, has_m: bool) -> String {
    let mut s = format!("{} {}", p.x, p.y);
    if has_z {
        s.push_str(&format!(" {}", p.z.unwrap_or(0.0)));
    }
    if has_m {
        s.push_str(&format!(" {}", p.m.unwrap_or(0.0)));
    }
    s
}

fn join_points(points: &[Point], has_z: bool, has_m: bool) -> String {
    points
        .iter()
        .map(|&p| point_coords(p, has_z, has_m))
        .collect::<Vec<_>>()
        .join(",")
}

fn ring_wkt(part: &Part, has_z: bool, has_m: bool) -> String {
    format!("({})", join_points(&part.points, has_z, has_m))
}

fn polygon_part_wkt(part: &PolygonPart, has_z: bool, has_m: bool) -> String {
    let rings = part
        .rings
        .iter()
        .map(|r| ring_wkt(r, has_z, has_m))
        .collect::<Vec<_>>()
        .join(",");
    format!("({rings})")
}

fn point_wkt(p: &Point, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(std::iter::once(*p), kind, flags);
    format!("POINT{}({})", dims_suffix(has_z, has_m), point_coords(*p, has_z, has_m))
}

fn multipoint_wkt(mp: &MultiPoint, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(mp.points.iter().copied(), kind, flags);
    format!(
        "MULTIPOINT{}({})",
        dims_suffix(has_z, has_m),
        join_points(&mp.points, has_z, has_m)
    )
}

fn polyline_wkt(pl: &PolyLine, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(pl.parts.iter().flat_map(|p| p.points.iter().copied()), kind, flags);
    let tag = dims_suffix(has_z, has_m);
    if pl.parts.len() == 1 {
        format!("LINESTRING{tag}({})", join_points(&pl.parts[0].points, has_z, has_m))
    } else {
        let parts = pl
            .parts
            .iter()
            .map(|part| format!("({})", join_points(&part.points, has_z, has_m)))
            .collect::<Vec<_>>()
            .join(",");
        format!("MULTILINESTRING{tag}({parts})")
    }
}

fn polygon_wkt(poly: &Polygon, kind: ShapeKind, flags: SuppressFlags) -> String {
    let (has_z, has_m) = dims(
        poly.parts
            .iter()
            .flat_map(|part| part.rings.iter().flat_map(|r| r.points.iter().copied())),
        kind,
        flags,
    );
    let tag = dims_suffix(has_z, has_m);
    if poly.parts.len() == 1 {
        format!("POLYGON{tag}{}", polygon_part_wkt(&poly.parts[0], has_z, has_m))
    } else {
        let parts = poly
            .parts
            .iter()
            .map(|part| polygon_part_wkt(part, has_z, has_m))
            .collect::<Vec<_>>()
            .join(",");
        format!("MULTIPOLYGON{tag}({parts})")
    }
}

/// Renders a decoded geometry to WKT. `kind` is the file's declared shape
/// kind and `flags` the suppression configuration in effect -- together
/// they decide whether Z/M are suffixed even when a geometry's ordinate set
/// happens to be empty (spec §4.10). A `NullShape` record renders as an
/// empty geometry collection, the usual WKT stand-in for "no geometry".
pub fn to_wkt(geometry: &Geometry, kind: ShapeKind, flags: SuppressFlags) -> String {
    match geometry {
        Geometry::Null => "GEOMETRYCOLLECTION EMPTY".to_string(),
        Geometry::Point(p) => point_wkt(p, kind, flags),
        Geometry::MultiPoint(mp) => multipoint_wkt(mp, kind, flags),
        Geometry::PolyLine(pl) => polyline_wkt(pl, kind, flags),
        Geometry::Polygon(poly) => polygon_wkt(poly, kind, flags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::BBox;

    fn bbox() -> BBox {
        BBox { xmin: 0.0, xmax: 0.0, ymin: 0.0, ymax: 0.0, zmin: None, zmax: None, mmin: None, mmax: None }
    }

    fn no_flags() -> SuppressFlags {
        SuppressFlags::default()
    }

    #[test]
    fn point_2d() {
        let geom = Geometry::Point(Point::xy(1.5, 2.5));
        assert_eq!(to_wkt(&geom, ShapeKind::Point, no_flags()), "POINT(1.5 2.5)");
    }

    #[test]
    fn point_with_z_and_m() {
        let p = Point { x: 1.0, y: 2.0, z: Some(3.0), m: Some(4.0) };
        assert_eq!(to_wkt(&Geometry::Point(p), ShapeKind::PointZ, no_flags()), "POINTZM(1 2 3 4)");
    }

    #[test]
    fn point_m_absent_prints_zero() {
        let p = Point { x: 1.0, y: 2.0, z: None, m: None };
        // No M anywhere on this (degenerate single-point) geometry: no M token at all.
        assert_eq!(to_wkt(&Geometry::Point(p), ShapeKind::Point, no_flags()), "POINT(1 2)");
    }

    #[test]
    fn suppressed_z_drops_tag_even_though_kind_carries_it() {
        let p = Point { x: 1.0, y: 2.0, z: None, m: Some(4.0) };
        let flags = SuppressFlags { suppress_z: true, suppress_m: false };
        assert_eq!(to_wkt(&Geometry::Point(p), ShapeKind::PointZ, flags), "POINTM(1 2 4)");
    }

    #[test]
    fn empty_multipoint_still_tags_z_from_kind() {
        let mp = MultiPoint { bbox: bbox(), points: vec![] };
        assert_eq!(to_wkt(&Geometry::MultiPoint(mp), ShapeKind::MultiPointZ, no_flags()), "MULTIPOINTZ()");
    }

    #[test]
    fn single_part_polygon_with_hole() {
        let outer = Part { points: vec![Point::xy(0.0, 0.0), Point::xy(10.0, 10.0), Point::xy(10.0, 0.0)] };
        let hole = Part { points: vec![Point::xy(2.0, 2.0), Point::xy(8.0, 8.0), Point::xy(2.0, 8.0)] };
        let poly = Polygon { bbox: bbox(), parts: vec![PolygonPart { rings: vec![outer, hole] }] };
        assert_eq!(
            to_wkt(&Geometry::Polygon(poly), ShapeKind::Polygon, no_flags()),
            "POLYGON((0 0,10 10,10 0),(2 2,8 8,2 8))"
        );
    }

    #[test]
    fn multilinestring_z_suffixes_tag() {
        // Spec §8 scenario (b).
        let a = Part { points: vec![Point { x: 0.0, y: 0.0, z: Some(10.0), m: None }, Point { x: 1.0, y: 1.0, z: Some(11.0), m: None }] };
        let b = Part { points: vec![Point { x: 2.0, y: 2.0, z: Some(12.0), m: None }, Point { x: 3.0, y: 3.0, z: Some(13.0), m: None }] };
        let pl = PolyLine { bbox: bbox(), parts: vec![a, b] };
        assert_eq!(
            to_wkt(&Geometry::PolyLine(pl), ShapeKind::PolyLineZ, no_flags()),
            "MULTILINESTRINGZ((0 0 10,1 1 11),(2 2 12,3 3 13))"
        );
    }

    #[test]
    fn multi_part_polygon() {
        let a = PolygonPart { rings: vec![Part { points: vec![Point::xy(0.0, 0.0), Point::xy(1.0, 1.0), Point::xy(1.0, 0.0)] }] };
        let b = PolygonPart { rings: vec![Part { points: vec![Point::xy(5.0, 5.0), Point::xy(6.0, 6.0), Point::xy(6.0, 5.0)] }] };
        let poly = Polygon { bbox: bbox(), parts: vec![a, b] };
        assert_eq!(
            to_wkt(&Geometry::Polygon(poly), ShapeKind::Polygon, no_flags()),
            "MULTIPOLYGON(((0 0,1 1,1 0)),((5 5,6 6,6 5)))"
        );
    }

    #[test]
    fn null_shape_is_empty_collection() {
        assert_eq!(to_wkt(&Geometry::Null, ShapeKind::Point, no_flags()), "GEOMETRYCOLLECTION EMPTY");
    }
}
