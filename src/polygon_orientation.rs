//! Ring-hierarchy reconstruction from a flat part list (spec §4.8).
//!
//! The wire format gives polygons as an unstructured list of rings; ring
//! orientation (clockwise outer, counter-clockwise hole) is the only signal
//! for which rings belong to which outer ring. The sign test itself is
//! grounded on `jblindsay-whitebox-tools/src/vector/shapefile/geometry.rs`'s
//! `ShapefileGeometry::is_hole`: the same `area += (x1*y2) - (x2*y1)` signed-
//! twice-area sum over consecutive vertices, with `area < 0` read as
//! clockwise. Whitebox only classifies one ring at a time (a caller asks "is
//! part N a hole?"); this module additionally walks the ring list once to
//! assemble the outer/hole hierarchy itself, and adds the spec §4.8 scale
//! escalation, since whitebox's `is_hole` has no fallback for an area that
//! comes out to exactly zero.

use crate::error::{Error, Result};
use crate::geometry::{Point, Polygon, PolygonPart};
use crate::header::BBox;

/// Escalating scale factors tried in order when the raw signed area comes
/// out exactly zero (spec §4.8: dodges catastrophic cancellation at small
/// magnitudes; the sign of the scaled sum is what's decided on, never the
/// magnitude).
const SCALE_ESCALATION: [f64; 4] = [1.0, 1e3, 1e6, 1e9];

fn twice_signed_area(points: &[Point], scale: f64) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let xi = points[i].x * scale;
        let yi = points[i].y * scale;
        let xj = points[j].x * scale;
        let yj = points[j].y * scale;
        sum += xi * yj - yi * xj;
    }
    sum
}

/// Signed twice-area of a ring, escalating scale until the sign resolves.
fn signed_area(points: &[Point]) -> Result<f64> {
    for &scale in &SCALE_ESCALATION {
        let s = twice_signed_area(points, scale);
        if s != 0.0 {
            return Ok(s);
        }
    }
    Err(Error::PolygonAreaTooSmall)
}

/// Assembles a decoded [`PolyLine`](crate::geometry::PolyLine)'s raw parts
/// into polygon parts with outer/hole structure, per spec §4.8 and the
/// invariant in spec §3 ("ring 0 has clockwise orientation; ring escalation
/// must resolve all non-clockwise rings into holes of the preceding
/// clockwise ring").
pub fn assemble_polygon(polyline: crate::geometry::PolyLine) -> Result<Polygon> {
    let bbox: BBox = polyline.bbox;
    let mut parts: Vec<PolygonPart> = Vec::new();

    for ring in polyline.parts {
        if ring.points.len() < 2 {
            // Declared clockwise by convention (spec §4.8): too few points
            // to have a meaningful orientation, so it opens its own part.
            parts.push(PolygonPart { rings: vec![ring] });
            continue;
        }

        let area = signed_area(&ring.points)?;
        if area < 0.0 {
            parts.push(PolygonPart { rings: vec![ring] });
        } else {
            match parts.last_mut() {
                Some(open) => open.rings.push(ring),
                None => return Err(Error::InvalidPolygon),
            }
        }
    }

    Ok(Polygon { bbox, parts })
}
