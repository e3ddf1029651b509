//! End-to-end coverage of Dataset -> RecordCursor -> WKT/GeoJSON, built over
//! hand-assembled in-memory `.shp`/`.shx`/`.dbf` byte buffers (no shipped
//! binary fixtures are available to this crate).

use shp_core::{Dataset, Geometry, OutputFormat, Record, RecordOutput, StreamSource};
use std::io::Cursor;

fn shp_header(kind_code: i32) -> Vec<u8> {
    let mut buf = vec![0u8; 100];
    buf[32..36].copy_from_slice(&kind_code.to_le_bytes());
    buf
}

fn shx_header_and_entries(entries: &[(u32, u32)]) -> Vec<u8> {
    let mut buf = vec![0u8; 100];
    for (offset_words, length_words) in entries {
        buf.extend_from_slice(&offset_words.to_be_bytes());
        buf.extend_from_slice(&length_words.to_be_bytes());
    }
    buf
}

fn dbf_with_one_numeric_field(rows: &[(u8, &str)]) -> Vec<u8> {
    let header_size: u16 = 32 + 32 + 1;
    let record_size: u16 = 1 + 5;
    let mut buf = vec![0u8; 32];
    buf[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
    buf[8..10].copy_from_slice(&header_size.to_le_bytes());
    buf[10..12].copy_from_slice(&record_size.to_le_bytes());

    let mut field = vec![0u8; 32];
    field[0..2].copy_from_slice(b"ID");
    field[11] = b'N';
    field[16] = 5;
    field[17] = 0;
    buf.extend_from_slice(&field);
    buf.push(0x0D);

    for (flag, value) in rows {
        buf.push(*flag);
        let mut v = value.as_bytes().to_vec();
        v.resize(5, b' ');
        buf.extend_from_slice(&v);
    }
    buf
}

fn dbf_with_no_fields(row_count: u32) -> Vec<u8> {
    let header_size: u16 = 32 + 1;
    let record_size: u16 = 1;
    let mut buf = vec![0u8; 32];
    buf[4..8].copy_from_slice(&row_count.to_le_bytes());
    buf[8..10].copy_from_slice(&header_size.to_le_bytes());
    buf[10..12].copy_from_slice(&record_size.to_le_bytes());
    buf.push(0x0D);
    for _ in 0..row_count {
        buf.push(0x20);
    }
    buf
}

fn point_record(record_number: i32, kind_code: i32, x: f64, y: f64, z: Option<f64>, m_raw: Option<f64>) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&record_number.to_be_bytes());
    buf.extend_from_slice(&0i32.to_be_bytes()); // content length unused by decoder
    buf.extend_from_slice(&kind_code.to_le_bytes());
    buf.extend_from_slice(&x.to_le_bytes());
    buf.extend_from_slice(&y.to_le_bytes());
    if let Some(z) = z {
        buf.extend_from_slice(&z.to_le_bytes());
    }
    if let Some(m) = m_raw {
        buf.extend_from_slice(&m.to_le_bytes());
    }
    buf
}

fn open_dataset(shp: Vec<u8>, shx: Vec<u8>, dbf: Vec<u8>) -> Dataset {
    let mut dataset = Dataset::new(Box::new(StreamSource::new(Cursor::new(shp)))).unwrap();
    dataset
        .add_index_source(Box::new(StreamSource::new(Cursor::new(shx))))
        .unwrap();
    dataset
        .add_dbf_source(Box::new(StreamSource::new(Cursor::new(dbf))))
        .unwrap();
    dataset
}

/// Scenario (a): a single Point record with no attribute fields.
#[test]
fn point_with_no_attributes() {
    let mut shp = shp_header(1);
    let record_start_words = (shp.len() / 2) as u32;
    shp.extend_from_slice(&point_record(1, 1, 3.0, 4.0, None, None));

    let shx = shx_header_and_entries(&[(record_start_words, 10)]);
    let dbf = dbf_with_no_fields(1);

    let mut dataset = open_dataset(shp, shx, dbf);
    assert_eq!(dataset.dbf_fields().unwrap().len(), 0);

    let mut cursor = dataset.cursor().unwrap();
    let output = cursor.take(OutputFormat::GeometryStruct).unwrap().unwrap();
    match output {
        RecordOutput::Struct(Record { geometry, attributes }) => {
            assert_eq!(geometry, Geometry::Point(shp_core::Point::xy(3.0, 4.0)));
            assert!(!attributes.deleted());
        }
        _ => panic!("expected struct output"),
    }
    assert!(cursor.current_record().is_none());
}

/// Scenario (d): PointM where the measure is the "no data" sentinel.
#[test]
fn point_m_with_no_measure() {
    let mut shp = shp_header(21);
    let start_words = (shp.len() / 2) as u32;
    shp.extend_from_slice(&point_record(1, 21, 1.0, 2.0, None, Some(shp_core::NO_DATA - 1.0)));

    let shx = shx_header_and_entries(&[(start_words, 10)]);
    let dbf = dbf_with_no_fields(1);

    let mut dataset = open_dataset(shp, shx, dbf);
    let mut cursor = dataset.cursor().unwrap();
    let output = cursor.take(OutputFormat::GeometryStruct).unwrap().unwrap();
    match output {
        RecordOutput::Struct(Record { geometry, .. }) => match geometry {
            Geometry::Point(p) => {
                assert_eq!((p.x, p.y), (1.0, 2.0));
                assert!(p.m.is_none());
            }
            _ => panic!("expected point"),
        },
        _ => panic!("expected struct output"),
    }
}

/// Scenario (c): a clockwise outer ring with a counter-clockwise hole,
/// checked through both the structured model and GeoJSON (which must
/// reverse both rings' winding).
#[test]
fn polygon_with_hole_round_trips_through_geojson() {
    let mut shp = shp_header(5);
    let start_words = (shp.len() / 2) as u32;

    let mut record = Vec::new();
    record.extend_from_slice(&1i32.to_be_bytes());
    record.extend_from_slice(&0i32.to_be_bytes());
    record.extend_from_slice(&5i32.to_le_bytes()); // Polygon
    record.extend_from_slice(&0.0f64.to_le_bytes()); // xmin
    record.extend_from_slice(&0.0f64.to_le_bytes()); // ymin
    record.extend_from_slice(&10.0f64.to_le_bytes()); // xmax
    record.extend_from_slice(&10.0f64.to_le_bytes()); // ymax
    record.extend_from_slice(&2i32.to_le_bytes()); // num_parts
    record.extend_from_slice(&8i32.to_le_bytes()); // num_points (4 outer + 4 hole)
    record.extend_from_slice(&0u32.to_le_bytes()); // part starts
    record.extend_from_slice(&4u32.to_le_bytes());

    let outer = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]; // clockwise
    let hole = [(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)]; // counter-clockwise
    for &(x, y) in outer.iter().chain(hole.iter()) {
        record.extend_from_slice(&x.to_le_bytes());
        record.extend_from_slice(&y.to_le_bytes());
    }
    shp.extend_from_slice(&record);

    let shx = shx_header_and_entries(&[(start_words, (record.len() / 2) as u32)]);
    let dbf = dbf_with_no_fields(1);

    let mut dataset = open_dataset(shp, shx, dbf);
    let mut cursor = dataset.cursor().unwrap();

    match cursor.read(OutputFormat::GeometryStruct).unwrap().unwrap() {
        RecordOutput::Struct(Record { geometry: Geometry::Polygon(poly), .. }) => {
            assert_eq!(poly.parts.len(), 1);
            assert_eq!(poly.parts[0].rings.len(), 2);
        }
        _ => panic!("expected polygon"),
    }

    match cursor.read(OutputFormat::GeoJsonGeometry).unwrap().unwrap() {
        RecordOutput::GeoJsonGeometry(json) => {
            assert_eq!(
                json,
                r#"{"type": "Polygon", "coordinates": [[[10,0],[10,10],[0,10],[0,0]],[[2,8],[8,8],[8,2],[2,2]]]}"#
            );
        }
        _ => panic!("expected geojson geometry"),
    }

    match cursor.take(OutputFormat::Wkt).unwrap().unwrap() {
        RecordOutput::Wkt(wkt) => {
            assert_eq!(wkt, "POLYGON((0 0,0 10,10 10,10 0),(2 2,8 2,8 8,2 8))");
        }
        _ => panic!("expected wkt"),
    }
}

/// Scenario (e): a DBF row marked deleted is still readable, and its
/// `_deleted` flag survives into the joined record.
#[test]
fn deleted_dbf_row_is_still_readable() {
    let mut shp = shp_header(1);
    let mut records = Vec::new();
    let start1 = (shp.len() / 2) as u32;
    let rec1 = point_record(1, 1, 0.0, 0.0, None, None);
    records.push((start1, (rec1.len() / 2) as u32));
    shp.extend_from_slice(&rec1);
    let start2 = (shp.len() / 2) as u32;
    let rec2 = point_record(2, 1, 1.0, 1.0, None, None);
    records.push((start2, (rec2.len() / 2) as u32));
    shp.extend_from_slice(&rec2);

    let shx = shx_header_and_entries(&records);
    let dbf = dbf_with_one_numeric_field(&[(0x20, "1"), (0x2A, "2")]);

    let mut dataset = open_dataset(shp, shx, dbf);
    let mut cursor = dataset.cursor().unwrap();

    let first = cursor.take(OutputFormat::GeometryStruct).unwrap().unwrap();
    match first {
        RecordOutput::Struct(Record { attributes, .. }) => assert!(!attributes.deleted()),
        _ => panic!(),
    }

    let second = cursor.take(OutputFormat::GeometryStruct).unwrap().unwrap();
    match second {
        RecordOutput::Struct(Record { attributes, .. }) => {
            assert!(attributes.deleted());
            assert_eq!(attributes.get("ID").unwrap().as_str(), Some("2"));
        }
        _ => panic!(),
    }
}

/// Scenario (f): a ring whose points are all coincident can never resolve a
/// sign for its signed area, even after scale escalation.
#[test]
fn degenerate_polygon_ring_fails_to_decode() {
    let mut shp = shp_header(5);
    let start_words = (shp.len() / 2) as u32;

    let mut record = Vec::new();
    record.extend_from_slice(&1i32.to_be_bytes());
    record.extend_from_slice(&0i32.to_be_bytes());
    record.extend_from_slice(&5i32.to_le_bytes());
    record.extend_from_slice(&0.0f64.to_le_bytes());
    record.extend_from_slice(&0.0f64.to_le_bytes());
    record.extend_from_slice(&0.0f64.to_le_bytes());
    record.extend_from_slice(&0.0f64.to_le_bytes());
    record.extend_from_slice(&1i32.to_le_bytes()); // num_parts
    record.extend_from_slice(&3i32.to_le_bytes()); // num_points
    record.extend_from_slice(&0u32.to_le_bytes()); // part start
    for _ in 0..3 {
        record.extend_from_slice(&1.0f64.to_le_bytes());
        record.extend_from_slice(&1.0f64.to_le_bytes());
    }
    shp.extend_from_slice(&record);

    let shx = shx_header_and_entries(&[(start_words, (record.len() / 2) as u32)]);
    let dbf = dbf_with_no_fields(1);

    let mut dataset = open_dataset(shp, shx, dbf);
    let mut cursor = dataset.cursor().unwrap();

    let err = cursor.read(OutputFormat::GeometryStruct).unwrap().unwrap_err();
    assert_eq!(err.code(), 31);
}

/// Scenario (b): a PolyLineZ with two parts, both carrying Z and M.
#[test]
fn polyline_z_with_two_parts() {
    let mut shp = shp_header(13);
    let start_words = (shp.len() / 2) as u32;

    let mut record = Vec::new();
    record.extend_from_slice(&1i32.to_be_bytes());
    record.extend_from_slice(&0i32.to_be_bytes());
    record.extend_from_slice(&13i32.to_le_bytes()); // PolyLineZ
    record.extend_from_slice(&0.0f64.to_le_bytes());
    record.extend_from_slice(&0.0f64.to_le_bytes());
    record.extend_from_slice(&10.0f64.to_le_bytes());
    record.extend_from_slice(&10.0f64.to_le_bytes());
    record.extend_from_slice(&2i32.to_le_bytes()); // num_parts
    record.extend_from_slice(&4i32.to_le_bytes()); // num_points
    record.extend_from_slice(&0u32.to_le_bytes());
    record.extend_from_slice(&2u32.to_le_bytes());

    let points = [(0.0, 0.0), (1.0, 1.0), (5.0, 5.0), (6.0, 6.0)];
    for &(x, y) in &points {
        record.extend_from_slice(&x.to_le_bytes());
        record.extend_from_slice(&y.to_le_bytes());
    }
    record.extend_from_slice(&0.0f64.to_le_bytes()); // zmin
    record.extend_from_slice(&3.0f64.to_le_bytes()); // zmax
    let zs = [0.0, 1.0, 2.0, 3.0];
    for z in zs {
        record.extend_from_slice(&z.to_le_bytes());
    }
    record.extend_from_slice(&0.0f64.to_le_bytes()); // mmin
    record.extend_from_slice(&30.0f64.to_le_bytes()); // mmax
    let ms = [0.0, 10.0, 20.0, 30.0];
    for m in ms {
        record.extend_from_slice(&m.to_le_bytes());
    }
    shp.extend_from_slice(&record);

    let shx = shx_header_and_entries(&[(start_words, (record.len() / 2) as u32)]);
    let dbf = dbf_with_no_fields(1);

    let mut dataset = open_dataset(shp, shx, dbf);
    let mut cursor = dataset.cursor().unwrap();

    match cursor.read(OutputFormat::GeometryStruct).unwrap().unwrap() {
        RecordOutput::Struct(Record { geometry: Geometry::PolyLine(pl), .. }) => {
            assert_eq!(pl.parts.len(), 2);
            assert_eq!(pl.parts[0].points.len(), 2);
            assert_eq!(pl.parts[1].points.len(), 2);
            assert_eq!(pl.parts[0].points[0].z, Some(0.0));
            assert_eq!(pl.parts[1].points[1].m, Some(30.0));
        }
        _ => panic!("expected polyline"),
    }

    // Both Z and M are present on every vertex here, so the WKT tag is "ZM"
    // rather than the bare "Z" spec §8 scenario (b) shows for a Z-only case.
    match cursor.read(OutputFormat::Wkt).unwrap().unwrap() {
        RecordOutput::Wkt(wkt) => {
            assert_eq!(
                wkt,
                "MULTILINESTRINGZM((0 0 0 0,1 1 1 10),(5 5 2 20,6 6 3 30))"
            );
        }
        _ => panic!("expected wkt"),
    }
}
