use shapefile::Point;

use super::*;

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x0, y1),
        Point::new(x1, y1),
        Point::new(x1, y0),
        Point::new(x0, y0),
    ]
}

#[test]
fn holes_attach_to_the_preceding_outer_ring() {
    let poly = shapefile::Polygon::with_rings(vec![
        PolygonRing::Outer(square(0.0, 0.0, 10.0, 10.0)),
        PolygonRing::Inner(square(2.0, 2.0, 4.0, 4.0)),
        PolygonRing::Outer(square(20.0, 0.0, 25.0, 5.0)),
    ]);
    let mp = polygon_to_geo(&poly);
    assert_eq!(mp.0.len(), 2);
    assert_eq!(mp.0[0].interiors().len(), 1);
    assert!(mp.0[1].interiors().is_empty());
    for p in &mp.0 {
        assert!(p.exterior().is_closed());
    }
}

#[test]
fn label_comes_from_character_field() {
    let mut record = Record::default();
    record.insert("STUSPS".to_string(), FieldValue::Character(Some("CA ".to_string())));
    record.insert("ALAND".to_string(), FieldValue::Numeric(Some(1.0)));

    assert_eq!(label_from_record(&record, DEFAULT_LABEL_FIELD).unwrap(), "CA");
    assert!(label_from_record(&record, "NAME").unwrap_err().contains("missing"));
    assert!(
        label_from_record(&record, "ALAND")
            .unwrap_err()
            .contains("not a character field")
    );
}

#[test]
fn load_rejects_non_shapefile_paths() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("states.csv");
    std::fs::write(&csv, b"x").unwrap();
    let err = load_states(&csv, DEFAULT_LABEL_FIELD).unwrap_err();
    assert!(matches!(err, CityweaveError::Input(_)));

    let err = load_states(&dir.path().join("absent.shp"), DEFAULT_LABEL_FIELD).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
