use super::*;

fn write_csv(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let p = dir.path().join("cities.csv");
    std::fs::write(&p, body).unwrap();
    p
}

#[test]
fn loads_registry_with_descriptive_columns() {
    let dir = tempfile::tempdir().unwrap();
    let p = write_csv(
        &dir,
        "city,city_ascii,state_id,state_name,population,lat,lng,id,value\n\
         Los Angeles,Los Angeles,CA,California,12750807,34.0,-118.0,1,0\n\
         New York,New York,NY,New York,18713220,40.7,-74.0,2,0\n",
    );
    let table = load_cities(&p, &CityCsvSchema::default()).unwrap();
    assert_eq!(table.len(), 2);

    let la = table.lookup(NodeId(1)).unwrap();
    assert_eq!(la.name, "Los Angeles");
    assert_eq!(la.state_code, "CA");
    assert_eq!(la.population, Some(12_750_807));
    assert_eq!((la.lat, la.lng), (34.0, -118.0));
    assert_eq!(table.id_for("New York", "NY"), Some(NodeId(2)));
}

#[test]
fn descriptive_columns_are_optional() {
    let dir = tempfile::tempdir().unwrap();
    let p = write_csv(&dir, "id,lat,lng\n0,30.5,-97.7\n");
    let table = load_cities(&p, &CityCsvSchema::default()).unwrap();
    let n = table.lookup(NodeId(0)).unwrap();
    assert!(n.name.is_empty());
    assert_eq!(n.population, None);
}

#[test]
fn schema_renames_columns() {
    let dir = tempfile::tempdir().unwrap();
    let p = write_csv(&dir, "node,y,x\n7,45.0,-122.6\n");
    let schema = CityCsvSchema {
        id: "node".into(),
        lat: "y".into(),
        lng: "x".into(),
        ..CityCsvSchema::default()
    };
    let table = load_cities(&p, &schema).unwrap();
    assert_eq!(table.coord(NodeId(7)).unwrap(), geo::coord! { x: -122.6, y: 45.0 });
}

#[test]
fn missing_required_column_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = write_csv(&dir, "id,lat\n1,34.0\n");
    let err = load_cities(&p, &CityCsvSchema::default()).unwrap_err();
    assert!(matches!(err, CityweaveError::Input(_)));
    assert!(err.to_string().contains("'lng'"));
}

#[test]
fn bad_rows_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for body in [
        "id,lat,lng\n1,34.0,-118.0\n1,40.7,-74.0\n",
        "id,lat,lng\n-3,34.0,-118.0\n",
        "id,lat,lng\n1,,-118.0\n",
        "id,lat,lng\n1,134.0,-118.0\n",
    ] {
        let p = write_csv(&dir, body);
        let err = load_cities(&p, &CityCsvSchema::default()).unwrap_err();
        assert!(matches!(err, CityweaveError::Input(_)), "{body:?}: {err}");
    }
}

#[test]
fn schema_deserializes_partially() {
    let schema: CityCsvSchema = serde_json::from_str(r#"{ "id": "node" }"#).unwrap();
    assert_eq!(schema.id, "node");
    assert_eq!(schema.lat, "lat");
    assert!(serde_json::from_str::<CityCsvSchema>(r#"{ "lon": "x" }"#).is_err());
}
