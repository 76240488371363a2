use super::*;

#[test]
fn defaults_point_at_the_demo_layout() {
    let cfg = RunConfig::default();
    assert_eq!(cfg.states_path, Path::new("../GeoData/usa-states-census-2014.shp"));
    assert_eq!(cfg.frames_dir, Path::new("../data/demo_data"));
    assert_eq!(cfg.canvas().unwrap(), Canvas::new(1200, 500).unwrap());
    let opts = cfg.driver_opts().unwrap();
    assert_eq!(opts.frame_interval_ms, 1000);
    assert_eq!(opts.export_fps, Fps::new(2, 1).unwrap());
    assert!(opts.preload);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = RunConfig::from_json_str(
        r#"{
            "frames_dir": "runs/dfs",
            "canvas": { "width": 640, "height": 320 },
            "style": { "show_labels": false }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.frames_dir, Path::new("runs/dfs"));
    assert_eq!(cfg.canvas().unwrap(), Canvas::new(640, 320).unwrap());
    assert!(!cfg.style.show_labels);
    assert_eq!(cfg.interval_ms, 1000);
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(matches!(
        RunConfig::from_json_str(r#"{ "frame_dir": "x" }"#),
        Err(CityweaveError::Serde(_))
    ));
    assert!(RunConfig::from_json_str(r#"{ "interval_ms": 0 }"#).is_err());
    assert!(RunConfig::from_json_str(r#"{ "canvas": { "width": 0, "height": 10 } }"#).is_err());
    assert!(RunConfig::from_json_str(r#"{ "style": { "edge_alpha": 3 } }"#).is_err());
}

#[test]
fn data_root_rewrites_input_paths() {
    let cfg = RunConfig::default().with_data_root(Path::new("/srv/geo"));
    assert_eq!(cfg.cities_path, Path::new("/srv/geo/filtered_uscities_data.csv"));
    assert_eq!(cfg.edges_path, Path::new("/srv/geo/usdemo_graph.txt"));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RunConfig::load(&dir.path().join("run.json")).unwrap_err();
    assert!(matches!(err, CityweaveError::Input(_)));

    let p = dir.path().join("run.json");
    std::fs::write(&p, r#"{ "export_fps": 5 }"#).unwrap();
    assert_eq!(RunConfig::load(&p).unwrap().export_fps, 5);
}

#[test]
fn load_scene_surfaces_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig::default().with_data_root(dir.path());
    let err = cfg.load_scene().unwrap_err();
    assert!(err.to_string().contains("usa-states-census-2014.shp"));
}
