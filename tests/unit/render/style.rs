use super::*;

#[test]
fn defaults_match_documented_values() {
    let s = StyleConfig::default();
    assert_eq!(s.normal_marker, MarkerShape::Cross);
    assert_eq!(s.visited_color, Rgba8::rgb(255, 255, 0));
    assert_eq!(s.ap_color, Rgba8::rgb(255, 0, 0));
    let edge = s.edge_paint();
    assert_eq!((edge.r, edge.g, edge.b), (0x66, 0x99, 0xcc));
    assert!((178..=179).contains(&edge.a));
    assert!(s.validate().is_ok());
}

#[test]
fn json_overrides_only_named_fields() {
    let s = StyleConfig::from_json_str(
        r##"{ "ap_marker": "D", "ap_color": "#00ff00", "fill_colormap": "tab10", "edge_alpha": 1.0 }"##,
    )
    .unwrap();
    assert_eq!(s.ap_marker, MarkerShape::Diamond);
    assert_eq!(s.ap_color, Rgba8::rgb(0, 255, 0));
    assert_eq!(s.fill_colormap, Colormap::Tab10);
    assert_eq!(s.visited_size, 10.0);
}

#[test]
fn unknown_fields_and_bad_values_are_rejected() {
    assert!(matches!(
        StyleConfig::from_json_str(r#"{ "edge_colour": "red" }"#),
        Err(CityweaveError::Serde(_))
    ));
    assert!(StyleConfig::from_json_str(r#"{ "normal_marker": "q" }"#).is_err());
    assert!(matches!(
        StyleConfig::from_json_str(r#"{ "edge_alpha": 1.5 }"#),
        Err(CityweaveError::Input(_))
    ));
    assert!(StyleConfig::from_json_str(r#"{ "ap_size": -1 }"#).is_err());
}

#[test]
fn listed_colormaps_span_the_palette() {
    assert_eq!(Colormap::Pastel1.color_at(0, 50), hex(0xfbb4ae));
    assert_eq!(Colormap::Pastel1.color_at(49, 50), hex(0xf2f2f2));
    assert_eq!(Colormap::Tab10.color_at(0, 1), hex(0x1f77b4));
    // Out-of-range indices clamp to the last colour.
    assert_eq!(Colormap::Set3.color_at(99, 3), hex(0xffed6f));
}

#[test]
fn viridis_interpolates_between_stops() {
    assert_eq!(Colormap::Viridis.color_at(0, 3), hex(0x440154));
    assert_eq!(Colormap::Viridis.color_at(1, 3), hex(0x21918c));
    assert_eq!(Colormap::Viridis.color_at(2, 3), hex(0xfde725));
}

#[test]
fn marker_strokes() {
    assert!(MarkerShape::Cross.is_stroked());
    assert!(!MarkerShape::Circle.is_stroked());
    let m: MarkerShape = serde_json::from_str(r#""^""#).unwrap();
    assert_eq!(m, MarkerShape::Triangle);
}
