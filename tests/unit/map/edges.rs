use std::path::Path;

use super::*;
use crate::map::cities::CityNode;

fn two_cities() -> CityTable {
    CityTable::from_nodes(vec![
        CityNode::at(1, 34.0, -118.0),
        CityNode::at(2, 40.7, -74.0),
    ])
    .unwrap()
}

#[test]
fn parses_pairs_skipping_blank_and_comment_lines() {
    let text = "% generated by dfs\n1 2\n\n  2   1  \n";
    let pairs = parse_edge_list(text, Path::new("edges.txt")).unwrap();
    assert_eq!(pairs, vec![EdgePair::new(1, 2), EdgePair::new(2, 1)]);
}

#[test]
fn wrong_token_count_reports_line() {
    let err = parse_edge_list("1 2\n3\n", Path::new("edges.txt")).unwrap_err();
    match err {
        CityweaveError::Parse { line, ref path, .. } => {
            assert_eq!(line, 2);
            assert_eq!(path, Path::new("edges.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(parse_edge_list("1 2 3\n", Path::new("e")).is_err());
}

#[test]
fn negative_or_non_numeric_ids_are_parse_errors() {
    assert!(parse_edge_list("-1 2\n", Path::new("e")).is_err());
    assert!(parse_edge_list("a 2\n", Path::new("e")).is_err());
    assert!(parse_edge_list("1.5 2\n", Path::new("e")).is_err());
}

#[test]
fn example_edge_resolves_in_lng_lat_order() {
    let pairs = parse_edge_list("1 2", Path::new("e")).unwrap();
    let g = EdgeGeometry::build(&pairs, &two_cities()).unwrap();
    assert_eq!(g.len(), 1);
    let seg = g.segments()[0];
    assert_eq!((seg.start.x, seg.start.y), (-118.0, 34.0));
    assert_eq!((seg.end.x, seg.end.y), (-74.0, 40.7));
}

#[test]
fn output_preserves_length_and_order() {
    let cities = two_cities();
    let pairs = vec![
        EdgePair::new(2, 1),
        EdgePair::new(1, 2),
        EdgePair::new(1, 1),
    ];
    let g = EdgeGeometry::build(&pairs, &cities).unwrap();
    assert_eq!(g.len(), pairs.len());
    assert_eq!(g.pairs(), pairs.as_slice());
    for (pair, seg) in pairs.iter().zip(g.segments()) {
        assert_eq!(seg.start, cities.coord(pair.source).unwrap());
        assert_eq!(seg.end, cities.coord(pair.destination).unwrap());
    }
}

#[test]
fn unknown_endpoint_fails_the_whole_build() {
    let pairs = vec![EdgePair::new(1, 2), EdgePair::new(2, 7)];
    let err = EdgeGeometry::build(&pairs, &two_cities()).unwrap_err();
    assert!(err.is_reference());
    assert!(err.to_string().contains("node id 7"));
}
