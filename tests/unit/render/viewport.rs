use super::*;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> geo::Rect<f64> {
    geo::Rect::new(geo::coord! { x: x0, y: y0 }, geo::coord! { x: x1, y: y1 })
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

#[test]
fn equator_box_fills_width_and_flips_y() {
    // Near the equator the aspect correction is ~1.
    let vp = Viewport::fit(rect(0.0, -1.0, 4.0, 1.0), Canvas::new(400, 240).unwrap(), 40.0).unwrap();
    let tl = vp.project(geo::coord! { x: 0.0, y: 1.0 });
    let br = vp.project(geo::coord! { x: 4.0, y: -1.0 });
    assert!(close(tl, Point::new(0.0, 40.0)));
    assert!(close(br, Point::new(400.0, 240.0)));
    assert!(vp.project(geo::coord! { x: 2.0, y: 0.5 }).y < vp.project(geo::coord! { x: 2.0, y: -0.5 }).y);
}

#[test]
fn latitude_is_stretched_away_from_the_equator() {
    let vp = Viewport::fit(rect(-10.0, 55.0, 10.0, 65.0), Canvas::new(1000, 1000).unwrap(), 0.0).unwrap();
    let a = vp.project(geo::coord! { x: 0.0, y: 60.0 });
    let right = vp.project(geo::coord! { x: 1.0, y: 60.0 });
    let up = vp.project(geo::coord! { x: 0.0, y: 61.0 });
    let dx = right.x - a.x;
    let dy = a.y - up.y;
    assert!((dy / dx - 2.0).abs() < 1e-9, "1/cos(60deg) == 2, got {}", dy / dx);
}

#[test]
fn map_is_centred_in_the_plot_area() {
    let vp = Viewport::fit(rect(0.0, 0.0, 1.0, 1.0), Canvas::new(300, 100).unwrap(), 0.0).unwrap();
    let c = vp.project(geo::coord! { x: 0.5, y: 0.5 });
    assert!((c.x - 150.0).abs() < 1e-6);
    assert!((c.y - 50.0).abs() < 1e-3);
    assert_eq!(vp.plot_area(), Rect::new(0.0, 0.0, 300.0, 100.0));
}

#[test]
fn single_point_bounds_are_padded() {
    let vp = Viewport::fit(rect(-118.0, 34.0, -118.0, 34.0), Canvas::default(), 30.0).unwrap();
    let p = vp.project(geo::coord! { x: -118.0, y: 34.0 });
    assert!(p.x.is_finite() && p.y.is_finite());
    assert!((p.x - 600.0).abs() < 1e-6);
}

#[test]
fn caption_band_must_leave_room() {
    let err = Viewport::fit(rect(0.0, 0.0, 1.0, 1.0), Canvas::new(100, 50).unwrap(), 50.0).unwrap_err();
    assert!(matches!(err, CityweaveError::Render(_)));
}
