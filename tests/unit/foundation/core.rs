use super::*;

#[test]
fn fps_validation() {
    assert!(Fps::new(2, 1).is_ok());
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(2, 0).is_err());
    let fps = Fps::new(2, 1).unwrap();
    assert_eq!(fps.as_f64(), 2.0);
}

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(64, 32).unwrap().rgba8_len(), 64 * 32 * 4);
}

#[test]
fn figsize_rounds_down_to_even_pixels() {
    let c = Canvas::from_figsize(12.0, 5.0, 100.0).unwrap();
    assert_eq!(c, Canvas::default());

    let c = Canvas::from_figsize(20.0, 8.0, 50.5).unwrap();
    assert_eq!(c.width % 2, 0);
    assert_eq!(c.height % 2, 0);
    assert_eq!(c.width, 1010);
    assert_eq!(c.height, 404);
}

#[test]
fn alpha_mul_and_premul() {
    let c = Rgba8::rgb(200, 100, 0).with_alpha_mul(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(c.to_premul_array(), [100, 50, 0, 128]);
    assert_eq!(Rgba8::rgb(1, 2, 3).to_premul_array(), [1, 2, 3, 255]);
}
